//! Decoding of page regions from multi-page TIFF images
//!
//! The entry points are [`RegionFetcher::fetch`] for library callers and
//! [`RegionChannel::handle`] for method-call style callers, which answer with
//! the `getRegion-tiff-null` and `getRegion-tiff-read-exception` error codes.

pub mod io;
pub mod tiff;
pub mod utils;
pub mod compression;
pub mod decoder;
pub mod fetcher;
pub mod channel;
pub mod config;
pub mod commands;

pub use channel::{Argument, MethodCall, MethodReply, RegionChannel};
pub use config::Settings;
pub use decoder::{DecodeOptions, PixelBuffer, Region, RegionDecoder, RegionPolicy, TiffRegionDecoder};
pub use fetcher::{DecodeRequest, FetchError, FetchErrorKind, ImageReference, RawPixelBytes, RegionFetcher};
pub use tiff::TiffReader;
