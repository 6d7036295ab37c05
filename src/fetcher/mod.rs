//! Region fetching
//!
//! `RegionFetcher` turns a `DecodeRequest` into raw RGBA bytes: it opens the
//! referenced resource through a `ResourceResolver`, hands the stream to a
//! `RegionDecoder` and maps every outcome to a `RawPixelBytes` or a
//! `FetchError`.

mod errors;
mod region_fetcher;
mod request;
mod resolver;

pub use errors::{FetchError, FetchErrorKind, FetchResult, CODE_DECODE_FAILED, CODE_READ_EXCEPTION};
pub use region_fetcher::RegionFetcher;
pub use request::{DecodeRequest, ImageReference, RawPixelBytes};
pub use resolver::{FileResolver, ResourceResolver, DEFAULT_BUFFER_CAPACITY};
