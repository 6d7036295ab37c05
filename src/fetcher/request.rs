//! Request and result types of a fetch

use std::fmt;
use std::path::Path;

use crate::decoder::{DecodeOptions, PixelBuffer, Region};

/// Opaque locator of an image: a local path or a `file://` URI
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageReference(String);

impl ImageReference {
    pub fn new(locator: impl Into<String>) -> Self {
        ImageReference(locator.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageReference {
    fn from(locator: &str) -> Self {
        ImageReference::new(locator)
    }
}

impl From<String> for ImageReference {
    fn from(locator: String) -> Self {
        ImageReference(locator)
    }
}

impl From<&Path> for ImageReference {
    fn from(path: &Path) -> Self {
        ImageReference(path.to_string_lossy().into_owned())
    }
}

/// One region request: which image, which page, which area, how coarse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeRequest {
    pub reference: ImageReference,
    pub page: usize,
    pub sample_size: u32,
    pub region: Region,
}

impl DecodeRequest {
    /// Request for `region` of the first page at full resolution
    pub fn new(reference: impl Into<ImageReference>, region: Region) -> Self {
        DecodeRequest {
            reference: reference.into(),
            page: 0,
            sample_size: 1,
            region,
        }
    }

    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn sample_size(mut self, sample_size: u32) -> Self {
        self.sample_size = sample_size;
        self
    }

    pub(crate) fn options(&self) -> DecodeOptions {
        DecodeOptions {
            page: self.page,
            sample_size: self.sample_size,
            region: self.region,
        }
    }
}

/// Decoded region as interleaved RGBA8, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPixelBytes {
    pub width: u32,
    pub height: u32,
    data: Vec<u8>,
}

impl RawPixelBytes {
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<PixelBuffer> for RawPixelBytes {
    fn from(buffer: PixelBuffer) -> Self {
        RawPixelBytes {
            width: buffer.width,
            height: buffer.height,
            data: buffer.data,
        }
    }
}
