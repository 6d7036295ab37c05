//! Opening image references as seekable byte streams

use log::debug;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use url::Url;

use crate::io::seekable::SeekableReader;

use super::request::ImageReference;

/// Default read buffer for opened files
pub const DEFAULT_BUFFER_CAPACITY: usize = 1024 * 1024;

/// Opens image references
///
/// Every returned handle is owned by the caller and closed when dropped.
pub trait ResourceResolver: Send + Sync {
    fn open(&self, reference: &ImageReference) -> io::Result<Box<dyn SeekableReader>>;
}

/// Resolves local paths and `file://` URIs
#[derive(Debug, Clone)]
pub struct FileResolver {
    buffer_capacity: usize,
}

impl FileResolver {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUFFER_CAPACITY)
    }

    pub fn with_capacity(buffer_capacity: usize) -> Self {
        FileResolver { buffer_capacity: buffer_capacity.max(1) }
    }

    /// Maps a reference to a local path
    ///
    /// References with a scheme other than `file` are not supported. Strings
    /// that do not parse as URLs, and Windows drive letters, are taken as paths.
    pub fn to_path(&self, reference: &ImageReference) -> io::Result<PathBuf> {
        let locator = reference.as_str();
        match Url::parse(locator) {
            Ok(url) if url.scheme() == "file" => url.to_file_path().map_err(|_| {
                io::Error::new(io::ErrorKind::InvalidInput, format!("Not a local file URI: {}", locator))
            }),
            Ok(url) if url.scheme().len() > 1 => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!("Unsupported URI scheme '{}' in {}", url.scheme(), locator),
            )),
            _ => Ok(PathBuf::from(locator)),
        }
    }
}

impl Default for FileResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceResolver for FileResolver {
    fn open(&self, reference: &ImageReference) -> io::Result<Box<dyn SeekableReader>> {
        let path = self.to_path(reference)?;
        debug!("Opening {}", path.display());
        let file = File::open(&path)?;
        Ok(Box::new(BufReader::with_capacity(self.buffer_capacity, file)))
    }
}
