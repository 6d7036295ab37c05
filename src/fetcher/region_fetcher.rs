//! The fetch operation

use log::{debug, warn};

use crate::decoder::{Region, RegionDecoder, TiffRegionDecoder};

use super::errors::{FetchError, FetchErrorKind, FetchResult};
use super::request::{DecodeRequest, ImageReference, RawPixelBytes};
use super::resolver::{FileResolver, ResourceResolver};

/// Fetches decoded page regions
///
/// Holds no per-call state; `fetch` may run concurrently on many threads.
pub struct RegionFetcher {
    resolver: Box<dyn ResourceResolver>,
    decoder: Box<dyn RegionDecoder>,
}

impl RegionFetcher {
    pub fn new(resolver: Box<dyn ResourceResolver>, decoder: Box<dyn RegionDecoder>) -> Self {
        RegionFetcher { resolver, decoder }
    }

    /// Fetches `request.region` of `request.page`, sampled by `request.sample_size`
    ///
    /// The opened handle lives for the duration of the call only.
    pub fn fetch(&self, request: &DecodeRequest) -> FetchResult<RawPixelBytes> {
        debug!("Fetching uri={} page={} sampleSize={} regionRect={}",
               request.reference, request.page, request.sample_size, request.region);

        let mut source = self.resolver.open(&request.reference).map_err(|e| {
            warn!("Cannot open {}: {}", request.reference, e);
            FetchError::new(FetchErrorKind::ResourceUnavailable, read_failure_message(request))
                .with_details(e.to_string())
        })?;

        let decoded = self.decoder.decode(source.as_mut(), &request.options());
        drop(source);

        match decoded {
            Ok(Some(buffer)) => {
                debug!("Fetched {}x{} region from {}", buffer.width, buffer.height, request.reference);
                Ok(RawPixelBytes::from(buffer))
            }
            Ok(None) => Err(FetchError::new(
                FetchErrorKind::DecodeFailed,
                format!("failed to decode region for uri={} page={} regionRect={}",
                        request.reference, request.page, request.region),
            )),
            Err(e) => {
                warn!("Reading {} failed: {}", request.reference, e);
                Err(FetchError::new(FetchErrorKind::ReadException, read_failure_message(request))
                    .with_details(e.to_string()))
            }
        }
    }

    /// Shorthand for `fetch` with a request built from its parts
    pub fn fetch_region(
        &self,
        reference: impl Into<ImageReference>,
        sample_size: u32,
        region: Region,
        page: usize,
    ) -> FetchResult<RawPixelBytes> {
        let request = DecodeRequest::new(reference, region)
            .page(page)
            .sample_size(sample_size);
        self.fetch(&request)
    }
}

impl Default for RegionFetcher {
    fn default() -> Self {
        RegionFetcher::new(Box::new(FileResolver::new()), Box::new(TiffRegionDecoder::default()))
    }
}

fn read_failure_message(request: &DecodeRequest) -> String {
    format!("failed to read from uri={} page={} regionRect={}",
            request.reference, request.page, request.region)
}
