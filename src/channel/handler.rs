//! Dispatch of method calls to the fetcher

use log::{debug, warn};

use crate::decoder::Region;
use crate::fetcher::{DecodeRequest, ImageReference, RegionFetcher};

use super::message::{Argument, MethodCall, MethodReply};

/// Name of the region fetch method
pub const METHOD_GET_REGION: &str = "getRegion";
/// Error code for missing or mistyped arguments
pub const CODE_BAD_ARGUMENTS: &str = "getRegion-args";

/// Answers method calls using a `RegionFetcher`
pub struct RegionChannel {
    fetcher: RegionFetcher,
}

impl RegionChannel {
    pub fn new(fetcher: RegionFetcher) -> Self {
        RegionChannel { fetcher }
    }

    pub fn fetcher(&self) -> &RegionFetcher {
        &self.fetcher
    }

    /// Handles one call and returns its reply
    pub fn handle(&self, call: &MethodCall) -> MethodReply {
        match call.method.as_str() {
            METHOD_GET_REGION => self.get_region(call),
            other => {
                debug!("Method not implemented: {}", other);
                MethodReply::NotImplemented
            }
        }
    }

    fn get_region(&self, call: &MethodCall) -> MethodReply {
        let request = match parse_request(call) {
            Ok(request) => request,
            Err(message) => {
                warn!("Rejected {} call: {}", METHOD_GET_REGION, message);
                return MethodReply::error(CODE_BAD_ARGUMENTS, message, None);
            }
        };

        match self.fetcher.fetch(&request) {
            Ok(pixels) => MethodReply::Success(pixels.into_bytes()),
            Err(e) => MethodReply::error(e.code(), e.message, e.details),
        }
    }
}

impl Default for RegionChannel {
    fn default() -> Self {
        RegionChannel::new(RegionFetcher::default())
    }
}

fn parse_request(call: &MethodCall) -> Result<DecodeRequest, String> {
    let uri = match call.get("uri") {
        Some(Argument::Str(uri)) => uri.clone(),
        Some(other) => return Err(format!("Argument 'uri' must be a string, got {:?}", other)),
        None => return Err("Missing argument 'uri'".to_string()),
    };

    let page = match call.get("pageId") {
        None | Some(Argument::Null) => 0,
        Some(_) => int_arg(call, "pageId")?,
    };
    let page = usize::try_from(page).map_err(|_| format!("Argument 'pageId' out of range: {}", page))?;

    let sample_size = int_arg(call, "sampleSize")?;
    let sample_size = u32::try_from(sample_size)
        .map_err(|_| format!("Argument 'sampleSize' out of range: {}", sample_size))?;

    let region = Region::new(
        i32_arg(call, "regionX")?,
        i32_arg(call, "regionY")?,
        i32_arg(call, "regionWidth")?,
        i32_arg(call, "regionHeight")?,
    );

    Ok(DecodeRequest::new(ImageReference::new(uri), region)
        .page(page)
        .sample_size(sample_size))
}

fn int_arg(call: &MethodCall, name: &str) -> Result<i64, String> {
    match call.get(name) {
        Some(Argument::Int(value)) => Ok(*value),
        Some(other) => Err(format!("Argument '{}' must be an integer, got {:?}", name, other)),
        None => Err(format!("Missing argument '{}'", name)),
    }
}

fn i32_arg(call: &MethodCall, name: &str) -> Result<i32, String> {
    let value = int_arg(call, name)?;
    i32::try_from(value).map_err(|_| format!("Argument '{}' out of range: {}", name, value))
}
