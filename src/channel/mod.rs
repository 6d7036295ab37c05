//! Method-call boundary
//!
//! Callers outside the crate reach the fetcher through named method calls
//! with loosely typed arguments. `RegionChannel` decodes the arguments,
//! runs the fetch and answers every call with exactly one `MethodReply`.

mod handler;
mod message;

pub use handler::{RegionChannel, CODE_BAD_ARGUMENTS, METHOD_GET_REGION};
pub use message::{Argument, MethodCall, MethodReply};
