//! I/O utilities for file handling
//!
//! Seekable reader abstraction and byte-order strategies used while
//! walking TIFF structures.

pub mod seekable;
pub mod byte_order;
