//! HTTP/1.1 Protocol.
//!
//! - [`parser`] contains line level parsers for request line and header fields.
//! - [`chunked`] contains chunked transfer coding decoder and encoder.
//! - [`RequestDecoder`] integrates all the components above into incremental request decoding.
pub mod parser;
pub mod chunked;
mod error;
mod decoder;

pub use error::DecodeError;
pub use decoder::{DecodeOutcome, Limits, RequestDecoder};

#[cfg(test)]
mod test;
