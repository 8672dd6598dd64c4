//! HTTP Protocol.
mod method;
mod status;
mod version;
mod date;

pub mod mime;

pub use method::{Method, MethodSet, UnknownMethod};
pub use version::Version;
pub use status::{InvalidStatusCode, StatusCode};
pub use date::{httpdate, httpdate_now};
