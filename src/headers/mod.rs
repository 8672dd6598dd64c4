//! HTTP Header Multimap.
mod error;
mod name;
mod value;
mod map;

pub use error::HeaderError;
pub use name::{AsHeaderName, HeaderName, IntoHeaderName, standard};
pub use value::HeaderValue;
pub use map::{HeaderField, HeaderMap, Iter};

pub(crate) use name::is_token;

#[cfg(test)]
mod test;
