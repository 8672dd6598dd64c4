//! HTTP Request
use std::net::SocketAddr;

use crate::body::Body;
use crate::bytestr::ByteStr;
use crate::headers::{AsHeaderName, HeaderMap, standard};
use crate::http::{Method, Version};

/// HTTP Request Parts.
#[derive(Debug, Clone, Default)]
pub struct Parts {
    pub method: Method,
    /// Request target as received, for logging.
    pub target: ByteStr,
    /// Percent-decoded and normalized path, used for route matching.
    pub path: String,
    /// Query pairs in order of appearance, keys may repeat.
    pub query: Vec<(String, String)>,
    pub version: Version,
    pub headers: HeaderMap,
    /// Remote peer address, if the transport has one.
    pub remote: Option<SocketAddr>,
    /// Position of the request within its connection, starting at 1.
    pub seq: u64,
}

/// HTTP Request.
#[derive(Debug, Default)]
pub struct Request {
    parts: Parts,
    body: Body,
}

/// Constructor
impl Request {
    /// Create [`Request`] from [`Parts`] and [`Body`].
    #[inline]
    pub fn from_parts(parts: Parts, body: Body) -> Self {
        Self { parts, body }
    }

    /// Destruct request into [`Parts`] and [`Body`].
    #[inline]
    pub fn into_parts(self) -> (Parts, Body) {
        (self.parts, self.body)
    }
}

impl Request {
    /// Returns shared reference to [`Parts`].
    #[inline]
    pub fn parts(&self) -> &Parts {
        &self.parts
    }

    /// Returns mutable reference to [`Parts`].
    #[inline]
    pub fn parts_mut(&mut self) -> &mut Parts {
        &mut self.parts
    }

    /// Returns the request [`Method`].
    #[inline]
    pub fn method(&self) -> Method {
        self.parts.method
    }

    /// Returns the request target as received.
    #[inline]
    pub fn target(&self) -> &str {
        &self.parts.target
    }

    /// Returns the decoded and normalized path.
    #[inline]
    pub fn path(&self) -> &str {
        &self.parts.path
    }

    /// Returns query pairs.
    #[inline]
    pub fn query(&self) -> &[(String, String)] {
        &self.parts.query
    }

    /// Returns the first query value for `key`.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.parts
            .query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the protocol [`Version`].
    #[inline]
    pub fn version(&self) -> Version {
        self.parts.version
    }

    /// Returns shared reference to [`HeaderMap`].
    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    /// Returns the first header value for `name` as `str`.
    #[inline]
    pub fn header<K: AsHeaderName>(&self, name: K) -> Option<&str> {
        self.parts.headers.get_str(name)
    }

    /// Returns the remote peer address.
    #[inline]
    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.parts.remote
    }

    /// Returns the position of the request within its connection.
    #[inline]
    pub fn seq(&self) -> u64 {
        self.parts.seq
    }

    /// Returns shared reference to [`Body`].
    #[inline]
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Consume request into [`Body`].
    #[inline]
    pub fn into_body(self) -> Body {
        self.body
    }

    /// Returns `true` if the client wants the connection to persist.
    ///
    /// HTTP/1.1 persists unless `Connection: close`, HTTP/1.0 requires `Connection: keep-alive`.
    pub fn keep_alive(&self) -> bool {
        let headers = &self.parts.headers;
        if headers.has_token(standard::CONNECTION, "close") {
            false
        } else if self.parts.version.is_persistent_default() {
            true
        } else {
            headers.has_token(standard::CONNECTION, "keep-alive")
        }
    }

    /// Deserialize JSON body.
    #[cfg(feature = "json")]
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(self.body.as_bytes())
    }
}
