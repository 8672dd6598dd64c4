//! HTTP Response
//!
//! Response is built once, then handed to exactly one writer in [`writer`]. Writer selection
//! depends on the body: a body with known length is written with `Content-Length`, a streaming
//! body is written with chunked transfer coding.
use bytes::Bytes;

use crate::body::ResBody;
use crate::headers::{HeaderMap, HeaderValue, standard};
use crate::http::{StatusCode, mime};

mod builder;
mod into_response;
pub mod writer;

pub use builder::{BuildError, ResponseBuilder};
pub use into_response::IntoResponse;


/// HTTP Response.
#[derive(Debug, Default)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: ResBody,
}

/// Construction methods
impl Response {
    /// Create `200 OK` response with given body.
    pub fn new(body: impl Into<ResBody>) -> Response {
        Response {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Create [`ResponseBuilder`].
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder::new()
    }

    /// Create response with given status and empty body.
    pub fn with_status(status: StatusCode) -> Response {
        Response {
            status,
            headers: HeaderMap::new(),
            body: ResBody::empty(),
        }
    }

    /// Create `200 OK` plain text response.
    pub fn text(body: impl Into<String>) -> Response {
        Self::typed(mime::TEXT_PLAIN, body.into().into_bytes())
    }

    /// Create `200 OK` html response.
    pub fn html(body: impl Into<String>) -> Response {
        Self::typed(mime::TEXT_HTML, body.into().into_bytes())
    }

    /// Create `200 OK` response with given content type.
    pub fn typed(content_type: &'static str, body: impl Into<Bytes>) -> Response {
        let mut res = Response::new(ResBody::full(body));
        res.headers
            .insert(standard::CONTENT_TYPE, HeaderValue::from_static(content_type));
        res
    }

    /// Create `200 OK` json response.
    ///
    /// # Errors
    ///
    /// Returns error if `value` fails to serialize.
    #[cfg(feature = "json")]
    pub fn json<T: serde::Serialize + ?Sized>(value: &T) -> Result<Response, serde_json::Error> {
        Ok(Self::typed(mime::APPLICATION_JSON, serde_json::to_vec(value)?))
    }

    /// Create response from its parts.
    pub fn from_parts(status: StatusCode, headers: HeaderMap, body: ResBody) -> Response {
        Response { status, headers, body }
    }

    /// Destruct response into its parts.
    pub fn into_parts(self) -> (StatusCode, HeaderMap, ResBody) {
        (self.status, self.headers, self.body)
    }
}

impl Response {
    /// Returns the response [`StatusCode`].
    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Set the response status.
    #[inline]
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Returns shared reference to [`HeaderMap`].
    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns mutable reference to [`HeaderMap`].
    #[inline]
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Returns shared reference to [`ResBody`].
    #[inline]
    pub fn body(&self) -> &ResBody {
        &self.body
    }

    /// Consume response into [`ResBody`].
    #[inline]
    pub fn into_body(self) -> ResBody {
        self.body
    }
}
