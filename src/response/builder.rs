use crate::body::ResBody;
use crate::headers::{HeaderError, HeaderMap, HeaderName, HeaderValue};
use crate::http::{InvalidStatusCode, StatusCode};
use crate::response::Response;

/// An error that can occur when building [`Response`].
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Header is set after the body is attached.
    #[error("header set after body is attached")]
    HeaderAfterBody,
    /// Invalid header name or value.
    #[error("invalid header: {0}")]
    InvalidHeader(#[from] HeaderError),
    /// Status code is not a three digit integer.
    #[error(transparent)]
    InvalidStatus(#[from] InvalidStatusCode),
}

/// [`Response`] builder.
///
/// Headers must be set before the body is attached. The first error is kept and returned by
/// [`build`][ResponseBuilder::build], subsequent calls are ignored.
///
/// ```
/// use tsuna::Response;
/// use tsuna::http::StatusCode;
///
/// let res = Response::builder()
///     .status(StatusCode::CREATED)
///     .header("location", "/users/42")
///     .body("created")
///     .build()
///     .unwrap();
///
/// assert_eq!(res.status(), StatusCode::CREATED);
/// ```
#[derive(Debug)]
pub struct ResponseBuilder {
    inner: Result<Parts, BuildError>,
}

#[derive(Debug, Default)]
struct Parts {
    status: StatusCode,
    headers: HeaderMap,
    body: Option<ResBody>,
}

impl From<std::convert::Infallible> for BuildError {
    fn from(value: std::convert::Infallible) -> Self {
        match value {}
    }
}

impl Default for ResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseBuilder {
    /// Create new [`ResponseBuilder`] with `200 OK` status.
    pub fn new() -> Self {
        Self {
            inner: Ok(Parts::default()),
        }
    }

    /// Set response status.
    pub fn status<S>(self, status: S) -> Self
    where
        S: TryInto<StatusCode>,
        BuildError: From<S::Error>,
    {
        self.and_then(|mut parts| {
            parts.status = status.try_into()?;
            Ok(parts)
        })
    }

    /// Append a header.
    pub fn header<K, V>(self, name: K, value: V) -> Self
    where
        K: TryInto<HeaderName>,
        V: TryInto<HeaderValue>,
        HeaderError: From<K::Error> + From<V::Error>,
    {
        self.and_then(|mut parts| {
            if parts.body.is_some() {
                return Err(BuildError::HeaderAfterBody);
            }
            let name = name.try_into().map_err(HeaderError::from)?;
            let value = value.try_into().map_err(HeaderError::from)?;
            parts.headers.append(name, value);
            Ok(parts)
        })
    }

    /// Attach the response body.
    pub fn body(self, body: impl Into<ResBody>) -> Self {
        self.and_then(|mut parts| {
            parts.body = Some(body.into());
            Ok(parts)
        })
    }

    /// Build the [`Response`].
    ///
    /// # Errors
    ///
    /// Returns the first error occured while building.
    pub fn build(self) -> Result<Response, BuildError> {
        let Parts { status, headers, body } = self.inner?;
        Ok(Response::from_parts(status, headers, body.unwrap_or_default()))
    }

    fn and_then(self, f: impl FnOnce(Parts) -> Result<Parts, BuildError>) -> Self {
        Self {
            inner: self.inner.and_then(f),
        }
    }
}
