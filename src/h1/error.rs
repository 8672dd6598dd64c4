use crate::headers::HeaderName;
use crate::http::StatusCode;

/// An error that can occur when decoding a request.
///
/// Every variant maps to exactly one response status, see [`DecodeError::status`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Request method is a valid token but not supported.
    #[error("unsupported method")]
    UnsupportedMethod,
    /// Request line is not `method SP target SP version`.
    #[error("invalid request line")]
    InvalidRequestLine,
    /// Request target exceeds the configured limit.
    #[error("request target too long")]
    PathTooLong,
    /// Request target is not a valid origin form path.
    #[error("invalid request target")]
    InvalidPath,
    /// Protocol version is not HTTP/1.0 or HTTP/1.1.
    #[error("unsupported http version")]
    UnsupportedVersion,
    /// Header line is not `name: value`.
    #[error("invalid header")]
    InvalidHeader,
    /// Singular header field occurs more than once.
    #[error("duplicate `{0}` header")]
    DuplicateHeader(HeaderName),
    /// Header section exceeds the configured limit.
    #[error("request header too large")]
    HeadersTooLarge,
    /// Both content-length and transfer-encoding is present.
    #[error("both content-length and transfer-encoding present")]
    ConflictingFraming,
    /// Content-length is not a decimal integer.
    #[error("invalid content-length")]
    InvalidContentLength,
    /// Transfer coding other than chunked.
    #[error("unsupported transfer-encoding")]
    UnsupportedEncoding,
    /// Malformed chunked body.
    #[error("invalid chunked body")]
    InvalidChunk,
    /// Body exceeds the configured limit.
    #[error("request body too large")]
    BodyTooLarge,
}

impl DecodeError {
    /// Returns the response status for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::PathTooLong => StatusCode::URI_TOO_LONG,
            Self::HeadersTooLarge => StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE,
            Self::BodyTooLarge => StatusCode::CONTENT_TOO_LARGE,
            Self::UnsupportedVersion => StatusCode::HTTP_VERSION_NOT_SUPPORTED,
            Self::UnsupportedEncoding => StatusCode::NOT_IMPLEMENTED,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
