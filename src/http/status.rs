use std::num::NonZeroU16;

/// HTTP [Status Code][rfc].
///
/// Any three digit code is representable, only well known codes carry a reason phrase.
///
/// [rfc]: <https://datatracker.ietf.org/doc/html/rfc9110#name-status-codes>
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StatusCode(NonZeroU16);

impl Default for StatusCode {
    #[inline]
    fn default() -> Self {
        Self::OK
    }
}

impl StatusCode {
    /// Create [`StatusCode`] from integer.
    ///
    /// # Errors
    ///
    /// Returns error if code is not within `100..=999`.
    pub const fn from_u16(code: u16) -> Result<Self, InvalidStatusCode> {
        match code {
            100..=999 => match NonZeroU16::new(code) {
                Some(code) => Ok(Self(code)),
                None => Err(InvalidStatusCode),
            },
            _ => Err(InvalidStatusCode),
        }
    }

    /// Returns status code value, e.g: `200`.
    #[inline]
    pub const fn status(&self) -> u16 {
        self.0.get()
    }

    /// Returns `true` for `1xx` status code.
    #[inline]
    pub const fn is_informational(&self) -> bool {
        matches!(self.0.get(), 100..200)
    }

    /// Returns `true` for `2xx` status code.
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self.0.get(), 200..300)
    }

    /// Returns `true` for `4xx` status code.
    #[inline]
    pub const fn is_client_error(&self) -> bool {
        matches!(self.0.get(), 400..500)
    }

    /// Returns `true` for `5xx` status code.
    #[inline]
    pub const fn is_server_error(&self) -> bool {
        matches!(self.0.get(), 500..600)
    }

    /// Returns `false` for status code which response must not contain content, `1xx`, `204` and
    /// `304`.
    #[inline]
    pub const fn allows_body(&self) -> bool {
        !matches!(self.0.get(), 100..200 | 204 | 304)
    }
}

macro_rules! status_codes {
    (
        $(
            $(#[$doc:meta])*
            $int:literal $id:ident $msg:literal;
        )*
    ) => {
        impl StatusCode {
            /// Returns the canonical reason phrase, e.g: `"OK"`.
            ///
            /// Returns `None` for status code that is not well known.
            #[inline]
            pub const fn reason(&self) -> Option<&'static str> {
                match self.0.get() {
                    $(
                        $int => Some($msg),
                    )*
                    _ => None,
                }
            }

            $(
                $(#[$doc])*
                pub const $id: Self = match NonZeroU16::new($int) {
                    Some(code) => Self(code),
                    None => panic!("status code cannot be zero"),
                };
            )*
        }
    };
}

status_codes! {
    /// `100`. The client should continue the request.
    100 CONTINUE "Continue";
    /// `101`. The server is switching to the protocol requested by `Upgrade`.
    101 SWITCHING_PROTOCOLS "Switching Protocols";
    /// `200`. The request succeeded.
    200 OK "OK";
    /// `201`. The request succeeded, and a new resource was created as a result.
    201 CREATED "Created";
    /// `202`. The request has been received but not yet acted upon.
    202 ACCEPTED "Accepted";
    /// `204`. There is no content to send for this request.
    204 NO_CONTENT "No Content";
    /// `206`. Only part of the resource is sent, as requested by `Range`.
    206 PARTIAL_CONTENT "Partial Content";
    /// `301`. The resource has been moved permanently.
    301 MOVED_PERMANENTLY "Moved Permanently";
    /// `302`. The resource has been changed temporarily.
    302 FOUND "Found";
    /// `303`. Redirect the client to get the resource at another URI with GET.
    303 SEE_OTHER "See Other";
    /// `304`. The cached representation is still valid.
    304 NOT_MODIFIED "Not Modified";
    /// `307`. Redirect with the same method to another URI.
    307 TEMPORARY_REDIRECT "Temporary Redirect";
    /// `308`. Redirect permanently with the same method to another URI.
    308 PERMANENT_REDIRECT "Permanent Redirect";
    /// `400`. The request is malformed.
    400 BAD_REQUEST "Bad Request";
    /// `401`. The request lacks valid authentication credentials.
    401 UNAUTHORIZED "Unauthorized";
    /// `403`. The client identity is known but lacks access rights.
    403 FORBIDDEN "Forbidden";
    /// `404`. The server cannot find the requested resource.
    404 NOT_FOUND "Not Found";
    /// `405`. The method is known but not supported by the target resource.
    405 METHOD_NOT_ALLOWED "Method Not Allowed";
    /// `406`. No content conforms to the negotiation criteria.
    406 NOT_ACCEPTABLE "Not Acceptable";
    /// `408`. The server timed out waiting for the request.
    408 REQUEST_TIMEOUT "Request Timeout";
    /// `409`. The request conflicts with the current state of the resource.
    409 CONFLICT "Conflict";
    /// `410`. The resource is permanently gone.
    410 GONE "Gone";
    /// `411`. The server requires `Content-Length`.
    411 LENGTH_REQUIRED "Length Required";
    /// `413`. The request content is larger than the server limit.
    413 CONTENT_TOO_LARGE "Content Too Large";
    /// `414`. The request target is longer than the server limit.
    414 URI_TOO_LONG "URI Too Long";
    /// `415`. The media format of the request content is not supported.
    415 UNSUPPORTED_MEDIA_TYPE "Unsupported Media Type";
    /// `417`. The expectation in `Expect` cannot be met.
    417 EXPECTATION_FAILED "Expectation Failed";
    /// `422`. The request content is well-formed but semantically invalid.
    422 UNPROCESSABLE_CONTENT "Unprocessable Content";
    /// `429`. Too many requests in a given amount of time.
    429 TOO_MANY_REQUESTS "Too Many Requests";
    /// `431`. The request header fields are too large.
    431 REQUEST_HEADER_FIELDS_TOO_LARGE "Request Header Fields Too Large";
    /// `500`. The server encountered an unexpected condition.
    500 INTERNAL_SERVER_ERROR "Internal Server Error";
    /// `501`. The server does not support the functionality required.
    501 NOT_IMPLEMENTED "Not Implemented";
    /// `502`. The upstream server returned an invalid response.
    502 BAD_GATEWAY "Bad Gateway";
    /// `503`. The server is not ready to handle the request.
    503 SERVICE_UNAVAILABLE "Service Unavailable";
    /// `504`. The upstream server did not respond in time.
    504 GATEWAY_TIMEOUT "Gateway Timeout";
    /// `505`. The HTTP version used in the request is not supported.
    505 HTTP_VERSION_NOT_SUPPORTED "HTTP Version Not Supported";
}

impl TryFrom<u16> for StatusCode {
    type Error = InvalidStatusCode;

    #[inline]
    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::from_u16(value)
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.reason() {
            Some(reason) => write!(f, "{} {reason}", self.status()),
            None => write!(f, "{}", self.status()),
        }
    }
}

impl std::fmt::Debug for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_tuple("StatusCode").field(&self.status()).finish()
    }
}

// ===== Error =====

/// Status code is not a three digit integer.
#[derive(Debug, thiserror::Error)]
#[error("invalid status code")]
pub struct InvalidStatusCode;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn status_code() {
        assert_eq!(StatusCode::NOT_FOUND.to_string(), "404 Not Found");
        assert_eq!(StatusCode::from_u16(299).unwrap().to_string(), "299");
        assert!(StatusCode::from_u16(99).is_err());
        assert!(StatusCode::from_u16(1000).is_err());
        assert!(!StatusCode::NO_CONTENT.allows_body());
        assert!(!StatusCode::CONTINUE.allows_body());
        assert!(StatusCode::OK.allows_body());
    }
}
