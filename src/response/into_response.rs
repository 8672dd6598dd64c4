use bytes::Bytes;

use crate::h1::DecodeError;
use crate::headers::{HeaderValue, standard};
use crate::http::{StatusCode, mime};
use crate::response::Response;

/// A type that can be converted into response.
///
/// This trait is used as request handler return type.
pub trait IntoResponse {
    /// Convert into [`Response`].
    fn into_response(self) -> Response;
}

macro_rules! into_response {
    ($target:ty, $self:ident => $body:expr) => {
        impl IntoResponse for $target {
            fn into_response($self) -> Response {
                $body
            }
        }
    };
}

impl<T, E> IntoResponse for Result<T, E>
where
    T: IntoResponse,
    E: IntoResponse,
{
    fn into_response(self) -> Response {
        match self {
            Ok(ok) => ok.into_response(),
            Err(err) => err.into_response(),
        }
    }
}

/// Override the status of the inner response.
impl<T: IntoResponse> IntoResponse for (StatusCode, T) {
    fn into_response(self) -> Response {
        let mut res = self.1.into_response();
        res.set_status(self.0);
        res
    }
}

into_response!((), self => Response::default());
into_response!(Response, self => self);
into_response!(StatusCode, self => Response::with_status(self));
into_response!(&'static str, self => Response::text(self));
into_response!(String, self => Response::text(self));
into_response!(Bytes, self => Response::typed(mime::APPLICATION_OCTET_STREAM, self));
into_response!(Vec<u8>, self => Response::typed(mime::APPLICATION_OCTET_STREAM, self));
into_response!(std::convert::Infallible, self => match self { });

// plain text error, the connection is closed after
into_response!(DecodeError, self => {
    let mut res = (self.status(), self.to_string()).into_response();
    res.headers_mut().insert(standard::CONNECTION, HeaderValue::from_static("close"));
    res
});
