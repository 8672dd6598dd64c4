//! Request and Response Body.
use bytes::Bytes;
use futures_core::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

/// Boxed error produced by a streaming body.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

// ===== Request Body =====

/// HTTP Request body.
///
/// The body is fully buffered by the decoder, bounded by the configured limit.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Body {
    bytes: Bytes,
}

impl Body {
    /// Create new [`Body`].
    #[inline]
    pub fn new(bytes: Bytes) -> Self {
        Self { bytes }
    }

    /// Create an empty [`Body`].
    #[inline]
    pub const fn empty() -> Self {
        Self { bytes: Bytes::new() }
    }

    /// Returns body length.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if body is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns body as byte slice.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns body as `str` if it is valid UTF-8.
    #[inline]
    pub fn to_str(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.bytes)
    }

    /// Consume body into [`Bytes`].
    #[inline]
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

impl std::fmt::Debug for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Body").field(&self.bytes.len()).finish()
    }
}

// ===== Response Body =====

/// HTTP Response body.
///
/// Either a finite buffer where length is known up front, or a stream of chunks where length is
/// unknown until exhausted.
#[derive(Default)]
pub struct ResBody {
    repr: Repr,
}

#[derive(Default)]
pub(crate) enum Repr {
    #[default]
    Empty,
    Full(Bytes),
    Stream(BodyStream),
}

/// Chunk stream of a [`ResBody`].
pub(crate) type BodyStream = Pin<Box<dyn Stream<Item = Result<Bytes, BoxError>> + Send>>;

/// Default chunk size used by [`ResBody::chunked`].
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

impl ResBody {
    /// Create an empty body.
    #[inline]
    pub const fn empty() -> Self {
        Self { repr: Repr::Empty }
    }

    /// Create body with known length.
    #[inline]
    pub fn full(bytes: impl Into<Bytes>) -> Self {
        Self {
            repr: Repr::Full(bytes.into()),
        }
    }

    /// Create a body from a stream of chunks.
    ///
    /// Empty chunks are skipped. An error from the stream aborts the connection, as the status
    /// line has already been sent.
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, BoxError>> + Send + 'static,
    {
        Self {
            repr: Repr::Stream(Box::pin(stream)),
        }
    }

    /// Create a streaming body which sends `bytes` in chunks of `chunk_size`.
    ///
    /// A zero `chunk_size` is replaced with [`DEFAULT_CHUNK_SIZE`].
    pub fn chunked(bytes: impl Into<Bytes>, chunk_size: usize) -> Self {
        let chunk_size = match chunk_size {
            0 => DEFAULT_CHUNK_SIZE,
            n => n,
        };
        Self::from_stream(SplitChunks {
            bytes: bytes.into(),
            chunk_size,
        })
    }

    /// Create a streaming body fed by the returned [`BodySender`].
    ///
    /// The body ends when the sender is dropped.
    pub fn channel(buffer: usize) -> (BodySender, ResBody) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (BodySender { tx }, Self::from_stream(Receiver { rx }))
    }

    /// Returns the body length if it is known up front.
    pub fn len(&self) -> Option<u64> {
        match &self.repr {
            Repr::Empty => Some(0),
            Repr::Full(bytes) => Some(bytes.len() as u64),
            Repr::Stream(_) => None,
        }
    }

    /// Returns `true` if body is known to be empty.
    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Returns `true` if body is a stream.
    pub fn is_stream(&self) -> bool {
        matches!(self.repr, Repr::Stream(_))
    }

    pub(crate) fn into_repr(self) -> Repr {
        self.repr
    }
}

impl From<Bytes> for ResBody {
    fn from(value: Bytes) -> Self {
        Self::full(value)
    }
}

impl From<&'static [u8]> for ResBody {
    fn from(value: &'static [u8]) -> Self {
        Self::full(Bytes::from_static(value))
    }
}

impl From<&'static str> for ResBody {
    fn from(value: &'static str) -> Self {
        Self::full(Bytes::from_static(value.as_bytes()))
    }
}

impl From<Vec<u8>> for ResBody {
    fn from(value: Vec<u8>) -> Self {
        Self::full(value)
    }
}

impl From<String> for ResBody {
    fn from(value: String) -> Self {
        Self::full(value.into_bytes())
    }
}

impl std::fmt::Debug for ResBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.repr {
            Repr::Empty => f.debug_tuple("ResBody").field(&"Empty").finish(),
            Repr::Full(b) => f.debug_tuple("ResBody").field(&b.len()).finish(),
            Repr::Stream(_) => f.debug_tuple("ResBody").field(&"Stream").finish(),
        }
    }
}

// ===== Streams =====

struct SplitChunks {
    bytes: Bytes,
    chunk_size: usize,
}

impl Stream for SplitChunks {
    type Item = Result<Bytes, BoxError>;

    fn poll_next(mut self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.bytes.is_empty() {
            return Poll::Ready(None);
        }
        let len = self.chunk_size.min(self.bytes.len());
        Poll::Ready(Some(Ok(self.bytes.split_to(len))))
    }
}

struct Receiver {
    rx: mpsc::Receiver<Result<Bytes, BoxError>>,
}

impl Stream for Receiver {
    type Item = Result<Bytes, BoxError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

/// Sending half of [`ResBody::channel`].
#[derive(Debug, Clone)]
pub struct BodySender {
    tx: mpsc::Sender<Result<Bytes, BoxError>>,
}

/// The receiving body has been dropped, usually because the connection is closed.
#[derive(Debug, thiserror::Error)]
#[error("response body closed")]
pub struct BodyClosed;

impl BodySender {
    /// Send a chunk, waiting for capacity.
    pub async fn send(&self, chunk: impl Into<Bytes>) -> Result<(), BodyClosed> {
        self.tx.send(Ok(chunk.into())).await.map_err(|_| BodyClosed)
    }

    /// Abort the body with an error, the connection will be closed.
    pub async fn abort(self, err: impl Into<BoxError>) {
        let _ = self.tx.send(Err(err.into())).await;
    }
}
