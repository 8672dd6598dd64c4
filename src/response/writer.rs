//! Response serialization.
//!
//! - [`DefaultWriter`] writes body with known length, framed by `Content-Length`.
//! - [`ChunkedWriter`] writes body with unknown length using chunked transfer coding.
//!
//! [`write_response`] selects the writer for a [`Response`].
use bytes::{Bytes, BytesMut};
use std::io;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::body::{BodyStream, Repr};
use crate::h1::chunked;
use crate::headers::{HeaderMap, HeaderName, HeaderValue, standard};
use crate::http::{StatusCode, Version, httpdate_now};
use crate::response::Response;

/// Body smaller than this is copied into the head buffer and written at once.
const COALESCE_LEN: usize = 8 * 1024;

/// Connection level options for writing a response.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Request protocol version.
    pub version: Version,
    /// The request method is `HEAD`, body is omitted.
    pub head: bool,
    /// The connection persists after this response.
    pub keep_alive: bool,
    /// Add `Date` header if absent.
    pub date: bool,
    /// `Server` header value added if absent.
    pub server: Option<HeaderValue>,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            version: Version::HTTP_11,
            head: false,
            keep_alive: true,
            date: true,
            server: None,
        }
    }
}

/// Message body framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// `Content-Length`
    Length(u64),
    /// `Transfer-Encoding: chunked`
    Chunked,
    /// No framing header, either bodiless or delimited by connection close.
    None,
}

/// Write response head into buffer.
///
/// User supplied framing and `Connection` headers are replaced with ones consistent with
/// `framing` and `keep_alive`.
pub fn encode_head(
    status: StatusCode,
    headers: &HeaderMap,
    framing: Framing,
    keep_alive: bool,
    opts: &WriteOptions,
    dst: &mut BytesMut,
) {
    let mut itoa = itoa::Buffer::new();

    dst.extend_from_slice(b"HTTP/1.1 ");
    dst.extend_from_slice(itoa.format(status.status()).as_bytes());
    dst.extend_from_slice(b" ");
    dst.extend_from_slice(status.reason().unwrap_or("").as_bytes());
    dst.extend_from_slice(b"\r\n");

    for (name, value) in headers {
        if is_connection_specific(name) {
            continue;
        }
        put_header(dst, name.as_str(), value.as_bytes());
    }

    if opts.date && !headers.contains_key(standard::DATE) {
        put_header(dst, "date", &httpdate_now());
    }
    if let Some(server) = &opts.server {
        if !headers.contains_key(standard::SERVER) {
            put_header(dst, "server", server.as_bytes());
        }
    }

    match framing {
        Framing::Length(len) => put_header(dst, "content-length", itoa.format(len).as_bytes()),
        Framing::Chunked => put_header(dst, "transfer-encoding", b"chunked"),
        Framing::None => {}
    }

    if !keep_alive {
        put_header(dst, "connection", b"close");
    } else if opts.version == Version::HTTP_10 {
        put_header(dst, "connection", b"keep-alive");
    }

    dst.extend_from_slice(b"\r\n");
}

fn put_header(dst: &mut BytesMut, name: &str, value: &[u8]) {
    dst.reserve(name.len() + value.len() + 4);
    dst.extend_from_slice(name.as_bytes());
    dst.extend_from_slice(b": ");
    dst.extend_from_slice(value);
    dst.extend_from_slice(b"\r\n");
}

fn is_connection_specific(name: &HeaderName) -> bool {
    *name == standard::CONTENT_LENGTH
        || *name == standard::TRANSFER_ENCODING
        || *name == standard::CONNECTION
}

/// Write the response, selecting the writer by its body.
///
/// Returns `true` if the connection can persist after this response.
pub async fn write_response<IO>(io: &mut IO, res: Response, opts: &WriteOptions) -> io::Result<bool>
where
    IO: AsyncWrite + Unpin,
{
    let (status, headers, body) = res.into_parts();
    let mut keep_alive = opts.keep_alive && !headers.has_token(standard::CONNECTION, "close");
    let known_len = body.len();

    if !status.allows_body() || opts.head {
        let framing = match (status.allows_body(), known_len) {
            (false, _) => Framing::None,
            (true, Some(len)) => Framing::Length(len),
            (true, None) if opts.version == Version::HTTP_11 => Framing::Chunked,
            (true, None) => Framing::None,
        };
        let mut buf = BytesMut::new();
        encode_head(status, &headers, framing, keep_alive, opts, &mut buf);
        io.write_all(&buf).await?;
        io.flush().await?;
        return Ok(keep_alive);
    }

    match body.into_repr() {
        Repr::Empty => {
            DefaultWriter::new(io)
                .write(status, &headers, Bytes::new(), keep_alive, opts)
                .await?;
        }
        Repr::Full(bytes) => {
            DefaultWriter::new(io)
                .write(status, &headers, bytes, keep_alive, opts)
                .await?;
        }
        Repr::Stream(stream) if opts.version == Version::HTTP_11 => {
            let mut writer = ChunkedWriter::new(io);
            writer.write_head(status, &headers, keep_alive, opts).await?;
            writer.write_stream(stream).await?;
            writer.finish().await?;
        }
        Repr::Stream(stream) => {
            // HTTP/1.0 has no chunked coding, the body ends when the connection closes
            keep_alive = false;
            let mut buf = BytesMut::new();
            encode_head(status, &headers, Framing::None, keep_alive, opts, &mut buf);
            io.write_all(&buf).await?;
            let mut stream = stream;
            while let Some(chunk) = next_chunk(&mut stream).await? {
                io.write_all(&chunk).await?;
            }
            io.flush().await?;
        }
    }

    Ok(keep_alive)
}

async fn next_chunk(stream: &mut BodyStream) -> io::Result<Option<Bytes>> {
    match std::future::poll_fn(|cx| stream.as_mut().poll_next(cx)).await {
        Some(Ok(chunk)) => Ok(Some(chunk)),
        Some(Err(err)) => Err(io::Error::other(err)),
        None => Ok(None),
    }
}

// ===== Default Writer =====

/// Writer for body with known length.
#[derive(Debug)]
pub struct DefaultWriter<'a, IO> {
    io: &'a mut IO,
    buf: BytesMut,
}

impl<'a, IO> DefaultWriter<'a, IO>
where
    IO: AsyncWrite + Unpin,
{
    /// Create new [`DefaultWriter`].
    pub fn new(io: &'a mut IO) -> Self {
        Self {
            io,
            buf: BytesMut::new(),
        }
    }

    /// Write status line, headers with `Content-Length`, then the body.
    pub async fn write(
        mut self,
        status: StatusCode,
        headers: &HeaderMap,
        body: Bytes,
        keep_alive: bool,
        opts: &WriteOptions,
    ) -> io::Result<()> {
        let framing = Framing::Length(body.len() as u64);
        encode_head(status, headers, framing, keep_alive, opts, &mut self.buf);

        if body.len() <= COALESCE_LEN {
            self.buf.extend_from_slice(&body);
            self.io.write_all(&self.buf).await?;
        } else {
            self.io.write_all(&self.buf).await?;
            self.io.write_all(&body).await?;
        }

        self.io.flush().await
    }
}

// ===== Chunked Writer =====

/// Writer for body with unknown length, using chunked transfer coding.
#[derive(Debug)]
pub struct ChunkedWriter<'a, IO> {
    io: &'a mut IO,
    buf: BytesMut,
}

impl<'a, IO> ChunkedWriter<'a, IO>
where
    IO: AsyncWrite + Unpin,
{
    /// Create new [`ChunkedWriter`].
    pub fn new(io: &'a mut IO) -> Self {
        Self {
            io,
            buf: BytesMut::new(),
        }
    }

    /// Write status line and headers with `Transfer-Encoding: chunked`.
    pub async fn write_head(
        &mut self,
        status: StatusCode,
        headers: &HeaderMap,
        keep_alive: bool,
        opts: &WriteOptions,
    ) -> io::Result<()> {
        self.buf.clear();
        encode_head(status, headers, Framing::Chunked, keep_alive, opts, &mut self.buf);
        self.io.write_all(&self.buf).await
    }

    /// Write a single chunk frame.
    ///
    /// Empty chunk is ignored, as it would terminate the body.
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()> {
        if chunk.is_empty() {
            return Ok(());
        }

        self.buf.clear();
        if chunk.len() <= COALESCE_LEN {
            chunked::encode_chunk(chunk, &mut self.buf);
            self.io.write_all(&self.buf).await?;
        } else {
            chunked::encode_header(chunk.len(), &mut self.buf);
            self.io.write_all(&self.buf).await?;
            self.io.write_all(chunk).await?;
            self.io.write_all(b"\r\n").await?;
        }
        self.io.flush().await
    }

    async fn write_stream(&mut self, mut stream: BodyStream) -> io::Result<()> {
        while let Some(chunk) = next_chunk(&mut stream).await? {
            self.write_chunk(&chunk).await?;
        }
        Ok(())
    }

    /// Write the terminating zero sized chunk with empty trailer section.
    pub async fn finish(self) -> io::Result<()> {
        self.io.write_all(chunked::LAST_CHUNK).await?;
        self.io.flush().await
    }
}
