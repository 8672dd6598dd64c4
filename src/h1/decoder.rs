use bytes::{Bytes, BytesMut};

use crate::body::Body;
use crate::bytestr::ByteStr;
use crate::h1::DecodeError;
use crate::h1::chunked::{Chunk, ChunkedDecoder};
use crate::h1::parser::{self, Header, ParseResult, Reqline};
use crate::headers::{HeaderMap, HeaderName, standard};
use crate::http::{Method, Version};
use crate::log::trace;
use crate::request::{Parts, Request};
use crate::uri;

/// Size limits enforced while decoding.
///
/// Exceeding any limit is a [`DecodeOutcome::Malformed`], so a connection buffer never grows
/// beyond the sum of the limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum request line length, excluding separator.
    pub max_request_line: usize,
    /// Maximum request target length.
    pub max_path: usize,
    /// Maximum total bytes of header section, including trailers.
    pub max_header_bytes: usize,
    /// Maximum number of header fields.
    pub max_headers: usize,
    /// Maximum body size, after chunked decoding.
    pub max_body: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_request_line: 8 * 1024,
            max_path: 4 * 1024,
            max_header_bytes: 16 * 1024,
            max_headers: 100,
            max_body: 16 * 1024 * 1024,
        }
    }
}

/// Result of feeding bytes to [`RequestDecoder`].
#[derive(Debug)]
pub enum DecodeOutcome {
    /// More bytes is required, decoder retains its state.
    Incomplete,
    /// A request is fully decoded.
    Complete(Request),
    /// Input is not a valid request.
    Malformed(DecodeError),
}

/// Incremental HTTP/1.1 request decoder.
///
/// Bytes may arrive split at any position, the decoded request is the same regardless of how the
/// input is chunked. Bytes past a complete request are retained for the next request, which
/// supports pipelining.
///
/// After [`DecodeOutcome::Malformed`], buffered bytes are discarded and the decoder starts over.
#[derive(Debug)]
pub struct RequestDecoder {
    buffer: BytesMut,
    limits: Limits,
    state: State,
}

#[derive(Debug)]
enum State {
    Reqline,
    Headers(Box<Partial>),
    Body(Box<Partial>, Framing),
}

#[derive(Debug)]
enum Framing {
    Length(u64),
    Chunked(ChunkedDecoder),
}

/// Request under construction.
#[derive(Debug)]
struct Partial {
    method: Method,
    target: ByteStr,
    path: String,
    query: Vec<(String, String)>,
    version: Version,
    headers: HeaderMap,
    header_bytes: usize,
    body: BytesMut,
}

/// Read buffer growth per read.
const READ_CHUNK: usize = 8 * 1024;

impl RequestDecoder {
    /// Create new [`RequestDecoder`].
    pub fn new(limits: Limits) -> Self {
        Self {
            buffer: BytesMut::new(),
            limits,
            state: State::Reqline,
        }
    }

    /// Returns the limits this decoder enforce.
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Append bytes and try to decode a request.
    pub fn feed(&mut self, bytes: &[u8]) -> DecodeOutcome {
        self.buffer.extend_from_slice(bytes);
        self.decode()
    }

    /// Returns the internal buffer with spare capacity reserved, for reading directly into it.
    ///
    /// Call [`decode`][RequestDecoder::decode] after appending bytes.
    pub fn read_buffer(&mut self) -> &mut BytesMut {
        self.buffer.reserve(READ_CHUNK);
        &mut self.buffer
    }

    /// Returns the number of buffered bytes not yet consumed by a request.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Returns `true` if no request is partially decoded.
    pub fn is_idle(&self) -> bool {
        matches!(self.state, State::Reqline) && self.buffer.is_empty()
    }

    /// Try to decode a request from buffered bytes.
    pub fn decode(&mut self) -> DecodeOutcome {
        match self.poll_decode() {
            Ok(Some(request)) => DecodeOutcome::Complete(request),
            Ok(None) => DecodeOutcome::Incomplete,
            Err(err) => {
                trace!("malformed request: {err}");
                self.state = State::Reqline;
                self.buffer.clear();
                DecodeOutcome::Malformed(err)
            }
        }
    }

    fn poll_decode(&mut self) -> Result<Option<Request>, DecodeError> {
        loop {
            match std::mem::replace(&mut self.state, State::Reqline) {
                State::Reqline => {
                    match parser::parse_reqline_chunk(&mut self.buffer, &self.limits) {
                        ParseResult::Ok(reqline) => {
                            self.state = State::Headers(Box::new(Partial::new(reqline)?));
                        }
                        ParseResult::Err(err) => return Err(err),
                        ParseResult::Pending => return Ok(None),
                    }
                }
                State::Headers(mut partial) => {
                    let before = self.buffer.len();
                    let result = parser::parse_header_chunk(&mut self.buffer);
                    partial.header_bytes += before - self.buffer.len();

                    match result {
                        ParseResult::Ok(Some(header)) => {
                            self.check_header_size(&partial, 0)?;
                            if partial.headers.len() >= self.limits.max_headers {
                                return Err(DecodeError::HeadersTooLarge);
                            }
                            insert_header(&mut partial.headers, header)?;
                            self.state = State::Headers(partial);
                        }
                        ParseResult::Ok(None) => {
                            self.check_header_size(&partial, 0)?;
                            match self.framing(&partial.headers)? {
                                Some(framing) => self.state = State::Body(partial, framing),
                                None => return Ok(Some(partial.into_request())),
                            }
                        }
                        ParseResult::Err(err) => return Err(err),
                        ParseResult::Pending => {
                            self.check_header_size(&partial, self.buffer.len())?;
                            self.state = State::Headers(partial);
                            return Ok(None);
                        }
                    }
                }
                State::Body(mut partial, Framing::Length(len)) => {
                    if (self.buffer.len() as u64) < len {
                        self.state = State::Body(partial, Framing::Length(len));
                        return Ok(None);
                    }
                    partial.body = self.buffer.split_to(len as usize);
                    return Ok(Some(partial.into_request()));
                }
                State::Body(mut partial, Framing::Chunked(mut chunked)) => loop {
                    let before = self.buffer.len();
                    match chunked.decode_chunk(&mut self.buffer) {
                        ParseResult::Ok(Chunk::Data(data)) => {
                            partial.body.extend_from_slice(&data);
                        }
                        ParseResult::Ok(Chunk::Trailer(header)) => {
                            partial.header_bytes += before - self.buffer.len();
                            self.check_header_size(&partial, 0)?;
                            if !is_framing(&header.name) {
                                partial.headers.append(header.name, header.value);
                            }
                        }
                        ParseResult::Ok(Chunk::End) => {
                            return Ok(Some(partial.into_request()));
                        }
                        ParseResult::Err(err) => return Err(err),
                        ParseResult::Pending => {
                            if chunked.in_trailer() {
                                self.check_header_size(&partial, self.buffer.len())?;
                            }
                            self.state = State::Body(partial, Framing::Chunked(chunked));
                            return Ok(None);
                        }
                    }
                },
            }
        }
    }

    fn check_header_size(&self, partial: &Partial, pending: usize) -> Result<(), DecodeError> {
        if partial.header_bytes + pending > self.limits.max_header_bytes {
            Err(DecodeError::HeadersTooLarge)
        } else {
            Ok(())
        }
    }

    /// Decide body framing, returns `None` for empty body.
    fn framing(&self, headers: &HeaderMap) -> Result<Option<Framing>, DecodeError> {
        let length = headers.get(standard::CONTENT_LENGTH);
        let chunked = headers.contains_key(standard::TRANSFER_ENCODING);

        match (length, chunked) {
            (Some(_), true) => Err(DecodeError::ConflictingFraming),
            (None, true) => {
                let mut codings = headers
                    .get_all(standard::TRANSFER_ENCODING)
                    .flat_map(|value| value.as_bytes().split(|b| *b == b','))
                    .map(<[u8]>::trim_ascii)
                    .filter(|coding| !coding.is_empty());

                // only a single `chunked` coding is supported
                match (codings.next(), codings.next()) {
                    (Some(coding), None) if coding.eq_ignore_ascii_case(b"chunked") => {
                        Ok(Some(Framing::Chunked(ChunkedDecoder::new(self.limits.max_body))))
                    }
                    _ => Err(DecodeError::UnsupportedEncoding),
                }
            }
            (Some(length), false) => {
                let length = length.as_bytes();
                if !matches!(length.len(), 1..=19) || !length.iter().all(u8::is_ascii_digit) {
                    return Err(DecodeError::InvalidContentLength);
                }
                let length = length
                    .iter()
                    .fold(0u64, |acc, digit| acc * 10 + u64::from(digit - b'0'));
                match length {
                    0 => Ok(None),
                    n if n > self.limits.max_body => Err(DecodeError::BodyTooLarge),
                    n => Ok(Some(Framing::Length(n))),
                }
            }
            (None, false) => Ok(None),
        }
    }
}

impl Partial {
    fn new(reqline: Reqline) -> Result<Self, DecodeError> {
        let Reqline { method, target, version } = reqline;
        let target = ByteStr::from_utf8(target).map_err(|_| DecodeError::InvalidPath)?;

        let (raw_path, raw_query) = uri::split_target(&target).map_err(|_| DecodeError::InvalidPath)?;
        let path = match raw_path {
            "*" if method == Method::OPTIONS => String::from("*"),
            "*" => return Err(DecodeError::InvalidPath),
            raw => uri::normalize_path(raw).map_err(|_| DecodeError::InvalidPath)?,
        };
        let query = raw_query.map(uri::parse_query).unwrap_or_default();

        Ok(Self {
            method,
            target,
            path,
            query,
            version,
            headers: HeaderMap::new(),
            header_bytes: 0,
            body: BytesMut::new(),
        })
    }

    fn into_request(self) -> Request {
        let parts = Parts {
            method: self.method,
            target: self.target,
            path: self.path,
            query: self.query,
            version: self.version,
            headers: self.headers,
            remote: None,
            seq: 0,
        };
        let body = match self.body.is_empty() {
            true => Bytes::new(),
            false => self.body.freeze(),
        };
        Request::from_parts(parts, Body::new(body))
    }
}

/// Header fields that can only occur once.
fn is_singular(name: &HeaderName) -> bool {
    *name == standard::CONTENT_LENGTH || *name == standard::HOST
}

fn is_framing(name: &HeaderName) -> bool {
    *name == standard::CONTENT_LENGTH || *name == standard::TRANSFER_ENCODING
}

fn insert_header(headers: &mut HeaderMap, header: Header) -> Result<(), DecodeError> {
    let Header { name, value } = header;
    if is_singular(&name) && headers.contains_key(&name) {
        return Err(DecodeError::DuplicateHeader(name));
    }
    headers.append(name, value);
    Ok(())
}
