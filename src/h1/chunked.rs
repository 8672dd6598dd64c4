//! Chunked transfer coding.
//!
//! ```text
//! chunked-body   = *chunk
//!                  last-chunk
//!                  trailer-section
//!                  CRLF
//!
//! chunk          = chunk-size [ chunk-ext ] CRLF
//!                  chunk-data CRLF
//! chunk-size     = 1*HEXDIG
//! last-chunk     = 1*("0") [ chunk-ext ] CRLF
//! ```
use bytes::{Buf, BytesMut};
use std::num::NonZeroU64;

use crate::h1::DecodeError;
use crate::h1::parser::{Header, ParseResult, parse_header_chunk, ready, split_line};

/// Chunk size line, including extensions, is bounded.
const MAX_CHUNK_LINE: usize = 1024;

/// Terminating zero sized chunk with empty trailer section.
pub const LAST_CHUNK: &[u8] = b"0\r\n\r\n";

/// Decoded unit of a chunked body.
#[derive(Debug)]
pub enum Chunk {
    /// Chunk data, possibly part of a larger chunk.
    Data(BytesMut),
    /// Trailer field after the last chunk.
    Trailer(Header),
    /// End of chunked body.
    End,
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Size,
    Data(NonZeroU64),
    DataEnd,
    Trailer,
    Eof,
}

/// Incremental chunked body decoder.
#[derive(Debug, Clone)]
pub struct ChunkedDecoder {
    phase: Phase,
    /// total decoded data
    total: u64,
    /// maximum total data
    limit: u64,
}

impl ChunkedDecoder {
    /// Create new [`ChunkedDecoder`] which rejects body larger than `limit`.
    pub fn new(limit: u64) -> Self {
        Self {
            phase: Phase::Size,
            total: 0,
            limit,
        }
    }

    /// Returns total data decoded so far.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Returns `true` if the last chunk is read and trailer section is being decoded.
    pub fn in_trailer(&self) -> bool {
        matches!(self.phase, Phase::Trailer)
    }

    /// Decode the next unit of chunked body.
    ///
    /// Data chunk is returned as soon as any of its bytes is available.
    pub fn decode_chunk(&mut self, buffer: &mut BytesMut) -> ParseResult<Chunk, DecodeError> {
        use DecodeError as E;

        loop {
            match self.phase {
                Phase::Size => {
                    let line = match split_line(buffer, E::InvalidChunk) {
                        ParseResult::Ok(line) => line,
                        ParseResult::Err(err) => return ParseResult::Err(err),
                        ParseResult::Pending if buffer.len() > MAX_CHUNK_LINE => {
                            return ParseResult::Err(E::InvalidChunk);
                        }
                        ParseResult::Pending => return ParseResult::Pending,
                    };

                    // extensions are ignored
                    let size = match line.iter().position(|b| *b == b';') {
                        Some(ext) => &line[..ext],
                        None => &line[..],
                    };
                    let size = size.trim_ascii_end();

                    if !matches!(size.len(), 1..=16) || !size.iter().all(u8::is_ascii_hexdigit) {
                        return ParseResult::Err(E::InvalidChunk);
                    }

                    // SAFETY: `is_ascii_hexdigit` is subset of ASCII
                    let digits = unsafe { std::str::from_utf8_unchecked(size) };
                    let Ok(size) = u64::from_str_radix(digits, 16) else {
                        return ParseResult::Err(E::InvalidChunk);
                    };

                    self.phase = match NonZeroU64::new(size) {
                        Some(size) => {
                            match self.total.checked_add(size.get()) {
                                Some(total) if total <= self.limit => {}
                                _ => return ParseResult::Err(E::BodyTooLarge),
                            }
                            Phase::Data(size)
                        }
                        None => Phase::Trailer,
                    };
                }
                Phase::Data(remaining) => {
                    if buffer.is_empty() {
                        return ParseResult::Pending;
                    }

                    let len = remaining.get().min(buffer.len() as u64);
                    let data = buffer.split_to(len as usize);
                    self.total += len;
                    self.phase = match NonZeroU64::new(remaining.get() - len) {
                        Some(remaining) => Phase::Data(remaining),
                        None => Phase::DataEnd,
                    };

                    return ParseResult::Ok(Chunk::Data(data));
                }
                Phase::DataEnd => {
                    let sep = match buffer.as_ref() {
                        [b'\r', b'\n', ..] => 2,
                        [b'\n', ..] => 1,
                        [] | [b'\r'] => return ParseResult::Pending,
                        _ => return ParseResult::Err(E::InvalidChunk),
                    };
                    buffer.advance(sep);
                    self.phase = Phase::Size;
                }
                Phase::Trailer => {
                    return match ready!(parse_header_chunk(buffer)) {
                        Some(header) => ParseResult::Ok(Chunk::Trailer(header)),
                        None => {
                            self.phase = Phase::Eof;
                            ParseResult::Ok(Chunk::End)
                        }
                    };
                }
                Phase::Eof => return ParseResult::Ok(Chunk::End),
            }
        }
    }
}

// ===== Encoder =====

/// Write chunk size line for a chunk of `len` bytes.
///
/// The chunk data must then be followed by `CRLF`.
pub fn encode_header(len: usize, dst: &mut BytesMut) {
    const HEX: &[u8; 16] = b"0123456789abcdef";

    let mut buf = [0u8; 16];
    let mut i = buf.len();
    let mut n = len as u64;
    loop {
        i -= 1;
        buf[i] = HEX[(n & 0xF) as usize];
        n >>= 4;
        if n == 0 {
            break;
        }
    }

    dst.reserve(buf.len() - i + 2);
    dst.extend_from_slice(&buf[i..]);
    dst.extend_from_slice(b"\r\n");
}

/// Write a full chunk frame.
pub fn encode_chunk(data: &[u8], dst: &mut BytesMut) {
    if data.is_empty() {
        // empty chunk would terminate the body
        return;
    }
    encode_header(data.len(), dst);
    dst.extend_from_slice(data);
    dst.extend_from_slice(b"\r\n");
}
