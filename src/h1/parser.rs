//! HTTP/1.1 Parser.
//!
//! [`parse_reqline_chunk`] works on chunked bytes, given any length of bytes, the parser will find
//! the next separator and advance the bytes past it. If the separator is not found, then the
//! parser returns [`ParseResult::Pending`], where more bytes is required to complete parsing.
//!
//! [`parse_header_chunk`] works the same way. Additionally, if the parser encounter an empty line
//! with separator, it returns `ParseResult::Ok(None)` denoting that its the end of header fields.
//!
//! Both parsers accept a bare `LF` as line separator, a `CR` not followed by `LF` is an error.
use bytes::{Buf, Bytes, BytesMut};

use crate::h1::DecodeError;
use crate::h1::Limits;
use crate::headers::{HeaderName, HeaderValue, is_token};
use crate::http::{Method, Version};

/// Result of parsing chunked bytes.
#[derive(Debug)]
pub enum ParseResult<T, E> {
    /// Bytes is not sufficient for parsing, more IO read is required.
    Pending,
    /// Parse success.
    Ok(T),
    /// Parse failed.
    Err(E),
}

impl<T, E> ParseResult<T, E> {
    /// Returns `true` if the parse result is [`Pending`].
    ///
    /// [`Pending`]: ParseResult::Pending
    #[inline]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns `true` if the parse result is [`Ok`].
    ///
    /// [`Ok`]: ParseResult::Ok
    #[inline]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(..))
    }

    /// Returns `true` if the parse result is [`Err`].
    ///
    /// [`Err`]: ParseResult::Err
    #[inline]
    pub const fn is_err(&self) -> bool {
        matches!(self, Self::Err(..))
    }
}

macro_rules! ready {
    ($e:expr) => {
        match $e {
            ParseResult::Ok(ok) => ok,
            ParseResult::Err(err) => return ParseResult::Err(err),
            ParseResult::Pending => return ParseResult::Pending,
        }
    };
}

pub(crate) use ready;

/// Request line.
#[derive(Debug)]
pub struct Reqline {
    pub method: Method,
    /// Raw request target, visible ASCII.
    pub target: Bytes,
    pub version: Version,
}

/// Header field line.
#[derive(Debug)]
pub struct Header {
    pub name: HeaderName,
    pub value: HeaderValue,
}

// ===== Line =====

/// Split the next line, excluding its separator.
///
/// `invalid` is returned when a bare `CR` is found.
pub(crate) fn split_line(bytes: &mut BytesMut, invalid: DecodeError) -> ParseResult<BytesMut, DecodeError> {
    let Some(lf) = bytes.iter().position(|b| *b == b'\n') else {
        return match bytes.iter().position(|b| *b == b'\r') {
            // `CR` at the end may still be followed by `LF`
            Some(cr) if cr + 1 != bytes.len() => ParseResult::Err(invalid),
            _ => ParseResult::Pending,
        };
    };

    let end = match lf.checked_sub(1) {
        Some(cr) if bytes[cr] == b'\r' => cr,
        _ => lf,
    };

    if bytes[..end].contains(&b'\r') {
        return ParseResult::Err(invalid);
    }

    let mut line = bytes.split_to(lf + 1);
    line.truncate(end);
    ParseResult::Ok(line)
}

// ===== Request Line =====

/// Parse request line.
///
/// Leading empty lines are skipped.
///
/// This function performs a chunked parsing, see [module level documentation] for more details.
///
/// [module level documentation]: crate::h1::parser
pub fn parse_reqline_chunk(bytes: &mut BytesMut, limits: &Limits) -> ParseResult<Reqline, DecodeError> {
    use DecodeError as E;

    loop {
        let sep = match bytes.as_ref() {
            [b'\r', b'\n', ..] => 2,
            [b'\n', ..] => 1,
            _ => break,
        };
        bytes.advance(sep);
    }

    if bytes.is_empty() {
        return ParseResult::Pending;
    }

    let line = match split_line(bytes, E::InvalidRequestLine) {
        ParseResult::Ok(line) => line.freeze(),
        ParseResult::Err(err) => return ParseResult::Err(err),
        ParseResult::Pending => {
            return match check_pending_reqline(bytes, limits) {
                Some(err) => ParseResult::Err(err),
                None => ParseResult::Pending,
            };
        }
    };

    let (Some(first_sp), Some(last_sp)) = (
        line.iter().position(|b| *b == b' '),
        line.iter().rposition(|b| *b == b' '),
    ) else {
        return ParseResult::Err(E::InvalidRequestLine);
    };

    if first_sp == last_sp {
        return ParseResult::Err(E::InvalidRequestLine);
    }

    let method = &line[..first_sp];
    if method.is_empty() || !method.iter().copied().all(is_token) {
        return ParseResult::Err(E::InvalidRequestLine);
    }
    let Some(method) = Method::from_bytes(method) else {
        return ParseResult::Err(E::UnsupportedMethod);
    };

    let target = line.slice(first_sp + 1..last_sp);
    if target.len() > limits.max_path {
        return ParseResult::Err(E::PathTooLong);
    }
    if target.is_empty() || !target.iter().all(|b| matches!(b, b'!'..=b'~')) {
        return ParseResult::Err(E::InvalidPath);
    }

    let version = &line[last_sp + 1..];
    let Some(version) = Version::from_bytes(version) else {
        return match version.starts_with(b"HTTP/") {
            true => ParseResult::Err(E::UnsupportedVersion),
            false => ParseResult::Err(E::InvalidRequestLine),
        };
    };

    ParseResult::Ok(Reqline {
        method,
        target,
        version,
    })
}

/// Checks an unterminated request line against the limits.
fn check_pending_reqline(bytes: &[u8], limits: &Limits) -> Option<DecodeError> {
    if let Some(sp) = bytes.iter().position(|b| *b == b' ') {
        let target = &bytes[sp + 1..];
        let target_len = target.iter().position(|b| *b == b' ').unwrap_or(target.len());
        if target_len > limits.max_path {
            return Some(DecodeError::PathTooLong);
        }
    }
    if bytes.len() > limits.max_request_line {
        return Some(DecodeError::InvalidRequestLine);
    }
    None
}

// ===== Header =====

/// Parse header field.
///
/// Returns `ParseResult::Ok(None)` when encounter an empty line with separator.
///
/// This function performs a chunked parsing, see [module level documentation] for more details.
///
/// [module level documentation]: crate::h1::parser
pub fn parse_header_chunk(bytes: &mut BytesMut) -> ParseResult<Option<Header>, DecodeError> {
    use DecodeError as E;

    let line = ready!(split_line(bytes, E::InvalidHeader));

    if line.is_empty() {
        return ParseResult::Ok(None);
    }

    // obsolete line folding is rejected
    if let [b' ' | b'\t', ..] = line.as_ref() {
        return ParseResult::Err(E::InvalidHeader);
    }

    let Some(colon) = line.iter().position(|b| *b == b':') else {
        return ParseResult::Err(E::InvalidHeader);
    };

    let Ok(name) = HeaderName::from_slice(&line[..colon]) else {
        return ParseResult::Err(E::InvalidHeader);
    };

    let value = line.freeze().slice(colon + 1..);
    let value = trim_ows(value);
    let Ok(value) = HeaderValue::from_bytes(value) else {
        return ParseResult::Err(E::InvalidHeader);
    };

    ParseResult::Ok(Some(Header { name, value }))
}

fn trim_ows(mut value: Bytes) -> Bytes {
    let start = value.iter().position(|b| !matches!(b, b' ' | b'\t')).unwrap_or(value.len());
    value.advance(start);
    let end = value.iter().rposition(|b| !matches!(b, b' ' | b'\t')).map_or(0, |i| i + 1);
    value.truncate(end);
    value
}
