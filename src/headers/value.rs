use bytes::Bytes;
use std::str::FromStr;

use crate::headers::error::HeaderError;

/// HTTP Header Value.
///
/// Value may contains obs-text bytes, use [`to_str`][HeaderValue::to_str] to get a visible ASCII
/// representation.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct HeaderValue {
    /// contains no control character other than HTAB
    bytes: Bytes,
}

impl HeaderValue {
    /// Parse header value from static str.
    ///
    /// # Panics
    ///
    /// Panics if the input is not a valid header value.
    #[inline]
    pub const fn from_static(value: &'static str) -> Self {
        match validate_header_value(value.as_bytes()) {
            Ok(()) => Self {
                bytes: Bytes::from_static(value.as_bytes()),
            },
            Err(err) => err.panic_const(),
        }
    }

    /// Parse header value from [`Bytes`].
    ///
    /// # Errors
    ///
    /// Returns error if the input is not a valid header value.
    #[inline]
    pub fn from_bytes<B: Into<Bytes>>(value: B) -> Result<Self, HeaderError> {
        let bytes = value.into();
        validate_header_value(&bytes)?;
        Ok(Self { bytes })
    }

    /// Parse header value by copying from slice of bytes.
    ///
    /// # Errors
    ///
    /// Returns error if the input is not a valid header value.
    #[inline]
    pub fn from_slice<A: AsRef<[u8]>>(value: A) -> Result<Self, HeaderError> {
        validate_header_value(value.as_ref())?;
        Ok(Self {
            bytes: Bytes::copy_from_slice(value.as_ref()),
        })
    }

    /// Creates header value from an integer.
    pub fn from_u64(value: u64) -> Self {
        let mut buffer = itoa::Buffer::new();
        Self {
            bytes: Bytes::copy_from_slice(buffer.format(value).as_bytes()),
        }
    }

    /// Returns header value as a byte slice.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns header value as `str`, if it only contains visible ASCII.
    ///
    /// # Errors
    ///
    /// Returns error if the value contains obs-text.
    pub fn to_str(&self) -> Result<&str, HeaderError> {
        if self.bytes.is_ascii() {
            // SAFETY: checked to be ASCII
            Ok(unsafe { std::str::from_utf8_unchecked(&self.bytes) })
        } else {
            Err(HeaderError::Invalid)
        }
    }
}

// ===== Parsing =====

const MAX_HEADER_VALUE_LEN: usize = 1 << 13;  // 8KB

/// field-value    = *field-content
/// field-content  = field-vchar [ 1*( SP / HTAB / field-vchar ) field-vchar ]
/// field-vchar    = VCHAR / obs-text
const fn validate_header_value(mut bytes: &[u8]) -> Result<(), HeaderError> {
    use HeaderError as E;
    match bytes {
        // no leading SP / HTAB
        | [b' ' | b'\t', ..]
        // no trailing SP / HTAB
        | [.., b' ' | b'\t'] => {
            return Err(E::Invalid);
        },
        _ => {}
    }
    if bytes.len() > MAX_HEADER_VALUE_LEN {
        return Err(E::TooLong);
    }
    let mut error = false;
    while let [byte, rest @ ..] = bytes {
        error |= !is_header_value(*byte);
        bytes = rest;
    }
    if !error { Ok(()) } else { Err(E::Invalid) }
}

#[inline(always)]
const fn is_header_value(byte: u8) -> bool {
    matches!(byte, b'\t' | b' '..=b'~' | 0x80..=0xFF)
}

// ===== Traits =====

impl std::fmt::Debug for HeaderValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_str() {
            Ok(s) => f.debug_tuple("HeaderValue").field(&s).finish(),
            Err(_) => f.debug_tuple("HeaderValue").field(&self.bytes).finish(),
        }
    }
}

impl FromStr for HeaderValue {
    type Err = HeaderError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slice(s)
    }
}

impl TryFrom<String> for HeaderValue {
    type Error = HeaderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_bytes(value.into_bytes())
    }
}

impl TryFrom<&str> for HeaderValue {
    type Error = HeaderError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_slice(value)
    }
}

impl PartialEq<str> for HeaderValue {
    fn eq(&self, other: &str) -> bool {
        self.bytes == other.as_bytes()
    }
}

impl PartialEq<&str> for HeaderValue {
    fn eq(&self, other: &&str) -> bool {
        self.bytes == other.as_bytes()
    }
}
