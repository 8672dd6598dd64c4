use bytes::Bytes;

use crate::headers::error::HeaderError;

/// HTTP Header name.
///
/// # Case Normalization
///
/// Input is normalized to lowercase at construction time. [`from_static`][HeaderName::from_static]
/// will panic at compile time when name contains uppercase character.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct HeaderName {
    /// is lowercase `token`
    bytes: Bytes,
}

impl HeaderName {
    /// Parse header name from static str.
    ///
    /// # Panics
    ///
    /// Panics if the input is not a valid header name or contains ASCII uppercase characters.
    #[inline]
    pub const fn from_static(name: &'static str) -> Self {
        match validate_lowercase(name.as_bytes()) {
            Ok(()) => Self {
                bytes: Bytes::from_static(name.as_bytes()),
            },
            Err(err) => err.panic_const(),
        }
    }

    /// Parse header name by copying from slice of bytes.
    ///
    /// Input name is normalized to lowercase.
    ///
    /// # Errors
    ///
    /// Returns error if the input is not a valid header name.
    pub fn from_slice<A: AsRef<[u8]>>(name: A) -> Result<Self, HeaderError> {
        let name = name.as_ref();
        if !matches!(name.len(), 1..=MAX_HEADER_NAME_LEN) {
            return Err(HeaderError::invalid_len(name.len()));
        }
        if !name.iter().copied().all(is_token) {
            return Err(HeaderError::Invalid);
        }
        Ok(Self {
            bytes: Bytes::from(name.to_ascii_lowercase()),
        })
    }

    /// Extracts a string slice of the header name.
    ///
    /// The returned string will always in ASCII lowercase.
    #[inline]
    pub fn as_str(&self) -> &str {
        // SAFETY: validated as ASCII token
        unsafe { std::str::from_utf8_unchecked(&self.bytes) }
    }

    /// Checks that two header name are an ASCII case-insensitive match.
    #[inline]
    pub fn eq_ignore_ascii_case(&self, name: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(name)
    }
}

// ===== Parser =====

const MAX_HEADER_NAME_LEN: usize = 1024;  // 1KB

/// token       = 1*tchar
/// tchar       = "!" / "#" / "$" / "%" / "&" / "'" / "*"
///             / "+" / "-" / "." / "^" / "_" / "`" / "|" / "~"
///             / DIGIT / ALPHA
#[inline(always)]
pub(crate) const fn is_token(byte: u8) -> bool {
    matches!(
        byte,
        | b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*'
        | b'+' | b'-' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~'
        | b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z'
    )
}

const fn validate_lowercase(mut bytes: &[u8]) -> Result<(), HeaderError> {
    if bytes.is_empty() || bytes.len() > MAX_HEADER_NAME_LEN {
        return Err(HeaderError::invalid_len(bytes.len()));
    }
    while let [byte, rest @ ..] = bytes {
        if !is_token(*byte) || byte.is_ascii_uppercase() {
            return Err(HeaderError::Invalid);
        }
        bytes = rest;
    }
    Ok(())
}

// ===== Lookup Traits =====

/// A type that can be used to lookup a header in [`HeaderMap`][crate::headers::HeaderMap].
pub trait AsHeaderName {
    /// Returns the name to compare case-insensitively.
    fn as_header_name(&self) -> &str;
}

/// A type that can be used to insert a header in [`HeaderMap`][crate::headers::HeaderMap].
pub trait IntoHeaderName {
    /// Convert into [`HeaderName`].
    ///
    /// # Panics
    ///
    /// String implementations panics if the name is not a valid header name.
    fn into_header_name(self) -> HeaderName;
}

impl AsHeaderName for HeaderName {
    fn as_header_name(&self) -> &str {
        self.as_str()
    }
}

impl AsHeaderName for &HeaderName {
    fn as_header_name(&self) -> &str {
        self.as_str()
    }
}

impl AsHeaderName for &str {
    fn as_header_name(&self) -> &str {
        self
    }
}

impl AsHeaderName for String {
    fn as_header_name(&self) -> &str {
        self
    }
}

impl AsHeaderName for &String {
    fn as_header_name(&self) -> &str {
        self
    }
}

impl IntoHeaderName for HeaderName {
    fn into_header_name(self) -> HeaderName {
        self
    }
}

impl IntoHeaderName for &HeaderName {
    fn into_header_name(self) -> HeaderName {
        self.clone()
    }
}

impl IntoHeaderName for &'static str {
    fn into_header_name(self) -> HeaderName {
        match HeaderName::from_slice(self) {
            Ok(name) => name,
            Err(err) => err.panic_const(),
        }
    }
}

impl IntoHeaderName for String {
    fn into_header_name(self) -> HeaderName {
        match HeaderName::from_slice(&self) {
            Ok(name) => name,
            Err(err) => err.panic_const(),
        }
    }
}

// ===== Traits =====

impl TryFrom<&str> for HeaderName {
    type Error = HeaderError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_slice(value)
    }
}

impl TryFrom<String> for HeaderName {
    type Error = HeaderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_slice(value)
    }
}

impl AsRef<str> for HeaderName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for HeaderName {
    fn eq(&self, other: &str) -> bool {
        self.eq_ignore_ascii_case(other)
    }
}

impl PartialEq<&str> for HeaderName {
    fn eq(&self, other: &&str) -> bool {
        self.eq_ignore_ascii_case(other)
    }
}

impl std::fmt::Display for HeaderName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Debug for HeaderName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("HeaderName").field(&self.as_str()).finish()
    }
}

// ===== Standard Headers =====

macro_rules! standard {
    ($($(#[$doc:meta])* $id:ident = $name:literal;)*) => {
        /// Predefined header names.
        pub mod standard {
            use super::HeaderName;
            $(
                $(#[$doc])*
                pub const $id: HeaderName = HeaderName::from_static($name);
            )*
        }
    };
}

standard! {
    ACCEPT = "accept";
    ALLOW = "allow";
    AUTHORIZATION = "authorization";
    CACHE_CONTROL = "cache-control";
    CONNECTION = "connection";
    CONTENT_LENGTH = "content-length";
    CONTENT_TYPE = "content-type";
    DATE = "date";
    EXPECT = "expect";
    HOST = "host";
    LOCATION = "location";
    SERVER = "server";
    TE = "te";
    TRAILER = "trailer";
    TRANSFER_ENCODING = "transfer-encoding";
    UPGRADE = "upgrade";
    USER_AGENT = "user-agent";
    WWW_AUTHENTICATE = "www-authenticate";
    /// Conventional header carrying an api key.
    X_API_KEY = "x-api-key";
}
