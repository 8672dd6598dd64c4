//! Cheaply cloneable and sliceable string.
use bytes::Bytes;
use std::{borrow::Borrow, ops::Deref, str::Utf8Error};

/// A cheaply cloneable and sliceable string.
///
/// Internally it uses [`Bytes`], so we get all the benefit of `Bytes` while having utf8 checked.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ByteStr(Bytes);

impl ByteStr {
    /// Creates a new empty [`ByteStr`].
    ///
    /// This will not allocate.
    pub const fn new() -> Self {
        Self(Bytes::new())
    }

    /// Creates a new [`ByteStr`] from a static str.
    ///
    /// The returned [`ByteStr`] will point directly to the static str. There is no allocating or
    /// copying.
    pub const fn from_static(s: &'static str) -> ByteStr {
        Self(Bytes::from_static(s.as_bytes()))
    }

    /// Creates a new [`ByteStr`] from a [`Bytes`].
    ///
    /// Input is checked to ensure that the bytes are valid UTF-8.
    pub fn from_utf8(bytes: Bytes) -> Result<ByteStr, Utf8Error> {
        std::str::from_utf8(&bytes)?;
        Ok(Self(bytes))
    }

    /// Copy the string into a new [`ByteStr`].
    pub fn copy_from_str(s: &str) -> ByteStr {
        Self(Bytes::copy_from_slice(s.as_bytes()))
    }

    /// Extracts a string slice.
    pub fn as_str(&self) -> &str {
        // SAFETY: checked at construction and immutable
        unsafe { std::str::from_utf8_unchecked(&self.0) }
    }

    /// Returns the underlying [`Bytes`].
    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

impl Deref for ByteStr {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for ByteStr {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for ByteStr {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl From<String> for ByteStr {
    fn from(value: String) -> Self {
        Self(Bytes::from(value.into_bytes()))
    }
}

impl From<&'static str> for ByteStr {
    fn from(value: &'static str) -> Self {
        Self::from_static(value)
    }
}

impl PartialEq<str> for ByteStr {
    fn eq(&self, other: &str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<&str> for ByteStr {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl std::fmt::Display for ByteStr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        str::fmt(self, f)
    }
}

impl std::fmt::Debug for ByteStr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        str::fmt(self, f)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rejects_invalid_utf8() {
        assert!(ByteStr::from_utf8(Bytes::from_static(b"\xff\xfe")).is_err());

        let s = ByteStr::from_utf8(Bytes::from_static(b"/users/42")).unwrap();
        assert_eq!(s, "/users/42");
        assert_eq!(s.len(), 9);
    }
}
