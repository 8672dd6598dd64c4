//! Error types that can occur during header related operation.

/// An error that can occur in header related operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HeaderError {
    /// Bytes is empty.
    #[error("cannot be empty")]
    Empty,
    /// Bytes too long.
    #[error("too long")]
    TooLong,
    /// Bytes contains invalid character.
    #[error("contains invalid byte")]
    Invalid,
}

impl HeaderError {
    pub(crate) const fn invalid_len(len: usize) -> Self {
        match len {
            0 => Self::Empty,
            _ => Self::TooLong,
        }
    }

    pub(crate) const fn panic_const(self) -> ! {
        match self {
            Self::Empty => panic!("header cannot be empty"),
            Self::TooLong => panic!("header too long"),
            Self::Invalid => panic!("header contains invalid byte"),
        }
    }
}

impl From<std::convert::Infallible> for HeaderError {
    fn from(value: std::convert::Infallible) -> Self {
        match value {}
    }
}
