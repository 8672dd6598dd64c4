use std::sync::Arc;

/// Captured route parameters.
///
/// Values are percent-decoded. Wildcard remainder is captured as `*`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    inner: Vec<(Arc<str>, String)>,
}

impl Params {
    /// Create new empty [`Params`].
    pub const fn new() -> Self {
        Self { inner: Vec::new() }
    }

    pub(crate) fn push(&mut self, name: Arc<str>, value: String) {
        self.inner.push((name, value));
    }

    pub(crate) fn pop(&mut self) {
        self.inner.pop();
    }

    /// Returns the value of parameter `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(k, _)| &**k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the wildcard remainder.
    pub fn wildcard(&self) -> Option<&str> {
        self.get("*")
    }

    /// Returns an iterator over name and value, in pattern order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (&**k, v.as_str()))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
