use crate::headers::{AsHeaderName, HeaderName, HeaderValue, IntoHeaderName};

/// A single header line.
#[derive(Clone, PartialEq, Eq)]
pub struct HeaderField {
    name: HeaderName,
    value: HeaderValue,
}

impl HeaderField {
    /// Create new [`HeaderField`].
    #[inline]
    pub const fn new(name: HeaderName, value: HeaderValue) -> Self {
        Self { name, value }
    }

    /// Returns reference to header name.
    #[inline]
    pub const fn name(&self) -> &HeaderName {
        &self.name
    }

    /// Returns reference to header value.
    #[inline]
    pub const fn value(&self) -> &HeaderValue {
        &self.value
    }

    /// Consume self into header name and value.
    #[inline]
    pub fn into_parts(self) -> (HeaderName, HeaderValue) {
        (self.name, self.value)
    }
}

/// HTTP Headers Multimap.
///
/// Names are matched case-insensitively, fields keep their insertion order, and one name may hold
/// multiple values.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    fields: Vec<HeaderField>,
}

impl HeaderMap {
    /// Create new empty [`HeaderMap`].
    ///
    /// This function does not allocate.
    #[inline]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Create new empty [`HeaderMap`] with at least the specified capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of header fields, counting repeated names.
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if headers has no field.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns `true` if the map contains a header value for the given name.
    pub fn contains_key<K: AsHeaderName>(&self, name: K) -> bool {
        let name = name.as_header_name();
        self.fields.iter().any(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// Returns a reference to the first header value for the given name.
    pub fn get<K: AsHeaderName>(&self, name: K) -> Option<&HeaderValue> {
        let name = name.as_header_name();
        self.fields
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
            .map(HeaderField::value)
    }

    /// Returns the first header value for the given name as `str`.
    ///
    /// Value containing obs-text is treated as absent.
    pub fn get_str<K: AsHeaderName>(&self, name: K) -> Option<&str> {
        self.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns an iterator over all header values for the given name.
    pub fn get_all<K: AsHeaderName>(&self, name: K) -> impl Iterator<Item = &HeaderValue> {
        self.fields
            .iter()
            .filter(move |f| f.name.eq_ignore_ascii_case(name.as_header_name()))
            .map(HeaderField::value)
    }

    /// Returns an iterator over header fields in insertion order.
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.fields.iter(),
        }
    }

    /// Insert a header, replacing all existing values with the same name.
    ///
    /// Returns the first replaced value, if any.
    pub fn insert<K: IntoHeaderName>(&mut self, name: K, value: HeaderValue) -> Option<HeaderValue> {
        let name = name.into_header_name();
        let removed = self.remove(&name);
        self.fields.push(HeaderField::new(name, value));
        removed
    }

    /// Append a header value, keeping existing values with the same name.
    pub fn append<K: IntoHeaderName>(&mut self, name: K, value: HeaderValue) {
        self.fields
            .push(HeaderField::new(name.into_header_name(), value));
    }

    /// Remove all values of a header, returning the first one.
    pub fn remove<K: AsHeaderName>(&mut self, name: K) -> Option<HeaderValue> {
        let name = name.as_header_name();
        let mut removed = None;
        self.fields.retain(|f| {
            if f.name.eq_ignore_ascii_case(name) {
                if removed.is_none() {
                    removed = Some(f.value.clone());
                }
                false
            } else {
                true
            }
        });
        removed
    }

    /// Reserves capacity for at least `additional` more headers.
    #[inline]
    pub fn reserve(&mut self, additional: usize) {
        self.fields.reserve(additional);
    }

    /// Clears the map, removing all fields.
    #[inline]
    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Returns `true` if any value of the comma separated header contains `token`.
    ///
    /// Comparison is ASCII case-insensitive.
    pub fn has_token<K: AsHeaderName>(&self, name: K, token: &str) -> bool {
        self.get_all(name).any(|value| {
            value
                .as_bytes()
                .split(|b| *b == b',')
                .any(|item| item.trim_ascii().eq_ignore_ascii_case(token.as_bytes()))
        })
    }
}

// ===== Iterator =====

/// An iterator over [`HeaderMap`] fields.
#[derive(Debug)]
pub struct Iter<'a> {
    inner: std::slice::Iter<'a, HeaderField>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a HeaderName, &'a HeaderValue);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|f| (&f.name, &f.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a HeaderMap {
    type Item = (&'a HeaderName, &'a HeaderValue);

    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Extend<HeaderField> for HeaderMap {
    fn extend<T: IntoIterator<Item = HeaderField>>(&mut self, iter: T) {
        self.fields.extend(iter);
    }
}

// ===== Traits =====

impl std::fmt::Debug for HeaderField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeaderField")
            .field("name", &self.name)
            .field("value", &self.value)
            .finish()
    }
}

impl std::fmt::Debug for HeaderMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
