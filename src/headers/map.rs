use std::borrow::Cow;
use std::collections::HashMap;

use super::value::HeaderValue;

/// Mapping of canonical lowercase header names to committed values.
///
/// Known names are interned `&'static str` keys from the catalog; arbitrary
/// names are owned lowercase strings. Repeat handling (singleton rejection,
/// `", "` merging, overwrite) is decided by the scanner before the map is
/// touched.
#[derive(Default, Clone)]
pub struct HeaderMap {
    inner: HashMap<Cow<'static, str>, HeaderValue>,
}

impl HeaderMap {
    /// Create a new empty map.
    ///
    /// This function does not allocate.
    pub fn new() -> HeaderMap {
        HeaderMap { inner: HashMap::new() }
    }

    /// Returns the number of committed headers.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if no header has been committed.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns `true` if the map holds a value for `name`.
    #[inline]
    pub fn contains_key(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    /// Returns the value committed for `name`.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&HeaderValue> {
        self.inner.get(name)
    }

    /// Insert a value, replacing any previous occurrence.
    #[inline]
    pub fn insert(&mut self, name: impl Into<Cow<'static, str>>, value: HeaderValue) {
        self.inner.insert(name.into(), value);
    }

    /// Append a repeat occurrence to an existing value with the `", "`
    /// separator, or insert it when the name is new.
    pub fn merge(&mut self, name: &'static str, raw: &[u8]) {
        match self.inner.get_mut(name) {
            Some(value) => value.merge(raw),
            None => self.insert(name, HeaderValue::copy_from_slice(raw)),
        }
    }

    /// Iterate over committed `(name, value)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.inner.iter().map(|(name, value)| (name.as_ref(), value))
    }

    /// Drop all committed headers, keeping the allocation.
    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

impl std::fmt::Debug for HeaderMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
