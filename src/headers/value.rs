use bytes::{BufMut, Bytes, BytesMut};

/// Committed header value.
///
/// Values are copied out of the scan buffer, because the buffer only lives
/// for one socket read while the request object may outlive it. The scanner
/// admits HTAB and visible ASCII only, so the content is always valid UTF-8.
#[derive(Clone, PartialEq, Eq)]
pub struct HeaderValue {
    inner: Bytes,
}

impl HeaderValue {
    /// Create a value from a static string.
    ///
    /// Intended for tests and fixtures; the scanner builds values with
    /// [`copy_from_slice`][HeaderValue::copy_from_slice].
    #[inline]
    pub const fn from_static(value: &'static str) -> HeaderValue {
        HeaderValue {
            inner: Bytes::from_static(value.as_bytes()),
        }
    }

    /// Copy a scanned, already-validated span into an owned value.
    #[inline]
    pub(crate) fn copy_from_slice(value: &[u8]) -> HeaderValue {
        HeaderValue {
            inner: Bytes::copy_from_slice(value),
        }
    }

    /// Append a repeat occurrence with the `", "` separator.
    pub(crate) fn merge(&mut self, next: &[u8]) {
        let mut merged = BytesMut::with_capacity(self.inner.len() + 2 + next.len());
        merged.put_slice(&self.inner);
        merged.put_slice(b", ");
        merged.put_slice(next);
        self.inner = merged.freeze();
    }

    /// Returns the value as a slice.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }

    /// Returns the value as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        // SAFETY: the value parsers reject every byte outside HTAB, SP and
        // visible ASCII, and `merge` only inserts ASCII separators
        unsafe { std::str::from_utf8_unchecked(&self.inner) }
    }

    /// Returns the value length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the value is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl std::fmt::Debug for HeaderValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self.as_str(), f)
    }
}

impl std::fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq<str> for HeaderValue {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for HeaderValue {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}
