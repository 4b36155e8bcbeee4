use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Bit-flag result code shared by every scan operation.
///
/// Scan entry points never fail with an error value; the outcome of a call is
/// a set of flags recorded on the request state. `Flags::OK` is the empty
/// set. Flags combine with `|`, and a single call may report several
/// conditions at once (for example a preflight against an unregistered
/// method).
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Flags(u32);

macro_rules! flags {
    ($($(#[$doc:meta])* $name:ident = $bit:literal;)*) => {
        impl Flags {
            /// Empty set, reported on success.
            pub const OK: Flags = Flags(0);

            $(
                $(#[$doc])*
                pub const $name: Flags = Flags(1 << $bit);
            )*
        }

        const NAMES: &[(Flags, &str)] = &[
            $((Flags::$name, stringify!($name)),)*
        ];
    };
}

flags! {
    /// Malformed request line, obsolete line folding, or CL/TE coexistence.
    BAD_REQUEST = 0;
    /// Method token recognized but no route table registered for it.
    METHOD_NOT_ALLOWED = 1;
    /// No endpoint matched the request target.
    NOT_FOUND = 2;
    /// An `OPTIONS` request hit an empty `OPTIONS` table.
    CORS_PREFLIGHT = 3;
    /// Version literal is not `HTTP/1.1`.
    HTTP_VERSION_UNSUPPORTED = 4;
    /// `content-length` exceeds the configured body cap.
    CONTENT_LENGTH_TOO_LARGE = 5;
    /// Head completed without a `host` header.
    MISSING_HOST = 6;
    /// The head announces a body (`content-length` > 0 or `transfer-encoding`).
    HAS_BODY = 7;
    /// Caller handed the scanner an unusable argument.
    INVALID_ARGUMENT = 8;
    /// Invalid byte in a header name.
    INVALID_HEADER = 9;
    /// Invalid byte in a header value, or a bare CR terminator.
    INVALID_HEADER_VALUE = 10;
    /// `content-length` digits do not form a representable length.
    INVALID_CONTENT_LENGTH = 11;
    /// Accumulated body bytes ran past the announced `content-length`.
    CONTENT_LENGTH_EXCEEDED = 12;
    /// Input ended before the header block terminator.
    UNTERMINATED_HEADERS = 13;
    /// Total header bytes exceeded the configured cap.
    MAX_HEADER_SIZE = 14;
    /// A single header name exceeded the configured cap.
    MAX_HEADER_NAME_SIZE = 15;
    /// A single header value exceeded the configured cap.
    MAX_HEADER_VALUE_SIZE = 16;
    /// Second occurrence of a singleton header.
    DUPLICATE_SINGLE_HEADER = 17;
    /// Query segment exceeded the configured byte cap.
    REQUEST_QUERY_EXCEEDED = 18;
    /// Request target ran past the wildcard byte bound.
    REQUEST_URL_EXCEEDED = 19;
    /// `content-length` and `transfer-encoding` in one head.
    SMUGGLING_TE_CL = 20;
}

impl Flags {
    /// Returns `true` if no flag is set.
    #[inline]
    pub const fn is_ok(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if all bits of `other` are set in `self`.
    #[inline]
    pub const fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the raw bit value.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Reconstructs a flag set from raw bits.
    #[inline]
    pub const fn from_bits(bits: u32) -> Flags {
        Flags(bits)
    }

    /// Union of two flag sets.
    #[inline]
    pub const fn union(self, other: Flags) -> Flags {
        Flags(self.0 | other.0)
    }
}

impl BitOr for Flags {
    type Output = Flags;

    #[inline]
    fn bitor(self, rhs: Flags) -> Flags {
        self.union(rhs)
    }
}

impl BitOrAssign for Flags {
    #[inline]
    fn bitor_assign(&mut self, rhs: Flags) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ok() {
            return f.write_str("OK");
        }
        let mut first = true;
        for (flag, name) in NAMES {
            if self.contains(*flag) {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Flags {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn flags_combine() {
        let flags = Flags::METHOD_NOT_ALLOWED | Flags::CORS_PREFLIGHT;
        assert!(flags.contains(Flags::METHOD_NOT_ALLOWED));
        assert!(flags.contains(Flags::CORS_PREFLIGHT));
        assert!(!flags.contains(Flags::NOT_FOUND));
        assert!(!flags.is_ok());
        assert!(Flags::OK.is_ok());
    }

    #[test]
    fn flags_are_disjoint_bits() {
        for (i, (a, _)) in NAMES.iter().enumerate() {
            assert_eq!(a.bits().count_ones(), 1);
            for (b, _) in &NAMES[i + 1..] {
                assert_eq!(a.bits() & b.bits(), 0);
            }
        }
    }

    #[test]
    fn debug_lists_names() {
        let flags = Flags::BAD_REQUEST | Flags::SMUGGLING_TE_CL;
        assert_eq!(format!("{flags:?}"), "BAD_REQUEST | SMUGGLING_TE_CL");
        assert_eq!(format!("{:?}", Flags::OK), "OK");
    }
}
