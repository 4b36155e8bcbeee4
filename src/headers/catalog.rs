//! Known-header catalog.
//!
//! A compile-time table keyed by [`HeaderId`]: canonical lowercase name,
//! value-parser selection, and the repeat policy the scanner enforces while
//! the mapping is being filled.

/// Value-parser strategy for a recognized header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// At least one decimal digit, optional trailing whitespace.
    Number,
    /// HTAB and visible ASCII, trailing whitespace trimmed.
    Any,
}

/// Repeat policy applied when a name is recognized against the
/// already-populated mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Second occurrence is rejected.
    Singleton,
    /// Repeat occurrences are concatenated with `", "`.
    Mergeable,
    /// Order-sensitive repeats; stored as a plain overwrite.
    Multi,
    /// No repeat constraint; last occurrence wins.
    Normal,
}

/// Catalog entry for one known header.
#[derive(Debug)]
pub struct HeaderDesc {
    /// Canonical lowercase name.
    pub name: &'static str,
    pub value: ValueKind,
    pub policy: Policy,
}

macro_rules! catalog {
    ($($variant:ident: $name:literal, $value:ident, $policy:ident;)*) => {
        /// Identifier of a known header, `Unknown` for everything else.
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum HeaderId {
            Unknown,
            $($variant,)*
        }

        const UNKNOWN_DESC: HeaderDesc = HeaderDesc {
            name: "unknown",
            value: ValueKind::Any,
            policy: Policy::Normal,
        };

        static CATALOG: &[(HeaderId, HeaderDesc)] = &[
            $((
                HeaderId::$variant,
                HeaderDesc {
                    name: $name,
                    value: ValueKind::$value,
                    policy: Policy::$policy,
                },
            ),)*
        ];

        impl HeaderId {
            /// Catalog entry for this id.
            pub const fn desc(self) -> &'static HeaderDesc {
                match self {
                    HeaderId::Unknown => &UNKNOWN_DESC,
                    $(HeaderId::$variant => {
                        const DESC: HeaderDesc = HeaderDesc {
                            name: $name,
                            value: ValueKind::$value,
                            policy: Policy::$policy,
                        };
                        &DESC
                    })*
                }
            }

            /// Look a lowercase name up in the catalog.
            ///
            /// Arbitrary-name scanning lands here so that policy headers
            /// without a dedicated recognition branch still get their repeat
            /// rules enforced.
            pub fn lookup(name: &str) -> HeaderId {
                for (id, desc) in CATALOG {
                    if desc.name == name {
                        return *id;
                    }
                }
                HeaderId::Unknown
            }
        }
    };
}

catalog! {
    // singleton, policy critical
    Host: "host", Any, Singleton;
    ContentLength: "content-length", Number, Singleton;
    TransferEncoding: "transfer-encoding", Any, Singleton;
    ContentType: "content-type", Any, Singleton;
    ContentRange: "content-range", Any, Singleton;
    Authorization: "authorization", Any, Singleton;
    ProxyAuthorization: "proxy-authorization", Any, Singleton;
    UserAgent: "user-agent", Any, Singleton;
    IfMatch: "if-match", Any, Singleton;
    IfNoneMatch: "if-none-match", Any, Singleton;
    IfModifiedSince: "if-modified-since", Any, Singleton;
    IfUnmodifiedSince: "if-unmodified-since", Any, Singleton;
    Referer: "referer", Any, Singleton;
    Origin: "origin", Any, Singleton;
    Date: "date", Any, Singleton;

    // multi, order matters downstream
    SetCookie: "set-cookie", Any, Multi;
    Warning: "warning", Any, Multi;
    WwwAuthenticate: "www-authenticate", Any, Multi;
    ProxyAuthenticate: "proxy-authenticate", Any, Multi;
    Link: "link", Any, Multi;
    Via: "via", Any, Multi;

    // mergeable, comma separated
    Accept: "accept", Any, Mergeable;
    AcceptLanguage: "accept-language", Any, Mergeable;
    AcceptEncoding: "accept-encoding", Any, Mergeable;
    AcceptRanges: "accept-ranges", Any, Mergeable;
    Allow: "allow", Any, Mergeable;
    CacheControl: "cache-control", Any, Mergeable;
    Connection: "connection", Any, Mergeable;
    Pragma: "pragma", Any, Mergeable;
    Upgrade: "upgrade", Any, Mergeable;
    Trailer: "trailer", Any, Mergeable;
    Te: "te", Any, Mergeable;
    Vary: "vary", Any, Mergeable;

    // known, no strict policy
    Range: "range", Any, Normal;
    Expect: "expect", Any, Normal;
    Cookie: "cookie", Any, Normal;
    Etag: "etag", Any, Normal;
    LastModified: "last-modified", Any, Normal;
    Expires: "expires", Any, Normal;
    Server: "server", Any, Normal;
    Location: "location", Any, Normal;

    // security / fetch metadata
    RefererPolicy: "referer-policy", Any, Normal;
    SecFetchSite: "sec-fetch-site", Any, Normal;
    SecFetchMode: "sec-fetch-mode", Any, Normal;
    SecFetchDest: "sec-fetch-dest", Any, Normal;
    SecFetchUser: "sec-fetch-user", Any, Normal;
    Dnt: "dnt", Number, Normal;

    // proxy / forwarding, de-facto
    XForwardedFor: "x-forwarded-for", Any, Normal;
    XForwardedProto: "x-forwarded-proto", Any, Normal;
    XForwardedHost: "x-forwarded-host", Any, Normal;
    XRealIp: "x-real-ip", Any, Normal;
}
