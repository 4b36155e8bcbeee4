//! Header block scanner.
//!
//! A hand-rolled machine over the header block. The initial dispatch
//! switches on the lowercase of the first name byte; each letter branch
//! recognizes the known headers starting with that letter by comparing the
//! following bytes in case-folded 64-bit words (128-bit for the longer
//! names), and falls through to an arbitrary-name path when every candidate
//! misses. Values are parsed by the strategy the catalog selects, and
//! repeat policies are enforced at recognition time against the mapping
//! filled so far.
//!
//! Offsets commit per header line, so a caller that split the head across
//! reads can resume from the last committed offset.

use std::borrow::Cow;

use crate::flags::Flags;
use crate::matches;
use crate::simd::eq_fold;

use super::catalog::{HeaderId, Policy, ValueKind};
use super::map::HeaderMap;
use super::value::HeaderValue;

enum Name {
    /// Recognized id; the offset points past the `:`.
    Known(HeaderId, usize),
    /// No candidate matched, rescan from the name start.
    Arbitrary,
    /// Not enough bytes to decide.
    Pending,
}

enum Step {
    Hit(usize),
    Miss,
    Pending,
}

#[inline(always)]
fn step(buf: &[u8], at: usize, lit: &[u8]) -> Step {
    if at + lit.len() > buf.len() {
        Step::Pending
    } else if eq_fold(buf, at, lit) {
        Step::Hit(at + lit.len())
    } else {
        Step::Miss
    }
}

/// Scan the header block at `offset` until the terminating empty line.
///
/// `header_size` carries the bytes consumed by previous reads of this head;
/// the total cap applies across continuations. On every outcome the offset
/// has advanced past the last committed header line.
pub(crate) fn scan_headers(
    buf: &[u8],
    offset: &mut usize,
    max_header_size: usize,
    max_header_name_size: usize,
    max_header_value_size: usize,
    header_size: usize,
    headers: &mut HeaderMap,
) -> Flags {
    let scan_start = *offset;
    let mut cursor = *offset;

    loop {
        // ===== block end =====
        match buf.get(cursor) {
            None => return Flags::UNTERMINATED_HEADERS,
            Some(b'\r') => match buf.get(cursor + 1) {
                Some(b'\n') => {
                    *offset = cursor + 2;
                    return Flags::OK;
                }
                Some(_) => return Flags::INVALID_HEADER,
                None => return Flags::UNTERMINATED_HEADERS,
            },
            Some(b'\n') => {
                *offset = cursor + 1;
                return Flags::OK;
            }
            Some(_) => {}
        }

        if header_size + (cursor - scan_start) > max_header_size {
            return Flags::MAX_HEADER_SIZE;
        }

        // ===== name =====
        let name_start = cursor;

        let (id, key): (HeaderId, Cow<'static, str>) = match recognize(buf, name_start) {
            Name::Pending => return Flags::UNTERMINATED_HEADERS,
            Name::Known(id, after_colon) => {
                cursor = after_colon;
                (id, Cow::Borrowed(id.desc().name))
            }
            Name::Arbitrary => {
                let mut end = name_start;
                loop {
                    match buf.get(end) {
                        None => return Flags::UNTERMINATED_HEADERS,
                        Some(b':') => break,
                        Some(&b) if !matches::is_field_name(b) => return Flags::INVALID_HEADER,
                        Some(_) => end += 1,
                    }
                    if end - name_start > max_header_name_size {
                        return Flags::MAX_HEADER_NAME_SIZE;
                    }
                }
                if end == name_start {
                    return Flags::INVALID_HEADER;
                }

                let name: String = buf[name_start..end]
                    .iter()
                    .map(|b| matches::FIELD_NAME[*b as usize] as char)
                    .collect();
                cursor = end + 1;

                // policy headers without a recognition branch still get
                // their repeat rules through the catalog
                match HeaderId::lookup(&name) {
                    HeaderId::Unknown => (HeaderId::Unknown, Cow::Owned(name)),
                    id => (id, Cow::Borrowed(id.desc().name)),
                }
            }
        };

        let desc = id.desc();

        // ===== cross-header policies =====
        if matches!(desc.policy, Policy::Singleton) && headers.contains_key(desc.name) {
            return Flags::DUPLICATE_SINGLE_HEADER;
        }
        match id {
            HeaderId::ContentLength if headers.contains_key("transfer-encoding") => {
                return Flags::BAD_REQUEST;
            }
            HeaderId::TransferEncoding if headers.contains_key("content-length") => {
                return Flags::BAD_REQUEST;
            }
            _ => {}
        }

        // ===== value =====
        while matches!(buf.get(cursor), Some(b' ' | b'\t')) {
            cursor += 1;
        }

        let parsed = match desc.value {
            ValueKind::Number => parse_value_number(buf, &mut cursor, max_header_value_size),
            ValueKind::Any => parse_value_any(buf, &mut cursor, max_header_value_size),
        };
        let (value_start, value_end) = match parsed {
            Ok(span) => span,
            Err(flags) => return flags,
        };

        // ===== line terminator =====
        match buf.get(cursor) {
            Some(b'\r') => match buf.get(cursor + 1) {
                Some(b'\n') => cursor += 2,
                _ => return Flags::INVALID_HEADER_VALUE,
            },
            Some(b'\n') => cursor += 1,
            _ => return Flags::UNTERMINATED_HEADERS,
        }

        // ===== commit =====
        let raw = &buf[value_start..value_end];
        if matches!(desc.policy, Policy::Mergeable) && headers.contains_key(desc.name) {
            headers.merge(desc.name, raw);
        } else {
            headers.insert(key, HeaderValue::copy_from_slice(raw));
        }

        *offset = cursor;
    }
}

// ===== value parsers =====

/// field-value of HTAB and visible ASCII, trailing OWS trimmed.
fn parse_value_any(
    buf: &[u8],
    cursor: &mut usize,
    max_header_value_size: usize,
) -> Result<(usize, usize), Flags> {
    let begin = *cursor;
    let mut end = *cursor;

    loop {
        let Some(&b) = buf.get(*cursor) else {
            return Err(Flags::UNTERMINATED_HEADERS);
        };
        if *cursor - begin > max_header_value_size {
            return Err(Flags::MAX_HEADER_VALUE_SIZE);
        }

        if matches!(b, b'\r' | b'\n') {
            break;
        }
        if !matches::is_field_value(b) {
            return Err(Flags::INVALID_HEADER_VALUE);
        }

        if !matches!(b, b' ' | b'\t') {
            end = *cursor + 1;
        }
        *cursor += 1;
    }

    Ok((begin, end))
}

/// At least one decimal digit, then optional trailing OWS.
fn parse_value_number(
    buf: &[u8],
    cursor: &mut usize,
    max_header_value_size: usize,
) -> Result<(usize, usize), Flags> {
    let begin = *cursor;
    let mut end = *cursor;
    let mut seen_digit = false;

    loop {
        let Some(&b) = buf.get(*cursor) else {
            return Err(Flags::UNTERMINATED_HEADERS);
        };
        if *cursor - begin > max_header_value_size {
            return Err(Flags::MAX_HEADER_VALUE_SIZE);
        }

        match b {
            b'\r' | b'\n' => break,
            b'0'..=b'9' => {
                seen_digit = true;
                end = *cursor + 1;
                *cursor += 1;
            }
            b' ' | b'\t' => {
                // only OWS may follow the digits
                *cursor += 1;
                loop {
                    match buf.get(*cursor) {
                        None => return Err(Flags::UNTERMINATED_HEADERS),
                        Some(b'\r' | b'\n') => break,
                        Some(b' ' | b'\t') => *cursor += 1,
                        Some(_) => return Err(Flags::INVALID_HEADER_VALUE),
                    }
                }
                break;
            }
            _ => return Err(Flags::INVALID_HEADER_VALUE),
        }
    }

    if !seen_digit {
        return Err(Flags::INVALID_HEADER_VALUE);
    }
    Ok((begin, end))
}

// ===== name recognition =====

/// Recognize a known header name starting at `start`.
///
/// Letter branches mirror the catalog: a candidate that cannot be decided
/// with the bytes at hand reports `Pending` rather than guessing, and any
/// decided miss falls through to the arbitrary-name path.
fn recognize(buf: &[u8], start: usize) -> Name {
    macro_rules! lit {
        ($at:expr, $lit:literal => $id:ident) => {
            match step(buf, $at, $lit) {
                Step::Hit(end) => match buf.get(end) {
                    Some(b':') => return Name::Known(HeaderId::$id, end + 1),
                    None => return Name::Pending,
                    Some(_) => {}
                },
                Step::Pending => return Name::Pending,
                Step::Miss => {}
            }
        };
    }

    macro_rules! peek {
        ($at:expr) => {
            match buf.get($at) {
                Some(&b) => b | 0x20,
                None => return Name::Pending,
            }
        };
    }

    let at = start + 1;

    match buf[start] | 0x20 {
        b'h' => lit!(at, b"ost" => Host),

        b'a' => match peek!(at) {
            b'c' => match step(buf, at, b"ccept") {
                Step::Hit(at) => match buf.get(at) {
                    Some(b':') => return Name::Known(HeaderId::Accept, at + 1),
                    Some(b'-') => {
                        let at = at + 1;
                        match peek!(at) {
                            b'l' => lit!(at, b"language" => AcceptLanguage),
                            b'e' => lit!(at, b"encoding" => AcceptEncoding),
                            b'r' => lit!(at, b"ranges" => AcceptRanges),
                            _ => {}
                        }
                    }
                    None => return Name::Pending,
                    Some(_) => {}
                },
                Step::Pending => return Name::Pending,
                Step::Miss => {}
            },
            b'l' => lit!(at, b"llow" => Allow),
            b'u' => lit!(at, b"uthorization" => Authorization),
            _ => {}
        },

        b'c' => match peek!(at) {
            b'a' => lit!(at, b"ache-control" => CacheControl),
            b'o' => match peek!(at + 1) {
                b'o' => lit!(at, b"ookie" => Cookie),
                b'n' => match peek!(at + 2) {
                    b'n' => lit!(at, b"onnection" => Connection),
                    b't' => match step(buf, at, b"ontent-") {
                        Step::Hit(at) => match peek!(at) {
                            b'l' => lit!(at, b"length" => ContentLength),
                            b't' => lit!(at, b"type" => ContentType),
                            b'r' => lit!(at, b"range" => ContentRange),
                            _ => {}
                        },
                        Step::Pending => return Name::Pending,
                        Step::Miss => {}
                    },
                    _ => {}
                },
                _ => {}
            },
            _ => {}
        },

        b'd' => match peek!(at) {
            b'a' => lit!(at, b"ate" => Date),
            b'n' => lit!(at, b"nt" => Dnt),
            _ => {}
        },

        b'i' => match step(buf, at, b"f-") {
            Step::Hit(at) => match peek!(at) {
                b'n' => lit!(at, b"none-match" => IfNoneMatch),
                b'm' => match peek!(at + 1) {
                    b'a' => lit!(at, b"match" => IfMatch),
                    b'o' => lit!(at, b"modified-since" => IfModifiedSince),
                    _ => {}
                },
                b'u' => lit!(at, b"unmodified-since" => IfUnmodifiedSince),
                _ => {}
            },
            Step::Pending => return Name::Pending,
            Step::Miss => {}
        },

        b'l' => match peek!(at) {
            b'i' => lit!(at, b"ink" => Link),
            b'a' => lit!(at, b"ast-modified" => LastModified),
            b'o' => lit!(at, b"ocation" => Location),
            _ => {}
        },

        b'o' => lit!(at, b"rigin" => Origin),

        b'p' => match peek!(at) {
            b'r' => match peek!(at + 1) {
                b'o' => match step(buf, at, b"roxy-auth") {
                    Step::Hit(at) => match peek!(at) {
                        b'e' => lit!(at, b"enticate" => ProxyAuthenticate),
                        b'o' => lit!(at, b"orization" => ProxyAuthorization),
                        _ => {}
                    },
                    Step::Pending => return Name::Pending,
                    Step::Miss => {}
                },
                b'a' => lit!(at, b"ragma" => Pragma),
                _ => {}
            },
            _ => {}
        },

        b's' => match peek!(at) {
            b'e' => match peek!(at + 1) {
                b'c' => match step(buf, at, b"ec-fetch-") {
                    Step::Hit(at) => match peek!(at) {
                        b's' => lit!(at, b"site" => SecFetchSite),
                        b'm' => lit!(at, b"mode" => SecFetchMode),
                        b'd' => lit!(at, b"dest" => SecFetchDest),
                        b'u' => lit!(at, b"user" => SecFetchUser),
                        _ => {}
                    },
                    Step::Pending => return Name::Pending,
                    Step::Miss => {}
                },
                b'r' => lit!(at, b"erver" => Server),
                b't' => lit!(at, b"et-cookie" => SetCookie),
                _ => {}
            },
            _ => {}
        },

        b't' => match peek!(at) {
            b'e' => lit!(at, b"e" => Te),
            b'r' => match peek!(at + 1) {
                b'a' => match peek!(at + 2) {
                    b'n' => lit!(at, b"ransfer-encoding" => TransferEncoding),
                    b'i' => lit!(at, b"railer" => Trailer),
                    _ => {}
                },
                _ => {}
            },
            _ => {}
        },

        b'u' => match peek!(at) {
            b's' => lit!(at, b"ser-agent" => UserAgent),
            b'p' => lit!(at, b"pgrade" => Upgrade),
            _ => {}
        },

        b'v' => match peek!(at) {
            b'i' => lit!(at, b"ia" => Via),
            b'a' => lit!(at, b"ary" => Vary),
            _ => {}
        },

        b'w' => match peek!(at) {
            b'w' => lit!(at, b"ww-authenticate" => WwwAuthenticate),
            b'a' => lit!(at, b"arning" => Warning),
            _ => {}
        },

        b'x' => match peek!(at) {
            b'-' => match peek!(at + 1) {
                b'f' => match step(buf, at, b"-forwarded-") {
                    Step::Hit(at) => match peek!(at) {
                        b'f' => lit!(at, b"for" => XForwardedFor),
                        b'p' => lit!(at, b"proto" => XForwardedProto),
                        b'h' => lit!(at, b"host" => XForwardedHost),
                        _ => {}
                    },
                    Step::Pending => return Name::Pending,
                    Step::Miss => {}
                },
                b'r' => lit!(at, b"-real-ip" => XRealIp),
                _ => {}
            },
            _ => {}
        },

        _ => {}
    }

    Name::Arbitrary
}
