//! Query string decoding.
//!
//! Pairs are read as `key[=value]` separated by `&`, terminated by a space,
//! CR, LF, `#`, or the end of the buffer. Keys and values are percent- and
//! plus-decoded into owned strings.

use std::collections::HashMap;

/// Query segment exceeded the configured byte cap.
#[derive(Debug, PartialEq, Eq)]
pub struct QueryOverflow;

impl std::error::Error for QueryOverflow {}

impl std::fmt::Display for QueryOverflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("query segment exceeded byte cap")
    }
}

const fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Percent- and plus-decode one query component.
///
/// `%HH` decodes only when both digits are hexadecimal; any other `%`,
/// including a trailing one, is kept literally. Decoded bytes outside UTF-8
/// are substituted.
pub fn decode_component(raw: &[u8]) -> String {
    let mut out = Vec::with_capacity(raw.len());
    let mut rest = raw;

    while let [byte, tail @ ..] = rest {
        match byte {
            b'%' => {
                if let [hi, lo, more @ ..] = tail {
                    if let (Some(hi), Some(lo)) = (hex_digit(*hi), hex_digit(*lo)) {
                        out.push((hi << 4) | lo);
                        rest = more;
                        continue;
                    }
                }
                out.push(b'%');
                rest = tail;
            }
            b'+' => {
                out.push(b' ');
                rest = tail;
            }
            _ => {
                out.push(*byte);
                rest = tail;
            }
        }
    }

    match String::from_utf8(out) {
        Ok(s) => s,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    }
}

/// Scan query pairs starting at `offset` (which may sit on the `?`).
///
/// On return the offset sits on the terminating byte. Every consumed pair
/// byte counts against `limit`; the `?` itself does not.
pub fn parse_query(
    buf: &[u8],
    offset: &mut usize,
    query: &mut HashMap<String, String>,
    limit: usize,
) -> Result<(), QueryOverflow> {
    let mut at = *offset;

    if buf.get(at) == Some(&b'?') {
        at += 1;
    }

    let mut scanned = 0usize;
    let mut key_start = at;
    let mut val_start = None;

    macro_rules! commit {
        ($end:expr) => {{
            let key_end = val_start.unwrap_or($end);
            let key = decode_component(&buf[key_start..key_end]);
            let value = match val_start {
                Some(v) => decode_component(&buf[v + 1..$end]),
                None => String::new(),
            };
            query.insert(key, value);
        }};
    }

    while let Some(&byte) = buf.get(at) {
        if matches!(byte, b' ' | b'\r' | b'\n' | b'#' | 0) {
            break;
        }

        scanned += 1;
        if scanned > limit {
            return Err(QueryOverflow);
        }

        match byte {
            b'=' => val_start = Some(at),
            b'&' => {
                commit!(at);
                key_start = at + 1;
                val_start = None;
            }
            _ => {}
        }

        at += 1;
    }

    if key_start < at {
        commit!(at);
    }

    *offset = at;
    Ok(())
}
