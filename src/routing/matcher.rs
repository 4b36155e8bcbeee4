//! Route trie matcher.
//!
//! Walks a compiled trie over the request target, filling path parameters
//! and query pairs as it descends. Children are tried in insertion order:
//! static prefixes first, then the parameter placeholder, then the wildcard
//! terminal.

use std::collections::HashMap;

use super::node::{NodeKind, RouteNode};
use crate::query::parse_query;
use crate::simd::pack_padded_at;

/// Bytes a wildcard may consume before the walk is abandoned.
const WILDCARD_SPAN_LIMIT: usize = 1000;

/// Reasons a trie walk can fail.
///
/// On failure the cursor may sit past the point of divergence and every
/// mutable output must be treated as invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchError {
    /// No endpoint matched the target.
    NotFound,
    /// Query segment exceeded the configured byte cap.
    QueryOverflow,
    /// Wildcard span exceeded the configured byte bound.
    UrlOverflow,
}

impl std::error::Error for MatchError {}

impl std::fmt::Display for MatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            MatchError::NotFound => "no matching route",
            MatchError::QueryOverflow => "query segment exceeded byte cap",
            MatchError::UrlOverflow => "request target exceeded wildcard bound",
        })
    }
}

#[inline(always)]
fn static_matches(node: &RouteNode, buf: &[u8], at: usize) -> bool {
    pack_padded_at(buf, at, node.value_len as usize) == node.value
}

/// Returns `true` when an endpoint may terminate at `at`: a space, a query
/// start, or the end of the buffer.
#[inline(always)]
fn terminal(buf: &[u8], at: usize) -> bool {
    matches!(buf.get(at), None | Some(b' ') | Some(b'?'))
}

/// Match the target at `offset` against a compiled trie.
///
/// On success the handler slot is returned, `params` holds the path
/// parameter values in declaration order, `query` holds decoded pairs, and
/// the offset sits on the byte terminating the target (normally the space
/// before the version literal).
pub fn match_url(
    root: &RouteNode,
    buf: &[u8],
    offset: &mut usize,
    params: &mut Vec<String>,
    query: &mut HashMap<String, String>,
    query_limit: usize,
) -> Result<u32, MatchError> {
    let mut node = root;

    if matches!(node.kind, NodeKind::Static) && node.value_len > 0 {
        if !static_matches(node, buf, *offset) {
            return Err(MatchError::NotFound);
        }
        *offset += node.value_len as usize;
    }

    // empty pattern terminating at the root
    if let Some(handler) = node.handler {
        if terminal(buf, *offset) {
            if buf.get(*offset) == Some(&b'?') {
                parse_query(buf, offset, query, query_limit)
                    .map_err(|_| MatchError::QueryOverflow)?;
            }
            return Ok(handler);
        }
    }

    'walk: loop {
        for child in &node.children {
            match &child.kind {
                NodeKind::Param { .. } => {
                    let start = *offset;
                    while !matches!(buf.get(*offset), None | Some(b'/' | b'?' | b' ')) {
                        *offset += 1;
                    }
                    params.push(String::from_utf8_lossy(&buf[start..*offset]).into_owned());

                    if let Some(handler) = child.handler {
                        if terminal(buf, *offset) {
                            if buf.get(*offset) == Some(&b'?') {
                                parse_query(buf, offset, query, query_limit)
                                    .map_err(|_| MatchError::QueryOverflow)?;
                            }
                            return Ok(handler);
                        }
                    }

                    // step over the segment separator
                    *offset += 1;
                    node = child;
                    continue 'walk;
                }

                NodeKind::Wildcard => {
                    let start = *offset;
                    loop {
                        match buf.get(*offset) {
                            None | Some(b' ') => break,
                            Some(b'?') => {
                                parse_query(buf, offset, query, query_limit)
                                    .map_err(|_| MatchError::QueryOverflow)?;
                                break;
                            }
                            Some(_) => {
                                *offset += 1;
                                if *offset - start > WILDCARD_SPAN_LIMIT {
                                    return Err(MatchError::UrlOverflow);
                                }
                            }
                        }
                    }
                    return child.handler.ok_or(MatchError::NotFound);
                }

                NodeKind::Static => {
                    if !static_matches(child, buf, *offset) {
                        continue;
                    }
                    *offset += child.value_len as usize;

                    if let Some(handler) = child.handler {
                        if terminal(buf, *offset) {
                            if buf.get(*offset) == Some(&b'?') {
                                parse_query(buf, offset, query, query_limit)
                                    .map_err(|_| MatchError::QueryOverflow)?;
                            }
                            return Ok(handler);
                        }
                    }

                    node = child;
                    continue 'walk;
                }
            }
        }

        return Err(MatchError::NotFound);
    }
}
