//! Core facade.
//!
//! [`Engine`] owns the per-method route tables and the scan limits, and
//! dispatches the request-line and header scans. Built once at startup, it
//! is immutable afterwards and freely shareable across workers.

use std::fmt::Write;

use crate::flags::Flags;
use crate::headers::scanner::scan_headers;
use crate::log::debug;
use crate::method::Method;
use crate::routing::{self, Endpoint, MatchError, RouteNode};
use crate::simd::eq_exact;
use crate::state::RequestState;

const VERSION_LITERAL: &[u8] = b"HTTP/1.1";

/// Scan caps, all in bytes except where noted.
#[derive(Debug, Clone)]
pub struct Limits {
    /// Total header block bytes across continuations.
    pub max_header_size: usize,
    /// Single header name bytes.
    pub max_header_name_size: usize,
    /// Single header value bytes.
    pub max_header_value_size: usize,
    /// Query segment bytes.
    pub query_limit: usize,
    /// Announced body bytes accepted by head finalization.
    pub max_content_length: u64,
}

impl Default for Limits {
    fn default() -> Limits {
        Limits {
            max_header_size: 8 * 1024,
            max_header_name_size: 4 * 1024,
            max_header_value_size: 4 * 1024,
            query_limit: 1024,
            max_content_length: 1024 * 1024,
        }
    }
}

/// One route registration: method, pattern, handler slot.
#[derive(Debug, Clone)]
pub struct Route {
    pub method: Method,
    pub pattern: String,
    pub handler: u32,
}

impl Route {
    pub fn new(method: Method, pattern: &str, handler: u32) -> Route {
        Route {
            method,
            pattern: pattern.to_owned(),
            handler,
        }
    }
}

/// Request head scanner with a compiled routing table.
#[derive(Debug, Default)]
pub struct Engine {
    tables: [Option<RouteNode>; Method::COUNT],
    allowed: u8,
    limits: Limits,
}

impl Engine {
    /// Create an engine with default limits and no routes.
    pub fn new() -> Engine {
        Engine::default()
    }

    /// Create an engine with explicit limits.
    pub fn with_limits(limits: Limits) -> Engine {
        Engine {
            limits,
            ..Engine::default()
        }
    }

    /// Configured scan limits.
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Compile route tables from a registration list.
    ///
    /// Routes are grouped by method and each non-empty group becomes one
    /// trie; the method's bit in the allowed mask is set accordingly.
    /// Returns the number of registered routes.
    pub fn register_routes(&mut self, routes: &[Route]) -> usize {
        let mut groups: [Vec<Endpoint>; Method::COUNT] = Default::default();

        for route in routes {
            groups[route.method.index()].push(Endpoint::new(&route.pattern, route.handler));
        }

        for method in Method::ALL {
            let group = &groups[method.index()];
            if let Some(root) = routing::build_route_tree(group) {
                debug!("{} routes registered for {method}", group.len());
                self.tables[method.index()] = Some(root);
                self.allowed |= 1 << method.index();
            }
        }

        routes.len()
    }

    #[inline]
    fn is_allowed(&self, method: Method) -> bool {
        self.allowed & (1 << method.index()) != 0
    }

    /// Scan one request head starting at `state.offset`.
    ///
    /// Runs the method scan, route match, version check, and header scan in
    /// sequence. Returns the matched handler slot when the walk reached
    /// one; the flag word on `state` carries everything else. A handler is
    /// returned even when the version check fails, so the caller can
    /// answer on the matched route.
    pub fn scan_request_line(&self, buf: &[u8], state: &mut RequestState) -> Option<u32> {
        let mut offset = state.offset;

        // ===== method =====
        let Some(method) = Method::scan(buf, &mut offset) else {
            state.flags |= Flags::BAD_REQUEST;
            return None;
        };

        if !self.is_allowed(method) {
            state.flags |= Flags::METHOD_NOT_ALLOWED;
            if method == Method::OPTIONS {
                state.flags |= Flags::CORS_PREFLIGHT;
            }
            state.offset = offset;
            return None;
        }

        state.method = Some(method);

        // the space, then the origin-form leading slash
        offset += 1;
        if buf.get(offset) == Some(&b'/') {
            offset += 1;
        }

        // ===== route =====
        let table = self.tables[method.index()]
            .as_ref()
            .expect("allowed bit implies a table");

        let handler = match routing::match_url(
            table,
            buf,
            &mut offset,
            &mut state.params,
            &mut state.query,
            self.limits.query_limit,
        ) {
            Ok(handler) => handler,
            Err(err) => {
                state.flags |= match err {
                    MatchError::NotFound => Flags::NOT_FOUND,
                    MatchError::QueryOverflow => Flags::REQUEST_QUERY_EXCEEDED,
                    MatchError::UrlOverflow => Flags::REQUEST_URL_EXCEEDED,
                };
                debug!("route match failed: {err}");
                state.offset = offset;
                return None;
            }
        };

        // ===== version =====
        offset += 1;
        if buf.len() < offset + VERSION_LITERAL.len()
            || !eq_exact(buf, offset, VERSION_LITERAL)
        {
            state.flags |= Flags::HTTP_VERSION_UNSUPPORTED;
            state.offset = offset;
            return Some(handler);
        }
        offset += VERSION_LITERAL.len();

        match buf.get(offset) {
            Some(b'\r') if buf.get(offset + 1) == Some(&b'\n') => offset += 2,
            Some(b'\n') => offset += 1,
            _ => {
                state.flags |= Flags::BAD_REQUEST;
                state.offset = offset;
                return Some(handler);
            }
        }

        // ===== headers =====
        let scan_start = offset;
        state.flags |= scan_headers(
            buf,
            &mut offset,
            self.limits.max_header_size,
            self.limits.max_header_name_size,
            self.limits.max_header_value_size,
            state.header_size,
            &mut state.headers,
        );
        state.header_size += offset - scan_start;
        state.offset = offset;

        Some(handler)
    }

    /// Resume the header scan at `state.offset`.
    ///
    /// Used when the caller split the head across reads: the request line
    /// was consumed by an earlier [`scan_request_line`][Engine::scan_request_line]
    /// call and `buf` now holds more of the same head.
    pub fn scan_header_continuation(&self, buf: &[u8], state: &mut RequestState) -> Flags {
        let mut offset = state.offset;
        let scan_start = offset;

        let flags = scan_headers(
            buf,
            &mut offset,
            self.limits.max_header_size,
            self.limits.max_header_name_size,
            self.limits.max_header_value_size,
            state.header_size,
            &mut state.headers,
        );

        state.header_size += offset - scan_start;
        state.offset = offset;
        state.flags |= flags;
        flags
    }

    /// Apply post-head policy once the header block is complete.
    ///
    /// Sets `MISSING_HOST`, `HAS_BODY`, `CONTENT_LENGTH_TOO_LARGE`, and
    /// `INVALID_CONTENT_LENGTH` as warranted, records them on the state,
    /// and returns what was added.
    pub fn finish_head(&self, state: &mut RequestState) -> Flags {
        let mut flags = Flags::OK;

        if !state.headers.contains_key("host") {
            flags |= Flags::MISSING_HOST;
        }

        if let Some(value) = state.headers.get("content-length") {
            // the numeric parser guarantees digits; overflow is still possible
            match value.as_str().parse::<u64>() {
                Ok(length) => {
                    if length > self.limits.max_content_length {
                        flags |= Flags::CONTENT_LENGTH_TOO_LARGE;
                    }
                    if length > 0 {
                        flags |= Flags::HAS_BODY;
                    }
                }
                Err(_) => flags |= Flags::INVALID_CONTENT_LENGTH,
            }
        }

        if state.headers.contains_key("transfer-encoding") {
            flags |= Flags::HAS_BODY;
        }

        state.flags |= flags;
        flags
    }

    /// Render the compiled route tables human-readably, `depth` levels deep.
    pub fn render_route_tree(&self, depth: usize) -> String {
        let mut out = String::new();
        for method in Method::ALL {
            if let Some(root) = &self.tables[method.index()] {
                let _ = writeln!(out, "{method}");
                out.push_str(&root.render(depth));
            }
        }
        out
    }
}
