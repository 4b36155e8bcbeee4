//! Route trie compiler.
//!
//! Endpoints for one method are folded into a trie of packed static
//! prefixes, parameter placeholders, and wildcard terminals. Building is
//! offline work; the resulting tree is immutable and shared by every
//! request.

use std::collections::BTreeMap;

use super::node::{ParamDesc, ParamType, RouteNode};

const PARAM_MARKER: u8 = b':';
const WILDCARD_MARKER: u8 = b'*';
/// Maximum bytes packed into one static node value.
const MAX_PACKED: usize = 8;

/// A route pattern plus handler slot, the builder's input.
///
/// Parameter placeholders are declared inline (`users/:id/posts`); a
/// trailing `*` consumes the rest of the path. One leading `/` is stripped
/// so `"users/:id"` and `"/users/:id"` register identically.
#[derive(Debug, Clone)]
pub struct Endpoint {
    pattern: String,
    params: Vec<ParamDesc>,
    handler: u32,
}

impl Endpoint {
    /// Describe a pattern, extracting its parameter descriptors.
    pub fn new(pattern: &str, handler: u32) -> Endpoint {
        let pattern = pattern.strip_prefix('/').unwrap_or(pattern).to_owned();

        let mut params = Vec::new();
        let bytes = pattern.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == PARAM_MARKER && (i == 0 || bytes[i - 1] == b'/') {
                let start = i + 1;
                let mut end = start;
                while end < bytes.len() && !matches!(bytes[end], b'/' | b'?') {
                    end += 1;
                }
                params.push(ParamDesc {
                    name: pattern[start..end].into(),
                    ty: ParamType::Str,
                });
                i = end;
            } else {
                i += 1;
            }
        }

        Endpoint { pattern, params, handler }
    }

    /// Override the declared type of the `index`-th parameter.
    pub fn param_type(mut self, index: usize, ty: ParamType) -> Endpoint {
        if let Some(param) = self.params.get_mut(index) {
            param.ty = ty;
        }
        self
    }

    /// Declared parameter descriptors, in pattern order.
    pub fn params(&self) -> &[ParamDesc] {
        &self.params
    }

    fn byte(&self, offset: usize) -> Option<u8> {
        self.pattern.as_bytes().get(offset).copied()
    }

    fn terminated(&self, offset: usize) -> bool {
        self.pattern.len() <= offset
    }

    fn param_at(&self, offset: usize) -> Option<&ParamDesc> {
        let bytes = self.pattern.as_bytes();
        let start = offset + 1;
        let mut end = start;
        while end < bytes.len() && !matches!(bytes[end], b'/' | b'?') {
            end += 1;
        }
        let name = &self.pattern[start..end];
        self.params.iter().find(|p| &*p.name == name)
    }
}

/// Compile endpoints for one method into a trie, or `None` if empty.
///
/// Conflicting handler slots at the same node resolve last-writer-wins; the
/// caller validates uniqueness upstream.
pub fn build_route_tree(endpoints: &[Endpoint]) -> Option<RouteNode> {
    if endpoints.is_empty() {
        return None;
    }

    let mut root = RouteNode::root();
    let refs: Vec<&Endpoint> = endpoints.iter().collect();
    build_sub(&mut root, &refs, 0);
    Some(root)
}

fn build_sub(node: &mut RouteNode, eps: &[&Endpoint], offset: usize) {
    if eps.is_empty() {
        return;
    }

    for ep in eps {
        if ep.terminated(offset) {
            // last write wins on duplicates
            node.handler = Some(ep.handler);
        }
    }

    let mut static_eps = Vec::new();
    let mut param_eps = Vec::new();
    let mut wildcard_ep = None;

    for &ep in eps {
        let Some(c) = ep.byte(offset) else { continue };

        if c == WILDCARD_MARKER {
            wildcard_ep = Some(ep);
        } else if c == PARAM_MARKER && (offset == 0 || ep.byte(offset - 1) == Some(b'/')) {
            param_eps.push(ep);
        } else {
            static_eps.push(ep);
        }
    }

    if !static_eps.is_empty() {
        build_static(node, &static_eps, offset);
    }

    // all endpoints at this level share one parameter node; the first
    // endpoint's placeholder supplies name, type, and token length
    if let Some(first) = param_eps.first() {
        let (name, ty) = match first.param_at(offset) {
            Some(desc) => (&*desc.name, desc.ty),
            None => ("", ParamType::Str),
        };
        let mut param_node = RouteNode::param(name, ty);

        // skip ":", the name, and the separator after it
        let next_offset = offset + 1 + name.len() + 1;
        build_sub(&mut param_node, &param_eps, next_offset);
        node.children.push(param_node);
    }

    if let Some(ep) = wildcard_ep {
        node.children.push(RouteNode::wildcard(ep.handler));
    }
}

fn build_static(node: &mut RouteNode, eps: &[&Endpoint], offset: usize) {
    // extend a common prefix one byte at a time, up to the packing limit
    let mut prefix = Vec::new();
    for p in 0..MAX_PACKED {
        let Some(c) = eps[0].byte(offset + p) else { break };
        if matches!(c, PARAM_MARKER | WILDCARD_MARKER) {
            break;
        }
        if !eps.iter().all(|ep| ep.byte(offset + p) == Some(c)) {
            break;
        }
        prefix.push(c);
    }

    if !prefix.is_empty() {
        let mut child = RouteNode::stat(&prefix);
        build_sub(&mut child, eps, offset + prefix.len());
        node.children.push(child);
    } else {
        // no shared first byte: one single-byte child per bucket
        let mut buckets: BTreeMap<u8, Vec<&Endpoint>> = BTreeMap::new();
        for &ep in eps {
            if let Some(c) = ep.byte(offset) {
                buckets.entry(c).or_default().push(ep);
            }
        }
        for (first, bucket) in buckets {
            let mut child = RouteNode::stat(&[first]);
            build_sub(&mut child, &bucket, offset + 1);
            node.children.push(child);
        }
    }
}
