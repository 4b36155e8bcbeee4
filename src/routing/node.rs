use std::fmt::Write;

/// Type attached to a parameter placeholder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParamType {
    #[default]
    Str,
    Number,
}

/// Parameter placeholder metadata declared by an endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDesc {
    pub name: Box<str>,
    pub ty: ParamType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NodeKind {
    Static,
    Param { name: Box<str>, ty: ParamType },
    Wildcard,
}

/// One node of the compiled route trie.
///
/// Static nodes hold up to 8 prefix bytes packed little-endian into `value`
/// with `0xFF` high padding, so the matcher resolves a whole prefix with one
/// 64-bit compare. Parameter and wildcard nodes match structurally.
#[derive(Debug, Clone)]
pub struct RouteNode {
    pub(crate) value: u64,
    pub(crate) value_len: u8,
    pub(crate) handler: Option<u32>,
    pub(crate) kind: NodeKind,
    pub(crate) children: Vec<RouteNode>,
}

impl RouteNode {
    pub(crate) fn root() -> RouteNode {
        RouteNode {
            value: 0,
            value_len: 0,
            handler: None,
            kind: NodeKind::Static,
            children: Vec::new(),
        }
    }

    pub(crate) fn stat(prefix: &[u8]) -> RouteNode {
        RouteNode {
            value: crate::simd::pack_padded(prefix),
            value_len: prefix.len() as u8,
            handler: None,
            kind: NodeKind::Static,
            children: Vec::new(),
        }
    }

    pub(crate) fn param(name: &str, ty: ParamType) -> RouteNode {
        RouteNode {
            value: 0,
            value_len: 0,
            handler: None,
            kind: NodeKind::Param { name: name.into(), ty },
            children: Vec::new(),
        }
    }

    pub(crate) fn wildcard(handler: u32) -> RouteNode {
        RouteNode {
            value: 0,
            value_len: 0,
            handler: Some(handler),
            kind: NodeKind::Wildcard,
            children: Vec::new(),
        }
    }

    /// Handler slot terminating an endpoint at this node, if any.
    #[inline]
    pub fn handler(&self) -> Option<u32> {
        self.handler
    }

    /// Render this subtree human-readably, `max_depth` levels deep.
    pub fn render(&self, max_depth: usize) -> String {
        let mut out = String::new();
        self.render_into(&mut out, 0, max_depth);
        out
    }

    fn render_into(&self, out: &mut String, depth: usize, max_depth: usize) {
        if depth > max_depth {
            return;
        }
        for _ in 0..depth {
            out.push_str("  ");
        }
        match &self.kind {
            NodeKind::Param { name, ty } => {
                let _ = write!(out, "PARAM({name}");
                if matches!(ty, ParamType::Number) {
                    out.push_str(": number");
                }
                out.push(')');
            }
            NodeKind::Wildcard => out.push_str("WILDCARD"),
            NodeKind::Static if self.value_len > 0 => {
                let _ = write!(out, "STATIC(len={}, hex={:#018x})", self.value_len, self.value);
            }
            NodeKind::Static => out.push_str("ROOT"),
        }
        if let Some(handler) = self.handler {
            let _ = write!(out, " -> handler={handler}");
        }
        out.push('\n');

        for child in &self.children {
            child.render_into(out, depth + 1, max_depth);
        }
    }
}
