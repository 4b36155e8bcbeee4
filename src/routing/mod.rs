//! Route trie building and matching.
//!
//! [`build_route_tree`] compiles the endpoints registered for one method
//! into an immutable trie; [`match_url`] walks it once per request,
//! extracting path parameters and query pairs along the way.

mod node;
mod builder;
mod matcher;

pub use node::{ParamDesc, ParamType, RouteNode};
pub use builder::{Endpoint, build_route_tree};
pub use matcher::{MatchError, match_url};
