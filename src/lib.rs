//! HTTP/1.1 request head scanning and routing.
//!
//! One call per buffered TCP read on the server hot path: the request line
//! is validated, the target is dispatched against a pre-built route trie to
//! a handler slot plus path and query parameters, and the header block is
//! normalized into a mapping of recognized names to values.
//!
//! The routing table is built once with [`Engine::register_routes`] and is
//! immutable afterwards; [`RequestState`] is owned by the caller for one
//! request and populated in place. Outcomes are reported as [`Flags`]
//! rather than errors, so the caller can map them straight onto response
//! codes.
#![warn(missing_debug_implementations)]

mod flags;
mod log;
mod matches;
mod method;
mod query;
mod simd;
mod state;

mod engine;

pub mod headers;
pub mod routing;

// ===== Reexports =====

pub use engine::{Engine, Limits, Route};
pub use flags::Flags;
pub use headers::{HeaderMap, HeaderValue};
pub use method::{Method, UnknownMethod};
pub use routing::{Endpoint, MatchError, ParamType};
pub use state::RequestState;
