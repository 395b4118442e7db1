//! Route registration, matching and dispatch.
//!
//! The functionality is split across submodules:
//!
//! - `pattern` - Schema to regex compilation
//! - `route` - A single route and its fluent handle ([`RouteMut`])
//! - `group` - Route groups and middleware fan-out ([`GroupMut`])
//! - `tree` - Segment tree index used by dispatch
//! - `router` - The registry ([`Router`]) and group scoping
//! - `dispatch` - Dispatch, route execution and the 404 path
//! - `events` - Event hooks and response filters
//! - `request` / `response` - Request source and response sink collaborators

mod dispatch;
mod echo;
mod events;
mod group;
mod handler;
mod params;
mod pattern;
mod request;
mod response;
mod route;
mod router;
mod tree;

pub use dispatch::NOT_FOUND_MESSAGE;
pub use echo::Echo;
pub use events::*;
pub use group::{GroupId, GroupMut, Member, RouteGroup};
pub use handler::{Handler, HandlerFn, Middleware, MiddlewareFn, Render, Reply};
pub use params::Params;
pub use pattern::{
    CompiledPattern, DEFAULT_PARAM_RULE, Extraction, Rules, compile, compile_cut, is_dynamic,
    translate,
};
pub use request::{Request, RequestSource};
pub use response::{AutoSend, PushLink, Response, ResponseSink};
pub use route::{Route, RouteId, RouteMut};
pub use router::Router;
pub use tree::SegmentTree;

#[cfg(test)]
mod tests;
