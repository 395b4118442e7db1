//! # route-core
//!
//! A URL routing and dispatch engine: register URL patterns with handlers,
//! group them under shared prefixes and middleware, then dispatch a URL and
//! HTTP method to the first matching route.
//!
//! Patterns support optional segments `(...)`, named parameters `:name` with
//! per-parameter regex rules, and `*` wildcards. Routes can be tagged for
//! reverse routing, and every option is configured through simple TOML.
//!
//! # Quick Start
//!
//! ```rust
//! use route_core::{Config, Response, ResponseSink, Result, Router};
//!
//! fn main() -> Result<()> {
//!     let config = Config::builtin().with_autosend(false);
//!     config.setup_tracing();
//!
//!     let mut router = Router::new(config)?;
//!     router
//!         .on("/element(/:id)", |args, _echo| {
//!             format!("element {}", args.get("id").unwrap_or("index"))
//!         })?
//!         .rules([("id", r"\d+")])?
//!         .tag("element");
//!
//!     let mut response = Response::new();
//!     assert!(router.dispatch("/element/12", "GET", &mut response));
//!     assert_eq!(response.body(), "element 12");
//!     assert!(router.dispatch("/element/", "GET", &mut Response::new()));
//!
//!     let url = router.url("element", &[("id", 7)].into_iter().collect());
//!     assert_eq!(url, "/element/7");
//!     Ok(())
//! }
//! ```
//!
//! # Groups and Middleware
//!
//! ```rust
//! use route_core::{Config, Response, ResponseSink, Router};
//!
//! let mut router = Router::new(Config::builtin().with_autosend(false)).unwrap();
//! router
//!     .group("/admin", |r, _args| {
//!         r.on("/users", |_, _| "users")?;
//!         r.on("/logs", |_, _| "logs")?;
//!         Ok(())
//!     })
//!     .unwrap()
//!     .before(|echo| echo.print("[auth]"));
//!
//! let mut response = Response::new();
//! router.dispatch("/admin/logs", "get", &mut response);
//! assert_eq!(response.body(), "[auth]logs");
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [route]
//! pruning = true
//! auto_optimize = true
//! append_echoed_text = true
//! response_default_type = "text/html; charset=utf-8"
//! response_filter = "core.route.response"
//!
//! [response]
//! autosend = true
//!
//! [logging]
//! format = "compact"
//! filter = "route_core=debug"
//! ```
//!
//! # Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | `config` | Configuration loading and validation ([`Config`]) |
//! | `routing` | Registration, matching and dispatch ([`Router`]) |
//! | `error` | Error types and handling ([`Error`]) |
//! | `utils` | Path and template helpers |
mod config;
mod error;
mod routing;
mod utils;

pub use config::*;
pub use error::*;
pub use routing::*;
pub use utils::*;

pub type Result<T> = std::result::Result<T, Error>;
