//! Test helpers and utilities for Router tests
//!
//! This module provides shared test infrastructure for all Router **unit tests**.
//! Every test dispatches in-process against a [`Response`] held in memory.
//!
//! ## Available Helpers
//!
//! - Configuration builders: `create_base_config()`, `create_config_with_toml()`
//! - Router builders: `create_test_router()`, `create_linear_router()`
//! - Dispatch helpers: `dispatch()`, `body_of()`

use crate::{Config, Response, ResponseSink, Router};

#[cfg(test)]
pub(crate) mod basic;

// ============================================================================
// Configuration Helpers
// ============================================================================

/// Base TOML configuration template for tests.
/// Autosend is off so tests can inspect the response without a flush.
const BASE_CONFIG_TOML: &str = r#"
[route]
pruning = true
auto_optimize = true
append_echoed_text = true

[response]
autosend = false

[logging]
format = "compact"
"#;

/// Creates a base test configuration by parsing TOML.
pub(crate) fn create_base_config() -> Config {
    BASE_CONFIG_TOML
        .parse()
        .expect("Failed to parse test config TOML")
}

/// Creates a test configuration with the `[route]` table replaced.
///
/// # Example
/// ```ignore
/// let config = create_config_with_toml(r#"
/// [route]
/// auto_optimize = false
/// "#);
/// ```
pub(crate) fn create_config_with_toml(route_toml: &str) -> Config {
    let toml_str = format!(
        r#"
{route_toml}

[response]
autosend = false

[logging]
format = "compact"
        "#
    );

    toml_str.parse().expect("Failed to parse test config TOML")
}

// ============================================================================
// Router Helpers
// ============================================================================

/// Creates a router that dispatches through the segment tree.
pub(crate) fn create_test_router() -> Router {
    Router::new(create_base_config()).expect("Failed to create Router")
}

/// Creates a router that dispatches by scanning buckets in registration order.
pub(crate) fn create_linear_router() -> Router {
    Router::new(create_base_config().with_auto_optimize(false)).expect("Failed to create Router")
}

// ============================================================================
// Dispatch Helpers
// ============================================================================

/// Dispatches and returns whether a route matched along with the response.
pub(crate) fn dispatch(router: &Router, url: &str, method: &str) -> (bool, Response) {
    let mut response = Response::new();
    let matched = router.dispatch(url, method, &mut response);
    (matched, response)
}

/// Body produced by a GET dispatch, or `None` when nothing matched.
pub(crate) fn body_of(router: &Router, url: &str) -> Option<String> {
    let (matched, response) = dispatch(router, url, "get");
    matched.then(|| response.body())
}
