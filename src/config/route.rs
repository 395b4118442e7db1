use {
    crate::{Error, Result},
    serde::Deserialize,
};

/// Content type applied to callable and view handlers unless configured otherwise.
pub const DEFAULT_RESPONSE_TYPE: &str = "text/html; charset=utf-8";

/// Filter name applied to the final response body of every run.
pub const DEFAULT_RESPONSE_FILTER: &str = "core.route.response";

///
/// Configuration for route registration and execution.
///
/// These are the `core.route.*` options. Every field has a default, so an
/// absent `[route]` section yields the standard behaviour.
///
#[derive(Debug, Clone, Deserialize)]
pub struct RouteConfig {
    /// Skip the body of a `group(...)` call whose prefix does not match the
    /// current request path. Only applies when the router is bound to a request.
    /// By default `pruning` is true.
    #[serde(default = "RouteConfig::default_true")]
    pub pruning: bool,

    /// Build the segment prefix tree at registration time and use it for dispatch.
    /// When false every dispatch is a linear scan over all routes.
    /// By default `auto_optimize` is true.
    #[serde(default = "RouteConfig::default_true")]
    pub auto_optimize: bool,

    /// Fold text that callbacks write to their `Echo` sink into the response body.
    /// By default `append_echoed_text` is true.
    #[serde(default = "RouteConfig::default_true")]
    pub append_echoed_text: bool,

    /// Content type set on the response before a callable or view handler runs.
    /// By default `response_default_type` is "text/html; charset=utf-8".
    #[serde(default = "RouteConfig::default_response_type")]
    pub response_default_type: String,

    /// Name of the filter applied to the final response body.
    /// By default `response_filter` is "core.route.response".
    #[serde(default = "RouteConfig::default_response_filter")]
    pub response_filter: String,
}

impl RouteConfig {
    fn default_true() -> bool {
        true
    }

    fn default_response_type() -> String {
        DEFAULT_RESPONSE_TYPE.into()
    }

    fn default_response_filter() -> String {
        DEFAULT_RESPONSE_FILTER.into()
    }

    pub fn validate(&self) -> Result<()> {
        if self.response_default_type.trim().is_empty() {
            return Err(Error::config(
                "route.response_default_type must not be empty. Set [route] response_default_type = \"text/html; charset=utf-8\" in config.",
            ));
        }

        if self.response_filter.trim().is_empty() {
            return Err(Error::config(
                "route.response_filter must not be empty. Set [route] response_filter = \"core.route.response\" in config.",
            ));
        }

        Ok(())
    }
}

impl Default for RouteConfig {
    fn default() -> Self {
        RouteConfig {
            pruning: true,
            auto_optimize: true,
            append_echoed_text: true,
            response_default_type: Self::default_response_type(),
            response_filter: Self::default_response_filter(),
        }
    }
}
