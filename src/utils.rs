//!
//! Utility functions shared by the configuration loader and the router.
//!
//! This module provides:
//! - [`replace_handlebars_with_env`] - Template substitution for environment variables
//! - [`normalize_path`] - Canonical `/`-prefixed form used for pattern matching
//! - [`collapse_slashes`] - Squeezes runs of `/` into a single separator
//!

use {
    regex::{Captures, Regex},
    std::{env, sync::LazyLock},
};

/// Matches `{{ VAR_NAME }}` with optional whitespace around the variable name.
/// Variable names must be uppercase letters, digits, or underscores.
static HANDLEBAR_REGEXP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Z0-9_]+)\s*\}\}").unwrap());

/// Replaces handlebars-style placeholders with environment variable values.
///
/// Searches through the input string for patterns like `{{ VAR_NAME }}` and replaces
/// them with the corresponding environment variable value. A variable that is not
/// set is replaced with an empty string and a warning is logged.
///
/// # Examples
///
/// ```
/// use route_core::replace_handlebars_with_env;
///
/// let template = "Value: {{ ROUTE_CORE_SURELY_MISSING }}";
/// assert_eq!(replace_handlebars_with_env(template), "Value: ");
/// ```
pub fn replace_handlebars_with_env(input: &str) -> String {
    HANDLEBAR_REGEXP
        .replace_all(input, |caps: &Captures| {
            let var_name = &caps[1];
            env::var(var_name).unwrap_or_else(|_| {
                tracing::warn!(
                    variable = %var_name,
                    "Environment variable not found, substituting with empty string"
                );
                String::new()
            })
        })
        .to_string()
}

/// Returns the path with surrounding slashes trimmed and a single leading `/`.
///
/// This is the form every dynamic pattern is matched against.
///
/// ```
/// use route_core::normalize_path;
///
/// assert_eq!(normalize_path("/element/"), "/element");
/// assert_eq!(normalize_path("element/12"), "/element/12");
/// assert_eq!(normalize_path("/"), "/");
/// ```
pub fn normalize_path(path: &str) -> String {
    format!("/{}", path.trim_matches('/'))
}

/// Collapses every run of consecutive slashes into a single `/`.
///
/// ```
/// use route_core::collapse_slashes;
///
/// assert_eq!(collapse_slashes("//a///b/"), "/a/b/");
/// ```
pub fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut previous_slash = false;
    for c in path.chars() {
        if c == '/' {
            if !previous_slash {
                out.push(c);
            }
            previous_slash = true;
        } else {
            out.push(c);
            previous_slash = false;
        }
    }
    out
}
