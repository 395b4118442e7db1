//! URL schema compilation.
//!
//! A schema is a `/`-delimited string where `(...)` marks an optional group,
//! `:name` a named capture and `*` a wildcard matching one or more of anything.
//! Compilation is a pure function of the schema, the per-parameter rule map and
//! the extraction mode; nothing outside this module inspects regex syntax.

use {
    super::params::Params,
    crate::{Error, Result},
    regex::{Captures, Regex},
    std::{collections::BTreeMap, fmt::Write, sync::LazyLock},
};

/// Per-parameter regex fragments, keyed by parameter name.
pub type Rules = BTreeMap<String, String>;

/// Fragment used for a `:name` parameter without an explicit rule.
pub const DEFAULT_PARAM_RULE: &str = "[^/]+";

/// Characters that make a schema require regex matching.
const DYNAMIC_MARKERS: [char; 6] = [':', '(', '?', '[', '*', '+'];

/// A `:name` token. Names follow the grammar of [`param_name_len`].
static PARAM_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":([A-Za-z][A-Za-z0-9_]*)").unwrap());

/// Whether the extracted form keeps named captures or only answers "does it match".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    /// Named capture groups, used to extract parameter values.
    Capture,
    /// Bare fragments wrapped in non-capturing groups, used for boolean matching.
    MatchOnly,
}

/// Returns true when the schema needs dynamic (regex) matching.
///
/// ```
/// use route_core::is_dynamic;
///
/// assert!(is_dynamic("/user/:id"));
/// assert!(is_dynamic("/files/*"));
/// assert!(!is_dynamic("/about/team"));
/// ```
pub fn is_dynamic(schema: &str) -> bool {
    schema.contains(DYNAMIC_MARKERS)
}

/// Returns true when `c` starts a dynamic portion of a schema.
pub(crate) fn is_marker(c: char) -> bool {
    DYNAMIC_MARKERS.contains(&c)
}

/// Rejects schemas the compiler cannot represent.
pub(crate) fn validate_schema(schema: &str) -> Result<()> {
    if schema.contains('#') {
        return Err(Error::invalid_pattern(format!(
            "route pattern must not contain '#': {schema}"
        )));
    }
    Ok(())
}

/// Rejects rule fragments the regex engine cannot compile.
pub(crate) fn validate_rules(rules: &Rules) -> Result<()> {
    for (name, fragment) in rules {
        if let Err(err) = Regex::new(fragment) {
            return Err(Error::invalid_pattern(format!(
                "rule for parameter '{name}' is not a valid regex: {err}"
            )));
        }
    }
    Ok(())
}

/// Length in bytes of the parameter name at the start of `rest` (`[A-Za-z][A-Za-z0-9_]*`).
fn param_name_len(rest: &str) -> usize {
    let bytes = rest.as_bytes();
    if bytes.first().is_none_or(|b| !b.is_ascii_alphabetic()) {
        return 0;
    }
    bytes
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
        .count()
}

/// Translates a schema into regex source without anchors.
///
/// `.` is escaped, `)` closes an optional group, `*` becomes `.+` and each
/// `:name` is replaced by its rule fragment. Optional groups never capture.
pub fn translate(schema: &str, rules: &Rules, mode: Extraction) -> String {
    let mut out = String::with_capacity(schema.len() * 2);
    let mut index = 0;

    while let Some(c) = schema[index..].chars().next() {
        index += c.len_utf8();
        match c {
            '.' => out.push_str(r"\."),
            '(' => out.push_str("(?:"),
            ')' => out.push_str(")?"),
            '*' => out.push_str(".+"),
            ':' => {
                let len = param_name_len(&schema[index..]);
                if len == 0 {
                    out.push(':');
                    continue;
                }
                let name = &schema[index..index + len];
                index += len;
                let fragment = rules
                    .get(name)
                    .map(String::as_str)
                    .unwrap_or(DEFAULT_PARAM_RULE);
                let _ = match mode {
                    Extraction::Capture => write!(out, "(?<{name}>{fragment})"),
                    Extraction::MatchOnly => write!(out, "(?:{fragment})"),
                };
            }
            _ => out.push(c),
        }
    }

    out
}

/// Compiles a schema into a regex anchored at both ends.
pub fn compile(schema: &str, rules: &Rules, mode: Extraction) -> Result<Regex> {
    validate_schema(schema)?;
    let source = format!("^{}$", translate(schema, rules, mode));
    Ok(Regex::new(&source)?)
}

/// Compiles a schema into a capturing regex anchored only at the start.
///
/// Used for dynamic group prefixes, which match the beginning of a longer path.
pub fn compile_cut(schema: &str, rules: &Rules) -> Result<Regex> {
    validate_schema(schema)?;
    let source = format!("^{}", translate(schema, rules, Extraction::Capture));
    Ok(Regex::new(&source)?)
}

/// Collects only the named captures that participated in the match.
pub(crate) fn named_captures(regex: &Regex, caps: &Captures<'_>) -> Params {
    regex
        .capture_names()
        .flatten()
        .filter_map(|name| caps.name(name).map(|m| (name, m.as_str())))
        .collect()
}

/// Replaces every `:name` token with `params[name] + "/"`, or nothing when absent.
pub(crate) fn substitute_params(template: &str, params: &Params) -> String {
    PARAM_TOKEN
        .replace_all(template, |caps: &Captures| {
            params
                .get(&caps[1])
                .map(|value| format!("{value}/"))
                .unwrap_or_default()
        })
        .into_owned()
}

/// Both compiled forms of a dynamic schema.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    capturing: Regex,
    matcher: Regex,
}

impl CompiledPattern {
    /// Compiles the capturing and the match-only forms of `schema`.
    pub fn new(schema: &str, rules: &Rules) -> Result<Self> {
        Ok(Self {
            capturing: compile(schema, rules, Extraction::Capture)?,
            matcher: compile(schema, rules, Extraction::MatchOnly)?,
        })
    }

    /// Boolean match against an already normalized path.
    pub fn is_match(&self, path: &str) -> bool {
        self.matcher.is_match(path)
    }

    /// Named parameters of an already normalized path, empty when it does not match.
    pub fn captures(&self, path: &str) -> Params {
        self.capturing
            .captures(path)
            .map(|caps| named_captures(&self.capturing, &caps))
            .unwrap_or_default()
    }

    /// Regex source of the capturing form.
    pub fn capturing_source(&self) -> &str {
        self.capturing.as_str()
    }

    /// Regex source of the match-only form.
    pub fn matcher_source(&self) -> &str {
        self.matcher.as_str()
    }
}
