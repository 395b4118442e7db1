use {crate::Result, serde::Deserialize};

///
/// Configuration for logging and tracing.
///
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    /// Format for log output.
    /// The default format is `default`, which is "full" human-readable format.
    /// Other options are `json`, `compact`, and `pretty`.
    #[serde(default)]
    pub format: LogFormat,

    /// Filter directives used when `RUST_LOG` is not set, e.g. `"route_core=debug"`.
    /// When absent the subscriber falls back to the `error` level.
    #[serde(default)]
    pub filter: Option<String>,
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<()> {
        if let Some(filter) = &self.filter
            && tracing_subscriber::EnvFilter::try_new(filter).is_err()
        {
            return Err(crate::Error::config(format!(
                "logging.filter is not a valid filter directive: {filter}"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Default,
    Compact,
    Pretty,
}
