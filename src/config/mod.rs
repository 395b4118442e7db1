//!
//! Configuration structures for the router, its response sink and logging.
//!
//! A configuration can be created in many ways:
//! - From an environment-specific TOML file via `Config::from_rust_env` or `Config::from_toml_file`
//! - From a TOML string via `Config::from_toml` or `str::parse`
//! - Constructed programmatically via the builder methods on `Config`
//!
//! In both TOML-based methods, environment variables can be referenced in the TOML
//! using the {{ VAR_NAME }} syntax, and they will be substituted with the corresponding
//! environment variable value.
//!
//! Configuration is split into logical sections, each represented by their own struct:
//!
//! - `RouteConfig` for registration and execution options (`core.route.*`)
//! - `ResponseConfig` for response sink options (`core.response.*`)
//! - `LoggingConfig` for logging and tracing settings
//!
mod logging;
mod response;
mod route;

pub use logging::*;
pub use response::*;
pub use route::*;

use {
    crate::{Error, Result, utils::replace_handlebars_with_env},
    serde::Deserialize,
    std::{env, fs, str::FromStr},
};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub route: RouteConfig,
    #[serde(default)]
    pub response: ResponseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    ///
    /// Creates a default configuration.
    /// This will attempt to load configuration from the file based on the RUST_ENV
    /// environment variable falling back to a default configuration if the environment
    /// variable is not set. Configuration files should be located in the "config/"
    /// directory of your project.
    ///
    fn default() -> Self {
        match Self::from_rust_env() {
            Ok(config) => config,
            Err(_) => Config::builtin(),
        }
    }
}

impl Config {
    ///
    /// Returns the built-in defaults without consulting the environment.
    ///
    pub fn builtin() -> Config {
        Config {
            route: RouteConfig::default(),
            response: ResponseConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    ///
    /// Loads the configuration from a file based on the RUST_ENV environment variable.
    ///
    pub fn from_rust_env() -> Result<Config> {
        Self::from_toml_file(env::var("RUST_ENV")?)
    }

    ///
    /// Given an environment name, loads the corresponding configuration file,
    /// substitutes any environment variables, and returns a Config struct.
    /// The configuration file is expected to be located at "config/{env}.toml".
    ///
    pub fn from_toml_file(env: impl AsRef<str>) -> Result<Config> {
        let path = format!("config/{}.toml", env.as_ref());
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    ///
    /// Parses a configuration string in TOML format into a Config struct.
    ///
    pub fn from_toml(toml_str: &str) -> Result<Config> {
        toml_str.parse()
    }

    /// Enables or disables group pruning.
    pub fn with_pruning(mut self, enable: bool) -> Self {
        self.route.pruning = enable;
        self
    }

    /// Enables or disables the segment tree used for dispatch.
    pub fn with_auto_optimize(mut self, enable: bool) -> Self {
        self.route.auto_optimize = enable;
        self
    }

    /// Enables or disables appending echoed callback output to the response.
    pub fn with_append_echoed_text(mut self, enable: bool) -> Self {
        self.route.append_echoed_text = enable;
        self
    }

    /// Sets the content type applied before callable and view handlers run.
    pub fn with_response_default_type(mut self, mime: impl Into<String>) -> Self {
        self.route.response_default_type = mime.into();
        self
    }

    /// Sets the filter name applied to the final response body.
    pub fn with_response_filter(mut self, name: impl Into<String>) -> Self {
        self.route.response_filter = name.into();
        self
    }

    /// Enables or disables flushing the response when dispatch returns.
    pub fn with_autosend(mut self, enable: bool) -> Self {
        self.response.autosend = enable;
        self
    }

    /// Sets the log format of the LoggingConfig.
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.logging.format = format;
        self
    }

    ///
    /// Looks up an option by its dotted name, e.g. `core.route.pruning`.
    /// Returns `None` for names that the router does not recognise.
    ///
    pub fn option(&self, key: &str) -> Option<toml::Value> {
        use toml::Value;
        match key {
            "core.route.pruning" => Some(Value::Boolean(self.route.pruning)),
            "core.route.auto_optimize" => Some(Value::Boolean(self.route.auto_optimize)),
            "core.route.append_echoed_text" => {
                Some(Value::Boolean(self.route.append_echoed_text))
            }
            "core.route.response_default_type" => {
                Some(Value::String(self.route.response_default_type.clone()))
            }
            "core.route.response" => Some(Value::String(self.route.response_filter.clone())),
            "core.response.autosend" => Some(Value::Boolean(self.response.autosend)),
            _ => None,
        }
    }

    /// Ensures that the configuration is valid.
    pub fn validate(&self) -> Result<()> {
        self.route.validate()?;
        self.response.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    ///
    /// Sets up the tracing subscriber for logging based on the LoggingConfig.
    ///
    /// NOTE: This should be called early during startup to ensure logging is configured
    ///       before any routes are registered.
    ///
    pub fn setup_tracing(&self) {
        use tracing_subscriber::{EnvFilter, prelude::*};
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            self.logging
                .filter
                .as_deref()
                .and_then(|directives| EnvFilter::try_new(directives).ok())
                .unwrap_or_else(|| EnvFilter::new("error"))
        });
        match self.logging.format {
            LogFormat::Json => {
                let _ = tracing_subscriber::registry()
                    .with(tracing_subscriber::fmt::layer().json())
                    .with(env_filter)
                    .try_init();
            }
            LogFormat::Default => {
                let _ = tracing_subscriber::registry()
                    .with(tracing_subscriber::fmt::layer())
                    .with(env_filter)
                    .try_init();
            }
            LogFormat::Compact => {
                let _ = tracing_subscriber::registry()
                    .with(tracing_subscriber::fmt::layer().compact())
                    .with(env_filter)
                    .try_init();
            }
            LogFormat::Pretty => {
                let _ = tracing_subscriber::registry()
                    .with(tracing_subscriber::fmt::layer().pretty())
                    .with(env_filter)
                    .try_init();
            }
        }
    }
}

///
/// Parses a configuration string with references to environment variables
/// into a Config struct by substituting the environment variables and then
/// parsing the resulting TOML.
///
impl FromStr for Config {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        let config_file = replace_handlebars_with_env(s);
        let config = toml::from_str::<Config>(&config_file)?;
        Ok(config)
    }
}
