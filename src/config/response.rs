use {crate::Result, serde::Deserialize};

///
/// Configuration for the response sink (`core.response.*` options).
///
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseConfig {
    /// Flush the response sink when dispatch returns, on every exit path.
    /// By default `autosend` is true.
    #[serde(default = "ResponseConfig::default_autosend")]
    pub autosend: bool,
}

impl ResponseConfig {
    fn default_autosend() -> bool {
        true
    }

    pub fn validate(&self) -> Result<()> {
        Ok(())
    }
}

impl Default for ResponseConfig {
    fn default() -> Self {
        ResponseConfig {
            autosend: Self::default_autosend(),
        }
    }
}
