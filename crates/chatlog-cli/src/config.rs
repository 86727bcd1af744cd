//! CLI configuration loaded from environment variables.
//!
//! Every setting has a default so the binary runs with zero configuration.

use std::path::PathBuf;

use chatlog_store::Layout;

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// File used by the save and load menu entries.
    /// Env: `CHATLOG_HISTORY_PATH`
    /// Default: `chat_history.csv`
    pub history_path: PathBuf,

    /// Row layout of the history file.
    /// Env: `CHATLOG_LAYOUT` (`direct` or `broadcast`)
    /// Default: `direct`
    pub layout: Layout,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            history_path: PathBuf::from("chat_history.csv"),
            layout: Layout::Direct,
        }
    }
}

impl CliConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = var("CHATLOG_HISTORY_PATH") {
            if !path.trim().is_empty() {
                config.history_path = PathBuf::from(path);
            }
        }

        if let Some(value) = var("CHATLOG_LAYOUT") {
            match value.parse::<Layout>() {
                Ok(layout) => config.layout = layout,
                Err(e) => {
                    tracing::warn!(value = %value, error = %e, "Invalid CHATLOG_LAYOUT, using default");
                }
            }
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter.

        config
    }
}
