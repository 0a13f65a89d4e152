use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub demo: DemoConfig,
}

/// How the store decides that a reducer produced "no transition".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoOpDetection {
    /// The reducer returned the same `Arc` it was given.
    #[default]
    Identity,
    /// The reducer returned a value equal to the current one.
    Equality,
}

/// Per-store behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Publish every reduced change, no-ops included (test mode).
    #[serde(default)]
    pub publish_every_transition: bool,
    #[serde(default)]
    pub no_op_detection: NoOpDetection,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive (default: "info"). `RUST_LOG` wins when set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

/// Settings for the bundled chats demo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Simulated load latency in milliseconds (default: 300).
    #[serde(default = "default_load_delay_ms")]
    pub load_delay_ms: u64,
    /// Chats returned by the in-memory use case.
    #[serde(default = "default_chats")]
    pub chats: Vec<String>,
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_load_delay_ms() -> u64 {
    300
}

fn default_chats() -> Vec<String> {
    vec![
        "Amanda".to_string(),
        "Mãe".to_string(),
        "Stélio".to_string(),
    ]
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            load_delay_ms: default_load_delay_ms(),
            chats: default_chats(),
        }
    }
}
