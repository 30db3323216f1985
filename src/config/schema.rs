//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from `chimera.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default location of the generated client module.
pub const DEFAULT_OUTPUT_PATH: &str = "resources/js/chimera.ts";

/// Default environment variable holding the pseudonymization secret.
pub const DEFAULT_SECRET_ENV: &str = "APP_KEY";

/// Root configuration for the route compiler.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ChimeraConfig {
    /// Where and how the artifact is written.
    pub output: OutputConfig,

    /// Pseudonymization and obfuscation settings.
    pub obfuscation: ObfuscationConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// Artifact output configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output file, overwritten on every run.
    pub path: PathBuf,

    /// Optional custom module template. The built-in template is used when unset.
    pub template: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            template: None,
        }
    }
}

/// Pseudonymization and obfuscation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObfuscationConfig {
    /// Replace every route-name segment with a keyed digest.
    pub pseudonymize: bool,

    /// Run the rendered module through the external obfuscator.
    pub obfuscate: bool,

    /// Number of hex characters kept from each segment digest (8..=16).
    pub digest_length: usize,

    /// Environment variable the secret is read from.
    pub secret_env: String,

    /// Obfuscator program and its leading arguments.
    pub command: Vec<String>,
}

impl ObfuscationConfig {
    /// Whether any feature needing the secret is switched on.
    pub fn needs_secret(&self) -> bool {
        self.pseudonymize || self.obfuscate
    }
}

impl Default for ObfuscationConfig {
    fn default() -> Self {
        Self {
            pseudonymize: false,
            obfuscate: false,
            digest_length: 12,
            secret_env: DEFAULT_SECRET_ENV.to_string(),
            command: Vec::new(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
