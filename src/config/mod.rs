//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! chimera.toml (optional)
//!     → loader.rs (parse & deserialize, defaults for missing fields)
//!     → CLI flag overrides (main.rs)
//!     → secret.rs (secret pulled from the environment)
//!     → validation.rs (semantic checks, all errors at once)
//!     → ChimeraConfig (validated, immutable for the run)
//! ```
//!
//! # Design Decisions
//! - Every field has a default so an absent config file is valid
//! - The secret never lives in the config file, only in the environment
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod secret;
pub mod validation;

pub use schema::ChimeraConfig;
pub use schema::ObfuscationConfig;
pub use schema::OutputConfig;
pub use secret::Secret;
