//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields (routes, path, pseudonymize)
//!
//! Consumer:
//!     → logging.rs (fmt layer on stderr, filtered by RUST_LOG or config)
//! ```
//!
//! # Design Decisions
//! - Logs go to stderr so `chimera resolve` / `list` output stays pipeable
//! - `RUST_LOG` overrides the configured level
//! - The secret is never a log field

pub mod logging;
