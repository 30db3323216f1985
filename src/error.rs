//! Top-level error taxonomy for the `chimera` command.
//!
//! Every producer-side failure funnels into [`ChimeraError`] and is turned
//! into a non-zero exit status by `main`. Resolver lookups report their own
//! [`ResolveError`](crate::resolver::ResolveError) and are never fatal.

use std::path::PathBuf;
use thiserror::Error;

use crate::compiler::emit::EmitError;
use crate::compiler::obfuscate::ObfuscationError;
use crate::compiler::CompileError;
use crate::config::loader::ConfigError;
use crate::routes::source::SourceError;

/// Errors that abort a compilation.
#[derive(Debug, Error)]
pub enum ChimeraError {
    /// Configuration is unusable (e.g. pseudonymization without a secret).
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The route manifest could not be read or parsed.
    #[error("route source error: {0}")]
    Source(#[from] SourceError),

    /// The name tree could not be built.
    #[error("compile error: {0}")]
    Compile(#[from] CompileError),

    /// The artifact template is unreadable or malformed.
    #[error("template error: {0}")]
    Template(#[from] EmitError),

    /// The external obfuscation pass failed.
    #[error("obfuscation error: {0}")]
    Obfuscation(#[from] ObfuscationError),

    /// Writing the artifact failed.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for producer-side operations.
pub type ChimeraResult<T> = Result<T, ChimeraError>;
