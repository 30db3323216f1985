//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Require a secret whenever pseudonymization or obfuscation is on
//! - Validate value ranges (digest length)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function over the config and the resolved secret
//! - Runs before any route is read or any file is written

use thiserror::Error;

use crate::compiler::pseudonym::{MAX_DIGEST_LENGTH, MIN_DIGEST_LENGTH};
use crate::config::schema::ChimeraConfig;
use crate::config::secret::Secret;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A secret-dependent feature is on but the secret is unavailable.
    #[error("{feature} requested but environment variable {env_var} is not set")]
    MissingSecret {
        feature: &'static str,
        env_var: String,
    },

    /// Digest length outside the supported range.
    #[error("digest_length must be between 8 and 16, got {0}")]
    DigestLength(usize),

    /// Obfuscation requested without an obfuscator command.
    #[error("obfuscate requested but obfuscation.command is empty")]
    EmptyCommand,

    /// Output path is empty.
    #[error("output.path must not be empty")]
    EmptyOutputPath,
}

/// Validate `config` against the secret resolved for this run.
pub fn validate_config(
    config: &ChimeraConfig,
    secret: Option<&Secret>,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let obfuscation = &config.obfuscation;

    if config.output.path.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyOutputPath);
    }

    if secret.is_none() {
        if obfuscation.pseudonymize {
            errors.push(ValidationError::MissingSecret {
                feature: "pseudonymize",
                env_var: obfuscation.secret_env.clone(),
            });
        }
        if obfuscation.obfuscate {
            errors.push(ValidationError::MissingSecret {
                feature: "obfuscate",
                env_var: obfuscation.secret_env.clone(),
            });
        }
    }

    if obfuscation.pseudonymize
        && !(MIN_DIGEST_LENGTH..=MAX_DIGEST_LENGTH).contains(&obfuscation.digest_length)
    {
        errors.push(ValidationError::DigestLength(obfuscation.digest_length));
    }

    if obfuscation.obfuscate && obfuscation.command.is_empty() {
        errors.push(ValidationError::EmptyCommand);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid_without_secret() {
        assert!(validate_config(&ChimeraConfig::default(), None).is_ok());
    }

    #[test]
    fn test_pseudonymize_without_secret() {
        let mut config = ChimeraConfig::default();
        config.obfuscation.pseudonymize = true;

        let errors = validate_config(&config, None).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::MissingSecret {
                feature: "pseudonymize",
                env_var: "APP_KEY".to_string(),
            }]
        );
        assert!(validate_config(&config, Some(&Secret::new("k"))).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = ChimeraConfig::default();
        config.obfuscation.pseudonymize = true;
        config.obfuscation.obfuscate = true;
        config.obfuscation.digest_length = 40;

        let errors = validate_config(&config, None).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::DigestLength(40)));
        assert!(errors.contains(&ValidationError::EmptyCommand));
    }

    #[test]
    fn test_digest_length_ignored_when_not_pseudonymizing() {
        let mut config = ChimeraConfig::default();
        config.obfuscation.digest_length = 2;
        assert!(validate_config(&config, None).is_ok());
    }
}
