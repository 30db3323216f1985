//! Optional obfuscation pass over the rendered module.
//!
//! The obfuscator is an external program treated as a black box: source on
//! stdin, obfuscated source on stdout, `--seed <n>` appended to its
//! arguments. The seed is derived from the secret so reruns are reproducible.

use async_trait::async_trait;
use hmac::Mac;
use std::process::Stdio;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::compiler::pseudonym::keyed_mac;
use crate::config::secret::Secret;

const SEED_CONTEXT: &[u8] = b"chimera:obfuscation-seed";

/// Errors raised by the obfuscation pass.
#[derive(Debug, Error)]
pub enum ObfuscationError {
    #[error("obfuscator command is empty")]
    EmptyCommand,

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("{0} produced no output")]
    EmptyOutput(String),

    #[error("{0} produced non UTF-8 output")]
    InvalidOutput(String),
}

/// A deterministic, seeded text-to-text transform.
#[async_trait]
pub trait Obfuscator: Send + Sync {
    async fn obfuscate(&self, source: &str, seed: u32) -> Result<String, ObfuscationError>;
}

/// Derive the obfuscator seed from the secret.
pub fn derive_seed(secret: &Secret) -> u32 {
    let mut mac = keyed_mac(secret);
    mac.update(SEED_CONTEXT);
    let digest = mac.finalize().into_bytes();
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Runs an external obfuscator program.
#[derive(Debug, Clone)]
pub struct CommandObfuscator {
    program: String,
    args: Vec<String>,
}

impl CommandObfuscator {
    /// `command[0]` is the program, the rest are leading arguments.
    pub fn new(command: &[String]) -> Result<Self, ObfuscationError> {
        let (program, args) = command.split_first().ok_or(ObfuscationError::EmptyCommand)?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

#[async_trait]
impl Obfuscator for CommandObfuscator {
    async fn obfuscate(&self, source: &str, seed: u32) -> Result<String, ObfuscationError> {
        let spawn_err = |source: std::io::Error| ObfuscationError::Spawn {
            program: self.program.clone(),
            source,
        };

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg("--seed")
            .arg(seed.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(spawn_err)?;

        // Write stdin while collecting output so a chatty child cannot
        // deadlock on a full stdout pipe. Dropping stdin closes it.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| spawn_err(std::io::Error::other("stdin unavailable")))?;
        let feed = async move { stdin.write_all(source.as_bytes()).await };
        let (written, output) = tokio::join!(feed, child.wait_with_output());
        let output = output.map_err(spawn_err)?;

        if !output.status.success() {
            return Err(ObfuscationError::Failed {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        written.map_err(spawn_err)?;

        let text = String::from_utf8(output.stdout)
            .map_err(|_| ObfuscationError::InvalidOutput(self.program.clone()))?;
        if text.trim().is_empty() {
            return Err(ObfuscationError::EmptyOutput(self.program.clone()));
        }

        tracing::debug!(program = %self.program, bytes = text.len(), "Obfuscation pass complete");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(parts: &[&str]) -> CommandObfuscator {
        let parts: Vec<String> = parts.iter().map(|s| s.to_string()).collect();
        CommandObfuscator::new(&parts).unwrap()
    }

    #[test]
    fn test_seed_is_stable_per_secret() {
        let a = derive_seed(&Secret::new("one"));
        assert_eq!(a, derive_seed(&Secret::new("one")));
        assert_ne!(a, derive_seed(&Secret::new("two")));
    }

    #[test]
    fn test_empty_command() {
        assert!(matches!(
            CommandObfuscator::new(&[]),
            Err(ObfuscationError::EmptyCommand)
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_passes_source_and_seed() {
        // `sh -c SCRIPT NAME --seed N`: the seed arrives as $2.
        let obfuscator = command(&["sh", "-c", "printf '/*%s*/' \"$2\"; cat", "obfuscate"]);
        let out = obfuscator.obfuscate("const a = 1;", 42).await.unwrap();
        assert_eq!(out, "/*42*/const a = 1;");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_command() {
        let obfuscator = command(&["sh", "-c", "echo boom >&2; exit 3", "obfuscate"]);
        let err = obfuscator.obfuscate("x", 1).await.unwrap_err();
        match err {
            ObfuscationError::Failed { stderr, .. } => assert_eq!(stderr, "boom"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_empty_output_is_error() {
        let obfuscator = command(&["sh", "-c", "cat >/dev/null", "obfuscate"]);
        assert!(matches!(
            obfuscator.obfuscate("x", 1).await,
            Err(ObfuscationError::EmptyOutput(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_large_source_streams_through() {
        let obfuscator = command(&["sh", "-c", "cat", "obfuscate"]);
        let source = "const route = '/users/:id';\n".repeat(64 * 1024);
        let out = obfuscator.obfuscate(&source, 7).await.unwrap();
        assert_eq!(out, source);
    }

    #[tokio::test]
    async fn test_missing_program() {
        let obfuscator = command(&["chimera-no-such-obfuscator"]);
        assert!(matches!(
            obfuscator.obfuscate("x", 1).await,
            Err(ObfuscationError::Spawn { .. })
        ));
    }
}
