//! One compilation run, from raw routes to the written artifact.
//!
//! ```text
//! validate config + secret   (abort before anything else)
//!     → routes::collect      (normalize, drop unnamed, filter)
//!     → compiler::compile    (tree, name map)
//!     → Template::render     (buffered in memory)
//!     → Obfuscator           (optional)
//!     → write_atomic         (single write, temp file + rename)
//! ```

use std::path::PathBuf;

use crate::compiler::emit::Template;
use crate::compiler::obfuscate::{derive_seed, CommandObfuscator, Obfuscator};
use crate::compiler::{compile, Compilation, HmacPseudonymizer, Pseudonymizer};
use crate::config::loader::ConfigError;
use crate::config::validation::validate_config;
use crate::config::{ChimeraConfig, Secret};
use crate::error::{ChimeraError, ChimeraResult};
use crate::output::write_atomic;
use crate::routes::{self, FilterOptions, RawRoute, RouteRecord};

/// Outcome of a successful run.
#[derive(Debug)]
pub struct GenerateReport {
    /// Routes that survived filtering, in input order.
    pub routes: Vec<RouteRecord>,
    pub compilation: Compilation,
    pub output_path: PathBuf,
    /// Size of the written artifact.
    pub bytes: usize,
}

/// A validated compilation setup.
pub struct Generator {
    config: ChimeraConfig,
    secret: Option<Secret>,
    pseudonymizer: Option<HmacPseudonymizer>,
    obfuscator: Option<Box<dyn Obfuscator>>,
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("config", &self.config)
            .field("pseudonymize", &self.pseudonymizer.is_some())
            .field("obfuscate", &self.obfuscator.is_some())
            .finish_non_exhaustive()
    }
}

impl Generator {
    /// Validate `config` against `secret` and prepare the run.
    ///
    /// Fails with a configuration error when pseudonymization or obfuscation
    /// is requested without a secret; nothing has been read or written yet.
    pub fn new(config: ChimeraConfig, secret: Option<Secret>) -> ChimeraResult<Self> {
        validate_config(&config, secret.as_ref()).map_err(ConfigError::Validation)?;

        let pseudonymizer = match (&secret, config.obfuscation.pseudonymize) {
            (Some(secret), true) => Some(HmacPseudonymizer::new(
                secret,
                config.obfuscation.digest_length,
            )),
            _ => None,
        };

        let obfuscator: Option<Box<dyn Obfuscator>> = if config.obfuscation.obfuscate {
            Some(Box::new(CommandObfuscator::new(&config.obfuscation.command)?))
        } else {
            None
        };

        Ok(Self {
            config,
            secret,
            pseudonymizer,
            obfuscator,
        })
    }

    /// Swap the obfuscator used when obfuscation is enabled.
    pub fn with_obfuscator(mut self, obfuscator: Box<dyn Obfuscator>) -> Self {
        if self.obfuscator.is_some() {
            self.obfuscator = Some(obfuscator);
        }
        self
    }

    pub fn config(&self) -> &ChimeraConfig {
        &self.config
    }

    /// Build the name tree for already-filtered routes.
    pub fn compile(&self, routes: &[RouteRecord]) -> ChimeraResult<Compilation> {
        let pseudonymizer = self
            .pseudonymizer
            .as_ref()
            .map(|p| p as &dyn Pseudonymizer);
        Ok(compile(routes, pseudonymizer)?)
    }

    /// Render the artifact text, including the obfuscation pass.
    pub async fn render(&self, compilation: &Compilation) -> ChimeraResult<String> {
        let template = match &self.config.output.template {
            Some(path) => Template::load(path).await?,
            None => Template::builtin(),
        };
        let rendered = template.render(compilation)?;

        match (&self.obfuscator, &self.secret) {
            (Some(obfuscator), Some(secret)) => {
                Ok(obfuscator.obfuscate(&rendered, derive_seed(secret)).await?)
            }
            _ => Ok(rendered),
        }
    }

    /// Run the whole pipeline and write the artifact.
    pub async fn run(&self, raw: Vec<RawRoute>, filter: &FilterOptions) -> ChimeraResult<GenerateReport> {
        let routes = routes::collect(raw, filter);
        if routes.is_empty() {
            tracing::warn!("No named routes left after filtering, writing an empty route tree");
        }

        let compilation = self.compile(&routes)?;
        let artifact = self.render(&compilation).await?;

        let output_path = self.config.output.path.clone();
        write_atomic(&output_path, &artifact)
            .await
            .map_err(|source| ChimeraError::Io {
                path: output_path.clone(),
                source,
            })?;

        tracing::info!(
            routes = routes.len(),
            path = %output_path.display(),
            pseudonymize = self.pseudonymizer.is_some(),
            obfuscate = self.obfuscator.is_some(),
            "Route module generated"
        );

        Ok(GenerateReport {
            routes,
            compilation,
            output_path,
            bytes: artifact.len(),
        })
    }
}
