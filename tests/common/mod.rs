//! Shared utilities for integration tests.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use chimera::compiler::obfuscate::{ObfuscationError, Obfuscator};
use chimera::config::ChimeraConfig;
use chimera::routes::source::parse_manifest;
use chimera::routes::RawRoute;

/// A small application's route manifest, in the host router's export shape.
pub const SAMPLE_MANIFEST: &str = r#"{
    "root": [
        {"name": "home", "pattern": "/", "methods": ["GET", "HEAD"], "middleware": ["web"], "handler": "renderHome"},
        {"pattern": "/health", "methods": ["GET"]},
        {"name": "users.index", "pattern": "/users", "methods": ["GET"], "middleware": ["web", "auth"], "handler": "UsersController.index"},
        {"name": "users.show", "pattern": "/users/:id", "methods": ["GET"], "middleware": ["web", "auth"], "handler": "UsersController.show"},
        {"name": "users.posts.show", "pattern": "/users/:user/posts/:post", "methods": ["GET"], "middleware": ["web", "auth", "verified"], "handler": {"kind": "controller", "module": "PostsController", "method": "show"}}
    ],
    "api.example.com": [
        {"name": "api.users.index", "pattern": "/api/users", "methods": ["GET"], "middleware": ["api"], "handler": "Api.UsersController.index"},
        {"name": "api.users.store", "pattern": "/api/users", "methods": ["POST"], "middleware": ["api", "throttle"], "handler": "Api.UsersController.store"}
    ]
}"#;

/// Parsed [`SAMPLE_MANIFEST`].
pub fn sample_routes() -> Vec<RawRoute> {
    parse_manifest(SAMPLE_MANIFEST).unwrap()
}

/// Default config writing to `dir/resources/js/chimera.ts`.
pub fn config_in(dir: &Path) -> ChimeraConfig {
    let mut config = ChimeraConfig::default();
    config.output.path = output_path(dir);
    config
}

pub fn output_path(dir: &Path) -> PathBuf {
    dir.join("resources/js/chimera.ts")
}

/// Obfuscator stub that tags its input with the seed.
#[derive(Debug, Default)]
pub struct TaggingObfuscator;

#[async_trait]
impl Obfuscator for TaggingObfuscator {
    async fn obfuscate(&self, source: &str, seed: u32) -> Result<String, ObfuscationError> {
        Ok(format!("/* seed:{} */\n{}", seed, source))
    }
}

/// Pull the JSON literal assigned to `const <name>` out of a rendered module.
#[allow(dead_code)]
pub fn literal<'a>(module: &'a str, name: &str) -> &'a str {
    let marker = format!("const {}", name);
    let start = module.find(&marker).unwrap();
    let start = start + module[start..].find(" = ").unwrap() + 3;
    let end = start + module[start..].find(";\n").unwrap();
    &module[start..end]
}
