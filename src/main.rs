//! chimera: named-route compiler.
//!
//! Reads the host router's route manifest and emits a client module with
//! `route(name, params, query)` and `current(name)`.
//!
//! # Architecture Overview
//!
//! ```text
//!   route manifest ──▶ routes::source ──▶ routes::filter ──▶ compiler::tree
//!   (JSON, stdin)       normalize          match/middleware     + pseudonym
//!                                                                    │
//!   chimera.toml ──▶ config (validate, secret from env)              ▼
//!                                                            compiler::emit
//!                                                                    │
//!                                                          compiler::obfuscate
//!                                                                    │
//!                                                                    ▼
//!                                                     output::writer (atomic)
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use chimera::config::loader::load_or_default;
use chimera::config::{ChimeraConfig, Secret};
use chimera::error::ChimeraResult;
use chimera::observability::logging;
use chimera::output::render_table;
use chimera::resolver::{self, Params, Query};
use chimera::routes::{self, FilterOptions, ManifestSource};
use chimera::Generator;

#[derive(Parser)]
#[command(name = "chimera")]
#[command(about = "Compile named routes into a client-side route() resolver", long_about = None)]
struct Cli {
    /// Config file (defaults to ./chimera.toml when present).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct RouteArgs {
    /// Route manifest exported by the host router, or `-` for stdin.
    #[arg(short, long, default_value = "-")]
    routes: String,

    /// Keep routes whose name, pattern or handler contains this text.
    #[arg(short = 'm', long = "match")]
    keyword: Option<String>,

    /// Keep routes carrying this middleware (`*` = any middleware).
    #[arg(long = "middleware", value_name = "NAME")]
    middleware: Vec<String>,

    /// Drop routes carrying this middleware (`*` = any middleware).
    #[arg(long = "ignore-middleware", value_name = "NAME")]
    ignore_middleware: Vec<String>,
}

impl RouteArgs {
    fn filter(&self) -> FilterOptions {
        FilterOptions {
            keyword: self.keyword.clone(),
            middleware: self.middleware.clone(),
            ignore_middleware: self.ignore_middleware.clone(),
        }
    }

    fn source(&self) -> ManifestSource {
        ManifestSource::from_arg(&self.routes)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compile the route module and write it to the output path
    Generate {
        #[command(flatten)]
        routes: RouteArgs,

        /// Output file (overrides output.path).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pseudonymize route-name segments (needs the secret).
        #[arg(long)]
        pseudonymize: bool,

        /// Run the external obfuscator over the module (needs the secret).
        #[arg(long)]
        obfuscate: bool,

        /// Print the compiled routes as a table.
        #[arg(short, long)]
        display: bool,
    },
    /// Print the filtered routes as a table without writing anything
    List {
        #[command(flatten)]
        routes: RouteArgs,
    },
    /// Resolve one route name the way the generated module would
    Resolve {
        #[command(flatten)]
        routes: RouteArgs,

        /// Dotted route name.
        name: String,

        /// Path parameter, `key=value`.
        #[arg(short, long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,

        /// Query entry, `key=value`.
        #[arg(short, long = "query", value_parser = parse_key_val)]
        query: Vec<(String, String)>,

        /// Also report whether the route is current for this path.
        #[arg(long)]
        active: Option<String>,
    },
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{}`", s))?;
    Ok((key.to_string(), value.to_string()))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = load_or_default(cli.config.as_deref());
    let level = loaded
        .as_ref()
        .map(|c| c.observability.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    logging::init(&level, cli.verbose);

    let result = match loaded {
        Ok(config) => run(cli.command, config).await,
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "chimera failed");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, mut config: ChimeraConfig) -> ChimeraResult<()> {
    match command {
        Commands::Generate {
            routes,
            output,
            pseudonymize,
            obfuscate,
            display,
        } => {
            if let Some(output) = output {
                config.output.path = output;
            }
            config.obfuscation.pseudonymize |= pseudonymize;
            config.obfuscation.obfuscate |= obfuscate;

            let secret = Secret::from_env(&config.obfuscation.secret_env);
            let generator = Generator::new(config, secret)?;

            let raw = routes.source().load().await?;
            let report = generator.run(raw, &routes.filter()).await?;

            if display {
                print!("{}", render_table(&report.routes));
                for (name, key) in &report.compilation.name_map {
                    println!("{} → {}", name, key);
                }
            }
            println!(
                "Generated {} ({} routes, {} bytes)",
                report.output_path.display(),
                report.compilation.route_count(),
                report.bytes
            );
        }
        Commands::List { routes: args } => {
            let raw = args.source().load().await?;
            let collected = routes::collect(raw, &args.filter());
            print!("{}", render_table(&collected));
        }
        Commands::Resolve {
            routes: args,
            name,
            params,
            query,
            active,
        } => {
            let secret = Secret::from_env(&config.obfuscation.secret_env);
            let generator = Generator::new(config, secret)?;

            let raw = args.source().load().await?;
            let collected = routes::collect(raw, &args.filter());
            let compilation = generator.compile(&collected)?;

            let key = compilation.key_for(&name);
            let params: Params = params.into_iter().collect();
            let query: Query = query.into_iter().map(|(k, v)| (k, Some(v))).collect();

            match resolver::route(&compilation.tree, key, &params, &query) {
                Ok(url) => println!("{}", url),
                Err(e) => {
                    // Mirrors the client: report and yield an empty result.
                    tracing::warn!(error = %e, "Route did not resolve");
                    println!();
                }
            }
            if let Some(active) = active {
                let is_current = resolver::current(&compilation.tree, key, &params, Some(&active));
                println!("current: {}", is_current);
            }
        }
    }
    Ok(())
}
