use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::io::Write;
use std::path::PathBuf;

use crate::runtime_config::RouterConfig;
use crate::table::{load_router, parse_methods};

/// Command-line interface for trierouter
#[derive(Parser, Debug)]
#[command(name = "trierouter")]
#[command(about = "Inspect and query segment-trie route tables", long_about = None)]
pub struct Cli {
    /// Log at debug level regardless of TRIEROUTER_LOG_LEVEL
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every route in a table
    Routes {
        /// Route table file (TOML or JSON)
        #[arg(short, long)]
        table: PathBuf,
    },
    /// Resolve one request path
    Find {
        /// Route table file (TOML or JSON)
        #[arg(short, long)]
        table: PathBuf,

        /// HTTP method of the request
        #[arg(short, long, default_value = "GET")]
        method: String,

        /// Request path, query string allowed
        path: String,
    },
    /// Validate a table without resolving anything
    Check {
        /// Route table file (TOML or JSON)
        #[arg(short, long)]
        table: PathBuf,
    },
}

impl Cli {
    /// Configuration from the environment, adjusted by global flags.
    pub fn config(&self) -> RouterConfig {
        let mut config = RouterConfig::from_env();
        if self.verbose {
            config.log_level = "debug".to_string();
        }
        config
    }
}

/// Run a parsed command, writing results to `out`.
///
/// Returns the process exit code: 0 on success, 1 when `find` has no match.
pub fn run_cli(cli: &Cli, config: &RouterConfig, out: &mut dyn Write) -> Result<i32> {
    match &cli.command {
        Commands::Routes { table } => {
            let router = load_router(table, config)?;
            let mut lines: Vec<String> = router
                .routes()
                .map(|route| format!("{} {} -> {}", route.method(), route.path(), route.handler()))
                .collect();
            lines.sort();
            for line in lines {
                writeln!(out, "{line}")?;
            }
            Ok(0)
        }
        Commands::Find {
            table,
            method,
            path,
        } => {
            let router = load_router(table, config)?;
            let method = parse_methods(std::slice::from_ref(method))?
                .into_iter()
                .next()
                .ok_or_else(|| anyhow::anyhow!("missing method"))?;
            match router.find(path, &method) {
                Some(found) => {
                    let report = json!({
                        "handler": found.handler(),
                        "path": found.path(),
                        "params": found.params_map(),
                        "splat": found.splat,
                    });
                    writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
                    Ok(0)
                }
                None => {
                    writeln!(out, "no match for {method} {path}")?;
                    Ok(1)
                }
            }
        }
        Commands::Check { table } => {
            let router = load_router(table, config)?;
            writeln!(
                out,
                "ok: {} routes, {} nodes",
                router.len(),
                router.node_count()
            )?;
            Ok(0)
        }
    }
}
