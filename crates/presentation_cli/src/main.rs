//! faultgate CLI
//!
//! Command-line client for the fault control server, plus local validation
//! of fault spec files.

#![allow(clippy::print_stdout)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use domain::{FaultStatus, RuleSnapshot};
use infrastructure::{FaultSpec, LogTarget, LoggingConfig, init_logging, load_spec};
use tracing::debug;

const DEFAULT_URL: &str = "http://127.0.0.1:8099";

/// faultgate CLI
#[derive(Debug, Parser)]
#[command(name = "faultgate-cli")]
#[command(author, version, about = "Fault injection control CLI", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show remaining failures per first-N key
    Status {
        /// Server URL
        #[arg(short, long, env = "FAULTGATE_URL", default_value = DEFAULT_URL)]
        url: String,
    },

    /// Show configured rules of both kinds
    Rules {
        /// Server URL
        #[arg(short, long, env = "FAULTGATE_URL", default_value = DEFAULT_URL)]
        url: String,
    },

    /// Fail the first COUNT calls for KEY
    Set {
        /// Fault key
        key: String,

        /// Number of failing calls
        #[arg(allow_negative_numbers = true)]
        count: i64,

        /// Server URL
        #[arg(short, long, env = "FAULTGATE_URL", default_value = DEFAULT_URL)]
        url: String,
    },

    /// Fail only call number N for KEY
    SetNth {
        /// Fault key
        key: String,

        /// Attempt number that fails
        #[arg(allow_negative_numbers = true)]
        n: i64,

        /// Server URL
        #[arg(short, long, env = "FAULTGATE_URL", default_value = DEFAULT_URL)]
        url: String,
    },

    /// Clear every rule and counter
    Reset {
        /// Server URL
        #[arg(short, long, env = "FAULTGATE_URL", default_value = DEFAULT_URL)]
        url: String,
    },

    /// Check that the control server is up
    Health {
        /// Server URL
        #[arg(short, long, env = "FAULTGATE_URL", default_value = DEFAULT_URL)]
        url: String,
    },

    /// Parse a YAML fault spec and print its rules
    ///
    /// Example: faultgate-cli validate ./faults.yaml
    Validate {
        /// Path to the spec file
        path: PathBuf,
    },
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Format endpoint URL
fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

fn render_spec(spec: &FaultSpec) -> String {
    let mut out = String::new();
    if spec.is_empty() {
        out.push_str("(no rules)\n");
        return out;
    }
    for (key, count) in &spec.failures {
        out.push_str(&format!("first-n  {key}: {count}\n"));
    }
    for (key, n) in &spec.precise_failures {
        out.push_str(&format!("nth-only {key}: {n}\n"));
    }
    out
}

async fn post_ok(request: reqwest::RequestBuilder) -> anyhow::Result<()> {
    let body = request.send().await?.error_for_status()?.text().await?;
    println!("{body}");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only command output
    init_logging(&LoggingConfig {
        filter: log_filter_from_verbosity(cli.verbose).to_string(),
        target: LogTarget::Stderr,
        ..LoggingConfig::default()
    })?;
    debug!(command = ?cli.command, "Parsed command line");

    let client = reqwest::Client::new();

    match cli.command {
        Commands::Status { url } => {
            let status = client
                .get(endpoint_url(&url, "/status"))
                .send()
                .await?
                .error_for_status()?
                .json::<FaultStatus>()
                .await?;

            println!("{}", serde_json::to_string_pretty(&status)?);
        },

        Commands::Rules { url } => {
            let rules = client
                .get(endpoint_url(&url, "/faults"))
                .send()
                .await?
                .error_for_status()?
                .json::<RuleSnapshot>()
                .await?;

            println!("{}", serde_json::to_string_pretty(&rules)?);
        },

        Commands::Set { key, count, url } => {
            post_ok(
                client
                    .post(endpoint_url(&url, "/set"))
                    .query(&[("key", key), ("count", count.to_string())]),
            )
            .await?;
        },

        Commands::SetNth { key, n, url } => {
            post_ok(
                client
                    .post(endpoint_url(&url, "/set-nth"))
                    .query(&[("key", key), ("n", n.to_string())]),
            )
            .await?;
        },

        Commands::Reset { url } => {
            post_ok(client.post(endpoint_url(&url, "/reset"))).await?;
        },

        Commands::Health { url } => {
            let health = client
                .get(endpoint_url(&url, "/health"))
                .send()
                .await?
                .error_for_status()?
                .json::<serde_json::Value>()
                .await?;

            println!("{}", serde_json::to_string_pretty(&health)?);
        },

        Commands::Validate { path } => {
            let spec = load_spec(&path)?;
            print!("{}", render_spec(&spec));
        },
    }

    Ok(())
}
