use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use hashcheck::commands::{check_command, probe_command, rule_info_command, CheckArgs};
use hashcheck::init_tracing;

/// Secure source code hashing compliance check.
///
/// This CLI is a thin wrapper around `hashcheck-core` (exposed in code as `hashcheck_core`).
/// All substantive logic lives in the library so it can be tested thoroughly
/// and reused from other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "hashcheck",
    version,
    about = "Checks that binaries were built with SHA-256 source code hashing",
    long_about = None
)]
struct Cli {
    /// Emit debug logs to stderr.
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a binary's recorded source hashing algorithms.
    ///
    /// Exits non-zero when an error-level finding is reported (or a warning,
    /// when `fail_on_warnings` is set in the config).
    Check {
        /// Debug-info manifest for the binary (JSON or YAML).
        #[arg(long)]
        manifest: String,

        /// Optional path to the binary itself. Used to detect the binary kind
        /// and to fingerprint the target.
        #[arg(long)]
        binary: Option<String>,

        /// Override the binary kind (native, managed, mixed).
        #[arg(long)]
        kind: Option<String>,

        /// Emit the JSON report instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Path to a config file. Defaults to `hashcheck.json` in the current directory.
        #[arg(long)]
        config: Option<String>,
    },

    /// Detect whether a PE image is native, managed, or mixed-mode.
    Probe {
        /// Path to the binary to inspect.
        #[arg(long)]
        binary: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Show the rule identity and description.
    RuleInfo {
        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Check { manifest, binary, kind, json, config } => {
            let passed = check_command(&CheckArgs { manifest, binary, kind, json, config })?;
            if !passed {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Probe { binary, json } => probe_command(&binary, json)?,
        Command::RuleInfo { json } => rule_info_command(json)?,
    }

    Ok(ExitCode::SUCCESS)
}
