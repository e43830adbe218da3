use anyhow::{anyhow, Context, Result};
use hashcheck_core::config::OutputFormat;
use hashcheck_core::report::Level;
use hashcheck_core::services::{CheckReport, CheckRequest, CheckRunner, ManifestSource};
use tracing::debug;

use crate::commands::{absolute_path, load_cli_config, validate_binary_kind};
use crate::sha256_file;

/// Arguments for the `check` command, as collected by the CLI.
#[derive(Debug, Clone, Default)]
pub struct CheckArgs {
    pub manifest: String,
    pub binary: Option<String>,
    pub kind: Option<String>,
    pub json: bool,
    pub config: Option<String>,
}

/// Run the hashing check and print the report.
///
/// Returns `true` when the binary is within policy, i.e. there are no error
/// findings (and no warnings when the config asks to fail on them).
pub fn check_command(args: &CheckArgs) -> Result<bool> {
    let config = load_cli_config(args.config.as_deref())?;
    let kind = args.kind.as_deref().map(validate_binary_kind).transpose()?;

    let manifest_path = absolute_path(&args.manifest)?;
    let binary_path = args.binary.as_deref().map(absolute_path).transpose()?;
    let binary_hash = match &binary_path {
        Some(path) if path.is_file() => Some(sha256_file(path)?),
        Some(path) => return Err(anyhow!("Binary file does not exist: {}", path.display())),
        None => None,
    };

    let request = CheckRequest { debug_info_path: manifest_path, binary_path, kind, binary_hash };
    debug!(
        manifest = %request.debug_info_path.display(),
        kind = request.kind.map(|k| k.as_str()).unwrap_or("auto"),
        format = ?config.format,
        "running source hashing check"
    );
    let runner = CheckRunner { source: &ManifestSource };
    let report = runner
        .run(&request)
        .with_context(|| format!("Failed to check {}", request.debug_info_path.display()))?;

    if args.json || config.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    let failed = report.has_errors() || (config.fail_on_warnings && report.has_warnings());
    Ok(!failed)
}

/// Human-readable rendering: one block per finding.
pub fn print_report(report: &CheckReport) {
    println!("hashcheck v{}", hashcheck_core::version());
    println!("Target: {} ({})", report.target, report.kind.as_str());
    if let Some(hash) = &report.binary_hash {
        println!("SHA-256: {}", hash);
    }
    for finding in &report.findings {
        println!();
        println!("{} {} [{}]", finding.rule_id, report.rule_name, finding.level.as_str());
        println!("{}", finding.message);
    }
    println!();
    println!("Result: {}", summary_label(report.worst_level()));
}

fn summary_label(level: Level) -> &'static str {
    match level {
        Level::Pass => "PASS",
        Level::Warning => "WARN",
        Level::Error => "FAIL",
    }
}
