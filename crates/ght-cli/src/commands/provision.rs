//! Provision command implementation

use std::fmt::Write as _;
use std::path::Path;

use colored::Colorize;
use ght_core::{Orchestrator, ProvisionConfig, Report, Verdict};

use crate::error::Result;

/// Run the provision command.
///
/// Returns `false` when `strict` is set and some repository failed.
pub fn run_provision(
    config: ProvisionConfig,
    root: &Path,
    names: &[String],
    json: bool,
    strict: bool,
) -> Result<bool> {
    let orchestrator = Orchestrator::new(config);
    let cancel = orchestrator.cancel_token();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let report = runtime.block_on(async {
        let watcher = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupted, cancelling run");
                cancel.cancel();
            }
        });
        let report = orchestrator.run(root, names).await;
        watcher.abort();
        report
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report));
    }

    Ok(!strict || report.verdict() == Verdict::Success)
}

pub(crate) fn render_report(report: &Report) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", "Provisioned".bold(), report.root.as_str().cyan());

    for outcome in &report.outcomes {
        let model = &outcome.model;
        match &outcome.error {
            None => {
                let _ = writeln!(
                    out,
                    "  {} {:<24} {:<10} {}",
                    "+".green(),
                    model.name,
                    model.target.to_string(),
                    model.remote_id
                );
            }
            Some(error) => {
                let _ = writeln!(
                    out,
                    "  {} {:<24} {:<10} {}",
                    "x".red(),
                    model.name,
                    model.target.to_string(),
                    format!("{}/{}", error.phase, error.step).as_str().yellow()
                );
                let _ = writeln!(out, "      {}", error.cause.to_string().as_str().dimmed());
            }
        }
    }

    let total = report.outcomes.len();
    let succeeded = report.succeeded().count();
    let summary = format!("{succeeded}/{total} succeeded");
    let summary = match report.verdict() {
        Verdict::Success => summary.as_str().green(),
        Verdict::PartialFailure => summary.as_str().yellow(),
    };
    let _ = writeln!(
        out,
        "\n{} in {:.1}s",
        summary,
        report.elapsed().num_milliseconds() as f64 / 1000.0
    );
    if report.cancelled {
        let _ = writeln!(out, "{}", "Run was cancelled".yellow());
    }

    let cleanup = &report.cleanup;
    if cleanup.kept {
        let _ = writeln!(
            out,
            "{} workspace and {} remote(s) kept",
            "Cleanup:".bold(),
            cleanup.remotes_kept.len()
        );
        for remote in &cleanup.remotes_kept {
            let _ = writeln!(out, "  {remote}");
        }
        return out;
    }

    let _ = writeln!(
        out,
        "{} {} remote(s) deleted",
        "Cleanup:".bold(),
        cleanup.remotes_deleted.len()
    );
    for remote in &cleanup.remotes_failed {
        let _ = writeln!(out, "  {} could not delete {}", "!".red(), remote);
    }
    if let Some(error) = &cleanup.directory_error {
        let _ = writeln!(out, "  {} workspace not removed: {}", "!".red(), error);
    }
    out
}
