//! Plan command implementation

use std::fmt::Write as _;
use std::path::Path;

use colored::Colorize;
use ght_core::{Orchestrator, ProvisionConfig, RepoModel};

use crate::error::Result;

/// Run the plan command
pub fn run_plan(config: ProvisionConfig, root: &Path, names: &[String], json: bool) -> Result<()> {
    let models = Orchestrator::new(config).plan(root, names)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&models)?);
    } else {
        print!("{}", render_plan(&models));
    }
    Ok(())
}

pub(crate) fn render_plan(models: &[RepoModel]) -> String {
    let mut out = String::new();
    if models.is_empty() {
        let _ = writeln!(out, "{}", "Nothing to provision".dimmed());
        return out;
    }

    let _ = writeln!(out, "{}", "Plan".bold());
    for model in models {
        let _ = writeln!(
            out,
            "  {} {:<24} {:<10} {}",
            "+".green(),
            model.name,
            model.target.to_string().as_str().cyan(),
            model.remote_id
        );
        let _ = writeln!(out, "      {}", model.local_path.as_str().dimmed());
        if let Some(aux) = &model.aux_path {
            let _ = writeln!(out, "      {} (auxiliary clone)", aux.as_str().dimmed());
        }
    }
    out
}
