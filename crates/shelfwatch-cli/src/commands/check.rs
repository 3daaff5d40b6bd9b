use super::CommandStatus;
use crate::output::Output;
use color_eyre::eyre::Context;
use color_eyre::Result;
use serde_json::json;
use shelfwatch_config::PathManager;
use shelfwatch_core::validate;
use shelfwatch_sources::{load_catalog, personal};
use std::path::PathBuf;

pub fn run_check(
    paths: &PathManager,
    personal_yaml: Option<PathBuf>,
    output: &Output,
) -> Result<CommandStatus> {
    tracing::debug!("Check command started");

    let resolved = paths.for_check(personal_yaml)?;
    if resolved.personal_yaml_inferred {
        output.info(format!("Using {}", resolved.personal_yaml.display()));
    }

    let catalog = load_catalog(&resolved.catalog)
        .wrap_err_with(|| format!("Failed to load catalog from {}", resolved.catalog.display()))?;
    let store = personal::load(&resolved.personal_yaml)?;

    let issues = validate(&catalog, &store);

    if !output.is_human() {
        output.json(&json!({
            "type": "check",
            "personal_yaml": resolved.personal_yaml.display().to_string(),
            "entries": store.len(),
            "valid": issues.is_empty(),
            "issues": issues,
        }));
    } else if !issues.is_empty() {
        output.error(format!("Found {} invalid reference(s):", issues.len()));
        for issue in &issues {
            output.issue(issue);
        }
    } else {
        output.success(format!("All {} slugs are valid!", store.len()));
        if store.has_movies() {
            output.success("All movie references are valid!");
        }
    }

    if issues.is_empty() {
        Ok(CommandStatus::Success)
    } else {
        Ok(CommandStatus::IssuesFound)
    }
}
