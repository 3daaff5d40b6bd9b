use super::CommandStatus;
use crate::output::Output;
use color_eyre::eyre::{eyre, Context};
use color_eyre::Result;
use serde_json::json;
use shelfwatch_config::PathManager;
use shelfwatch_core::update_movies;
use shelfwatch_sources::{load_catalog, parse_watch_history_csv, PersonalFile};
use std::path::Path;

pub fn run_update_movies(
    paths: &PathManager,
    personal_yaml: Option<String>,
    dry_run: bool,
    output: &Output,
) -> Result<CommandStatus> {
    tracing::debug!(dry_run, "Update-movies command started");

    let resolved = paths.for_update_movies(personal_yaml)?;
    let export = resolved
        .watch_export
        .as_deref()
        .ok_or_else(|| eyre!("No watch-history export resolved"))?;
    if resolved.personal_yaml_inferred {
        output.info(format!("Using {}", file_name(&resolved.personal_yaml)));
    }
    output.info(format!("Using {}", file_name(export)));

    let records = parse_watch_history_csv(export)
        .wrap_err_with(|| format!("Error reading CSV {}", export.display()))?;

    let catalog = load_catalog(&resolved.catalog)
        .wrap_err_with(|| format!("Failed to load catalog from {}", resolved.catalog.display()))?;

    let mut file = PersonalFile::load(&resolved.personal_yaml)?;
    let outcome = update_movies(&catalog, file.store(), &records);

    if output.is_human() {
        output.info(format!("{} watched movies", outcome.watched_ids));
        output.info(format!(
            "{} movies across {} books",
            catalog.total_adaptations(),
            catalog.books_with_adaptations()
        ));
        output.info(format!("{} matches found", outcome.matches.len()));
        for found in &outcome.newly_watched {
            output.success(format!("{} ({})", found.slug, found.year));
        }
    } else {
        output.json(&json!({
            "type": "update_movies",
            "personal_yaml": resolved.personal_yaml.display().to_string(),
            "watch_export": export.display().to_string(),
            "watched_ids": outcome.watched_ids,
            "catalog_movies": catalog.total_adaptations(),
            "catalog_books_with_movies": catalog.books_with_adaptations(),
            "matches": outcome.matches,
            "newly_watched": outcome.newly_watched,
            "dry_run": dry_run,
        }));
    }

    let changes = outcome.newly_watched.len();
    if !outcome.has_changes() {
        if !outcome.matches.is_empty() {
            output.info("All movies already marked");
        }
        return Ok(CommandStatus::Success);
    }

    if dry_run {
        output.warn(format!(
            "Dry run: {} movies would be updated in {}",
            changes,
            resolved.personal_yaml.display()
        ));
        return Ok(CommandStatus::Success);
    }

    file.replace_store(outcome.store);
    file.save(&resolved.personal_yaml)
        .wrap_err_with(|| format!("Failed to write {}", resolved.personal_yaml.display()))?;
    tracing::info!(path = %resolved.personal_yaml.display(), changes, "Personal file updated");
    output.info(format!("Updated {} movies", changes));

    Ok(CommandStatus::Success)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
