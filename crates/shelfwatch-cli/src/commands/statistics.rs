use super::CommandStatus;
use crate::output::Output;
use color_eyre::eyre::{eyre, Context};
use color_eyre::Result;
use comfy_table::{Cell, Table};
use serde_json::json;
use shelfwatch_config::PathManager;
use shelfwatch_core::{aggregate, render_mermaid, StatsReport};
use shelfwatch_sources::{load_catalog, personal};
use std::fs;
use std::path::{Path, PathBuf};

pub fn run_statistics(
    paths: &PathManager,
    personal_yaml: Option<PathBuf>,
    diagram: Option<PathBuf>,
    output: &Output,
) -> Result<CommandStatus> {
    tracing::debug!("Statistics command started");

    let resolved = paths.for_statistics(personal_yaml, diagram)?;
    let diagram_path = resolved
        .statistics_output
        .as_deref()
        .ok_or_else(|| eyre!("No diagram output path resolved"))?;
    if resolved.personal_yaml_inferred {
        output.info(format!("Using {}", resolved.personal_yaml.display()));
    }

    let catalog = load_catalog(&resolved.catalog)
        .wrap_err_with(|| format!("Failed to load catalog from {}", resolved.catalog.display()))?;
    let store = personal::load(&resolved.personal_yaml)?;

    let report = aggregate(&catalog, &store);
    write_diagram(diagram_path, &render_mermaid(&report))?;

    if output.is_human() {
        if !output.is_quiet() {
            print_summary(&report);
        }
        output.success(format!("Mermaid diagram saved to: {}", diagram_path.display()));
        output.info("View online: https://mermaid.live");
        output.info(format!(
            "Convert to SVG: mmdc -i {} -o {} -b transparent",
            diagram_path.display(),
            diagram_path.with_extension("svg").display()
        ));
    } else {
        output.json(&json!({
            "type": "statistics",
            "diagram": diagram_path.display().to_string(),
            "report": report,
            "books_read_pct": report.books_read_pct(),
            "adaptations_watched_pct": report.adaptations_watched_pct(),
        }));
    }

    Ok(CommandStatus::Success)
}

fn write_diagram(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .wrap_err_with(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    fs::write(path, content).wrap_err_with(|| format!("Failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), "Wrote Mermaid diagram");
    Ok(())
}

fn print_summary(report: &StatsReport) {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Statistics Summary")
            .fg(comfy_table::Color::Cyan)
            .add_attribute(comfy_table::Attribute::Bold),
        Cell::new(""),
    ]);
    table.add_row(vec![Cell::new("Total Books"), Cell::new(report.total_books)]);
    table.add_row(vec![
        Cell::new("Books Read"),
        Cell::new(format!("{} ({:.1}%)", report.books_read, report.books_read_pct())),
    ]);
    table.add_row(vec![
        Cell::new("Books Not Read"),
        Cell::new(format!("{} ({:.1}%)", report.books_not_read, report.books_not_read_pct())),
    ]);
    table.add_row(vec![
        Cell::new("Total Movie Adaptations"),
        Cell::new(report.total_adaptations),
    ]);
    table.add_row(vec![
        Cell::new("Movies Watched"),
        Cell::new(format!(
            "{} ({:.1}%)",
            report.adaptations_watched,
            report.adaptations_watched_pct()
        )),
    ]);
    table.add_row(vec![
        Cell::new("Movies Not Watched"),
        Cell::new(format!(
            "{} ({:.1}%)",
            report.adaptations_not_watched(),
            report.adaptations_not_watched_pct()
        )),
    ]);
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    println!("{}", table);

    let b = &report.buckets;
    let mut breakdown = Table::new();
    breakdown.set_header(vec![
        Cell::new("Completion Breakdown")
            .fg(comfy_table::Color::Cyan)
            .add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Books"),
    ]);
    breakdown.add_row(vec![
        Cell::new("Read + Watched All Movies"),
        Cell::new(b.read_and_all_movies_watched),
    ]);
    breakdown.add_row(vec![
        Cell::new("Read + Watched Some Movies"),
        Cell::new(b.read_and_some_movies_watched),
    ]);
    breakdown.add_row(vec![Cell::new("Read Book Only"), Cell::new(b.read_only)]);
    breakdown.add_row(vec![Cell::new("Watched Movies Only"), Cell::new(b.watched_only)]);
    breakdown.add_row(vec![Cell::new("Neither Read Nor Watched"), Cell::new(b.neither)]);
    breakdown.load_preset(comfy_table::presets::UTF8_FULL);
    breakdown.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    println!("{}", breakdown);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::workspace;
    use crate::output::OutputFormat;

    fn quiet() -> Output {
        Output::new(OutputFormat::Human, true)
    }

    #[test]
    fn test_statistics_writes_default_diagram() {
        let (dir, paths) = workspace(
            "read|watched:\n  moby-dick:\n    book: true\n    movies:\n      1956: true\n      1998: true\n  dune:\n    movies:\n      1984: true\n",
        );

        let status = run_statistics(&paths, None, None, &quiet()).unwrap();
        assert_eq!(status, CommandStatus::Success);

        let diagram = fs::read_to_string(dir.path().join("personal/statistics.mmd")).unwrap();
        assert!(diagram.contains("All Books,Books Read,1\n"));
        assert!(diagram.contains("Books Read,Read + All Movies,1\n"));
        assert!(diagram.contains("Books Not Read,Movies Only,1\n"));
        assert!(diagram.contains("Books Not Read,Neither,1\n"));
        assert!(diagram.contains("All Movies,Movies Watched,3\n"));
        assert!(diagram.contains("All Movies,Movies Not Watched,0\n"));
    }

    #[test]
    fn test_statistics_custom_output_creates_parent() {
        let (dir, paths) = workspace("read|watched: {}\n");
        let target = dir.path().join("out/nested/stats.mmd");

        run_statistics(&paths, None, Some(target.clone()), &quiet()).unwrap();

        let diagram = fs::read_to_string(target).unwrap();
        assert!(diagram.contains("All Books,Books Not Read,3\n"));
        assert!(diagram.contains("All Movies,Movies Not Watched,3\n"));
    }
}
