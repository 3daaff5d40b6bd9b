use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::Context;
use commands::{check, statistics, update_movies};
use shelfwatch_config::{config_file_path, Config, PathManager};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "shelfwatch")]
#[command(about = "Shelfwatch - Track the books you read and the adaptations you watch")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    format: output::OutputFormat,

    /// Path to the books catalog (default: reading-challenge.yaml)
    #[arg(long, global = true, value_name = "PATH")]
    catalog: Option<PathBuf>,

    /// Path to the config file (default: $SHELFWATCH_CONFIG or ./shelfwatch.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the personal YAML file against the catalog
    #[command(long_about = "Validate that all slugs in the personal YAML file exist in the catalog and that all movie years reference actual adaptations. Exits non-zero if any issue is found.")]
    Check {
        /// Path to personal YAML file (default: first YAML in the personal directory)
        #[arg(long, value_name = "PATH")]
        personal_yaml: Option<PathBuf>,
    },
    /// Mark adaptations as watched from an IMDb CSV export
    #[command(long_about = "Update watched movies in the personal YAML file from the first CSV file in the personal directory. Expects an IMDb export with a 'Const' column holding tt identifiers, matched against the imdb ids listed for each adaptation in the catalog.")]
    UpdateMovies {
        /// Personal directory containing the CSV and YAML files (default: personal)
        #[arg(long, value_name = "DIR")]
        personal_dir: Option<PathBuf>,

        /// Name of the personal YAML file inside the personal directory (default: first YAML)
        #[arg(long, value_name = "NAME")]
        personal_yaml: Option<String>,

        /// Report what would change without writing the personal file
        #[arg(long, action = ArgAction::SetTrue)]
        dry_run: bool,
    },
    /// Generate a Mermaid diagram with reading and watching statistics
    #[command(long_about = "Compute statistics about books read and adaptations watched, print a summary, and write a Mermaid sankey diagram.")]
    Statistics {
        /// Path to personal YAML file (default: first YAML in the personal directory)
        #[arg(long, value_name = "PATH")]
        personal_yaml: Option<PathBuf>,

        /// Output file for the Mermaid diagram (default: personal/statistics.mmd)
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let (config_path, explicit) = config_file_path(cli.config);
    let config = Config::load(&config_path, explicit).wrap_err("Failed to load configuration")?;

    logging::init_logging(cli.verbose, cli.quiet, &config.logging)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.format, cli.quiet);
    let paths = PathManager::new(&config).with_catalog(cli.catalog);

    let status = match cli.command {
        Commands::Check { personal_yaml } => check::run_check(&paths, personal_yaml, &output)?,
        Commands::UpdateMovies {
            personal_dir,
            personal_yaml,
            dry_run,
        } => {
            let paths = paths.with_personal_dir(personal_dir);
            update_movies::run_update_movies(&paths, personal_yaml, dry_run, &output)?
        }
        Commands::Statistics {
            personal_yaml,
            output: diagram,
        } => statistics::run_statistics(&paths, personal_yaml, diagram, &output)?,
    };

    Ok(status.into())
}
