//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the indicator catalog
//! - reloads series from FRED
//! - prints reports/plots
//! - writes optional exports

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing::info;

use crate::cli::{CatalogArgs, Command, LoadArgs, SourceArgs, ViewArgs};
use crate::data::FredClient;
use crate::domain::Catalog;
use crate::error::AppError;
use crate::logging::{self, LogTarget};

pub mod pipeline;

/// Log file used while the TUI owns the terminal.
pub const TUI_LOG_FILE: &str = "pulse.log";

/// Entry point for the `pulse` binary.
pub fn run() -> Result<(), AppError> {
    // We want `pulse` and `pulse --end-date ...` to behave like `pulse tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Load(args) => handle_load(args),
        Command::View(args) => handle_view(args),
        Command::Correlate(args) => handle_correlate(args),
        Command::Catalog(args) => handle_catalog(args),
    }
}

fn handle_load(args: LoadArgs) -> Result<(), AppError> {
    logging::init(LogTarget::Stderr)?;
    let catalog = load_catalog(args.source.catalog.as_deref())?;
    let client = FredClient::from_env()?;

    let dataset = pipeline::reload(&client, &catalog, end_date(&args.source));

    println!("{}", crate::report::format_overview(&dataset));
    println!("{}", crate::report::format_dashboard(&dataset, &catalog));
    println!("{}", crate::report::format_status_legend());

    if let Some(dir) = &args.export_dir {
        for path in crate::io::export_dataset(dir, &dataset)? {
            info!(path = %path.display(), "exported category table");
        }
    }

    Ok(())
}

fn handle_view(args: ViewArgs) -> Result<(), AppError> {
    logging::init(LogTarget::Stderr)?;
    let catalog = load_catalog(args.source.catalog.as_deref())?;
    let client = FredClient::from_env()?;

    let (table, failures) =
        pipeline::reload_category(&client, &catalog, args.category, end_date(&args.source));

    println!("{}", crate::report::format_category_summary(&table, &catalog));
    if args.raw {
        println!("{}", crate::report::format_raw_table(&table));
    }
    for f in &failures {
        println!("unavailable: {}: {}", f.identifier, f.error);
    }

    if args.plot {
        for (magnitude, ids) in crate::analysis::scale_groups(&table) {
            println!("Scale 10^{magnitude}");
            println!(
                "{}",
                crate::plot::render_group_plot(&table, &ids, args.width, args.height)
            );
        }
    }

    if let Some(path) = &args.export {
        crate::io::write_table_csv(path, &table)?;
        info!(path = %path.display(), "exported category table");
    }

    Ok(())
}

fn handle_correlate(args: SourceArgs) -> Result<(), AppError> {
    logging::init(LogTarget::Stderr)?;
    let catalog = load_catalog(args.catalog.as_deref())?;
    let client = FredClient::from_env()?;

    let dataset = pipeline::reload(&client, &catalog, end_date(&args));
    let matrix = crate::analysis::correlation_matrix(&dataset.tables);

    println!("{}", crate::report::format_correlation(&matrix));
    Ok(())
}

fn handle_catalog(args: CatalogArgs) -> Result<(), AppError> {
    logging::init(LogTarget::Stderr)?;
    let catalog = load_catalog(args.catalog.as_deref())?;
    print!("{}", crate::report::format_catalog(&catalog));
    Ok(())
}

fn handle_tui(args: SourceArgs) -> Result<(), AppError> {
    logging::init(LogTarget::File(PathBuf::from(TUI_LOG_FILE)))?;
    let catalog = load_catalog(args.catalog.as_deref())?;
    let client = FredClient::from_env()?;
    crate::tui::run(catalog, client, end_date(&args))
}

/// The built-in catalog, or the JSON file given with `--catalog`.
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog, AppError> {
    match path {
        Some(path) => crate::io::read_catalog_json(path),
        None => Ok(Catalog::builtin()),
    }
}

fn end_date(args: &SourceArgs) -> NaiveDate {
    args.end_date.unwrap_or_else(|| Local::now().date_naive())
}

/// Rewrite argv so `pulse` defaults to `pulse tui`.
///
/// Rules:
/// - `pulse`                        -> `pulse tui`
/// - `pulse --end-date 2024-06-30`  -> `pulse tui --end-date 2024-06-30`
/// - `pulse --help/--version/-h`    -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "load" | "view" | "correlate" | "catalog");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}
