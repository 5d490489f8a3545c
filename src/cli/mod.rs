//! Command-line parsing for the FRED-based macro indicator dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the fetch/analysis code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::domain::Category;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "pulse", version, about = "Macro indicator dashboard (FRED-based)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive TUI.
    ///
    /// Status cards and charts per category; `r` reloads from FRED.
    Tui(SourceArgs),
    /// Reload every configured series and print the overview and status dashboard.
    Load(LoadArgs),
    /// Reload one category and print summary statistics and scale groups.
    View(ViewArgs),
    /// Reload everything and print the cross-category correlation matrix.
    Correlate(SourceArgs),
    /// Print the configured indicator catalog (no network access).
    Catalog(CatalogArgs),
}

/// Options shared by every command that talks to FRED.
#[derive(Debug, Args, Clone)]
pub struct SourceArgs {
    /// Indicator catalog JSON (category -> series id -> attributes). Defaults to the built-in set.
    #[arg(long, value_name = "JSON")]
    pub catalog: Option<PathBuf>,

    /// Last observation date to request (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_name = "DATE")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Args, Clone)]
pub struct LoadArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Write `<category>_data.csv` for every category with data into this directory.
    #[arg(long, value_name = "DIR")]
    pub export_dir: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ViewArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Category to show.
    #[arg(short = 'c', long, value_enum, ignore_case = true)]
    pub category: Category,

    /// Print every aligned row (blank cells for missing months).
    #[arg(long)]
    pub raw: bool,

    /// Render one ASCII chart per scale group.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export the category table to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct CatalogArgs {
    /// Indicator catalog JSON to print instead of the built-in set.
    #[arg(long, value_name = "JSON")]
    pub catalog: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_parses_category_and_shared_flags() {
        let cli = Cli::parse_from([
            "pulse",
            "view",
            "-c",
            "inflation",
            "--end-date",
            "2024-06-30",
            "--plot",
        ]);
        let Command::View(args) = cli.command else {
            panic!("expected view");
        };
        assert_eq!(args.category, Category::Inflation);
        assert_eq!(args.source.end_date, NaiveDate::from_ymd_opt(2024, 6, 30));
        assert!(args.plot);
        assert_eq!(args.width, 100);
    }

    #[test]
    fn category_name_is_case_insensitive() {
        let cli = Cli::parse_from(["pulse", "view", "-c", "Inflation", "--raw"]);
        let Command::View(args) = cli.command else {
            panic!("expected view");
        };
        assert_eq!(args.category, Category::Inflation);
        assert!(args.raw);
        assert!(Cli::try_parse_from(["pulse", "view", "-c", "Housing"]).is_err());
    }

    #[test]
    fn bad_end_date_is_rejected() {
        let res = Cli::try_parse_from(["pulse", "load", "--end-date", "yesterday"]);
        assert!(res.is_err());
    }
}
