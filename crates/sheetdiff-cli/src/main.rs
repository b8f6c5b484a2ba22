//! sheetdiff CLI - compare two spreadsheet workbooks

mod report;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{ensure, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use sheetdiff::prelude::*;
use sheetdiff::{compare_files_with, compare_sheet_files, CsvReadOptions, Format};
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

use report::ReportOptions;

#[derive(Parser)]
#[command(name = "sheetdiff")]
#[command(
    author,
    version,
    about = "Compare two versions of a spreadsheet workbook cell by cell"
)]
struct Cli {
    /// More log output (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two workbooks. Exits 0 if identical, 1 if they differ
    Diff {
        /// Baseline workbook (xlsx, xlsm, csv)
        old: PathBuf,

        /// Workbook to compare against the baseline
        new: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Also list unchanged cells
        #[arg(short, long)]
        all: bool,

        /// Only compare the sheet with this exact name
        #[arg(short, long)]
        sheet: Option<String>,

        /// Compare sheets in parallel
        #[arg(short, long)]
        parallel: bool,

        /// Field delimiter for CSV inputs
        #[arg(short, long, default_value = ",")]
        delimiter: char,
    },

    /// Show information about a workbook
    Info {
        /// Input workbook
        input: PathBuf,
    },

    /// List all sheets in a workbook
    Sheets {
        /// Input workbook
        input: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => ExitCode::from(1),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(io::stderr)
                .with_filter(filter),
        )
        .init();
}

/// Returns whether differences were found
fn run(command: Commands) -> Result<bool> {
    match command {
        Commands::Diff {
            old,
            new,
            format,
            all,
            sheet,
            parallel,
            delimiter,
        } => diff(
            &old,
            &new,
            DiffArgs {
                format,
                report: ReportOptions { all },
                sheet,
                parallel,
                delimiter,
            },
        ),
        Commands::Info { input } => show_info(&input).map(|_| false),
        Commands::Sheets { input } => list_sheets(&input).map(|_| false),
    }
}

struct DiffArgs {
    format: OutputFormat,
    report: ReportOptions,
    sheet: Option<String>,
    parallel: bool,
    delimiter: char,
}

fn diff(old: &Path, new: &Path, args: DiffArgs) -> Result<bool> {
    ensure!(
        args.delimiter.is_ascii(),
        "Delimiter must be a single ASCII character, got '{}'",
        args.delimiter
    );
    let loader = FileLoader::with_options(LoadOptions {
        csv: CsvReadOptions {
            delimiter: args.delimiter as u8,
            ..CsvReadOptions::default()
        },
    });

    let (results, changed) = match &args.sheet {
        Some(name) => {
            let result = compare_sheet_files(&loader, old, new, name).with_context(|| {
                format!(
                    "Failed to compare sheet '{}' of '{}' and '{}'",
                    name,
                    old.display(),
                    new.display()
                )
            })?;
            let changed = result.has_changes();
            (vec![result], changed)
        }
        None => {
            let options = CompareOptions {
                parallel: args.parallel,
            };
            let comparison = compare_files_with(&loader, old, new, &options).with_context(|| {
                format!("Failed to compare '{}' and '{}'", old.display(), new.display())
            })?;
            let changed = comparison.has_changes();
            (comparison.results, changed)
        }
    };

    tracing::debug!(sheets = results.len(), changed, "comparison finished");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Text => report::write_text(&mut out, old, new, &results, args.report)
            .context("Failed to write to stdout")?,
        OutputFormat::Json => {
            let value = report::to_json(old, new, &results, args.report);
            serde_json::to_writer_pretty(&mut out, &value).context("Failed to write JSON")?;
            writeln!(out).context("Failed to write to stdout")?;
        }
    }

    Ok(changed)
}

fn open(input: &Path) -> Result<Workbook> {
    FileLoader::new()
        .load(input)
        .with_context(|| format!("Failed to open '{}'", input.display()))
}

fn show_info(input: &Path) -> Result<()> {
    let workbook = open(input)?;

    println!("File: {}", input.display());
    if let Some(format) = Format::from_path(input) {
        println!("Format: {}", format.as_str());
    }
    println!("Loaded: {}", workbook.loaded_at().format("%Y-%m-%d %H:%M:%S"));
    println!("Sheets: {}", workbook.sheet_count());

    for (i, sheet) in workbook.worksheets().enumerate() {
        let formula_count = sheet.cells().filter(|c| c.is_formula()).count();

        println!();
        println!("  Sheet {}: \"{}\"", i, sheet.name());

        if let Some((start, end)) = sheet.used_range() {
            println!(
                "    Used range: {}:{} ({} rows x {} columns)",
                start,
                end,
                sheet.row_count(),
                sheet.column_count()
            );
        } else {
            println!("    Used range: empty");
        }
        println!("    Cells: {}", sheet.cell_count());
        println!("    Formulas: {}", formula_count);
    }

    Ok(())
}

fn list_sheets(input: &Path) -> Result<()> {
    let workbook = open(input)?;

    for (i, sheet) in workbook.worksheets().enumerate() {
        println!("{}\t{}", i, sheet.name());
    }

    Ok(())
}
