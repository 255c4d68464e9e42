use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::{Args, Parser, Subcommand};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};
use tracing_subscriber::EnvFilter;

use contract_report::config::{config_dir, expand_path, init_config, load_config};
use contract_report::engine::aggregate;
use contract_report::error::{ReportError, Result};
use contract_report::ingest::read_input;
use contract_report::render::{preview_table, render_report, report_file_name};

#[derive(Parser)]
#[command(name = "contract-report")]
#[command(
    version,
    about = "Consolidate installment exports into one report row per contract",
    long_about = None
)]
struct Cli {
    /// Path to config directory (default: XDG config dir)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with a template config.toml
    Init,

    /// Consolidate an installment export into the contract report
    Process(ProcessArgs),

    /// Show which input headers are read for each attribute
    Columns,
}

#[derive(Args)]
struct ProcessArgs {
    /// Installment export with a header row (CSV, or an Excel/ODS workbook)
    input: PathBuf,

    /// Directory for the report (default: report.output_dir from config)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Classify receivable/overdue as of this date (YYYY-MM-DD, DD/MM/YYYY or
    /// YYYY-MM-DDTHH:MM:SS); a bare date means the end of that day
    #[arg(long, value_name = "DATE")]
    as_of: Option<String>,

    /// Report format: csv, xlsx or json
    #[arg(short, long)]
    format: Option<String>,

    /// Input field delimiter (e.g. ';')
    #[arg(short, long)]
    delimiter: Option<String>,

    /// Print the consolidated rows as a table
    #[arg(long)]
    preview: bool,

    /// Aggregate and preview without writing the report
    #[arg(long)]
    dry_run: bool,
}

fn main() {
    init_tracing();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Process(args) => cmd_process(&cfg_dir, args),
        Commands::Columns => cmd_columns(&cfg_dir),
    }
}

/// Initialize config directory with the template file
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    let path = init_config(cfg_dir)?;

    println!("Initialized contract-report config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!("  1. Match your export's headers:  $EDITOR {}", path.display());
    println!("  2. Consolidate an export:        contract-report process <export.csv>");

    Ok(())
}

/// Consolidate one export and write the report
fn cmd_process(cfg_dir: &Path, args: ProcessArgs) -> Result<()> {
    let mut config = load_config(cfg_dir)?;
    if let Some(delimiter) = args.delimiter {
        config.input.delimiter = delimiter;
    }
    if let Some(format) = args.format {
        config.report.format = format.parse()?;
    }

    let reference = match args.as_of {
        Some(s) => parse_as_of(&s)?,
        None => Local::now().naive_local(),
    };

    let table = read_input(&args.input, &config.input)?;
    tracing::debug!(
        rows = table.len(),
        columns = table.columns().len(),
        "input loaded"
    );

    let aggregation = aggregate(&table, &config.columns, reference)?;
    for warning in &aggregation.warnings {
        tracing::warn!("{warning}");
    }

    if args.preview || args.dry_run {
        println!(
            "{}",
            preview_table(&aggregation, &config.report.currency_symbol)
        );
    }

    if args.dry_run {
        println!(
            "Dry run: {} not written",
            report_file_name(&aggregation, config.report.format)
        );
        return Ok(());
    }

    let output_dir = args
        .output_dir
        .unwrap_or_else(|| expand_path(&config.report.output_dir));
    let path = render_report(&aggregation, &config.report, &output_dir)?;

    tracing::info!(
        title = %aggregation.title,
        contracts = aggregation.contracts.len(),
        warnings = aggregation.warnings.len(),
        path = %path.display(),
        "report generated"
    );

    println!("Generated report '{}'", aggregation.title);
    println!("  Contracts: {}", aggregation.contracts.len());
    println!("  As of:     {}", reference.format("%d/%m/%Y %H:%M"));
    if !aggregation.warnings.is_empty() {
        println!(
            "  Warnings:  {} value(s) treated as empty (details on stderr)",
            aggregation.warnings.len()
        );
    }
    println!("  Saved:     {}", path.display());

    Ok(())
}

/// Parse an --as-of value. A bare date resolves to 23:59:59 of that day.
fn parse_as_of(value: &str) -> Result<NaiveDateTime> {
    let value = value.trim();
    let invalid = || ReportError::InvalidAsOf(value.to_string());

    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(moment) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(moment);
        }
    }

    ["%Y-%m-%d", "%d/%m/%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .and_then(|date| date.and_hms_opt(23, 59, 59))
        .ok_or_else(invalid)
}

#[derive(Tabled)]
struct ColumnRow {
    #[tabled(rename = "ATTRIBUTE")]
    attribute: String,
    #[tabled(rename = "HEADER")]
    header: String,
    #[tabled(rename = "REQUIRED")]
    required: String,
}

/// List the active column mapping
fn cmd_columns(cfg_dir: &Path) -> Result<()> {
    let config = load_config(cfg_dir)?;

    let rows: Vec<ColumnRow> = config
        .columns
        .entries()
        .into_iter()
        .map(|entry| ColumnRow {
            attribute: entry.attribute.to_string(),
            header: entry.header.to_string(),
            required: if entry.required { "yes" } else { "no" }.to_string(),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");
    println!("Optional columns that are absent count as zero/empty.");

    Ok(())
}
