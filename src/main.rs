use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tasklytics::cli;
use tasklytics::config::AppConfig;

#[derive(Parser)]
#[command(name = "tasklytics")]
#[command(about = "Sales sheet aggregation and incremental dashboard sync")]
#[command(long_about = "Tasklytics - per-category revenue and a growing dashboard sheet

Each sync appends one period column to the dashboard worksheet, keyed by
category. Earlier columns are never rewritten.

COMMANDS:
  aggregate   - Per-category revenue from a sales workbook
  upload      - Replace the dashboard sheet with a fresh summary
  sync        - Append the source as a new period column
  growth      - Latest vs previous period per category
  insight     - One-paragraph summary of the latest period
  watch       - Sync whenever the source workbook changes

EXAMPLES:
  tasklytics aggregate sales_data.xlsx --excel summary.xlsx
  tasklytics upload sales_data.xlsx
  tasklytics sync sales_data.xlsx --label 2025-02-01
  tasklytics --workbook dashboard.xlsx growth --json

CONFIG:
  tasklytics.yaml in the working directory, or --config / TASKLYTICS_CONFIG.
  TASKLYTICS_SPREADSHEET_ID, TASKLYTICS_WORKSHEET, TASKLYTICS_SOURCE and
  TASKLYTICS_SYNC_SECRET override the file.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ./tasklytics.yaml when present)
    #[arg(short, long, global = true, env = "TASKLYTICS_CONFIG")]
    config: Option<PathBuf>,

    /// Use a local .xlsx workbook as the dashboard sheet
    #[arg(short, long, global = true)]
    workbook: Option<PathBuf>,

    /// Show verbose steps and debug logs
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate revenue per category from a sales workbook
    Aggregate {
        /// Source workbook (.xlsx/.xls/.ods); defaults to `source` from config
        source: Option<PathBuf>,

        /// JSON summary output
        #[arg(short, long, default_value = "processed_data.json")]
        output: PathBuf,

        /// Also write the summary as a formatted .xlsx
        #[arg(long)]
        excel: Option<PathBuf>,
    },

    /// Aggregate and overwrite the dashboard sheet
    Upload {
        /// Source workbook; defaults to `source` from config
        source: Option<PathBuf>,
    },

    #[command(long_about = "Append the source as a new period column.

The period label is written to the first free header cell and each remote
row gets the value of its category. Rows whose category is missing from the
source stay empty. A label that already exists is refused (duplicate_period:
refuse) and the sheet is left unchanged.

Use --dry-run to replay the sync on a copy of the sheet.")]
    /// Append the source as a new period column
    Sync {
        /// Source workbook; defaults to `source` from config
        source: Option<PathBuf>,

        /// Period label (defaults to today, formatted with sync.label_format)
        #[arg(short, long)]
        label: Option<String>,

        /// Preview the sync without writing to the sheet
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// Show latest vs previous period per category
    Growth {
        /// Print JSON records instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print a text insight over the latest period
    Insight,

    /// Sync whenever the source workbook changes
    Watch {
        /// Source workbook; defaults to `source` from config
        source: Option<PathBuf>,

        /// Fixed period label (defaults to today on every run)
        #[arg(short, long)]
        label: Option<String>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "tasklytics=debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(workbook) = cli.workbook {
        config = config.with_workbook(workbook);
    }
    let verbose = cli.verbose;

    match cli.command {
        Commands::Aggregate {
            source,
            output,
            excel,
        } => cli::aggregate(source, output, excel, &config, verbose)?,

        Commands::Upload { source } => cli::upload(source, &config, verbose)?,

        Commands::Sync {
            source,
            label,
            dry_run,
        } => cli::sync(source, label, dry_run, &config, verbose)?,

        Commands::Growth { json } => cli::growth(json, &config)?,

        Commands::Insight => cli::insight(&config)?,

        Commands::Watch { source, label } => cli::watch(source, label, &config, verbose)?,
    }

    Ok(())
}
