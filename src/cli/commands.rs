use crate::config::AppConfig;
use crate::core::{default_period_label, Aggregator, SyncEngine, SyncOutcome};
use crate::error::{TasklyticsError, TasklyticsResult};
use crate::excel::{SourceReader, SummaryExporter};
use crate::remote::{open_backend, MemorySheet, SheetBackend};
use crate::types::{format_number, CategoryTotal, GrowthRecord, Summary, Table};
use colored::Colorize;
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Duration;
use tokio::runtime::Runtime;

/// Single-threaded runtime for the remote calls of one command
fn runtime() -> TasklyticsResult<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(TasklyticsError::Io)
}

/// Source file from the command line, else from config
fn source_path(source: Option<PathBuf>, config: &AppConfig) -> PathBuf {
    source.unwrap_or_else(|| config.source.clone())
}

fn read_source(path: &Path, verbose: bool) -> TasklyticsResult<Table> {
    if verbose {
        println!("{}", "📖 Reading source table...".cyan());
    }
    let table = SourceReader::new(path).read()?;
    if verbose {
        println!(
            "   Found {} data rows, {} columns\n",
            table.data_rows().len(),
            table.header_len()
        );
    }
    Ok(table)
}

fn print_totals(totals: &[CategoryTotal]) {
    let width = totals
        .iter()
        .map(|t| t.category.chars().count())
        .max()
        .unwrap_or(0)
        .max(8);
    for total in totals {
        println!(
            "   {:<width$}  {}",
            total.category.bright_blue(),
            format_number(total.total).bold(),
            width = width
        );
    }
}

fn format_growth(growth: Option<f64>) -> String {
    match growth {
        Some(g) if g >= 0.0 => format!("+{:.2}%", g).green().to_string(),
        Some(g) => format!("{:.2}%", g).red().to_string(),
        None => "n/a".dimmed().to_string(),
    }
}

/// Execute the aggregate command
pub fn aggregate(
    source: Option<PathBuf>,
    output: PathBuf,
    excel: Option<PathBuf>,
    config: &AppConfig,
    verbose: bool,
) -> TasklyticsResult<()> {
    let source = source_path(source, config);
    println!("{}", "📊 Tasklytics - Aggregating revenue".bold().green());
    println!("   Source: {}\n", source.display());

    let table = read_source(&source, verbose)?;
    let aggregator = Aggregator::new(&config.sync)?;

    if verbose {
        let columns = aggregator.detect_columns(table.header());
        println!(
            "   Columns: category={}, value={}, units={}\n",
            table.header_label(columns.category).cyan(),
            table.header_label(columns.value).cyan(),
            columns
                .units
                .map(|c| table.header_label(c))
                .unwrap_or_else(|| "(1 per row)".to_string())
                .cyan()
        );
    }

    let totals = aggregator.aggregate_totals(&table);
    println!("{}", "✅ Revenue by category:".bold().green());
    print_totals(&totals);
    println!();

    let summary = Summary::new(totals.clone());
    fs::write(&output, serde_json::to_string_pretty(&summary)?)?;
    println!("   Summary written to {}", output.display());

    if let Some(path) = excel {
        SummaryExporter::new(totals).export(&path)?;
        println!("   Workbook written to {}", path.display());
    }

    Ok(())
}

/// Execute the upload command
pub fn upload(source: Option<PathBuf>, config: &AppConfig, verbose: bool) -> TasklyticsResult<()> {
    let source = source_path(source, config);
    println!("{}", "📤 Tasklytics - Uploading summary".bold().green());
    println!("   Source: {}", source.display());

    let table = read_source(&source, verbose)?;
    let totals = Aggregator::new(&config.sync)?.aggregate_totals(&table);

    let backend = open_backend(config)?;
    println!("   Sheet: {}\n", backend.describe());

    let engine = SyncEngine::new(backend.as_ref(), config.sync.clone())?;
    let written = runtime()?.block_on(engine.upload(&totals))?;

    println!(
        "{}",
        format!("✅ Sheet replaced with {} categories", written)
            .bold()
            .green()
    );
    Ok(())
}

fn print_outcome(outcome: &SyncOutcome) {
    match outcome {
        SyncOutcome::Success { .. } => {
            println!("{} {}", "✅ Synced:".bold().green(), outcome);
        }
        _ => {
            println!("{} {}", "⚠️  Nothing written:".bold().yellow(), outcome);
        }
    }
}

fn run_sync(
    runtime: &Runtime,
    backend: &dyn SheetBackend,
    table: &Table,
    label: &str,
    config: &AppConfig,
) -> TasklyticsResult<SyncOutcome> {
    let engine = SyncEngine::new(backend, config.sync.clone())?;
    runtime.block_on(engine.sync_from_source(table, label))
}

/// Execute the sync command
pub fn sync(
    source: Option<PathBuf>,
    label: Option<String>,
    dry_run: bool,
    config: &AppConfig,
    verbose: bool,
) -> TasklyticsResult<()> {
    let source = source_path(source, config);
    let label = label.unwrap_or_else(|| default_period_label(&config.sync.label_format));

    println!("{}", "🔄 Tasklytics - Incremental sync".bold().green());
    println!("   Source: {}", source.display());
    println!("   Period: {}", label.bright_yellow().bold());

    let backend = open_backend(config)?;
    println!("   Sheet: {}\n", backend.describe());

    if dry_run {
        println!(
            "{}",
            "📋 DRY RUN MODE - No changes will be written\n".yellow()
        );
    }

    let table = read_source(&source, verbose)?;
    let runtime = runtime()?;

    if dry_run {
        let snapshot = runtime.block_on(backend.get_all_values())?;
        let preview = MemorySheet::from_table(snapshot);
        let outcome = run_sync(&runtime, &preview, &table, &label, config)?;
        print_outcome(&outcome);
        println!(
            "   Header would be: {}",
            preview.snapshot().header_labels().join(" | ").cyan()
        );
        println!("{}", "📋 Dry run complete - no changes written".yellow());
        return Ok(());
    }

    let outcome = run_sync(&runtime, backend.as_ref(), &table, &label, config)?;
    print_outcome(&outcome);
    Ok(())
}

fn load_growth(config: &AppConfig) -> TasklyticsResult<Vec<GrowthRecord>> {
    let backend = open_backend(config)?;
    let engine = SyncEngine::new(backend.as_ref(), config.sync.clone())?;
    runtime()?.block_on(engine.growth())
}

/// Execute the growth command
pub fn growth(json: bool, config: &AppConfig) -> TasklyticsResult<()> {
    let records = load_growth(config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    println!("{}", "📈 Tasklytics - Growth".bold().green());
    let Some(first) = records.first() else {
        println!("   {}", "No data available".yellow());
        return Ok(());
    };
    println!("   Period: {}\n", first.period_label.bright_yellow().bold());

    let width = records
        .iter()
        .map(|r| r.category.chars().count())
        .max()
        .unwrap_or(0)
        .max(8);
    println!(
        "   {:<width$}  {:>14}  {:>14}  {:>10}",
        "category".bold(),
        "latest".bold(),
        "previous".bold(),
        "growth".bold(),
        width = width
    );
    for record in &records {
        println!(
            "   {:<width$}  {:>14}  {:>14}  {:>10}",
            record.category.bright_blue(),
            format_number(record.latest),
            format_number(record.previous),
            format_growth(record.growth),
            width = width
        );
    }
    Ok(())
}

/// Execute the insight command
pub fn insight(config: &AppConfig) -> TasklyticsResult<()> {
    let backend = open_backend(config)?;
    let engine = SyncEngine::new(backend.as_ref(), config.sync.clone())?;
    let insight = runtime()?.block_on(engine.insight())?;
    println!("{}", "💡 Tasklytics - Insight".bold().green());
    println!("   {}", insight.text);
    Ok(())
}

/// Execute the watch command
pub fn watch(
    source: Option<PathBuf>,
    label: Option<String>,
    config: &AppConfig,
    verbose: bool,
) -> TasklyticsResult<()> {
    let source = source_path(source, config);
    println!("{}", "👁️  Tasklytics - Watch Mode".bold().green());
    println!("   Watching: {}", source.display());
    println!("   Press {} to stop\n", "Ctrl+C".bold().yellow());

    // Verify file exists
    if !source.exists() {
        return Err(TasklyticsError::Validation(format!(
            "File not found: {}",
            source.display()
        )));
    }

    let canonical_path = source.canonicalize()?;
    let parent_dir = canonical_path.parent().ok_or_else(|| {
        TasklyticsError::Validation("Cannot determine parent directory".to_string())
    })?;

    let backend = open_backend(config)?;
    let runtime = runtime()?;

    let (tx, rx) = channel();

    // Debounce so one save triggers one sync
    let mut debouncer = new_debouncer(Duration::from_millis(200), tx).map_err(|e| {
        TasklyticsError::Validation(format!("Failed to create file watcher: {}", e))
    })?;

    debouncer
        .watcher()
        .watch(parent_dir, RecursiveMode::NonRecursive)
        .map_err(|e| TasklyticsError::Validation(format!("Failed to watch directory: {}", e)))?;

    if verbose {
        println!(
            "   {} {}",
            "Watching directory:".cyan(),
            parent_dir.display()
        );
    }

    let run = |label: &str| {
        let result = read_source(&source, verbose)
            .and_then(|table| run_sync(&runtime, backend.as_ref(), &table, label, config));
        match result {
            Ok(outcome) => print_outcome(&outcome),
            Err(e) => println!("{} {}", "❌ Sync failed:".bold().red(), e),
        }
    };

    println!("{}", "🔄 Initial run...".cyan());
    run(&current_label(&label, config));
    println!();

    // Runs are sequential: the next event is only read after a sync returns
    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant = events.iter().any(|event| {
                    event.kind == DebouncedEventKind::Any
                        && event.path.file_name() == canonical_path.file_name()
                });

                if relevant {
                    println!(
                        "\n{} {}",
                        "🔄 Change detected at".cyan(),
                        chrono::Local::now().format("%H:%M:%S").to_string().cyan()
                    );
                    run(&current_label(&label, config));
                    println!();
                }
            }
            Ok(Err(error)) => {
                eprintln!("{} Watch error: {}", "❌".red(), error);
            }
            Err(e) => {
                eprintln!("{} Channel error: {}", "❌".red(), e);
                break;
            }
        }
    }

    Ok(())
}

fn current_label(label: &Option<String>, config: &AppConfig) -> String {
    label
        .clone()
        .unwrap_or_else(|| default_period_label(&config.sync.label_format))
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
