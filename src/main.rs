// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

use finance_tracker::{
    breakdown_by_category, daily_trend, format_money, read_csv, totals_by_kind, Ledger,
    TransactionKind, EXPORT_FILE_NAME,
};

#[derive(Parser, Debug)]
#[command(name = "finance-tracker", version, about = "Track income and expenses from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the interactive dashboard (default)
    Tui {
        /// Seed the session from a previously exported CSV
        #[arg(long)]
        load: Option<PathBuf>,

        /// Where the export key writes the CSV
        #[arg(long, default_value = EXPORT_FILE_NAME)]
        export_path: PathBuf,

        /// Write logs to this file (the dashboard owns the terminal)
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Print totals, expense breakdown and daily trend of an exported CSV
    Summary {
        /// CSV produced by the export action
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Tui {
        load: None,
        export_path: PathBuf::from(EXPORT_FILE_NAME),
        log_file: None,
    }) {
        Command::Tui {
            load,
            export_path,
            log_file,
        } => {
            if let Some(path) = &log_file {
                init_file_tracing(path)?;
            }
            let ledger = match &load {
                Some(path) => load_ledger(path)?,
                None => Ledger::new(),
            };
            run_ui_mode(ledger, export_path)
        }
        Command::Summary { file } => {
            finance_tracker::init_tracing();
            run_summary(&file)
        }
    }
}

fn load_ledger(path: &Path) -> Result<Ledger> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let transactions = read_csv(file).with_context(|| format!("Failed to parse {}", path.display()))?;
    info!(rows = transactions.len(), path = %path.display(), "loaded ledger from CSV");
    Ok(Ledger::from_transactions(transactions))
}

fn init_file_tracing(path: &Path) -> Result<()> {
    use std::sync::Mutex;
    use tracing_subscriber::EnvFilter;

    let file = File::create(path).with_context(|| format!("Failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn run_summary(path: &Path) -> Result<()> {
    let ledger = load_ledger(path)?;

    if ledger.is_empty() {
        println!("No transactions in {}", path.display());
        return Ok(());
    }

    let totals = totals_by_kind(ledger.all());
    println!("💰 Personal Finance Summary ({} transactions)", ledger.len());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Total Income:   {:>14}", format_money(totals.income));
    println!("Total Expenses: {:>14}", format_money(totals.expense));
    println!("Balance:        {:>14}", format_money(totals.balance));

    let breakdown = breakdown_by_category(ledger.all(), TransactionKind::Expense);
    if !breakdown.is_empty() {
        println!("\n📊 Expense Breakdown by Category");
        for (category, amount) in &breakdown {
            println!("  {:<15} {:>14}", category.as_str(), format_money(*amount));
        }
    }

    println!("\n📈 Daily Transaction Trends");
    for point in daily_trend(ledger.all()) {
        println!(
            "  {}  {:<8} {:>14}",
            point.date,
            point.kind.as_str(),
            format_money(point.amount)
        );
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(ledger: Ledger, export_path: PathBuf) -> Result<()> {
    let mut app = ui::App::new(ledger, export_path);
    ui::run_ui(&mut app)?;

    println!("✅ Dashboard closed ({} transactions in session)", app.ledger.len());
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_ledger: Ledger, _export_path: PathBuf) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the API server: cargo run --bin tracker-server --features server");
    std::process::exit(1);
}
