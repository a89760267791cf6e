//! Presentation shell for the stock ledger.
//!
//! # Responsibility
//! - Collect raw command-line input and forward it to the inventory
//!   service as typed requests.
//! - Map core error kinds to user-facing messages; never panic on bad
//!   input.
//! - Re-read and redisplay the full ledger after every mutating operation.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};
use stockledger_core::db::open_db;
use stockledger_core::{
    default_log_level, export_to_path, format_epoch_ms, init_logging, EntryRequest, ExitRequest,
    InventoryError, InventoryService, RecordId, SqliteStockRepository, StockRepository,
};

#[derive(Parser)]
#[command(name = "stockledger", version, about = "Single-user stock ledger over SQLite")]
struct Cli {
    /// Path to the ledger database file. Created on first use.
    #[arg(long, default_value = "stockledger.sqlite3")]
    db: PathBuf,
    /// Directory for rolling log files. Logging stays off when omitted.
    #[arg(long)]
    log_dir: Option<PathBuf>,
    /// Log level (trace|debug|info|warn|error). Defaults per build mode.
    #[arg(long)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Record a stock-in event, merging into the matching item if present.
    Entry {
        /// Item category. Required, non-empty.
        #[arg(long)]
        item_type: String,
        /// Item description. May be empty; matched exactly when merging.
        #[arg(long, default_value = "")]
        description: String,
        /// Units to add, as entered.
        #[arg(long)]
        quantity: String,
    },
    /// Record a stock-out event against a record id.
    Exit {
        /// Id of the ledger record to deplete, as entered.
        #[arg(long)]
        id: String,
        /// Units to remove, as entered.
        #[arg(long)]
        quantity: String,
    },
    /// Print the current ledger snapshot.
    List,
    /// Export the ledger snapshot to a CSV file.
    Export {
        /// Target CSV file path.
        #[arg(long)]
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli
            .log_level
            .as_deref()
            .unwrap_or(default_log_level());
        init_logging(level, &absolutize(log_dir)?)?;
    }

    let conn = open_db(&cli.db).map_err(|err| err.to_string())?;
    let repo = SqliteStockRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let service = InventoryService::new(repo);

    match cli.command {
        Command::Entry {
            item_type,
            description,
            quantity,
        } => {
            if item_type.is_empty() {
                return Err("item type is required".to_string());
            }
            let quantity = parse_quantity(&quantity)?;
            let request = EntryRequest {
                item_type,
                description,
                quantity,
            };
            service
                .register_entry(&request, now_epoch_ms())
                .map_err(|err| err.to_string())?;
            println!("entry registered");
            print_snapshot(&service)
        }
        Command::Exit { id, quantity } => {
            let request = ExitRequest {
                record_id: parse_record_id(&id)?,
                quantity: parse_quantity(&quantity)?,
            };
            service
                .register_exit(&request, now_epoch_ms())
                .map_err(|err| err.to_string())?;
            println!("exit registered");
            print_snapshot(&service)
        }
        Command::List => print_snapshot(&service),
        Command::Export { path } => {
            let snapshot = service.list_inventory().map_err(|err| err.to_string())?;
            export_to_path(&snapshot, &path).map_err(|err| err.to_string())?;
            println!("ledger exported to {}", path.display());
            Ok(())
        }
    }
}

/// Parses raw form text into a quantity.
///
/// Parse failure is reported identically to a non-positive quantity; the
/// service re-validates positivity on its side.
fn parse_quantity(raw: &str) -> Result<i64, String> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| InventoryError::InvalidQuantity.to_string())
}

/// Parses raw form text into a record id, with the same failure reporting
/// as quantities.
fn parse_record_id(raw: &str) -> Result<RecordId, String> {
    raw.trim()
        .parse::<RecordId>()
        .map_err(|_| InventoryError::InvalidQuantity.to_string())
}

fn print_snapshot<R: StockRepository>(service: &InventoryService<R>) -> Result<(), String> {
    let records = service.list_inventory().map_err(|err| err.to_string())?;
    if records.is_empty() {
        println!("ledger is empty");
        return Ok(());
    }

    println!(
        "{:<6} {:<18} {:<28} {:>8}  {:<19}  {:<19}",
        "ID", "Type", "Description", "Quantity", "Entry Time", "Exit Time"
    );
    for record in &records {
        println!(
            "{:<6} {:<18} {:<28} {:>8}  {:<19}  {:<19}",
            record.id,
            record.item_type,
            record.description,
            record.quantity,
            format_epoch_ms(record.last_entry_at),
            format_epoch_ms(record.last_exit_at)
        );
    }
    Ok(())
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}

fn absolutize(dir: &Path) -> Result<String, String> {
    let absolute = if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|err| format!("cannot resolve current directory: {err}"))?
            .join(dir)
    };
    absolute
        .to_str()
        .map(str::to_owned)
        .ok_or_else(|| format!("log directory is not valid UTF-8: `{}`", absolute.display()))
}
