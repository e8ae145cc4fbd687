//! Price Tracker CLI
//!
//! `add` interactively collects cards into the watch-list; `refresh`
//! resolves current prices for every entry and syncs the collection sheet.

use clap::{Parser, Subcommand};
use price_tracker::error::Error;
use price_tracker::scryfall::{DEFAULT_BASE_URL, DEFAULT_RESULT_CAP};
use price_tracker::updater::DEFAULT_SLEEP_MS;
use price_tracker::{
    refresh, sync_prices, CardReference, CsvSheet, ScryfallClient, SheetLayout, WatchEntry,
    Watchlist,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// MTG price tracker - watch-list refresh and sheet sync
#[derive(Parser, Debug)]
#[command(name = "price_tracker")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the watch-list file
    #[arg(long, global = true, default_value = "data/cards_list.txt")]
    watchlist: PathBuf,

    /// Path to the collection sheet (CSV)
    #[arg(long, global = true, default_value = "data/collection.csv")]
    sheet: PathBuf,

    /// Sheet layout JSON file (built-in layout when omitted)
    #[arg(long, global = true)]
    layout: Option<PathBuf>,

    /// Card search API base URL
    #[arg(long, global = true, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Delay between card lookups in milliseconds (0 uses the default)
    #[arg(long, global = true, default_value_t = DEFAULT_SLEEP_MS)]
    sleep_ms: u64,

    /// Maximum search results before a query is rejected as ambiguous
    #[arg(long, global = true, default_value_t = DEFAULT_RESULT_CAP)]
    result_cap: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactively add cards to the watch-list
    Add,
    /// Refresh all watch-list prices and sync the collection sheet
    Refresh,
}

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let client = ScryfallClient::new(args.base_url.clone()).with_result_cap(args.result_cap);

    let result = match args.command {
        Command::Add => run_add(&args, &client),
        Command::Refresh => run_refresh(&args, &client),
    };

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

/// Prompt for `Name(SET)#` strings until blank input, resolving and
/// appending each batch with dedup. Not-found cards are reported and the
/// loop continues.
fn run_add(args: &Args, client: &ScryfallClient) -> price_tracker::Result<()> {
    let watchlist = Watchlist::new(&args.watchlist);
    let today = chrono::Local::now().format("%d/%m/%Y").to_string();
    let stdin = io::stdin();

    loop {
        print!("Enter card name (optional Card_Name(SET)#): ");
        io::stdout().flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }
        let raw = input.trim();
        if raw.is_empty() {
            break;
        }

        let reference = match CardReference::parse(raw) {
            Ok(reference) => normalize_placeholders(reference),
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };
        if reference.name.is_empty() {
            eprintln!("Card name must not be empty.");
            continue;
        }

        let records = match client.resolve(&reference) {
            Ok(records) => records,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        if records.is_empty() {
            eprintln!(
                "Invalid card name: {} set: {} number: {}",
                reference.name, reference.set_code, reference.collector_number
            );
            continue;
        }

        println!("Found: {} with name: {}.", records.len(), reference.name);

        let entries: Vec<WatchEntry> = records
            .iter()
            .map(|record| WatchEntry::from_record(record, &today))
            .collect();
        let outcome = watchlist.append_unique(&entries)?;
        for duplicate in &outcome.duplicates {
            println!("{} already present.", duplicate);
        }
    }

    println!("Card collection logged to {}", watchlist.path().display());
    Ok(())
}

/// Refresh every watch-list entry and reconcile the results into the sheet.
fn run_refresh(args: &Args, client: &ScryfallClient) -> price_tracker::Result<()> {
    let watchlist = Watchlist::new(&args.watchlist);
    let entries = watchlist.load().map_err(|e| {
        Error::Config(format!(
            "cannot read watch-list {}: {}",
            args.watchlist.display(),
            e
        ))
    })?;

    if entries.is_empty() {
        log::warn!("Watch-list is empty, nothing to refresh");
        return Ok(());
    }
    log::info!("Loaded {} watch-list entries", entries.len());

    let records = refresh(client, &entries, args.sleep_ms);

    let layout = match &args.layout {
        Some(path) => SheetLayout::from_file(path).map_err(|e| {
            Error::Config(format!("cannot read layout {}: {}", path.display(), e))
        })?,
        None => SheetLayout::default(),
    };

    let mut sheet = CsvSheet::open(&args.sheet).map_err(|e| {
        Error::Config(format!("cannot open sheet {}: {}", args.sheet.display(), e))
    })?;

    let outcome = sync_prices(&mut sheet, &layout, &records)?;
    log::info!(
        "Prices updated successfully ({} updated, {} appended).",
        outcome.updated,
        outcome.appended
    );
    Ok(())
}

/// The `_` placeholder means "unconstrained" for set code or collector
/// number; convert it before the reference reaches the resolver.
fn normalize_placeholders(mut reference: CardReference) -> CardReference {
    if reference.set_code == "_" {
        reference.set_code.clear();
    }
    if reference.collector_number == "_" {
        reference.collector_number.clear();
    }
    reference
}
