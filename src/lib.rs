//! Price Tracker - MTG watch-list price sync
//!
//! Resolves card prices from Scryfall for a persisted watch-list and
//! reconciles them into a spreadsheet-backed collection sheet.

pub mod error;
pub mod models;
pub mod scryfall;
pub mod sheet;
pub mod updater;
pub mod watchlist;

pub use error::{Error, Result};
pub use models::{CardReference, PriceRecord, Prices};
pub use scryfall::ScryfallClient;
pub use sheet::{sync_prices, CsvSheet, SheetLayout, SheetStore, SyncOutcome};
pub use updater::refresh;
pub use watchlist::{AppendOutcome, WatchEntry, Watchlist};
