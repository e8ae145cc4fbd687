//! Sheet reconciliation: match incoming price records against a tabular
//! store and update-or-append, keyed by the composite display name
//!
//! The spreadsheet service itself stays behind [`SheetStore`]; this module
//! owns the matching and row-number bookkeeping. Two deployment variants
//! were observed with different header offsets and column orders, so the
//! layout is configuration, not constants.

use crate::error::{Error, Result};
use crate::models::PriceRecord;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Header offset and 1-indexed column positions of the target sheet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SheetLayout {
    /// Fixed rows preceding the data, applied uniformly to row numbers
    pub header_rows: usize,
    pub name_col: usize,
    pub start_eur_col: usize,
    pub start_usd_col: usize,
    pub current_eur_col: usize,
    pub current_usd_col: usize,
}

impl Default for SheetLayout {
    /// The original deployment: four header rows, name / start EUR /
    /// start USD / current EUR / current USD.
    fn default() -> Self {
        Self {
            header_rows: 4,
            name_col: 1,
            start_eur_col: 2,
            start_usd_col: 3,
            current_eur_col: 4,
            current_usd_col: 5,
        }
    }
}

impl SheetLayout {
    /// Load a layout from a JSON file; absent keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<SheetLayout> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }

    fn width(&self) -> usize {
        self.name_col
            .max(self.start_eur_col)
            .max(self.start_usd_col)
            .max(self.current_eur_col)
            .max(self.current_usd_col)
    }

    /// Render a fresh row for `record`: start prices equal current prices,
    /// name cell hyperlinked to the record's resource URI.
    fn new_row(&self, record: &PriceRecord) -> Vec<String> {
        let mut cells = vec![String::new(); self.width()];
        cells[self.name_col - 1] = hyperlink(&record.resource_uri, &record.display_name());
        cells[self.start_eur_col - 1] = record.prices.eur.clone();
        cells[self.start_usd_col - 1] = record.prices.usd.clone();
        cells[self.current_eur_col - 1] = record.prices.eur.clone();
        cells[self.current_usd_col - 1] = record.prices.usd.clone();
        cells
    }
}

/// Tabular store seam: read-all snapshot plus point-update and append.
///
/// `read_rows` returns every row including headers, as display values (a
/// hyperlink cell reads back as its label, the way a spreadsheet client
/// returns rendered text). `update_cell` addresses 1-indexed sheet
/// coordinates; `append_row` adds after the last occupied row.
pub trait SheetStore {
    fn read_rows(&mut self) -> Result<Vec<Vec<String>>>;
    fn update_cell(&mut self, row: usize, col: usize, value: &str) -> Result<()>;
    fn append_row(&mut self, cells: &[String]) -> Result<()>;
}

/// Counts reported back after a sync call.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    pub updated: usize,
    pub appended: usize,
}

/// Reconcile `updates` into the store.
///
/// The snapshot is read once per call. Matched rows get their current USD
/// and EUR cells point-updated in place (start prices and row order are
/// untouched); unmatched records are appended with start = current. First
/// match in store order wins; appended rows join the match map so an
/// in-batch repeat updates instead of duplicating. Rows are never deleted.
pub fn sync_prices(
    store: &mut dyn SheetStore,
    layout: &SheetLayout,
    updates: &[PriceRecord],
) -> Result<SyncOutcome> {
    let rows = store.read_rows()?;
    let mut row_count = rows.len();

    // display name -> 1-indexed row number (enumeration index + offset + 1,
    // folded together by enumerating absolute rows and skipping the header)
    let mut index: HashMap<String, usize> = HashMap::new();
    for (i, row) in rows.iter().enumerate().skip(layout.header_rows) {
        if let Some(name) = row.get(layout.name_col - 1) {
            index.entry(name.clone()).or_insert(i + 1);
        }
    }

    let mut outcome = SyncOutcome::default();
    for record in updates {
        let display = record.display_name();
        match index.get(&display).copied() {
            Some(row_number) => {
                store.update_cell(row_number, layout.current_usd_col, &record.prices.usd)?;
                store.update_cell(row_number, layout.current_eur_col, &record.prices.eur)?;
                outcome.updated += 1;
                log::debug!("Updated row {}: {}", row_number, display);
            }
            None => {
                store.append_row(&layout.new_row(record))?;
                row_count += 1;
                index.insert(display.clone(), row_count);
                outcome.appended += 1;
                log::debug!("Appended row {}: {}", row_count, display);
            }
        }
    }

    log::info!(
        "Sheet sync: {} updated, {} appended",
        outcome.updated,
        outcome.appended
    );
    Ok(outcome)
}

/// Render a clickable label cell.
fn hyperlink(uri: &str, label: &str) -> String {
    format!("=HYPERLINK(\"{}\"; \"{}\")", uri, label)
}

/// Display value of a cell: a hyperlink formula renders as its label,
/// anything else as itself.
fn display_value(cell: &str) -> &str {
    if let Some(inner) = cell.strip_prefix("=HYPERLINK(").and_then(|s| s.strip_suffix(')')) {
        if let Some(end) = inner.rfind('"') {
            if let Some(start) = inner[..end].rfind('"') {
                return &inner[start + 1..end];
            }
        }
    }
    cell
}

/// CSV-file-backed sheet store.
///
/// The whole file is held in memory and rewritten on every mutation, which
/// matches the single-writer, small-sheet usage this tool assumes.
pub struct CsvSheet {
    path: PathBuf,
    rows: Vec<Vec<String>>,
}

impl CsvSheet {
    /// Open an existing sheet file, or start an empty one.
    pub fn open(path: impl Into<PathBuf>) -> Result<CsvSheet> {
        let path = path.into();
        let mut rows = Vec::new();

        if path.exists() {
            let mut reader = csv::ReaderBuilder::new()
                .has_headers(false)
                .flexible(true)
                .from_path(&path)?;
            for result in reader.records() {
                let record = result?;
                rows.push(record.iter().map(str::to_string).collect());
            }
        }

        Ok(CsvSheet { path, rows })
    }

    fn save(&self) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(&self.path)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl SheetStore for CsvSheet {
    fn read_rows(&mut self) -> Result<Vec<Vec<String>>> {
        Ok(self
            .rows
            .iter()
            .map(|row| row.iter().map(|cell| display_value(cell).to_string()).collect())
            .collect())
    }

    fn update_cell(&mut self, row: usize, col: usize, value: &str) -> Result<()> {
        let row_idx = row
            .checked_sub(1)
            .ok_or_else(|| Error::Config("sheet rows are 1-indexed".to_string()))?;
        let cells = self
            .rows
            .get_mut(row_idx)
            .ok_or_else(|| Error::Config(format!("sheet row {} out of range", row)))?;
        if cells.len() < col {
            cells.resize(col, String::new());
        }
        cells[col - 1] = value.to_string();
        self.save()
    }

    fn append_row(&mut self, cells: &[String]) -> Result<()> {
        self.rows.push(cells.to_vec());
        self.save()
    }
}
