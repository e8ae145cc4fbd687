//! Watch-list persistence: pipe-delimited card list with dedup-on-append
//!
//! One line per tracked printing, `#`-prefixed and blank lines skipped.
//! The first three fields (name, expansion, collector number) rendered with
//! their separators form the identity prefix; price and date fields never
//! participate in identity.

use crate::error::Result;
use crate::models::{CardReference, PriceRecord};
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// One persisted watch-list row with its last-known price snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEntry {
    pub card_name: String,
    pub expansion: String,
    pub collector_number: String,
    pub price_usd: String,
    pub price_usd_foil: String,
    pub price_eur: String,
    pub price_eur_foil: String,
    pub tix: String,
    /// DD/MM/YYYY
    pub last_updated: String,
    pub resource_uri: String,
}

impl WatchEntry {
    /// Build an entry from a resolved record, stamped with `date`.
    pub fn from_record(record: &PriceRecord, date: &str) -> WatchEntry {
        WatchEntry {
            card_name: record.name.clone(),
            expansion: record.set_code.clone(),
            collector_number: record.collector_number.clone(),
            price_usd: record.prices.usd.clone(),
            price_usd_foil: record.prices.usd_foil.clone(),
            price_eur: record.prices.eur.clone(),
            price_eur_foil: record.prices.eur_foil.clone(),
            tix: record.prices.tix.clone(),
            last_updated: date.to_string(),
            resource_uri: record.resource_uri.clone(),
        }
    }

    /// Parse one pipe-delimited line. Returns `None` when the field count is
    /// off; comment and blank lines are the caller's concern.
    pub fn parse_line(line: &str) -> Option<WatchEntry> {
        let fields: Vec<&str> = line.split('|').map(str::trim).collect();
        if fields.len() != 10 {
            return None;
        }

        Some(WatchEntry {
            card_name: fields[0].to_string(),
            expansion: fields[1].to_string(),
            collector_number: fields[2].to_string(),
            price_usd: fields[3].to_string(),
            price_usd_foil: fields[4].to_string(),
            price_eur: fields[5].to_string(),
            price_eur_foil: fields[6].to_string(),
            tix: fields[7].to_string(),
            last_updated: fields[8].to_string(),
            resource_uri: fields[9].to_string(),
        })
    }

    /// Uniqueness key: the first three fields rendered literally, separators
    /// included, through the collector number field.
    pub fn identity_prefix(&self) -> String {
        format!(
            "{} | {} | {} | ",
            self.card_name, self.expansion, self.collector_number
        )
    }

    /// Render the full persisted line.
    pub fn to_line(&self) -> String {
        format!(
            "{}{} | {} | {} | {} | {} | {} | {}",
            self.identity_prefix(),
            self.price_usd,
            self.price_usd_foil,
            self.price_eur,
            self.price_eur_foil,
            self.tix,
            self.last_updated,
            self.resource_uri
        )
    }

    /// Turn the entry back into a resolver input. The stored resource URI
    /// rides along so refreshes can take the fast path.
    pub fn to_reference(&self) -> CardReference {
        CardReference {
            name: self.card_name.clone(),
            set_code: self.expansion.clone(),
            collector_number: self.collector_number.clone(),
            resource_uri: if self.resource_uri.is_empty() {
                None
            } else {
                Some(self.resource_uri.clone())
            },
        }
    }
}

/// Result of an append: how many lines landed, and which candidates were
/// rejected as duplicates (reported to the operator, never fatal).
#[derive(Debug, Default)]
pub struct AppendOutcome {
    pub added: usize,
    pub duplicates: Vec<String>,
}

/// Line-oriented watch-list store on disk.
pub struct Watchlist {
    path: PathBuf,
}

impl Watchlist {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all entries, in file order. Comment and blank lines are skipped
    /// silently, malformed lines with a warning.
    pub fn load(&self) -> Result<Vec<WatchEntry>> {
        let file = File::open(&self.path)?;
        let reader = io::BufReader::new(file);
        let mut entries = Vec::new();

        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            match WatchEntry::parse_line(trimmed) {
                Some(entry) => entries.push(entry),
                None => log::warn!("Skipping malformed watch-list line: {}", trimmed),
            }
        }

        Ok(entries)
    }

    /// Append entries whose identity prefix is not already present.
    ///
    /// Existing prefixes are loaded once; the set is updated as candidates
    /// are accepted, so duplicates within the batch are rejected too. The
    /// stored file never contains two lines with the same prefix.
    pub fn append_unique(&self, entries: &[WatchEntry]) -> Result<AppendOutcome> {
        let mut seen = self.existing_prefixes()?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut outcome = AppendOutcome::default();
        for entry in entries {
            if seen.insert(entry.identity_prefix()) {
                writeln!(file, "{}", entry.to_line())?;
                outcome.added += 1;
            } else {
                outcome
                    .duplicates
                    .push(format!("{}({})", entry.card_name, entry.expansion));
            }
        }

        Ok(outcome)
    }

    /// Identity prefixes of everything already stored. A missing file is an
    /// empty store for append purposes.
    fn existing_prefixes(&self) -> Result<HashSet<String>> {
        if !self.path.exists() {
            return Ok(HashSet::new());
        }

        let entries = self.load()?;
        Ok(entries.iter().map(WatchEntry::identity_prefix).collect())
    }
}
