//! Batch refresh: resolve every watch-list entry, rate-limited

use crate::models::PriceRecord;
use crate::scryfall::ScryfallClient;
use crate::watchlist::WatchEntry;
use std::thread;
use std::time::Duration;

/// Pause after each entry, for upstream rate-limit courtesy.
pub const DEFAULT_SLEEP_MS: u64 = 60;

/// Resolve each entry in order and flatten the results.
///
/// A zero `sleep_ms` falls back to the default. One entry failing to
/// resolve (no results, ambiguous query) contributes zero records and never
/// halts the batch; output order follows the watch-list and, within an
/// entry, the upstream search order.
pub fn refresh(client: &ScryfallClient, entries: &[WatchEntry], sleep_ms: u64) -> Vec<PriceRecord> {
    let sleep_ms = if sleep_ms == 0 { DEFAULT_SLEEP_MS } else { sleep_ms };
    let total = entries.len();
    let mut records = Vec::new();

    for (i, entry) in entries.iter().enumerate() {
        log::info!("Updating card: {} ({}/{})", entry.card_name, i + 1, total);

        match client.resolve(&entry.to_reference()) {
            Ok(found) if found.is_empty() => {
                log::warn!("No results for: {}", entry.card_name);
            }
            Ok(found) => {
                log::debug!("Resolved {} printing(s) for {}", found.len(), entry.card_name);
                records.extend(found);
            }
            Err(e) => {
                log::warn!("Skipping {}: {}", entry.card_name, e);
            }
        }

        thread::sleep(Duration::from_millis(sleep_ms));
    }

    log::info!("Refreshed {} price record(s) from {} entries", records.len(), total);
    records
}

#[cfg(test)]
#[path = "updater_tests.rs"]
mod tests;
