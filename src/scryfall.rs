//! Scryfall API client for resolving card prices
//!
//! Uses blocking reqwest; the batch runs sequentially and rate-limits itself.

use crate::error::{Error, Result};
use crate::models::{CardReference, PriceRecord, Prices, NOT_AVAILABLE};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Production Scryfall endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.scryfall.com";

/// Searches matching more printings than this are rejected as ambiguous
pub const DEFAULT_RESULT_CAP: u64 = 100;

const USER_AGENT: &str = "price_tracker/1.0";

/// Scryfall card response
///
/// Every field is optional so the projection to [`PriceRecord`] is total.
#[derive(Debug, Deserialize)]
pub struct ScryfallCard {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub set: Option<String>,
    #[serde(default)]
    pub set_name: Option<String>,
    #[serde(default)]
    pub collector_number: Option<String>,
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub prices: ScryfallPrices,
}

#[derive(Debug, Deserialize, Default)]
pub struct ScryfallPrices {
    pub usd: Option<String>,
    pub usd_foil: Option<String>,
    pub eur: Option<String>,
    pub eur_foil: Option<String>,
    pub tix: Option<String>,
}

/// One page of `/cards/search` results
#[derive(Debug, Deserialize)]
struct SearchPage {
    total_cards: u64,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    next_page: Option<String>,
    data: Vec<ScryfallCard>,
}

impl ScryfallCard {
    /// Project the raw card object into a price record.
    ///
    /// Missing price fields become the `"N/A"` sentinel; missing metadata
    /// fields get placeholder text. Never fails.
    fn into_record(self) -> PriceRecord {
        let not_available = || NOT_AVAILABLE.to_string();
        PriceRecord {
            name: self.name.unwrap_or_else(|| "Unknown".to_string()),
            set_code: self.set.unwrap_or_else(|| "Unknown".to_string()),
            set_name: self.set_name.unwrap_or_else(|| "Unknown".to_string()),
            collector_number: self.collector_number.unwrap_or_else(not_available),
            rarity: self.rarity.unwrap_or_else(|| "Unknown".to_string()),
            resource_uri: self.uri.unwrap_or_else(|| "Unknown".to_string()),
            prices: Prices {
                usd: self.prices.usd.unwrap_or_else(not_available),
                usd_foil: self.prices.usd_foil.unwrap_or_else(not_available),
                eur: self.prices.eur.unwrap_or_else(not_available),
                eur_foil: self.prices.eur_foil.unwrap_or_else(not_available),
                tix: self.prices.tix.unwrap_or_else(not_available),
            },
        }
    }
}

/// Scryfall price resolver
///
/// The base URL and result cap are injected so the same client works against
/// a mock server and across deployments.
pub struct ScryfallClient {
    base_url: String,
    result_cap: u64,
    http: reqwest::blocking::Client,
}

impl ScryfallClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            result_cap: DEFAULT_RESULT_CAP,
            http: reqwest::blocking::Client::new(),
        }
    }

    pub fn with_result_cap(mut self, cap: u64) -> Self {
        self.result_cap = cap;
        self
    }

    /// Resolve a card reference to all matching price records.
    ///
    /// Prefers the direct-fetch fast path when a valid resource URI is
    /// already known; otherwise (or when the fast path yields nothing) runs
    /// a full paginated search. Transport failures resolve to an empty list
    /// so a batch can continue; an over-cap search fails with
    /// [`Error::AmbiguousQuery`] because a human must narrow the query.
    pub fn resolve(&self, reference: &CardReference) -> Result<Vec<PriceRecord>> {
        if let Some(uri) = reference.resource_uri.as_deref() {
            if Url::parse(uri).is_ok() {
                if let Some(record) = self.fetch_direct(uri) {
                    return Ok(vec![record]);
                }
            }
        }

        match self.search(reference) {
            Ok(records) => Ok(records),
            Err(err @ Error::AmbiguousQuery { .. }) => Err(err),
            Err(e) => {
                log::error!("Error retrieving card data: {}", e);
                Ok(Vec::new())
            }
        }
    }

    /// Fast path: fetch one card object straight from its resource URI.
    ///
    /// Any failure falls through to the search path, never a hard error.
    fn fetch_direct(&self, uri: &str) -> Option<PriceRecord> {
        log::debug!("Direct fetch: {}", uri);
        match self.get_json::<ScryfallCard>(uri) {
            Ok(card) => Some(card.into_record()),
            Err(e) => {
                log::debug!("Direct fetch failed ({}), falling back to search", e);
                None
            }
        }
    }

    /// Search path: exact-name query with optional set/number filters,
    /// restricted to paper printings, all unique prints.
    fn search(&self, reference: &CardReference) -> Result<Vec<PriceRecord>> {
        let query = build_query(reference);
        let url = format!(
            "{}/cards/search?q={}&unique=prints",
            self.base_url,
            urlencoding::encode(&query)
        );

        log::debug!("Searching Scryfall: {}", query);

        let mut page: SearchPage = self.get_json(&url)?;

        if page.total_cards > self.result_cap {
            return Err(Error::AmbiguousQuery {
                total: page.total_cards,
                cap: self.result_cap,
            });
        }

        let mut records: Vec<PriceRecord> =
            page.data.into_iter().map(ScryfallCard::into_record).collect();

        // Accumulate continuation pages in upstream order
        while page.has_more {
            let next = match page.next_page.take() {
                Some(next) => next,
                None => break,
            };
            page = self.get_json(&next)?;
            records.extend(page.data.into_iter().map(ScryfallCard::into_record));
        }

        Ok(records)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .http
            .get(url)
            .header("User-Agent", USER_AGENT)
            .send()?;

        if !response.status().is_success() {
            return Err(Error::HttpStatus(response.status()));
        }

        Ok(response.json::<T>()?)
    }
}

/// Build the search query string for a reference.
///
/// Quoted name for an exact match; empty set/number filters are omitted.
fn build_query(reference: &CardReference) -> String {
    let mut query = format!("\"{}\"", reference.name);
    if !reference.set_code.is_empty() {
        query.push_str(&format!(" set:{}", reference.set_code));
    }
    if !reference.collector_number.is_empty() {
        query.push_str(&format!(" cn:{}", reference.collector_number));
    }
    query.push_str(" game:paper");
    query
}

#[cfg(test)]
#[path = "scryfall_tests.rs"]
mod tests;
