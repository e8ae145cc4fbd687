//! Core data types: card references and resolved price records

use crate::error::{Error, Result};

/// Sentinel for a price field the upstream service has no value for.
///
/// Price fields are always a decimal string or this sentinel, never absent,
/// so downstream formatting stays uniform.
pub const NOT_AVAILABLE: &str = "N/A";

/// A loosely-specified reference to one or more printings of a card.
///
/// Empty `set_code`/`collector_number` mean "unconstrained", not "literal
/// empty". `resource_uri` enables the direct-fetch fast path when known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardReference {
    pub name: String,
    pub set_code: String,
    pub collector_number: String,
    pub resource_uri: Option<String>,
}

impl CardReference {
    /// Parse a `Name(SET)#` formatted string into a card reference.
    ///
    /// No `(`: the whole string is the name. `(` without a following `)` is
    /// a format error. Otherwise everything before the first `(` is the
    /// name, everything between it and the first `)` after it is the set
    /// code, and the rest is the collector number. No trimming is applied;
    /// callers trim surrounding whitespace first.
    pub fn parse(raw: &str) -> Result<CardReference> {
        let (name, set_code, collector_number) = match raw.find('(') {
            None => (raw.to_string(), String::new(), String::new()),
            Some(open) => match raw[open + 1..].find(')') {
                None => {
                    return Err(Error::Format(format!(
                        "Unmatched '(' without a closing ')' in '{}'",
                        raw
                    )))
                }
                Some(offset) => {
                    let close = open + 1 + offset;
                    (
                        raw[..open].to_string(),
                        raw[open + 1..close].to_string(),
                        raw[close + 1..].to_string(),
                    )
                }
            },
        };

        Ok(CardReference {
            name,
            set_code,
            collector_number,
            resource_uri: None,
        })
    }
}

/// All five price points Scryfall reports for a printing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prices {
    pub usd: String,
    pub usd_foil: String,
    pub eur: String,
    pub eur_foil: String,
    pub tix: String,
}

/// One resolved printing with its current prices.
///
/// Created fresh on every resolution call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceRecord {
    pub name: String,
    pub set_code: String,
    pub set_name: String,
    pub collector_number: String,
    pub rarity: String,
    pub resource_uri: String,
    pub prices: Prices,
}

impl PriceRecord {
    /// Composite sheet label: `name(SET) number`.
    ///
    /// This is the stable matching key for sheet reconciliation.
    pub fn display_name(&self) -> String {
        format!("{}({}) {}", self.name, self.set_code, self.collector_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_name_only() {
        let reference = CardReference::parse("Lightning Bolt").unwrap();
        assert_eq!(reference.name, "Lightning Bolt");
        assert_eq!(reference.set_code, "");
        assert_eq!(reference.collector_number, "");
        assert!(reference.resource_uri.is_none());
    }

    #[test]
    fn parse_full_reference() {
        let reference = CardReference::parse("Lightning Bolt(LEA)161").unwrap();
        assert_eq!(reference.name, "Lightning Bolt");
        assert_eq!(reference.set_code, "LEA");
        assert_eq!(reference.collector_number, "161");
    }

    #[test]
    fn parse_empty_set_and_number() {
        let reference = CardReference::parse("Bolt()").unwrap();
        assert_eq!(reference.name, "Bolt");
        assert_eq!(reference.set_code, "");
        assert_eq!(reference.collector_number, "");
    }

    #[test]
    fn parse_unmatched_paren_fails() {
        let result = CardReference::parse("Lightning Bolt(LEA");
        assert!(matches!(result, Err(Error::Format(_))));
    }

    #[test]
    fn parse_uses_first_closing_paren_after_open() {
        // A stray ')' before the '(' belongs to the name
        let reference = CardReference::parse("We)ird(SET)7").unwrap();
        assert_eq!(reference.name, "We)ird");
        assert_eq!(reference.set_code, "SET");
        assert_eq!(reference.collector_number, "7");
    }

    #[test]
    fn parse_reconstructs_balanced_input() {
        for raw in ["Lightning Bolt(LEA)161", "a()b", "x(y)", "(s)9"] {
            let r = CardReference::parse(raw).unwrap();
            let rebuilt = format!("{}({}){}", r.name, r.set_code, r.collector_number);
            assert_eq!(rebuilt, raw);
        }
    }

    #[test]
    fn display_name_format() {
        let record = PriceRecord {
            name: "Bolt".to_string(),
            set_code: "LEA".to_string(),
            set_name: "Limited Edition Alpha".to_string(),
            collector_number: "1".to_string(),
            rarity: "common".to_string(),
            resource_uri: "https://api.example/card/1".to_string(),
            prices: Prices {
                usd: "3.00".to_string(),
                usd_foil: NOT_AVAILABLE.to_string(),
                eur: "2.50".to_string(),
                eur_foil: NOT_AVAILABLE.to_string(),
                tix: NOT_AVAILABLE.to_string(),
            },
        };
        assert_eq!(record.display_name(), "Bolt(LEA) 1");
    }
}
