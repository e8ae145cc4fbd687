use price_tracker::{WatchEntry, Watchlist};
use std::collections::HashSet;
use std::io::Write;
use tempfile::{tempdir, NamedTempFile};

// Test fixtures - sample data for testing

fn entry(name: &str, set: &str, cn: &str, usd: &str) -> WatchEntry {
    WatchEntry {
        card_name: name.to_string(),
        expansion: set.to_string(),
        collector_number: cn.to_string(),
        price_usd: usd.to_string(),
        price_usd_foil: "10.00".to_string(),
        price_eur: "1.80".to_string(),
        price_eur_foil: "9.00".to_string(),
        tix: "0.10".to_string(),
        last_updated: "01/01/2024".to_string(),
        resource_uri: "https://api.example/card/1".to_string(),
    }
}

fn create_sample_list_content() -> String {
    r#"# tracked cards
Lightning Bolt | LEA | 1 | 2.00 | 10.00 | 1.80 | 9.00 | 0.10 | 01/01/2024 | https://api.example/card/1

Black Lotus | LEA | 232 | 15000.00 | N/A | 14000.00 | N/A | N/A | 01/01/2024 | https://api.example/card/2
not | a | valid | line"#
        .to_string()
}

/// Every identity prefix in the stored file, for invariant checks.
fn stored_prefixes(path: &std::path::Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.trim().starts_with('#'))
        .filter_map(WatchEntry::parse_line)
        .map(|e| e.identity_prefix())
        .collect()
}

// Tests for load

#[test]
fn load_skips_comments_blanks_and_malformed_lines() {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{}", create_sample_list_content()).unwrap();

    let entries = Watchlist::new(temp_file.path()).load().unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].card_name, "Lightning Bolt");
    assert_eq!(entries[1].card_name, "Black Lotus");
}

#[test]
fn load_missing_file_fails() {
    let dir = tempdir().unwrap();
    let result = Watchlist::new(dir.path().join("nope.txt")).load();
    assert!(result.is_err());
}

#[test]
fn load_preserves_file_order() {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{}", create_sample_list_content()).unwrap();

    let entries = Watchlist::new(temp_file.path()).load().unwrap();
    let names: Vec<&str> = entries.iter().map(|e| e.card_name.as_str()).collect();
    assert_eq!(names, vec!["Lightning Bolt", "Black Lotus"]);
}

// Tests for append_unique

#[test]
fn append_creates_missing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cards_list.txt");
    let watchlist = Watchlist::new(&path);

    let outcome = watchlist
        .append_unique(&[entry("Lightning Bolt", "LEA", "1", "2.00")])
        .unwrap();

    assert_eq!(outcome.added, 1);
    assert!(outcome.duplicates.is_empty());
    assert_eq!(watchlist.load().unwrap().len(), 1);
}

#[test]
fn append_rejects_duplicates_against_existing_content() {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{}", create_sample_list_content()).unwrap();
    let watchlist = Watchlist::new(temp_file.path());

    // Same identity, different price fields: still the same logical item
    let outcome = watchlist
        .append_unique(&[entry("Lightning Bolt", "LEA", "1", "99.99")])
        .unwrap();

    assert_eq!(outcome.added, 0);
    assert_eq!(outcome.duplicates, vec!["Lightning Bolt(LEA)".to_string()]);
    assert_eq!(watchlist.load().unwrap().len(), 2);
}

#[test]
fn append_rejects_duplicates_within_one_batch() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cards_list.txt");
    let watchlist = Watchlist::new(&path);

    let outcome = watchlist
        .append_unique(&[
            entry("Lightning Bolt", "LEA", "1", "2.00"),
            entry("Lightning Bolt", "LEA", "1", "3.00"),
            entry("Lightning Bolt", "2ED", "162", "1.00"),
        ])
        .unwrap();

    assert_eq!(outcome.added, 2);
    assert_eq!(outcome.duplicates.len(), 1);
}

#[test]
fn store_never_holds_two_lines_with_same_prefix() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cards_list.txt");
    let watchlist = Watchlist::new(&path);

    // Two batches with overlap between and within them
    watchlist
        .append_unique(&[
            entry("Lightning Bolt", "LEA", "1", "2.00"),
            entry("Lightning Bolt", "LEA", "1", "2.50"),
            entry("Shivan Dragon", "LEA", "174", "800.00"),
        ])
        .unwrap();
    watchlist
        .append_unique(&[
            entry("Lightning Bolt", "LEA", "1", "3.00"),
            entry("Shivan Dragon", "LEA", "174", "810.00"),
            entry("Black Lotus", "LEA", "232", "15000.00"),
        ])
        .unwrap();

    let prefixes = stored_prefixes(&path);
    let unique: HashSet<&String> = prefixes.iter().collect();
    assert_eq!(prefixes.len(), 3);
    assert_eq!(unique.len(), prefixes.len());
}

#[test]
fn distinct_printings_are_distinct_items() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cards_list.txt");
    let watchlist = Watchlist::new(&path);

    let outcome = watchlist
        .append_unique(&[
            entry("Lightning Bolt", "LEA", "161", "2.00"),
            entry("Lightning Bolt", "2ED", "162", "1.00"),
            entry("Lightning Bolt", "LEA", "162", "2.00"),
        ])
        .unwrap();

    assert_eq!(outcome.added, 3);
    assert!(outcome.duplicates.is_empty());
}

#[test]
fn appended_lines_round_trip_through_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cards_list.txt");
    let watchlist = Watchlist::new(&path);

    let original = entry("Lightning Bolt", "LEA", "1", "2.00");
    watchlist.append_unique(&[original.clone()]).unwrap();

    let loaded = watchlist.load().unwrap();
    assert_eq!(loaded, vec![original]);
}
