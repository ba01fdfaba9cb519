//! Test fixture loading and record builders

use impress_citekey::{BibEntry, EntryType};
use serde_json::Value;
use std::path::PathBuf;

/// Get the path to a fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures")
        .join(name)
}

/// Load a fixture file as a string
pub fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", name))
}

/// Load a JSON array of `{"type", "key", "fields"}` records
#[allow(dead_code)]
pub fn load_records(name: &str) -> Vec<BibEntry> {
    let records: Vec<Value> = serde_json::from_str(&load_fixture(name))
        .unwrap_or_else(|e| panic!("Invalid record fixture {}: {}", name, e));

    records
        .iter()
        .map(|record| {
            let mut entry =
                BibEntry::new(EntryType::from_str(record["type"].as_str().unwrap_or("misc")));
            entry.cite_key = record["key"].as_str().map(String::from);
            if let Some(fields) = record["fields"].as_object() {
                for (name, value) in fields {
                    entry.set_field(name.as_str(), value.as_str().unwrap_or_default());
                }
            }
            entry
        })
        .collect()
}

/// An article with the given fields
#[allow(dead_code)]
pub fn article(fields: &[(&str, &str)]) -> BibEntry {
    fields
        .iter()
        .fold(BibEntry::new(EntryType::Article), |entry, (name, value)| {
            entry.with_field(*name, *value)
        })
}

#[allow(dead_code)]
pub fn einstein() -> BibEntry {
    article(&[("author", "Albert Einstein"), ("year", "1905")])
}

#[allow(dead_code)]
pub const THREE_AUTHORS: &str = "Isaac Newton and James Maxwell and Albert Einstein";
