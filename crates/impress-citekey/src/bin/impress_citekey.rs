//! Command-line front end for trying out key patterns
//!
//! ```text
//! impress-citekey generate --input records.json --pattern "[auth:lower][shortyear]"
//! impress-citekey expand --pattern "[authIni2][year]" \
//!     --field author="Newton and Maxwell" --field year=1870
//! ```

use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use impress_citekey::{
    BibEntry, CiteKeyGenerator, DuplicateKeyTracker, EntryType, KeyGeneratorConfig,
    Pattern, Result,
};

/// Generate BibTeX cite keys from patterns
#[derive(Parser, Debug)]
#[command(name = "impress-citekey")]
#[command(about = "Generate BibTeX cite keys from patterns", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate keys for a JSON array of records
    Generate {
        /// Records as `[{"type": "article", "key": "...", "fields": {...}}]`
        #[arg(long, value_name = "FILE")]
        input: PathBuf,

        /// Key generator config (.toml or .json)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Override the default pattern
        #[arg(long)]
        pattern: Option<String>,

        /// Print the key changes as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the raw expansion of a pattern for one record
    Expand {
        #[arg(long)]
        pattern: String,

        /// Field as `name=value`; may be repeated
        #[arg(long = "field", value_name = "NAME=VALUE", value_parser = parse_field)]
        fields: Vec<(String, String)>,

        /// Entry type of the record
        #[arg(long = "type", default_value = "misc")]
        entry_type: String,
    },
}

#[derive(Debug, Deserialize)]
struct Record {
    #[serde(rename = "type", default)]
    entry_type: String,
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    fields: BTreeMap<String, String>,
}

impl From<Record> for BibEntry {
    fn from(record: Record) -> Self {
        let mut entry = BibEntry::new(EntryType::from_str(&record.entry_type));
        entry.cite_key = record.key;
        for (name, value) in record.fields {
            entry.set_field(name, value);
        }
        entry
    }
}

fn parse_field(arg: &str) -> std::result::Result<(String, String), String> {
    arg.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.to_string()))
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", arg))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Generate {
            input,
            config,
            pattern,
            json,
        } => generate(input, config, pattern, json),
        Command::Expand {
            pattern,
            fields,
            entry_type,
        } => {
            let mut entry = BibEntry::new(EntryType::from_str(&entry_type));
            for (name, value) in fields {
                entry.set_field(name, value);
            }
            println!("{}", Pattern::parse(&pattern).expand(&entry, None, ','));
            Ok(())
        }
    }
}

fn generate(
    input: PathBuf,
    config: Option<PathBuf>,
    pattern: Option<String>,
    json: bool,
) -> Result<()> {
    let mut config = match config {
        Some(path) => KeyGeneratorConfig::load(path)?,
        None => KeyGeneratorConfig::default(),
    };
    if let Some(pattern) = pattern {
        config.default_pattern = pattern;
    }
    let generator = CiteKeyGenerator::new(config)?;

    let text = std::fs::read_to_string(&input)?;
    let records: Vec<Record> = serde_json::from_str(&text)?;
    let mut entries: Vec<BibEntry> = records.into_iter().map(BibEntry::from).collect();

    let mut tracker = DuplicateKeyTracker::from_entries(&entries);
    let changes = generator.generate_all(&mut entries, &mut tracker, |done, total| {
        tracing::trace!("{}/{} keys generated", done, total);
    });

    if json {
        let out = serde_json::to_string_pretty(&changes)?;
        println!("{}", out);
    } else {
        for change in &changes {
            println!(
                "{} -> {}",
                change.old_key.as_deref().unwrap_or("(none)"),
                change.new_key
            );
        }
    }
    Ok(())
}
