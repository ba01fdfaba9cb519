//! Pattern-driven cite key generation
//!
//! This crate derives BibTeX cite keys from bibliographic records:
//! - A bracketed pattern language (`[auth][year]`, `[title:abbr:upper]`)
//! - Author name parsing and some forty author, title and page markers
//! - String macro resolution with cycle protection
//! - Duplicate tracking with letter suffixes (`Einstein1905a`)
//!
//! ```
//! use impress_citekey::{
//!     BibEntry, CiteKeyGenerator, DuplicateKeyTracker, EntryType, KeyGeneratorConfig,
//! };
//!
//! let generator = CiteKeyGenerator::new(KeyGeneratorConfig::default()).unwrap();
//! let mut tracker = DuplicateKeyTracker::new();
//! let mut entry = BibEntry::new(EntryType::Article)
//!     .with_field("author", "Albert Einstein")
//!     .with_field("year", "1905");
//!
//! let change = generator.generate_and_set(&mut entry, &mut tracker);
//! assert_eq!(change.new_key, "Einstein1905");
//! ```

pub mod author;
pub mod config;
pub mod database;
pub mod entry;
pub mod error;
pub mod fields;
pub mod generator;
pub mod latex;
pub mod legalize;
pub mod macros;
pub mod modifiers;
pub mod pattern;
pub mod patterns;
pub mod tracker;

pub use author::{Author, AuthorList, Contributor};
pub use config::{KeyGeneratorConfig, KeySuffix, DEFAULT_PATTERN};
pub use database::BibDatabase;
pub use entry::{BibEntry, EntryField, EntryType};
pub use error::{CiteKeyError, Result};
pub use fields::FieldValueResolver;
pub use generator::{letter_suffix, CiteKeyGenerator, KeyChange};
pub use legalize::{clean_key, DEFAULT_UNWANTED_CHARACTERS};
pub use macros::{MacroTable, StringMacro};
pub use modifiers::{Formatter, Modifier};
pub use pattern::{expand, Marker, Pattern, Token};
pub use patterns::KeyPatterns;
pub use tracker::{DuplicateKeyTracker, SharedKeyTracker};

// Setup UniFFI when the feature is enabled
#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();
