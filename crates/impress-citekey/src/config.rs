//! Configuration for key generation
//!
//! Loaded from TOML or JSON. Every field has a default, so a config file only
//! needs to name what it changes:
//!
//! ```toml
//! default_pattern = "[auth:lower][shortyear]"
//! key_suffix = "second_with_b"
//!
//! [type_patterns]
//! book = "[authors2][year]"
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{CiteKeyError, Result};
use crate::legalize::DEFAULT_UNWANTED_CHARACTERS;

/// Pattern used when neither the entry type nor the database names one
pub const DEFAULT_PATTERN: &str = "[auth][year]";

/// How duplicate keys are told apart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeySuffix {
    /// Every key gets a letter, even the first: `Smith2020a`
    Always,
    /// The first key stays bare, the second gets `a`
    #[default]
    SecondWithA,
    /// The first key stays bare, the second gets `b`
    SecondWithB,
}

impl KeySuffix {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "always" => Some(Self::Always),
            "second_with_a" => Some(Self::SecondWithA),
            "second_with_b" => Some(Self::SecondWithB),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::SecondWithA => "second_with_a",
            Self::SecondWithB => "second_with_b",
        }
    }
}

/// Key generator settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyGeneratorConfig {
    /// Global default pattern
    pub default_pattern: String,
    /// Characters removed from generated keys
    pub unwanted_characters: String,
    /// Regex applied once to every legalized key
    pub key_pattern_regex: Option<String>,
    /// Replacement for `key_pattern_regex`; `$1` refers to groups
    pub key_pattern_replacement: Option<String>,
    pub key_suffix: KeySuffix,
    /// Separator of the `keywords` field
    pub keyword_delimiter: char,
    /// Replace special characters with ASCII
    pub transliterate: bool,
    /// Patterns by lowercase entry type name
    pub type_patterns: HashMap<String, String>,
}

impl Default for KeyGeneratorConfig {
    fn default() -> Self {
        Self {
            default_pattern: DEFAULT_PATTERN.to_string(),
            unwanted_characters: DEFAULT_UNWANTED_CHARACTERS.to_string(),
            key_pattern_regex: None,
            key_pattern_replacement: None,
            key_suffix: KeySuffix::default(),
            keyword_delimiter: ',',
            transliterate: true,
            type_patterns: HashMap::new(),
        }
    }
}

impl KeyGeneratorConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.default_pattern = pattern.into();
        self
    }

    /// Set the pattern for one entry type, e.g. `"article"`
    pub fn with_type_pattern(mut self, entry_type: &str, pattern: impl Into<String>) -> Self {
        self.type_patterns
            .insert(entry_type.to_lowercase(), pattern.into());
        self
    }

    pub fn with_key_suffix(mut self, key_suffix: KeySuffix) -> Self {
        self.key_suffix = key_suffix;
        self
    }

    pub fn with_unwanted_characters(mut self, unwanted: impl Into<String>) -> Self {
        self.unwanted_characters = unwanted.into();
        self
    }

    pub fn with_key_pattern(
        mut self,
        regex: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        self.key_pattern_regex = Some(regex.into());
        self.key_pattern_replacement = Some(replacement.into());
        self
    }

    pub fn with_keyword_delimiter(mut self, delimiter: char) -> Self {
        self.keyword_delimiter = delimiter;
        self
    }

    pub fn with_transliterate(mut self, transliterate: bool) -> Self {
        self.transliterate = transliterate;
        self
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self> {
        Ok(serde_json::from_str(json_str)?)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Read and validate a `.toml` or `.json` config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);
        let config = match extension.as_deref() {
            Some("toml") => Self::from_toml(&text)?,
            Some("json") => Self::from_json(&text)?,
            _ => {
                return Err(CiteKeyError::InvalidConfig(format!(
                    "unsupported config file '{}': expected .toml or .json",
                    path.display()
                )))
            }
        };
        config.validate()?;
        tracing::debug!("Loaded key generator config from {}", path.display());
        Ok(config)
    }

    /// Compile the key pattern regex, if any
    pub fn compiled_key_pattern(&self) -> Result<Option<(Regex, String)>> {
        let Some(pattern) = self.key_pattern_regex.as_deref().filter(|p| !p.is_empty()) else {
            return Ok(None);
        };
        let regex = Regex::new(pattern).map_err(|e| CiteKeyError::InvalidRegex {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        let replacement = self.key_pattern_replacement.clone().unwrap_or_default();
        Ok(Some((regex, replacement)))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.default_pattern.trim().is_empty() {
            return Err(CiteKeyError::InvalidConfig(
                "default_pattern must not be blank".to_string(),
            ));
        }

        if self.keyword_delimiter.is_whitespace() {
            return Err(CiteKeyError::InvalidConfig(
                "keyword_delimiter must not be whitespace".to_string(),
            ));
        }

        self.compiled_key_pattern()?;
        Ok(())
    }
}
