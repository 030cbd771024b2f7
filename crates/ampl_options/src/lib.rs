//! ampl_options: front-end configuration.
//!
//! Parses `ampl.json`-style configuration files and provides the option
//! structures consumed by the scanner and the symbol table. Every field has a
//! default, so an empty object (or no file at all) yields the standard
//! language settings.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default tab stride used for column tracking.
pub const DEFAULT_TAB_WIDTH: u32 = 4;
/// Default maximum identifier length.
pub const DEFAULT_MAX_ID_LENGTH: usize = 32;
/// Default symbol table load factor.
pub const DEFAULT_LOAD_FACTOR: f32 = 0.75;
/// Smallest accepted load factor. Lower values make a scope's first
/// insertion allocate millions of buckets.
pub const MIN_LOAD_FACTOR: f32 = 0.1;

/// Errors raised while loading options.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} must be {expected}, got {value}")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Scanner options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScannerOptions {
    /// Number of columns a tab character advances.
    pub tab_width: u32,
    /// Longest identifier accepted without a diagnostic.
    pub max_id_length: usize,
}

impl Default for ScannerOptions {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
            max_id_length: DEFAULT_MAX_ID_LENGTH,
        }
    }
}

/// Symbol table options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SymbolOptions {
    /// Maximum load factor of each scope's hash table.
    pub load_factor: f32,
}

impl Default for SymbolOptions {
    fn default() -> Self {
        Self {
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }
}

/// The configuration file structure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AmplOptions {
    pub scanner: ScannerOptions,
    pub symbols: SymbolOptions,
}

impl AmplOptions {
    /// Parse options from a JSON string.
    pub fn from_json_str(content: &str) -> Result<Self, OptionsError> {
        let options: AmplOptions = serde_json::from_str(content)?;
        options.validate()?;
        Ok(options)
    }

    /// Parse options from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, OptionsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Check every option against its accepted range.
    pub fn validate(&self) -> Result<(), OptionsError> {
        let tab_width = self.scanner.tab_width;
        if !(1..=16).contains(&tab_width) {
            return Err(OptionsError::OutOfRange {
                field: "scanner.tabWidth",
                expected: "between 1 and 16",
                value: tab_width.to_string(),
            });
        }
        if self.scanner.max_id_length == 0 {
            return Err(OptionsError::OutOfRange {
                field: "scanner.maxIdLength",
                expected: "at least 1",
                value: "0".to_string(),
            });
        }
        let load_factor = self.symbols.load_factor;
        if !load_factor.is_finite() || load_factor < MIN_LOAD_FACTOR {
            return Err(OptionsError::OutOfRange {
                field: "symbols.loadFactor",
                expected: "a finite number of at least 0.1",
                value: load_factor.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let options = AmplOptions::from_json_str("{}").unwrap();
        assert_eq!(options, AmplOptions::default());
        assert_eq!(options.scanner.tab_width, 4);
        assert_eq!(options.scanner.max_id_length, 32);
        assert_eq!(options.symbols.load_factor, 0.75);
    }

    #[test]
    fn test_partial_override() {
        let options =
            AmplOptions::from_json_str(r#"{ "scanner": { "tabWidth": 8 } }"#).unwrap();
        assert_eq!(options.scanner.tab_width, 8);
        assert_eq!(options.scanner.max_id_length, DEFAULT_MAX_ID_LENGTH);
    }

    #[test]
    fn test_symbols_override() {
        let options =
            AmplOptions::from_json_str(r#"{ "symbols": { "loadFactor": 0.5 } }"#).unwrap();
        assert_eq!(options.symbols.load_factor, 0.5);
    }

    #[test]
    fn test_out_of_range_tab_width() {
        let err = AmplOptions::from_json_str(r#"{ "scanner": { "tabWidth": 0 } }"#).unwrap_err();
        assert!(matches!(err, OptionsError::OutOfRange { field: "scanner.tabWidth", .. }));
        assert_eq!(err.to_string(), "scanner.tabWidth must be between 1 and 16, got 0");
    }

    #[test]
    fn test_out_of_range_load_factor() {
        let err =
            AmplOptions::from_json_str(r#"{ "symbols": { "loadFactor": -1.0 } }"#).unwrap_err();
        assert!(matches!(err, OptionsError::OutOfRange { field: "symbols.loadFactor", .. }));
    }

    #[test]
    fn test_tiny_load_factor_rejected() {
        let err =
            AmplOptions::from_json_str(r#"{ "symbols": { "loadFactor": 1e-9 } }"#).unwrap_err();
        assert!(matches!(err, OptionsError::OutOfRange { field: "symbols.loadFactor", .. }));
        let options =
            AmplOptions::from_json_str(r#"{ "symbols": { "loadFactor": 0.1 } }"#).unwrap();
        assert_eq!(options.symbols.load_factor, MIN_LOAD_FACTOR);
    }

    #[test]
    fn test_malformed_json() {
        let err = AmplOptions::from_json_str("{ scanner: }").unwrap_err();
        assert!(matches!(err, OptionsError::Json(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = AmplOptions::from_file("/nonexistent/ampl.json").unwrap_err();
        assert!(matches!(err, OptionsError::Io(_)));
    }
}
