//! Editor localization string tables.
//!
//! A table maps dotted message keys (`common.ok`, `table.cell.menu`) to
//! template strings. Templates may embed placeholders, but the table never
//! substitutes them; see [`template`] for the caller-side helpers.

pub mod template;

pub use template::{Placeholder, TemplateArgs, placeholders, render};

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::{fs, path::Path};
use tracing::debug;

/// Localization loading error.
#[derive(Debug, thiserror::Error)]
pub enum LocalizationError {
    #[error("failed to read language file: {0}")]
    ReadFile(#[from] std::io::Error),
    #[error("missing CKEDITOR.lang assignment")]
    MissingHeader,
    #[error("invalid language table: {0}")]
    Json(#[from] serde_json::Error),
    #[error("language table root must be an object")]
    NotAnObject,
    #[error("unsupported value for key {key}: only strings are allowed")]
    UnsupportedValue { key: String },
}

const BUNDLE_PREFIX: &str = "CKEDITOR.lang[";

/// Message strings for a single language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalizationTable {
    language: String,
    entries: BTreeMap<String, String>,
}

impl LocalizationTable {
    /// Loads an editor language bundle from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LocalizationError> {
        let content = fs::read_to_string(path)?;
        Self::parse_editor_bundle(&content)
    }

    /// Parses `CKEDITOR.lang['<code>']={...};`.
    ///
    /// A byte-order mark and a leading licence comment are tolerated.
    pub fn parse_editor_bundle(source: &str) -> Result<Self, LocalizationError> {
        let source = source.trim_start_matches('\u{feff}');
        let start = source
            .find(BUNDLE_PREFIX)
            .ok_or(LocalizationError::MissingHeader)?;
        let rest = &source[start + BUNDLE_PREFIX.len()..];

        let close = rest.find(']').ok_or(LocalizationError::MissingHeader)?;
        let language = rest[..close].trim().trim_matches(['\'', '"']).to_string();

        let body = rest[close + 1..]
            .trim_start()
            .strip_prefix('=')
            .ok_or(LocalizationError::MissingHeader)?;
        let body = body.trim().trim_end_matches(';');

        Self::from_json(&language, body)
    }

    /// Builds a table from a JSON object, flattening nested objects.
    pub fn from_json(language: &str, json: &str) -> Result<Self, LocalizationError> {
        let value: Value = serde_json::from_str(json)?;
        let Value::Object(root) = value else {
            return Err(LocalizationError::NotAnObject);
        };

        let mut entries = BTreeMap::new();
        flatten("", &root, &mut entries)?;

        debug!(language = %language, entries = entries.len(), "localization table loaded");

        Ok(Self {
            language: language.to_string(),
            entries,
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Looks up the template for a message key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn flatten(
    prefix: &str,
    object: &Map<String, Value>,
    out: &mut BTreeMap<String, String>,
) -> Result<(), LocalizationError> {
    for (name, value) in object {
        let key = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", prefix, name)
        };

        match value {
            Value::String(text) => {
                out.insert(key, text.clone());
            }
            Value::Object(nested) => flatten(&key, nested, out)?,
            _ => return Err(LocalizationError::UnsupportedValue { key }),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
