//! @acp:module "Substitution Engine"
//! @acp:summary "Whole-payload placeholder replacement"
//! @acp:domain core
//! @acp:layer service
//!
//! The payload is loaded into memory in one piece. Document payloads are
//! small, and splitting the text into buffers would need care because a
//! placeholder can straddle a buffer boundary.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::placeholder::{check_disjoint, Delimiters, Placeholder};
use crate::config::Config;
use crate::error::{DocfillError, Result};

/// Field name to replacement value; `None` selects the missing-value sentinel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubstitutionMap(BTreeMap<String, Option<String>>);

impl SubstitutionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a field to a value
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), Some(value.into()));
    }

    /// Map a field to "no value"
    pub fn insert_missing(&mut self, field: impl Into<String>) {
        self.0.insert(field.into(), None);
    }

    pub fn get(&self, field: &str) -> Option<Option<&str>> {
        self.0.get(field).map(|v| v.as_deref())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Parse a JSON object of field names to strings or null
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

/// What happened to one mapped field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOutcome {
    pub field: String,
    /// Occurrences of the placeholder that were replaced
    pub occurrences: usize,
    /// The sentinel was used instead of a value
    pub missing: bool,
}

/// Per-field results of one substitution pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionReport {
    pub fields: Vec<FieldOutcome>,
}

impl SubstitutionReport {
    /// Total number of placeholder occurrences replaced
    pub fn replaced(&self) -> usize {
        self.fields.iter().map(|f| f.occurrences).sum()
    }

    /// Mapped fields whose placeholder never appeared in the payload
    pub fn unmatched(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|f| f.occurrences == 0)
            .map(|f| f.field.as_str())
    }

    /// Fields that were replaced by the sentinel
    pub fn sentinel_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|f| f.missing && f.occurrences > 0)
            .map(|f| f.field.as_str())
    }
}

/// Replaces placeholders in payload text
#[derive(Debug, Clone)]
pub struct Substituter {
    delimiters: Delimiters,
    missing_value: String,
}

impl Substituter {
    pub fn new(delimiters: Delimiters, missing_value: impl Into<String>) -> Self {
        Self {
            delimiters,
            missing_value: missing_value.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.delimiters(), config.missing_value.clone())
    }

    /// Replace every occurrence of every mapped placeholder in `text`.
    ///
    /// Placeholders that are not in the map are left untouched. Fails before
    /// touching the text if one mapped placeholder contains another.
    ///
    /// That check only covers containment. When field names themselves contain
    /// delimiter text, two placeholders can still overlap partially in the
    /// payload (with `<`/`>` delimiters, `<a<b>` and `<b>c>` both match inside
    /// `<a<b>c>`), and the result then depends on replacement order. Keep
    /// delimiter text out of field names.
    pub fn apply(&self, text: &str, map: &SubstitutionMap) -> Result<(String, SubstitutionReport)> {
        let pairs: Vec<(Placeholder, Option<&str>)> = map
            .iter()
            .map(|(field, value)| (self.delimiters.placeholder(field), value))
            .collect();
        let placeholders: Vec<Placeholder> = pairs.iter().map(|(p, _)| p.clone()).collect();
        check_disjoint(&placeholders)?;

        let mut output = text.to_string();
        let mut report = SubstitutionReport::default();

        for (placeholder, value) in pairs {
            let occurrences = output.matches(placeholder.text.as_str()).count();
            if occurrences > 0 {
                let replacement = value.unwrap_or(&self.missing_value);
                tracing::debug!(
                    "Replacing {} ({} occurrences) with {:?}",
                    placeholder.text,
                    occurrences,
                    replacement
                );
                output = output.replace(placeholder.text.as_str(), replacement);
            }
            report.fields.push(FieldOutcome {
                field: placeholder.field,
                occurrences,
                missing: value.is_none(),
            });
        }

        Ok((output, report))
    }

    /// Substitute the payload file at `path` in place
    pub fn substitute_file(&self, path: &Path, map: &SubstitutionMap) -> Result<SubstitutionReport> {
        let bytes = fs::read(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => DocfillError::PayloadMissing {
                path: path.to_path_buf(),
            },
            _ => DocfillError::fs("read payload", path, e),
        })?;
        let text = String::from_utf8(bytes).map_err(|e| DocfillError::Encoding {
            path: path.to_path_buf(),
            source: e,
        })?;

        let (output, report) = self.apply(&text, map)?;

        tracing::info!("Writing {}", path.display());
        fs::write(path, output.as_bytes()).map_err(|e| DocfillError::fs("write payload", path, e))?;
        Ok(report)
    }
}
