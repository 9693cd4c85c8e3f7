//! @acp:module "Placeholders"
//! @acp:summary "Delimiter-wrapped field names and their preconditions"
//! @acp:domain core
//! @acp:layer model

use regex::Regex;

use crate::error::{DocfillError, Result};

/// Opening and closing delimiter pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiters {
    start: String,
    end: String,
}

impl Delimiters {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end(&self) -> &str {
        &self.end
    }

    /// Build the placeholder text for a field
    pub fn wrap(&self, field: &str) -> String {
        format!("{}{}{}", self.start, field, self.end)
    }

    /// Placeholder for a field, keeping the field name alongside the literal
    pub fn placeholder(&self, field: &str) -> Placeholder {
        Placeholder {
            field: field.to_string(),
            text: self.wrap(field),
        }
    }
}

/// A field name and the literal text that marks it in the payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub field: String,
    pub text: String,
}

/// Fail when one placeholder's text occurs inside another's.
///
/// Replacement runs pair by pair, so overlapping placeholders would make the
/// result depend on iteration order.
pub fn check_disjoint(placeholders: &[Placeholder]) -> Result<()> {
    for outer in placeholders {
        for inner in placeholders {
            if outer.text != inner.text && outer.text.contains(&inner.text) {
                return Err(DocfillError::OverlappingPlaceholders {
                    outer: outer.text.clone(),
                    inner: inner.text.clone(),
                });
            }
        }
    }
    Ok(())
}

/// List field names that appear between the delimiters in `text`.
///
/// Names are word characters, dots and dashes. Each name is reported once,
/// in order of first occurrence.
pub fn scan_placeholders(text: &str, delimiters: &Delimiters) -> Result<Vec<String>> {
    let pattern = format!(
        "{}([\\w.\\-]+){}",
        regex::escape(delimiters.start()),
        regex::escape(delimiters.end())
    );
    let re = Regex::new(&pattern)
        .map_err(|e| DocfillError::Config(format!("invalid placeholder pattern: {}", e)))?;

    let mut fields: Vec<String> = Vec::new();
    for caps in re.captures_iter(text) {
        let field = &caps[1];
        if !fields.iter().any(|f| f == field) {
            fields.push(field.to_string());
        }
    }
    Ok(fields)
}
