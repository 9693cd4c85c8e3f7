//! @acp:module "Substitution"
//! @acp:summary "Placeholder syntax and the text substitution engine"
//! @acp:domain core
//! @acp:layer service
//!
//! Placeholders are matched as exact literal substrings of the payload. There
//! is no tokenizing, nesting or escaping, and values are inserted verbatim.

pub mod engine;
pub mod placeholder;

pub use engine::{FieldOutcome, SubstitutionMap, SubstitutionReport, Substituter};
pub use placeholder::{check_disjoint, scan_placeholders, Delimiters, Placeholder};
