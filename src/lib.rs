#![forbid(unsafe_code)]

//! @acp:module "Docfill Library"
//! @acp:summary "Populate zip-packaged XML document templates by placeholder substitution"
//! @acp:domain core
//! @acp:layer api
//! @acp:stability stable
//!
//! # Docfill
//!
//! Fills `.docx`-style templates: the archive is exploded into a private
//! workspace, placeholders in one text payload are replaced, and the tree is
//! packed back into an archive of the same format.
//!
//! ## Pipeline
//!
//! - **Workspace**: a uniquely named directory per invocation
//! - **Extract**: unpack the template archive into the workspace
//! - **Substitute**: replace `&lt;field/&gt` placeholders in `word/document.xml`
//! - **Build**: repack the workspace, skipping earlier outputs
//!
//! ## Example
//!
//! ```rust,no_run
//! use docfill::{Config, Generator, SubstitutionMap};
//!
//! fn main() -> docfill::Result<()> {
//!     let generator = Generator::new(Config::default())?;
//!
//!     let mut map = SubstitutionMap::new();
//!     map.insert("companyName", "SUBSTITUTIONS PLC");
//!     map.insert_missing("chargeNumber");
//!
//!     let doc = generator.try_generate("certificate.docx", &map)?;
//!     std::fs::copy(&doc.output, "certificate.docx").ok();
//!     doc.workspace.reclaim()?;
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod commands;
pub mod config;
pub mod error;
pub mod generate;
pub mod substitute;
pub mod workspace;

// Re-exports
pub use archive::{ArchiveEntry, EntryFilter, EntryKind};
pub use config::Config;
pub use error::{DocfillError, ErrorKind, Result};
pub use generate::{GeneratedDocument, Generator};
pub use substitute::{
    scan_placeholders, Delimiters, Placeholder, SubstitutionMap, SubstitutionReport, Substituter,
};
pub use workspace::{reclaim, Workspace, WorkspaceGuard};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
