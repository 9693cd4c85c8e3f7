//! @acp:module "Archive"
//! @acp:summary "Zip archive extraction and reconstruction"
//! @acp:domain core
//! @acp:layer service
//!
//! Templates and generated documents are plain zip archives. Extraction
//! explodes one into a workspace; the builder packs a workspace back up.

pub mod builder;
pub mod extract;

use std::path::{Component, Path, PathBuf};

pub use builder::{build, plan_entries, EntryFilter};
pub use extract::{extract, read_text_entry};

/// One entry of an archive as seen on either side of the workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Entry name inside the archive, `/`-separated; directories end with `/`
    pub name: String,
    pub kind: EntryKind,
}

/// Directory marker or file whose bytes live at `path` in the workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File { path: PathBuf, size: u64 },
}

impl ArchiveEntry {
    pub fn is_dir(&self) -> bool {
        matches!(self.kind, EntryKind::Directory)
    }
}

/// Archive entry name for a path relative to the archive root
pub fn entry_name(relative: &Path, is_dir: bool) -> String {
    let mut name = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/");
    if is_dir && !name.ends_with('/') {
        name.push('/');
    }
    name
}
