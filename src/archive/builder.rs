//! @acp:module "Archive Builder"
//! @acp:summary "Repackage a workspace tree into a zip archive"
//! @acp:domain core
//! @acp:layer service
//!
//! The tree is walked with an explicit stack rather than recursion, since the
//! depth of a workspace is decided by whoever authored the template. Each
//! directory is emitted before its children. Siblings are visited in name
//! order so rebuilt archives are reproducible.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::{entry_name, ArchiveEntry, EntryKind};
use crate::config::Config;
use crate::error::{DocfillError, Result};

/// Decides which workspace files stay out of the rebuilt archive
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    patterns: Vec<glob::Pattern>,
}

impl EntryFilter {
    pub fn new(patterns: Vec<glob::Pattern>) -> Self {
        Self { patterns }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.exclusion_patterns()?))
    }

    /// True when a file with this name must be skipped
    pub fn excludes(&self, file_name: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(file_name))
    }
}

/// List the entries `build` would write for `source_dir`, in write order
pub fn plan_entries(source_dir: &Path, filter: &EntryFilter) -> Result<Vec<ArchiveEntry>> {
    let mut entries = Vec::new();
    let mut stack: Vec<PathBuf> = vec![source_dir.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let mut children = fs::read_dir(&dir)
            .map_err(|e| DocfillError::fs("list directory", &dir, e))?
            .collect::<std::io::Result<Vec<_>>>()
            .map_err(|e| DocfillError::fs("list directory", &dir, e))?;
        children.sort_by_key(|c| c.file_name());

        let mut subdirs = Vec::new();
        for child in children {
            let path = child.path();
            let file_type = child
                .file_type()
                .map_err(|e| DocfillError::fs("inspect", &path, e))?;
            let relative = path.strip_prefix(source_dir).unwrap_or(&path);

            if file_type.is_dir() {
                entries.push(ArchiveEntry {
                    name: entry_name(relative, true),
                    kind: EntryKind::Directory,
                });
                subdirs.push(path);
                continue;
            }

            let file_name = child.file_name();
            if filter.excludes(&file_name.to_string_lossy()) {
                tracing::debug!("Skipping excluded file {}", relative.display());
                continue;
            }

            let size = child
                .metadata()
                .map_err(|e| DocfillError::fs("inspect", &path, e))?
                .len();
            entries.push(ArchiveEntry {
                name: entry_name(relative, false),
                kind: EntryKind::File { path, size },
            });
        }

        // Reverse so the first sibling is popped first
        stack.extend(subdirs.into_iter().rev());
    }

    Ok(entries)
}

/// Pack `source_dir` into a new archive at `output`.
///
/// The entry list is taken before `output` is created, so an output placed
/// inside `source_dir` never ends up containing itself.
pub fn build(source_dir: &Path, output: &Path, filter: &EntryFilter) -> Result<Vec<ArchiveEntry>> {
    tracing::info!(
        "Building {} from {}",
        output.display(),
        source_dir.display()
    );

    let entries = plan_entries(source_dir, filter)?;

    let write_error = |source: ZipError| DocfillError::ArchiveWrite {
        path: output.to_path_buf(),
        source,
    };

    let file = File::create(output).map_err(|e| write_error(ZipError::Io(e)))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in &entries {
        match &entry.kind {
            EntryKind::Directory => {
                zip.add_directory(entry.name.as_str(), options)
                    .map_err(write_error)?;
            }
            EntryKind::File { path, size } => {
                let mut source = File::open(path).map_err(|e| DocfillError::fs("open", path, e))?;
                zip.start_file(
                    entry.name.as_str(),
                    options.large_file(*size > u32::MAX as u64),
                )
                .map_err(write_error)?;
                io::copy(&mut source, &mut zip).map_err(|e| write_error(ZipError::Io(e)))?;
            }
        }
        tracing::debug!("  added {}", entry.name);
    }

    zip.finish().map_err(write_error)?;
    Ok(entries)
}
