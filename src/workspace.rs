//! @acp:module "Workspace"
//! @acp:summary "Per-invocation working directories: allocation and reclaim"
//! @acp:domain core
//! @acp:layer service
//!
//! Each generation gets its own directory under the output root, named by a
//! random v4 UUID so concurrent invocations never share files. Nothing here
//! deletes a workspace implicitly except [`WorkspaceGuard`], which callers opt
//! into.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{DocfillError, Result};

/// An allocated workspace directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Create a fresh, uniquely named directory under `output_root`
    pub fn allocate(output_root: &Path) -> Result<Self> {
        fs::create_dir_all(output_root)
            .map_err(|e| DocfillError::fs("create output root", output_root, e))?;

        let root = output_root.join(uuid::Uuid::new_v4().to_string());
        // create_dir (not create_dir_all) so an existing path is an error
        fs::create_dir(&root).map_err(|e| DocfillError::fs("create workspace", &root, e))?;

        tracing::debug!("Allocated workspace {}", root.display());
        Ok(Self { root })
    }

    /// Wrap an existing workspace directory, e.g. one named on the command line
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Workspace root directory
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Resolve a path relative to the workspace root
    pub fn join(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    /// Delete the workspace tree
    pub fn reclaim(self) -> Result<()> {
        reclaim(&self.root)
    }
}

/// Recursively delete `path`.
///
/// Children are removed before their parent directory. Entries that vanish
/// while the walk is in progress, or a root that is already gone, are not
/// errors, so the call can be repeated on a partially deleted tree.
pub fn reclaim(path: &Path) -> Result<()> {
    if fs::symlink_metadata(path).is_err() {
        tracing::debug!("Workspace {} already gone", path.display());
        return Ok(());
    }

    for entry in WalkDir::new(path).contents_first(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if is_not_found(e.io_error()) => continue,
            Err(e) => {
                let failed = e.path().unwrap_or(path).to_path_buf();
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::other("filesystem loop"));
                return Err(DocfillError::fs("walk", failed, source));
            }
        };

        let result = if entry.file_type().is_dir() {
            fs::remove_dir(entry.path())
        } else {
            fs::remove_file(entry.path())
        };

        match result {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!("Entry {} disappeared during reclaim", entry.path().display());
            }
            Err(e) => return Err(DocfillError::fs("delete", entry.path(), e)),
        }
    }

    tracing::debug!("Reclaimed workspace {}", path.display());
    Ok(())
}

fn is_not_found(err: Option<&io::Error>) -> bool {
    err.map(|e| e.kind() == io::ErrorKind::NotFound).unwrap_or(false)
}

/// Scoped workspace that is reclaimed when dropped unless [`keep`](Self::keep) is called
#[derive(Debug)]
pub struct WorkspaceGuard {
    workspace: Workspace,
    armed: bool,
}

impl WorkspaceGuard {
    pub fn new(workspace: Workspace) -> Self {
        Self {
            workspace,
            armed: true,
        }
    }

    pub fn path(&self) -> &Path {
        self.workspace.path()
    }

    pub fn join(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.workspace.join(relative)
    }

    /// Disarm the guard and hand the workspace to the caller
    pub fn keep(mut self) -> Workspace {
        self.armed = false;
        self.workspace.clone()
    }
}

impl Drop for WorkspaceGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(e) = reclaim(self.workspace.path()) {
            tracing::warn!(
                "Failed to reclaim workspace {}: {}",
                self.workspace.path().display(),
                e
            );
        }
    }
}
