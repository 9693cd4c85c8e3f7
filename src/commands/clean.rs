//! @acp:module "Clean Command"
//! @acp:summary "Reclaim generation workspaces"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Only UUID-named directories directly under the output root are ever
//! deleted. Anything else named on the command line is refused.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use console::style;

use crate::config::Config;
use crate::workspace::reclaim;

/// Options for the clean command
#[derive(Debug, Clone, Default)]
pub struct CleanOptions {
    /// Workspace paths or bare workspace ids
    pub workspaces: Vec<PathBuf>,
    /// Reclaim every workspace under the output root
    pub all: bool,
}

/// Outcome of a clean run
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CleanSummary {
    pub reclaimed: Vec<PathBuf>,
    /// Named workspaces that were not on disk
    pub missing: Vec<PathBuf>,
}

fn is_workspace_name(name: &str) -> bool {
    uuid::Uuid::parse_str(name).is_ok()
}

/// Workspace directories under `output_root`, recognised by their UUID names
pub fn list_workspaces(output_root: &Path) -> Result<Vec<PathBuf>> {
    if !output_root.exists() {
        return Ok(Vec::new());
    }

    let mut found = Vec::new();
    for entry in fs::read_dir(output_root)
        .with_context(|| format!("Failed to list {}", output_root.display()))?
    {
        let entry = entry?;
        let is_workspace =
            entry.file_type()?.is_dir() && is_workspace_name(&entry.file_name().to_string_lossy());
        if is_workspace {
            found.push(entry.path());
        }
    }
    found.sort();
    Ok(found)
}

fn same_directory(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Map a bare id or a workspace path to its directory under the output root
fn resolve(config: &Config, workspace: &Path) -> Result<PathBuf> {
    let name = workspace
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if !is_workspace_name(&name) {
        bail!(
            "{} is not a workspace: workspace names are UUIDs",
            workspace.display()
        );
    }

    let parent = workspace.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(parent) = parent {
        if !same_directory(parent, &config.output_root) {
            bail!(
                "{} is not under the output root {}",
                workspace.display(),
                config.output_root.display()
            );
        }
    }

    Ok(config.output_root.join(name))
}

/// Reclaim the selected workspaces without printing anything.
///
/// Every explicit target is resolved before anything is deleted, so one bad
/// name aborts the whole run.
pub fn clean_workspaces(options: &CleanOptions, config: &Config) -> Result<CleanSummary> {
    let targets: Vec<PathBuf> = if options.all {
        list_workspaces(&config.output_root)?
    } else {
        options
            .workspaces
            .iter()
            .map(|w| resolve(config, w))
            .collect::<Result<_>>()?
    };

    let mut summary = CleanSummary::default();
    for target in targets {
        match fs::symlink_metadata(&target) {
            Err(_) => {
                summary.missing.push(target);
                continue;
            }
            Ok(meta) if !meta.is_dir() => {
                bail!("{} is not a workspace directory", target.display());
            }
            Ok(_) => {}
        }
        reclaim(&target).with_context(|| format!("Failed to reclaim {}", target.display()))?;
        summary.reclaimed.push(target);
    }
    Ok(summary)
}

/// Execute the clean command
pub fn execute_clean(options: CleanOptions, config: Config) -> Result<()> {
    let summary = clean_workspaces(&options, &config)?;

    for target in &summary.missing {
        println!("{} No workspace at {}", style("!").yellow(), target.display());
    }
    for target in &summary.reclaimed {
        println!("{} Reclaimed {}", style("✓").green(), target.display());
    }
    if summary.reclaimed.is_empty() && summary.missing.is_empty() {
        println!("{} Nothing to clean", style("✓").green());
    }

    Ok(())
}
