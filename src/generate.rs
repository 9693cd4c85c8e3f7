//! @acp:module "Generator"
//! @acp:summary "Extract, substitute and rebuild a template for one request"
//! @acp:domain core
//! @acp:layer api
//!
//! A successful run leaves the populated archive inside its workspace; the
//! caller relocates it and reclaims the workspace when done. A failed run
//! reclaims its partial workspace unless `keep_failed_workspaces` is set.

use std::path::{Path, PathBuf};

use crate::archive::{self, EntryFilter};
use crate::config::Config;
use crate::error::{DocfillError, Result};
use crate::substitute::{SubstitutionMap, SubstitutionReport, Substituter};
use crate::workspace::{Workspace, WorkspaceGuard};

/// Result of a successful generation
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    /// Workspace holding the exploded template and the output archive
    pub workspace: Workspace,
    /// Populated archive, named after the template
    pub output: PathBuf,
    pub report: SubstitutionReport,
}

/// Runs the template pipeline against one configuration
#[derive(Debug, Clone)]
pub struct Generator {
    config: Config,
}

impl Generator {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Generate a document, reporting only success or failure.
    ///
    /// The cause of a failure goes to the log.
    pub fn generate(&self, template: &str, map: &SubstitutionMap) -> bool {
        match self.try_generate(template, map) {
            Ok(doc) => {
                tracing::info!("Generated {}", doc.output.display());
                true
            }
            Err(e) => {
                tracing::error!("Generating {} failed ({}): {}", template, e.kind(), e);
                false
            }
        }
    }

    /// Generate a document, returning where it was written
    pub fn try_generate(&self, template: &str, map: &SubstitutionMap) -> Result<GeneratedDocument> {
        let template_path = self.config.template_path(template)?;
        let output_name = output_file_name(&template_path)?;
        let filter = EntryFilter::from_config(&self.config)?;
        let substituter = Substituter::from_config(&self.config);

        let workspace = Workspace::allocate(&self.config.output_root)?;
        let guard = WorkspaceGuard::new(workspace);

        let result = run_phases(
            &template_path,
            guard.path(),
            &self.config.payload_path,
            &output_name,
            &substituter,
            &filter,
            map,
        );

        match result {
            Ok((output, report)) => Ok(GeneratedDocument {
                workspace: guard.keep(),
                output,
                report,
            }),
            Err(e) => {
                if self.config.keep_failed_workspaces {
                    let kept = guard.keep();
                    tracing::warn!("Keeping failed workspace {}", kept.path().display());
                }
                Err(e)
            }
        }
    }
}

/// Each phase runs once, in order; the first error stops the rest
fn run_phases(
    template: &Path,
    workspace: &Path,
    payload: &Path,
    output_name: &str,
    substituter: &Substituter,
    filter: &EntryFilter,
    map: &SubstitutionMap,
) -> Result<(PathBuf, SubstitutionReport)> {
    archive::extract(template, workspace)?;

    let report = substituter.substitute_file(&workspace.join(payload), map)?;
    for field in report.unmatched() {
        tracing::debug!("Field {} does not occur in {}", field, template.display());
    }

    let output = workspace.join(output_name);
    archive::build(workspace, &output, filter)?;
    Ok((output, report))
}

fn output_file_name(template: &Path) -> Result<String> {
    template
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            DocfillError::Config(format!("template path {} has no file name", template.display()))
        })
}
