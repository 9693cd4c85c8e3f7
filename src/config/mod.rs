//! @acp:module "Configuration"
//! @acp:summary "Pipeline configuration loading, defaults and validation"
//! @acp:domain core
//! @acp:layer config
//!
//! Every constant the pipeline depends on (template root, payload path,
//! delimiter pair, sentinel, exclusion patterns) lives in [`Config`] so tests
//! and callers can swap them for fixtures.
//!
//! The default delimiter pair is `&lt;` / `/&gt`. The closing delimiter is
//! missing its `;` and so encodes differently from the opening one. This is
//! most likely a defect in the legacy templates; the pair stays as-is until
//! the product owner confirms which form templates should use.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DocfillError, Result};
use crate::substitute::Delimiters;

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = ".docfill.config.json";

/// @acp:summary "Main docfill configuration structure"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory that template names are resolved against
    #[serde(default = "default_template_root")]
    pub template_root: PathBuf,

    /// Directory under which per-invocation workspaces are allocated
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,

    /// Relative path of the substitutable text entry inside the archive
    #[serde(default = "default_payload_path")]
    pub payload_path: PathBuf,

    /// Opening placeholder delimiter
    #[serde(default = "default_start_delimiter")]
    pub start_delimiter: String,

    /// Closing placeholder delimiter
    #[serde(default = "default_end_delimiter")]
    pub end_delimiter: String,

    /// Replacement text for fields mapped to null
    #[serde(default = "default_missing_value")]
    pub missing_value: String,

    /// File name patterns left out of the rebuilt archive (glob syntax)
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Leave the workspace on disk when a generation fails
    #[serde(default)]
    pub keep_failed_workspaces: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            template_root: default_template_root(),
            output_root: default_output_root(),
            payload_path: default_payload_path(),
            start_delimiter: default_start_delimiter(),
            end_delimiter: default_end_delimiter(),
            missing_value: default_missing_value(),
            exclude: default_exclude(),
            keep_failed_workspaces: false,
        }
    }
}

impl Config {
    /// @acp:summary "Load config from a JSON file"
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| DocfillError::fs("read config", path, e))?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// @acp:summary "Save config to a file"
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| DocfillError::fs("write config", path, e))?;
        Ok(())
    }

    /// Check the invariants the pipeline relies on
    pub fn validate(&self) -> Result<()> {
        if self.start_delimiter.is_empty() || self.end_delimiter.is_empty() {
            return Err(DocfillError::Config(
                "placeholder delimiters must not be empty".to_string(),
            ));
        }
        if !is_contained_relative(&self.payload_path) {
            return Err(DocfillError::Config(format!(
                "payload_path '{}' must be a relative path inside the archive",
                self.payload_path.display()
            )));
        }
        self.exclusion_patterns()?;
        Ok(())
    }

    /// Delimiter pair used to build placeholders
    pub fn delimiters(&self) -> Delimiters {
        Delimiters::new(&self.start_delimiter, &self.end_delimiter)
    }

    /// Placeholder text for a field name
    pub fn placeholder(&self, field: &str) -> String {
        self.delimiters().wrap(field)
    }

    /// Resolve a template name against the template root
    pub fn template_path(&self, name: &str) -> Result<PathBuf> {
        let relative = Path::new(name);
        if name.is_empty() || !is_contained_relative(relative) {
            return Err(DocfillError::Config(format!(
                "template name '{}' must be a relative path under {}",
                name,
                self.template_root.display()
            )));
        }
        Ok(self.template_root.join(relative))
    }

    /// Compile the exclusion globs
    pub fn exclusion_patterns(&self) -> Result<Vec<glob::Pattern>> {
        self.exclude
            .iter()
            .map(|p| {
                glob::Pattern::new(p).map_err(|e| {
                    DocfillError::Config(format!("invalid exclude pattern '{}': {}", p, e))
                })
            })
            .collect()
    }
}

/// True for relative paths naming at least one normal component and no `..`
fn is_contained_relative(path: &Path) -> bool {
    let mut has_name = false;
    for component in path.components() {
        match component {
            Component::Normal(_) => has_name = true,
            Component::CurDir => {}
            _ => return false,
        }
    }
    has_name
}

fn default_template_root() -> PathBuf {
    PathBuf::from("src/main/resources")
}

fn default_output_root() -> PathBuf {
    PathBuf::from("output")
}

fn default_payload_path() -> PathBuf {
    PathBuf::from("word/document.xml")
}

fn default_start_delimiter() -> String {
    "&lt;".to_string()
}

fn default_end_delimiter() -> String {
    "/&gt".to_string()
}

fn default_missing_value() -> String {
    "NEDOSTAJE".to_string()
}

fn default_exclude() -> Vec<String> {
    vec!["*.docx".to_string()]
}
