//! @acp:module "Init Command"
//! @acp:summary "Write a default docfill configuration"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Implements `docfill init` command for project initialization.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use console::style;

use crate::config::{Config, CONFIG_FILE};

/// Options for the init command
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Force overwrite existing config
    pub force: bool,
    /// Template root to record instead of the default
    pub template_root: Option<PathBuf>,
    /// Output root to record instead of the default
    pub output_root: Option<PathBuf>,
}

/// Execute the init command
pub fn execute_init(options: InitOptions, config_path: PathBuf) -> Result<()> {
    if config_path.exists() && !options.force {
        return Err(anyhow!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        ));
    }

    let mut config = Config::default();
    if let Some(root) = options.template_root {
        config.template_root = root;
    }
    if let Some(root) = options.output_root {
        config.output_root = root;
    }

    if !config.template_root.exists() {
        std::fs::create_dir_all(&config.template_root)?;
        println!(
            "{} Created {}/",
            style("✓").green(),
            config.template_root.display()
        );
    }

    config.save(&config_path)?;
    println!("{} Created {}", style("✓").green(), config_path.display());

    println!("\n{}", style("Next steps:").bold());
    println!(
        "  1. Put templates in {}",
        style(config.template_root.display()).cyan()
    );
    println!(
        "  2. Run {} to see their fields",
        style("docfill inspect <template>").cyan()
    );
    if config_path != PathBuf::from(CONFIG_FILE) {
        println!(
            "  3. Pass {} to later commands",
            style(format!("--config {}", config_path.display())).cyan()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_config_and_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE);
        let options = InitOptions {
            template_root: Some(dir.path().join("templates")),
            output_root: Some(dir.path().join("output")),
            ..Default::default()
        };

        execute_init(options.clone(), config_path.clone()).unwrap();
        let written = Config::load(&config_path).unwrap();
        assert_eq!(written.template_root, dir.path().join("templates"));
        assert!(dir.path().join("templates").is_dir());

        assert!(execute_init(options.clone(), config_path.clone()).is_err());
        execute_init(
            InitOptions {
                force: true,
                ..options
            },
            config_path,
        )
        .unwrap();
    }
}
