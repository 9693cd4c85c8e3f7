//! @acp:module "Generate Command"
//! @acp:summary "Populate a template from the command line"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Implements `docfill generate` command.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use console::style;

use crate::config::Config;
use crate::generate::Generator;
use crate::substitute::SubstitutionMap;

/// Options for the generate command
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Template name, relative to the template root
    pub template: String,
    /// JSON file of field values (null selects the sentinel)
    pub data: Option<PathBuf>,
    /// `field=value` assignments, applied after the data file
    pub set: Vec<String>,
    /// Fields to map to the missing-value sentinel
    pub missing: Vec<String>,
    /// Copy the generated archive here
    pub out: Option<PathBuf>,
    /// Reclaim the workspace after copying the output
    pub clean: bool,
}

/// Split a `field=value` assignment
pub fn parse_assignment(raw: &str) -> Result<(String, String)> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected field=value, got '{}'", raw))?;
    if field.is_empty() {
        return Err(anyhow!("Empty field name in '{}'", raw));
    }
    Ok((field.to_string(), value.to_string()))
}

/// Assemble the substitution map from a data file and CLI assignments
pub fn build_map(options: &GenerateOptions) -> Result<SubstitutionMap> {
    let mut map = match &options.data {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read data file {}", path.display()))?;
            SubstitutionMap::from_json(&content)
                .with_context(|| format!("Failed to parse data file {}", path.display()))?
        }
        None => SubstitutionMap::new(),
    };

    for raw in &options.set {
        let (field, value) = parse_assignment(raw)?;
        map.insert(field, value);
    }
    for field in &options.missing {
        map.insert_missing(field.clone());
    }

    Ok(map)
}

/// Execute the generate command
pub fn execute_generate(options: GenerateOptions, config: Config) -> Result<()> {
    if options.clean && options.out.is_none() {
        return Err(anyhow!("--clean needs --out, otherwise the document is deleted"));
    }

    let map = build_map(&options)?;
    let generator = Generator::new(config)?;

    println!(
        "{} Generating {} ({} fields)",
        style("→").cyan(),
        style(&options.template).bold(),
        map.len()
    );

    let doc = generator
        .try_generate(&options.template, &map)
        .with_context(|| format!("Failed to generate {}", options.template))?;

    println!(
        "{} Replaced {} placeholder occurrences",
        style("✓").green(),
        doc.report.replaced()
    );
    for field in doc.report.sentinel_fields() {
        println!(
            "  {} {} has no value, used '{}'",
            style("!").yellow(),
            field,
            generator.config().missing_value
        );
    }
    for field in doc.report.unmatched() {
        println!("  {} {} not found in template", style("·").dim(), field);
    }

    match &options.out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::copy(&doc.output, out)
                .with_context(|| format!("Failed to copy output to {}", out.display()))?;
            println!("{} Written to {}", style("✓").green(), out.display());

            if options.clean {
                doc.workspace.reclaim()?;
            } else {
                println!("  Workspace: {}", doc.workspace.path().display());
            }
        }
        None => {
            println!("{} Written to {}", style("✓").green(), doc.output.display());
        }
    }

    Ok(())
}
