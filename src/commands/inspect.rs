//! @acp:module "Inspect Command"
//! @acp:summary "List the placeholders a template expects"
//! @acp:domain cli
//! @acp:layer handler

use anyhow::{Context, Result};
use console::style;

use crate::archive::read_text_entry;
use crate::config::Config;
use crate::substitute::scan_placeholders;

/// Options for the inspect command
#[derive(Debug, Clone)]
pub struct InspectOptions {
    /// Template name, relative to the template root
    pub template: String,
    /// Print the field names as a JSON data skeleton
    pub json: bool,
}

/// Field names found in a template's payload, in first-occurrence order
pub fn template_fields(config: &Config, template: &str) -> Result<Vec<String>> {
    let path = config.template_path(template)?;
    let payload = read_text_entry(&path, &config.payload_path)
        .with_context(|| format!("Failed to read payload of {}", path.display()))?;
    Ok(scan_placeholders(&payload, &config.delimiters())?)
}

/// JSON object with every field mapped to null, keys in the order given
pub fn data_skeleton(fields: &[String]) -> serde_json::Value {
    let skeleton: serde_json::Map<String, serde_json::Value> = fields
        .iter()
        .map(|f| (f.clone(), serde_json::Value::Null))
        .collect();
    serde_json::Value::Object(skeleton)
}

/// Execute the inspect command
pub fn execute_inspect(options: InspectOptions, config: Config) -> Result<()> {
    let fields = template_fields(&config, &options.template)?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&data_skeleton(&fields))?);
        return Ok(());
    }

    if fields.is_empty() {
        println!(
            "{} No placeholders found in {}",
            style("!").yellow(),
            options.template
        );
        return Ok(());
    }

    println!(
        "{} {} placeholders in {}",
        style("→").cyan(),
        fields.len(),
        style(&options.template).bold()
    );
    for field in &fields {
        println!("  {}", config.placeholder(field));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skeleton_keeps_scan_order() {
        let fields: Vec<String> = ["issueDate", "companyName", "chargeNumber"]
            .iter()
            .map(|f| f.to_string())
            .collect();

        let skeleton = data_skeleton(&fields);
        let keys: Vec<&str> = skeleton
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["issueDate", "companyName", "chargeNumber"]);
        assert_eq!(
            serde_json::to_string(&skeleton).unwrap(),
            r#"{"issueDate":null,"companyName":null,"chargeNumber":null}"#
        );
    }

    #[test]
    fn test_skeleton_parses_as_substitution_map() {
        let fields = vec!["companyName".to_string()];
        let json = serde_json::to_string(&data_skeleton(&fields)).unwrap();
        let map = crate::substitute::SubstitutionMap::from_json(&json).unwrap();
        assert_eq!(map.get("companyName"), Some(None));
    }
}
