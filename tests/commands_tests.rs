//! Command handler tests
//!
//! Drives the `generate`, `inspect` and `clean` handlers the way the CLI does.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use docfill::commands::{
    execute_clean, execute_generate, list_workspaces, template_fields, CleanOptions,
    GenerateOptions,
};
use docfill::Config;

fn setup(payload: &str) -> (TempDir, Config) {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        template_root: dir.path().join("templates"),
        output_root: dir.path().join("output"),
        ..Default::default()
    };
    fs::create_dir_all(&config.template_root).unwrap();

    let file = File::create(config.template_root.join("certificate.docx")).unwrap();
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default();
    zip.add_directory("word/", options).unwrap();
    zip.start_file("word/document.xml", options).unwrap();
    zip.write_all(payload.as_bytes()).unwrap();
    zip.finish().unwrap();

    (dir, config)
}

fn payload_of(archive: &Path) -> String {
    let mut archive = ZipArchive::new(File::open(archive).unwrap()).unwrap();
    let mut text = String::new();
    archive
        .by_name("word/document.xml")
        .unwrap()
        .read_to_string(&mut text)
        .unwrap();
    text
}

// =============================================================================
// inspect
// =============================================================================

mod inspect_tests {
    use super::*;

    #[test]
    fn test_template_fields() {
        let (_dir, config) = setup(
            "&lt;companyNumber/&gt &lt;chargeNumber/&gt &lt;companyNumber/&gt &lt;issueDate/&gt",
        );
        assert_eq!(
            template_fields(&config, "certificate.docx").unwrap(),
            vec!["companyNumber", "chargeNumber", "issueDate"]
        );
    }

    #[test]
    fn test_template_fields_missing_template() {
        let (_dir, config) = setup("");
        assert!(template_fields(&config, "absent.docx").is_err());
    }
}

// =============================================================================
// generate + clean
// =============================================================================

mod generate_tests {
    use super::*;

    #[test]
    fn test_generate_copies_output_and_cleans() {
        let (dir, config) = setup("Issued to &lt;companyName/&gt on &lt;issueDate/&gt");
        let data = dir.path().join("data.json");
        fs::write(&data, r#"{ "companyName": "SUBSTITUTIONS PLC", "issueDate": null }"#).unwrap();
        let out = dir.path().join("dist/certificate.docx");

        execute_generate(
            GenerateOptions {
                template: "certificate.docx".to_string(),
                data: Some(data),
                out: Some(out.clone()),
                clean: true,
                ..Default::default()
            },
            config.clone(),
        )
        .unwrap();

        assert_eq!(payload_of(&out), "Issued to SUBSTITUTIONS PLC on NEDOSTAJE");
        assert!(list_workspaces(&config.output_root).unwrap().is_empty());
    }

    #[test]
    fn test_generate_then_clean_all() {
        let (_dir, config) = setup("&lt;companyName/&gt");

        for name in ["ONE", "TWO"] {
            execute_generate(
                GenerateOptions {
                    template: "certificate.docx".to_string(),
                    set: vec![format!("companyName={}", name)],
                    ..Default::default()
                },
                config.clone(),
            )
            .unwrap();
        }
        assert_eq!(list_workspaces(&config.output_root).unwrap().len(), 2);

        execute_clean(
            CleanOptions {
                all: true,
                ..Default::default()
            },
            config.clone(),
        )
        .unwrap();
        assert!(list_workspaces(&config.output_root).unwrap().is_empty());
    }

    #[test]
    fn test_generate_reports_failure() {
        let (_dir, config) = setup("&lt;companyName/&gt");
        let result = execute_generate(
            GenerateOptions {
                template: "absent.docx".to_string(),
                ..Default::default()
            },
            config,
        );
        assert!(result.is_err());
    }
}
