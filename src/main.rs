#![forbid(unsafe_code)]
//! Docfill Command Line Interface

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

use docfill::commands::{
    execute_clean, execute_generate, execute_init, execute_inspect, CleanOptions, GenerateOptions,
    InitOptions, InspectOptions,
};
use docfill::config::{Config, CONFIG_FILE};

#[derive(Parser)]
#[command(name = "docfill")]
#[command(about = "Populate .docx-style templates by placeholder substitution")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Directory templates are resolved against (overrides config)
    #[arg(long, global = true, env = "DOCFILL_TEMPLATE_ROOT")]
    template_root: Option<PathBuf>,

    /// Directory workspaces are created under (overrides config)
    #[arg(long, global = true, env = "DOCFILL_OUTPUT_ROOT")]
    output_root: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Generate a document from a template
    Generate {
        /// Template name, relative to the template root
        template: String,

        /// JSON file mapping field names to values (null = missing)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Set a field: --set companyName="ACME PLC" (repeatable)
        #[arg(short, long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,

        /// Mark a field as missing so it gets the sentinel (repeatable)
        #[arg(short, long = "missing", value_name = "FIELD")]
        missing: Vec<String>,

        /// Copy the generated document to this path
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Reclaim the workspace after copying (requires --out)
        #[arg(long)]
        clean: bool,
    },

    /// List the placeholders in a template
    Inspect {
        /// Template name, relative to the template root
        template: String,

        /// Print a JSON data skeleton instead
        #[arg(long)]
        json: bool,
    },

    /// Delete generation workspaces
    Clean {
        /// Workspace paths or ids
        workspaces: Vec<PathBuf>,

        /// Delete every workspace under the output root
        #[arg(long, conflicts_with = "workspaces")]
        all: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(
    path: &Path,
    template_root: Option<PathBuf>,
    output_root: Option<PathBuf>,
) -> anyhow::Result<Config> {
    let mut config = if path.exists() {
        Config::load(path)?
    } else {
        tracing::debug!("No {} found, using defaults", path.display());
        Config::default()
    };

    if let Some(root) = template_root {
        config.template_root = root;
    }
    if let Some(root) = output_root {
        config.output_root = root;
    }
    Ok(config)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        command,
        config: config_path,
        template_root,
        output_root,
        ..
    } = cli;

    match command {
        Commands::Init { force } => {
            let options = InitOptions { force, template_root, output_root };
            execute_init(options, config_path)?;
        }

        Commands::Generate { template, data, set, missing, out, clean } => {
            let config = load_config(&config_path, template_root, output_root)?;
            let options = GenerateOptions { template, data, set, missing, out, clean };
            execute_generate(options, config)?;
        }

        Commands::Inspect { template, json } => {
            let config = load_config(&config_path, template_root, output_root)?;
            let options = InspectOptions { template, json };
            execute_inspect(options, config)?;
        }

        Commands::Clean { workspaces, all } => {
            let config = load_config(&config_path, template_root, output_root)?;
            let options = CleanOptions { workspaces, all };
            execute_clean(options, config)?;
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {}", style("✗").red(), e);
        for cause in e.chain().skip(1) {
            eprintln!("  {}", style(cause).dim());
        }
        std::process::exit(1);
    }
}
