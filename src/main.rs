use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};

use whatsflowing::config::{StageSettings, ATTRIBUTES_TO_LOG, LOG_FILE_DIRECTORY};
use whatsflowing::logging::{init_logging, TracingLogSink};
use whatsflowing::runner::StageRunner;
use whatsflowing::stage::{Stage, WhatsFlowing, REL_SUCCESS};

#[derive(Parser)]
#[command(
    name = "whatsflowing",
    version,
    about = "See what is flowing: journal selected record attributes to a daily log",
    long_about = "WhatsFlowing pushes files through the WhatsFlowing stage as records. \
                  For each record it appends one line with the attributes matching a \
                  regular expression to <dir>/WhatsFlowing_<YYYY_MM_DD>.log."
)]
struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send files through the stage, one record per file
    Run {
        #[command(flatten)]
        properties: PropertyArgs,

        /// Extra attribute for every record (key=value, repeatable)
        #[arg(long = "attr", value_parser = parse_attribute)]
        extra_attributes: Vec<(String, String)>,

        /// Files to enqueue
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Check the stage configuration
    Validate {
        #[command(flatten)]
        properties: PropertyArgs,
    },

    /// Show the stage's relationships and properties
    Describe {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct PropertyArgs {
    /// Settings file (JSON) holding property values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Journal directory; may reference attributes as ${name}
    #[arg(short = 'd', long, env = "WHATSFLOWING_LOG_DIR")]
    log_dir: Option<String>,

    /// Regular expression selecting the attributes to journal
    #[arg(short, long)]
    attributes: Option<String>,
}

impl PropertyArgs {
    /// Settings file values, overridden by command-line flags
    fn into_properties(self) -> Result<BTreeMap<String, String>> {
        let mut properties = match &self.config {
            Some(path) => StageSettings::load(path)?.into_properties(),
            None => BTreeMap::new(),
        };

        if let Some(dir) = self.log_dir {
            properties.insert(LOG_FILE_DIRECTORY.name.to_string(), dir);
        }
        if let Some(pattern) = self.attributes {
            properties.insert(ATTRIBUTES_TO_LOG.name.to_string(), pattern);
        }

        Ok(properties)
    }
}

fn parse_attribute(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{}'", s)),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    match cli.command {
        Commands::Run {
            properties,
            extra_attributes,
            files,
        } => {
            let properties = properties.into_properties()?;
            let extra: HashMap<String, String> = extra_attributes.into_iter().collect();
            run(properties, extra, &files)?;
        }
        Commands::Validate { properties } => {
            let properties = properties.into_properties()?;
            validate(properties)?;
        }
        Commands::Describe { json } => describe(json)?,
    }

    Ok(())
}

fn run(
    properties: BTreeMap<String, String>,
    extra: HashMap<String, String>,
    files: &[PathBuf],
) -> Result<()> {
    let stage = WhatsFlowing::new();
    let sink = Arc::new(TracingLogSink::new(stage.descriptor().name));
    let mut runner = StageRunner::new(stage).with_log_sink(sink);
    runner.set_properties(properties);

    for file in files {
        runner.enqueue_file(file, extra.clone())?;
    }
    runner.run(files.len())?;

    let routed = runner.transferred(&REL_SUCCESS).len();
    println!("Transferred {} record(s) to {}", routed, REL_SUCCESS.name);

    let warnings = runner.logger().warn_messages();
    if !warnings.is_empty() {
        println!("{} journal write(s) failed:", warnings.len());
        for warning in warnings {
            println!("  {}", warning);
        }
    }

    Ok(())
}

fn validate(properties: BTreeMap<String, String>) -> Result<()> {
    let mut runner = StageRunner::new(WhatsFlowing::new());
    runner.set_properties(properties);

    let problems = runner.validate();
    if problems.is_empty() {
        println!("Configuration is valid");
        return Ok(());
    }

    for problem in &problems {
        println!("{}", problem);
    }
    bail!("{} validation problem(s) found", problems.len());
}

fn describe(json: bool) -> Result<()> {
    let stage = WhatsFlowing::new();
    let descriptor = stage.descriptor();

    if json {
        println!("{}", serde_json::to_string_pretty(descriptor)?);
        return Ok(());
    }

    println!("{}", descriptor.name);
    println!("{}", "=".repeat(descriptor.name.len()));
    println!("{}", descriptor.description);
    println!("Tags: {}", descriptor.tags.join(", "));
    println!();
    println!("Relationships:");
    for relationship in &descriptor.relationships {
        println!("  {:<10} {}", relationship.name, relationship.description);
    }
    println!();
    println!("Properties:");
    for property in &descriptor.properties {
        let default = property.default_value.unwrap_or("-");
        println!(
            "  {} (required: {}, default: {}, expressions: {})",
            property.name, property.required, default, property.expression_language_supported
        );
        println!("      {}", property.description);
    }

    Ok(())
}
