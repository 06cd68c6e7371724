//! SAMI caption tool
//!
//! Converts story text into SAMI caption documents and decodes SAMI
//! documents into JSON caption segments.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sami_captions::config_file::{generate_default_config, ConfigFile, LoggingSettings};
use sami_captions::timeline::process_story_with_document;
use sami_captions::{displayable, parse_sami, story_to_sami, CaptionConfig, Result};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
const APP_NAME: &str = "sami-captions";

/// Config file picked up from the working directory when `--config` is absent
const DEFAULT_CONFIG_PATH: &str = "captions.toml";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a story text file into a SAMI document
    Encode {
        /// Story text file, `-` for stdin
        input: String,
        /// Output file, stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decode a SAMI document into JSON caption segments
    Decode {
        /// SAMI document, `-` for stdin
        input: String,
        /// Drop clearing events and the open-ended last segment
        #[arg(long)]
        displayable: bool,
    },

    /// Story text straight to display items (encode, decode, filter)
    Process {
        /// Story text file, `-` for stdin
        input: String,
        /// Also write the intermediate SAMI document here
        #[arg(long)]
        smi: Option<PathBuf>,
    },

    /// Write a default configuration file
    InitConfig {
        /// Destination path
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config_file, load_error) = load_config_file(cli.config.as_deref())?;
    init_logging(&config_file.logging());
    if let Some(e) = load_error {
        tracing::warn!(
            "Failed to load config file {}: {}. Using defaults.",
            DEFAULT_CONFIG_PATH,
            e
        );
    }

    tracing::debug!("{} v{} starting", APP_NAME, VERSION);
    let config = config_file.into_caption_config();
    tracing::debug!("Configuration loaded: {:?}", config);

    match cli.command {
        Commands::Encode { input, output } => {
            let story = read_input(&input)?;
            let document = story_to_sami(&story, &config)?;
            write_output(output.as_deref(), &document)?;
        }
        Commands::Decode { input, displayable: only_displayable } => {
            let document = read_input(&input)?;
            let mut segments = parse_sami(&document)?;
            if only_displayable {
                segments = displayable(&segments);
            }
            print_json(&segments)?;
        }
        Commands::Process { input, smi } => {
            let story = read_input(&input)?;
            let (document, items) = process_story_with_document(&story, &config)?;
            if let Some(path) = smi {
                std::fs::write(&path, &document)?;
                tracing::info!("Wrote SAMI document to {}", path.display());
            }
            print_json(&items)?;
        }
        Commands::InitConfig { path } => {
            generate_default_config(&path)?;
            tracing::info!("Wrote default configuration to {}", path.display());
        }
    }

    Ok(())
}

/// Load the configuration file.
///
/// An explicit path must load. The implicit default path is optional, and a
/// broken one falls back to defaults; its error is returned for logging once
/// the subscriber is up.
fn load_config_file(
    explicit: Option<&Path>,
) -> Result<(ConfigFile, Option<sami_captions::CaptionError>)> {
    if let Some(path) = explicit {
        return Ok((ConfigFile::from_file(path)?, None));
    }

    if !Path::new(DEFAULT_CONFIG_PATH).exists() {
        return Ok((ConfigFile::default(), None));
    }
    match ConfigFile::from_file(DEFAULT_CONFIG_PATH) {
        Ok(cf) => Ok((cf, None)),
        Err(e) => Ok((ConfigFile::default(), Some(e))),
    }
}

/// Initialize logging with tracing, on stderr so stdout carries only output
fn init_logging(settings: &LoggingSettings) {
    let json = settings.format.as_deref() == Some("json");
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("sami_captions={}", settings.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(std::fs::read_to_string(input)?)
    }
}

fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)?;
            tracing::info!("Wrote SAMI document to {}", path.display());
        }
        None => std::io::stdout().write_all(content.as_bytes())?,
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}
