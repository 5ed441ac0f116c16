//! Command-line interface definitions.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use crate::processor::{self, ConvertResult};
use crate::settings::ConvertSettings;

/// Make near-white icon backgrounds transparent.
///
/// With no arguments the legacy icon is converted in place.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Image to convert (default: the legacy icon path)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub input: Option<PathBuf>,

    /// PNG to write (default: overwrite INPUT)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// R, G and B must all be strictly above this for a pixel to become transparent
    #[arg(short, long)]
    pub threshold: Option<u8>,

    /// JSON settings file; command-line flags override its values
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Print the result as JSON instead of a message
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Merge defaults, the optional settings file and explicit flags, in that order.
    pub fn resolve_settings(&self) -> anyhow::Result<ConvertSettings> {
        let mut settings = match &self.config {
            Some(path) => ConvertSettings::from_json_file(path)?,
            None => ConvertSettings::default(),
        };

        if let Some(input) = &self.input {
            settings.input_path = input.clone();
            settings.output_path = input.clone();
        }
        if let Some(output) = &self.output {
            settings.output_path = output.clone();
        }
        if let Some(threshold) = self.threshold {
            settings.threshold = threshold;
        }

        Ok(settings)
    }
}

fn report(result: &ConvertResult, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        println!("Created transparent icon: {}", result.output_path.display());
    }
    Ok(())
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    crate::logger::init_logger();

    let settings = cli.resolve_settings()?;
    log::debug!("Resolved settings: {:?}", settings);

    let result = processor::convert_with(&settings)
        .with_context(|| format!("Failed to convert {}", settings.input_path.display()))?;

    report(&result, cli.json)
}
