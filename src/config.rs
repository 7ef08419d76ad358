use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::extract::DEFAULT_OUTPUT_HEIGHT;

pub const DEFAULT_DISPLAY_WIDTH: u32 = 1920;

/// Mark points on wide images and save a fixed-height strip around each one.
#[derive(Parser, Debug)]
#[command(name = "strip-label", version)]
pub struct Cli {
    /// Folder holding the images to annotate
    pub input_dir: PathBuf,

    /// Folder the strips are written to (created if missing)
    pub output_dir: PathBuf,

    /// JSON file with default settings; command line values take precedence
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Window width in pixels
    #[arg(long)]
    pub display_width: Option<u32>,

    /// Height of every saved strip in source pixels
    #[arg(long)]
    pub output_height: Option<u32>,

    /// File extension of the saved strips, selects the encoder
    #[arg(long)]
    pub extension: Option<String>,

    /// Seed for the image order, for reproducible sessions
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Settings that may come from the config file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub display_width: u32,
    pub output_height: u32,
    pub extension: String,
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            display_width: DEFAULT_DISPLAY_WIDTH,
            output_height: DEFAULT_OUTPUT_HEIGHT,
            extension: "png".to_string(),
            seed: None,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration(format!("cannot read config {}: {e}", path.display()))
        })?;
        serde_json::from_str(&data).map_err(|e| {
            Error::configuration(format!("invalid config {}: {e}", path.display()))
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.display_width == 0 {
            return Err(Error::configuration("display width must be at least 1"));
        }
        if self.output_height == 0 {
            return Err(Error::configuration("output height must be at least 1"));
        }
        match image::ImageFormat::from_extension(&self.extension) {
            Some(format) if format.writing_enabled() => Ok(()),
            _ => Err(Error::configuration(format!(
                "cannot encode images with extension {:?}",
                self.extension
            ))),
        }
    }
}

/// Everything a session needs, after merging defaults, file and command line.
#[derive(Clone, Debug)]
pub struct Config {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub settings: Settings,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let mut settings = match &cli.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        if let Some(width) = cli.display_width {
            settings.display_width = width;
        }
        if let Some(height) = cli.output_height {
            settings.output_height = height;
        }
        if let Some(ext) = cli.extension {
            settings.extension = ext;
        }
        if cli.seed.is_some() {
            settings.seed = cli.seed;
        }
        settings.extension = settings.extension.trim_start_matches('.').to_ascii_lowercase();
        settings.validate()?;

        Ok(Self {
            input_dir: cli.input_dir,
            output_dir: cli.output_dir,
            settings,
        })
    }

    /// Create the output folder if needed.
    pub fn prepare_output_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir).map_err(|e| {
            Error::configuration(format!(
                "cannot create output folder {}: {e}",
                self.output_dir.display()
            ))
        })
    }
}
