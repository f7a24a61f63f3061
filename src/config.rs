use std::path::PathBuf;

use clap::{Parser, Subcommand};
use image::ImageFormat;

use crate::dataset::Dataset;
use crate::errors::Result;

pub const DEFAULT_DATA_ROOT: &str = "../medsam_data";

#[derive(Parser, Clone, Debug)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Directory holding one subdirectory per dataset.
    #[arg(long, global = true, env = "MEDSAM_DATA_ROOT", default_value = DEFAULT_DATA_ROOT)]
    pub data_root: PathBuf,

    /// Dataset name, or `all`.
    #[arg(short, long, global = true, default_value = "all")]
    pub dataset: String,

    #[arg(short, long, global = true)]
    pub max_samples: Option<usize>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Print the first two samples of each dataset.
    Smoke,
    /// Count every dataset and report its first image shape.
    Describe,
    /// Write images, binary masks and overlays for an external model runner.
    Export {
        #[arg(short, long)]
        output_dir: PathBuf,

        #[arg(short, long, default_value = "png", value_parser = check_format)]
        format: String,

        #[arg(long)]
        overlay: bool,
    },
}

impl Config {
    pub fn new() -> Self {
        Self::parse()
    }

    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Smoke)
    }

    /// Datasets selected by `--dataset`.
    pub fn datasets(&self) -> Result<Vec<Dataset>> {
        if self.dataset.eq_ignore_ascii_case("all") {
            Ok(Dataset::ALL.to_vec())
        } else {
            Ok(vec![self.dataset.parse()?])
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn check_format(s: &str) -> std::result::Result<String, String> {
    let supported: Vec<_> = ImageFormat::all()
        .filter(|f| f.writing_enabled())
        .flat_map(|f| f.extensions_str())
        .map(|s| format!("`{}`", s))
        .collect();
    let supported_message = format!("Supported formats: {}", supported.join(", "));

    let format = ImageFormat::from_extension(s)
        .ok_or(format!("{} is not supported. {}", s, supported_message))?;
    if !format.writing_enabled() {
        return Err(format!("{} is not supported. {}", s, supported_message));
    }

    Ok(s.to_string())
}
