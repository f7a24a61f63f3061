use std::{fs, path::Path};

use anyhow::{ensure, Context, Result};
use image::ImageFormat;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use medseg_rs::{
    config::Command,
    render::{self, MaskStats},
    Config, Dataset, Registry, Sample,
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::new();
    let datasets = config.datasets()?;
    let registry = Registry::new(config.data_root.clone());

    match config.command() {
        Command::Smoke => smoke(&registry, &datasets),
        Command::Describe => describe(&registry, &datasets),
        Command::Export {
            output_dir,
            format,
            overlay,
        } => export(
            &registry,
            &datasets,
            config.max_samples,
            &output_dir,
            &format,
            overlay,
        ),
    }
}

fn smoke(registry: &Registry, datasets: &[Dataset]) -> Result<()> {
    println!("Testing dataset loaders...");
    println!("{}", "=".repeat(60));

    for &dataset in datasets {
        println!("\n{}:", dataset);
        let root = registry.dataset_root(dataset);
        if !root.is_dir() {
            println!("  ERROR: {} not found at {}", dataset, root.display());
            continue;
        }

        let samples: Vec<Sample> = registry.load(dataset, Some(2)).collect();
        println!("  Loaded {} samples", samples.len());
        for sample in &samples {
            let stats = MaskStats::from_mask(sample.ground_truth_mask());
            println!("  [{}]", sample.sample_id());
            println!("    Image shape: {:?}", sample.image_shape());
            println!("    Mask shape: {:?}", sample.ground_truth_mask().dim());
            println!("    Mask unique values: {:?}", sample.mask_values());
            println!("    Foreground: {} px", stats.area_px);
            println!("    Text prompt: {}", sample.text_prompt());
        }
    }

    println!("\n{}", "=".repeat(60));
    println!("Dataset loading test complete!");
    Ok(())
}

fn describe(registry: &Registry, datasets: &[Dataset]) -> Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message("counting samples");
    spinner.enable_steady_tick(std::time::Duration::from_millis(120));
    let summaries = registry.describe(datasets);
    spinner.finish_and_clear();

    println!("{:<14} {:>8}  {:<16} prompt", "dataset", "samples", "first shape");
    for summary in &summaries {
        let shape = summary
            .image_shape
            .map_or_else(|| "-".to_string(), |(h, w, c)| format!("{}x{}x{}", h, w, c));
        println!(
            "{:<14} {:>8}  {:<16} {}",
            summary.dataset.name(),
            summary.num_samples,
            shape,
            summary.text_prompt
        );
    }
    Ok(())
}

fn export(
    registry: &Registry,
    datasets: &[Dataset],
    max_samples: Option<usize>,
    output_dir: &Path,
    format: &str,
    overlay: bool,
) -> Result<()> {
    ensure!(
        registry.data_root().is_dir(),
        "Data root does not exist: {}",
        registry.data_root().display()
    );
    let image_format = ImageFormat::from_extension(format).context("Invalid format")?;

    let progress_bar = ProgressBar::no_length();
    progress_bar.set_style(ProgressStyle::with_template(
        "{spinner:.green} [{elapsed}] {pos} samples ({per_sec}) {msg}",
    )?);

    datasets.par_iter().try_for_each(|&dataset| -> Result<()> {
        let dir = output_dir.join(dataset.name());
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

        for sample in registry.load(dataset, max_samples) {
            write_sample(&sample, &dir, format, image_format, overlay)?;
            progress_bar.inc(1);
        }
        Ok(())
    })?;

    progress_bar.finish_with_message("done");
    Ok(())
}

fn write_sample(
    sample: &Sample,
    dir: &Path,
    extension: &str,
    format: ImageFormat,
    overlay: bool,
) -> Result<()> {
    let id = sample.sample_id();

    let image_path = dir.join(format!("{}.{}", id, extension));
    sample
        .image()
        .save_with_format(&image_path, format)
        .with_context(|| format!("Failed to save image: {}", image_path.display()))?;

    let mask_path = dir.join(format!("{}_mask.png", id));
    render::mask_to_luma(sample.ground_truth_mask())
        .save_with_format(&mask_path, ImageFormat::Png)
        .with_context(|| format!("Failed to save mask: {}", mask_path.display()))?;

    if overlay {
        let overlay_path = dir.join(format!("{}_overlay.{}", id, extension));
        render::overlay(
            sample.image(),
            sample.ground_truth_mask(),
            render::OVERLAY_COLOR,
            render::OVERLAY_ALPHA,
        )
        .save_with_format(&overlay_path, format)
        .with_context(|| format!("Failed to save overlay: {}", overlay_path.display()))?;
    }

    Ok(())
}
