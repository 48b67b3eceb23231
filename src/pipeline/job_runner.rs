// Job: list inputs -> plan outputs -> parallel per-file conversion

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use image::ImageFormat;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::cache::hash::CacheSettings;
use crate::cache::store::CacheStore;
use crate::codec::{DecodeLimits, Quality};
use crate::convert::{CancellationToken, Converter};
use crate::error::ConvertError;
use crate::pipeline::item_processor::{ItemOutcome, process_item};

/// Configuration for a single job.
pub struct JobConfig {
    /// A PNG file, or a directory whose `.png` files are converted.
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub quality: Quality,
    pub overwrite: bool,
    pub limits: DecodeLimits,
    pub cache_dir: Option<PathBuf>,
}

/// Result for one input file of a job.
pub struct ItemResult {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub outcome: crate::error::Result<ItemOutcome>,
}

/// Result of processing a single job.
pub struct JobResult {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub items: Vec<ItemResult>,
}

impl JobResult {
    pub fn converted_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item.outcome, Ok(ItemOutcome::Converted { .. })))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.items.iter().filter(|item| item.outcome.is_err()).count()
    }

    pub fn has_errors(&self) -> bool {
        self.failed_count() > 0
    }
}

/// Output file for an input: same stem, `.jpg` extension.
pub fn output_path_for(input_path: &Path, output_dir: &Path) -> crate::error::Result<PathBuf> {
    let stem = input_path.file_stem().ok_or_else(|| {
        ConvertError::config(format!("Input has no file name: {}", input_path.display()))
    })?;
    let mut file_name = stem.to_os_string();
    file_name.push(".jpg");
    Ok(output_dir.join(file_name))
}

/// List the files a job converts.
///
/// A file input is taken as-is, whatever its type, so a wrong type is
/// reported instead of silently ignored. A directory contributes its `.png`
/// files (non-recursive, sorted by name); a directory without any is an error.
pub fn collect_inputs(input_path: &Path) -> crate::error::Result<Vec<PathBuf>> {
    if input_path.is_file() {
        return Ok(vec![input_path.to_path_buf()]);
    }

    if !input_path.is_dir() {
        return Err(ConvertError::config(format!(
            "Input not found: {}",
            input_path.display()
        )));
    }

    let mut inputs = Vec::new();
    for entry in std::fs::read_dir(input_path)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if matches!(ImageFormat::from_path(&path), Ok(ImageFormat::Png)) {
            inputs.push(path);
        } else {
            debug!(path = %path.display(), "skipping non-PNG file");
        }
    }

    if inputs.is_empty() {
        return Err(ConvertError::config(format!(
            "No PNG files in {}",
            input_path.display()
        )));
    }

    inputs.sort();
    Ok(inputs)
}

/// Run a single job.
///
/// Phase A: input listing and output planning (sequential)
/// Phase B: per-file conversion (rayon parallel)
///
/// The job itself only fails when its input cannot be listed or the output
/// directory cannot be created; per-file failures land in [`JobResult::items`].
pub fn run_job(config: &JobConfig, token: &CancellationToken) -> crate::error::Result<JobResult> {
    let inputs = collect_inputs(&config.input_path)?;
    std::fs::create_dir_all(&config.output_dir)?;

    // --- Phase A: output planning (sequential) ---
    let mut claimed: HashSet<PathBuf> = HashSet::new();
    let mut planned: Vec<(PathBuf, crate::error::Result<PathBuf>)> = Vec::new();
    for input in inputs {
        let output = output_path_for(&input, &config.output_dir).and_then(|output| {
            if claimed.insert(output.clone()) {
                Ok(output)
            } else {
                Err(ConvertError::config(format!(
                    "Output {} is already produced by another input",
                    output.display()
                )))
            }
        });
        planned.push((input, output));
    }

    // --- Phase B: conversion (rayon parallel) ---
    let converter = Converter::with_limits(config.limits);
    let cache_store = config.cache_dir.as_ref().map(CacheStore::new);
    let settings = CacheSettings {
        quality: config.quality,
        limits: config.limits,
    };

    let items: Vec<ItemResult> = planned
        .into_par_iter()
        .map(|(input_path, output)| {
            let output_path = output.as_ref().cloned().unwrap_or_default();
            let outcome = output.and_then(|output_path| {
                if !config.overwrite && output_path.exists() {
                    return Ok(ItemOutcome::SkippedExisting);
                }
                process_item(
                    &input_path,
                    &output_path,
                    &converter,
                    &settings,
                    cache_store.as_ref(),
                    token,
                )
            });
            ItemResult {
                input_path,
                output_path,
                outcome,
            }
        })
        .collect();

    let result = JobResult {
        input_path: config.input_path.clone(),
        output_dir: config.output_dir.clone(),
        items,
    };

    info!(
        input = %result.input_path.display(),
        converted = result.converted_count(),
        failed = result.failed_count(),
        "job finished"
    );

    Ok(result)
}
