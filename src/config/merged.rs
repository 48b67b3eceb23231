use std::path::PathBuf;

use super::job::Job;
use super::settings::Settings;
use crate::codec::{DecodeLimits, Quality};

#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub quality: Quality,
    pub overwrite: bool,
    pub parallel_workers: usize,
    pub cache_dir: Option<PathBuf>,
    pub limits: DecodeLimits,
}

impl MergedConfig {
    /// Job values win over settings where the job sets them.
    pub fn new(settings: &Settings, job: &Job) -> Self {
        MergedConfig {
            quality: job.quality.unwrap_or(settings.quality),
            overwrite: job.overwrite.unwrap_or(settings.overwrite),
            parallel_workers: settings.parallel_workers,
            cache_dir: settings.cache_dir.clone(),
            limits: DecodeLimits::with_max_dimension(settings.max_dimension),
        }
    }
}
