use serde::Deserialize;

use crate::codec::Quality;

#[derive(Debug, Clone, Deserialize)]
pub struct JobFile {
    pub jobs: Vec<Job>,
}

/// One conversion job: a PNG file or a directory of them, and where the
/// JPEGs go.
#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    pub input: String,
    pub output: String,
    #[serde(default, deserialize_with = "super::deserialize_optional_quality")]
    pub quality: Option<Quality>,
    pub overwrite: Option<bool>,
}

impl JobFile {
    pub fn from_yaml(yaml: &str) -> crate::error::Result<Self> {
        let job_file: JobFile = serde_yml::from_str(yaml)?;
        if job_file.jobs.is_empty() {
            return Err(crate::error::ConvertError::config(
                "Job file contains no jobs",
            ));
        }
        Ok(job_file)
    }
}
