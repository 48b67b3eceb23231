use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::codec::Quality;
use crate::codec::png::DEFAULT_MAX_DIMENSION;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(deserialize_with = "super::deserialize_quality")]
    pub quality: Quality,
    pub parallel_workers: usize,
    pub cache_dir: Option<PathBuf>,
    pub max_dimension: u32,
    pub overwrite: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            quality: Quality::DEFAULT,
            parallel_workers: 0,
            cache_dir: None,
            max_dimension: DEFAULT_MAX_DIMENSION,
            overwrite: false,
        }
    }
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> crate::error::Result<Self> {
        let settings: Settings = serde_yml::from_str(yaml).map_err(|e| {
            crate::error::ConvertError::config(format!("Failed to parse settings YAML: {e}"))
        })?;
        if settings.max_dimension == 0 {
            return Err(crate::error::ConvertError::config(
                "max_dimension must be greater than 0",
            ));
        }
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }
}
