pub mod job;
pub mod merged;
pub mod settings;

use serde::Deserialize;
use settings::Settings;
use std::path::Path;

use crate::codec::Quality;

/// Load `settings.yaml` from the job file's directory, or defaults if absent.
pub fn load_settings_for_job(job_file_path: &Path) -> crate::error::Result<Settings> {
    let dir = job_file_path
        .parent()
        .ok_or_else(|| crate::error::ConvertError::config("Cannot determine job file directory"))?;

    let settings_path = dir.join("settings.yaml");

    if settings_path.exists() {
        Settings::from_file(&settings_path)
    } else {
        Ok(Settings::default())
    }
}

/// serde deserializer that validates a quality fraction at load time.
fn deserialize_quality<'de, D>(deserializer: D) -> Result<Quality, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = f32::deserialize(deserializer)?;
    Quality::new(value).map_err(serde::de::Error::custom)
}

fn deserialize_optional_quality<'de, D>(deserializer: D) -> Result<Option<Quality>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<f32>::deserialize(deserializer)?
        .map(|value| Quality::new(value).map_err(serde::de::Error::custom))
        .transpose()
}
