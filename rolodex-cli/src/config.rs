use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct RolodexConfig {
    pub storage: StorageConfig,
    pub import: ImportConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding contacts.csv
    pub working_directory: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            working_directory: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ImportConfig {
    /// Name of the note that keeps the raw OCR text
    pub ocr_note_name: String,
    /// Base name for attached images; numbered when several are attached
    pub image_name: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            ocr_note_name: "OCR".to_string(),
            image_name: "Import".to_string(),
        }
    }
}

impl RolodexConfig {
    /// Load from `explicit` if given, else from the default location,
    /// writing a default file there on first run.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, PathBuf), ConfigError> {
        let config_path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::Message(format!(
                        "Config file not found at {}",
                        path.display()
                    )));
                }
                path.to_path_buf()
            }
            None => {
                let path = get_config_path();
                if !path.exists() {
                    write_default_config(&path)?;
                }
                path
            }
        };

        let config = Self::from_file(&config_path)?;
        Ok((config, config_path))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize()
    }
}

fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::Message(format!("Failed to create config directory: {e}"))
        })?;
    }

    let contents = toml::to_string_pretty(&RolodexConfig::default())
        .map_err(|e| ConfigError::Message(format!("Failed to encode default config: {e}")))?;

    std::fs::write(path, contents)
        .map_err(|e| ConfigError::Message(format!("Failed to write default config: {e}")))
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("rolodex").join("cli.toml")
    } else {
        PathBuf::from("cli.toml")
    }
}
