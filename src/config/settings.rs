//! Stage settings file
//!
//! Persists the stage's property values as JSON, keyed by the property
//! display names:
//!
//! ```json
//! {
//!   "Log File Directory": "/var/log/flows/${path}",
//!   "Attributes to Log": "file.*|path"
//! }
//! ```

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::property::{ATTRIBUTES_TO_LOG, LOG_FILE_DIRECTORY};
use crate::error::WhatsFlowingError;

/// Property values for the WhatsFlowing stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSettings {
    /// Journal directory, may contain `${attribute}` expressions
    #[serde(
        rename = "Log File Directory",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub log_file_directory: Option<String>,

    /// Regex selecting attribute keys
    #[serde(
        rename = "Attributes to Log",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub attributes_to_log: Option<String>,
}

impl StageSettings {
    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, WhatsFlowingError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            WhatsFlowingError::Io(format!(
                "Failed to read settings file {}: {}",
                path.display(),
                e
            ))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            WhatsFlowingError::Json(format!(
                "Failed to parse settings file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Save settings to a JSON file (write to temp, then rename)
    pub fn save(&self, path: &Path) -> Result<(), WhatsFlowingError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                WhatsFlowingError::Io(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let temp_path = path.with_extension("json.tmp");
        let file = File::create(&temp_path)
            .map_err(|e| WhatsFlowingError::Io(format!("Failed to create temp file: {}", e)))?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;

        fs::rename(&temp_path, path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            WhatsFlowingError::Io(format!("Failed to rename temp file: {}", e))
        })?;

        Ok(())
    }

    /// Convert to the property map consumed by validation and the context
    pub fn into_properties(self) -> BTreeMap<String, String> {
        let mut properties = BTreeMap::new();
        if let Some(dir) = self.log_file_directory {
            properties.insert(LOG_FILE_DIRECTORY.name.to_string(), dir);
        }
        if let Some(pattern) = self.attributes_to_log {
            properties.insert(ATTRIBUTES_TO_LOG.name.to_string(), pattern);
        }
        properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings_are_empty() {
        let settings = StageSettings::default();
        assert!(settings.into_properties().is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("stage.json");

        let settings = StageSettings {
            log_file_directory: Some("/var/log/${path}".to_string()),
            attributes_to_log: Some("file.*|path".to_string()),
        };
        settings.save(&path).unwrap();
        assert!(!path.with_extension("json.tmp").exists());

        let loaded = StageSettings::load(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_json_keys_are_display_names() {
        let settings: StageSettings =
            serde_json::from_str(r#"{"Log File Directory": "logs"}"#).unwrap();
        assert_eq!(settings.log_file_directory.as_deref(), Some("logs"));
        assert_eq!(settings.attributes_to_log, None);

        let properties = settings.into_properties();
        assert_eq!(properties.get("Log File Directory").map(String::as_str), Some("logs"));
        assert!(!properties.contains_key("Attributes to Log"));
    }

    #[test]
    fn test_load_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("stage.json");
        fs::write(&path, "not json at all").unwrap();

        let err = StageSettings::load(&path).unwrap_err();
        assert!(matches!(err, WhatsFlowingError::Json(_)));
        assert!(err.to_string().starts_with("JSON error: Failed to parse settings file"));
    }

    #[test]
    fn test_load_wrong_value_type() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("stage.json");
        fs::write(&path, r#"{"Log File Directory": 42}"#).unwrap();

        let err = StageSettings::load(&path).unwrap_err();
        assert!(matches!(err, WhatsFlowingError::Json(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = StageSettings::load(&temp_dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, WhatsFlowingError::Io(_)));
    }
}
