// TOML config adapter - Configuration management using TOML files

use crate::domain::errors::*;
use crate::ports::*;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Section of the config file holding segcut keys
pub const CONFIG_SECTION: &str = "segcut";

/// TOML configuration adapter
pub struct TomlConfigAdapter {
    config: Arc<RwLock<HashMap<String, String>>>,
}

impl TomlConfigAdapter {
    /// Create new TOML config adapter seeded with defaults
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(Self::default_values())),
        }
    }

    fn default_values() -> HashMap<String, String> {
        [
            ("ffmpeg_path", "ffmpeg"),
            ("ffprobe_path", "ffprobe"),
            ("output_prefix", crate::domain::model::DEFAULT_OUTPUT_PREFIX),
            ("log_level", "info"),
            ("log_format", "pretty"),
            ("event_buffer", "16"),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
    }

    /// Parse the `[segcut]` section of a TOML document
    ///
    /// Strings, integers and booleans are accepted; anything else is rejected
    /// so that a typo does not silently fall back to a default.
    fn parse_section(toml_content: &str) -> Result<HashMap<String, String>, DomainError> {
        let parsed: toml::Table = toml::from_str(toml_content)
            .map_err(|e| DomainError::Config(format!("Failed to parse TOML config: {}", e)))?;

        let Some(section) = parsed.get(CONFIG_SECTION) else {
            return Ok(HashMap::new());
        };
        let table = section.as_table().ok_or_else(|| {
            DomainError::Config(format!("[{}] must be a table", CONFIG_SECTION))
        })?;

        let mut values = HashMap::new();
        for (key, value) in table {
            let value = match value {
                toml::Value::String(s) => s.clone(),
                toml::Value::Integer(i) => i.to_string(),
                toml::Value::Boolean(b) => b.to_string(),
                other => {
                    return Err(DomainError::Config(format!(
                        "Unsupported value for {}: {}",
                        key, other
                    )))
                }
            };
            values.insert(key.clone(), value);
        }
        Ok(values)
    }
}

impl Default for TomlConfigAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigPort for TomlConfigAdapter {
    async fn get_config(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.config.read().await.get(key).cloned())
    }

    async fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, DomainError> {
        Ok(self
            .config
            .read()
            .await
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string()))
    }

    async fn set_config(&self, key: &str, value: &str) -> Result<(), DomainError> {
        self.config
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        tracing::debug!("Set config {} = {}", key, value);
        Ok(())
    }

    async fn load_config(&self, file_path: &Path) -> Result<(), DomainError> {
        let content = tokio::fs::read_to_string(file_path).await.map_err(|e| {
            DomainError::Config(format!(
                "Failed to read config file {}: {}",
                file_path.display(),
                e
            ))
        })?;

        let values = Self::parse_section(&content)?;
        self.config.write().await.extend(values);
        Ok(())
    }

    async fn get_all_config_keys(&self) -> Result<Vec<String>, DomainError> {
        let mut keys: Vec<String> = self.config.read().await.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}
