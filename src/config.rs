use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_yaml::Value as YamlValue;

use crate::error::{Result, VitaraError};

// ---------------------------------------------------------------------------
// DisplayConfig – rendering settings handed to downstream consumers
// ---------------------------------------------------------------------------

/// Display settings read from a YAML file's `display` section.
///
/// This is a plain value: whoever renders the data receives it explicitly.
/// Nothing in this crate applies it to process-wide state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayConfig {
    settings: BTreeMap<String, YamlValue>,
}

#[derive(Deserialize)]
struct ConfigFile {
    #[serde(alias = "matplotlib")]
    display: Option<BTreeMap<String, YamlValue>>,
}

impl DisplayConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| VitaraError::io(path, e))?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let file: ConfigFile = serde_yaml::from_str(text)?;
        let settings = file
            .display
            .ok_or_else(|| VitaraError::Config("config requires a display section".into()))?;
        Ok(DisplayConfig { settings })
    }

    pub fn settings(&self) -> &BTreeMap<String, YamlValue> {
        &self.settings
    }

    pub fn get(&self, key: &str) -> Option<&YamlValue> {
        self.settings.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// Settings flattened to strings, for formats that only carry text
    /// metadata. Scalars are written bare; sequences and mappings as YAML.
    pub fn to_string_map(&self) -> Result<BTreeMap<String, String>> {
        self.settings
            .iter()
            .map(|(key, value)| {
                let text = match value {
                    YamlValue::String(s) => s.clone(),
                    YamlValue::Bool(b) => b.to_string(),
                    YamlValue::Number(n) => n.to_string(),
                    YamlValue::Null => String::new(),
                    other => serde_yaml::to_string(other)?.trim_end().to_string(),
                };
                Ok::<_, VitaraError>((key.clone(), text))
            })
            .collect()
    }
}
