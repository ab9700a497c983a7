//! Charm configuration schema (`config.yaml`)

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;

use crate::error::{CoreError, Result};

/// Configuration options a charm accepts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub options: BTreeMap<String, ConfigOption>,
}

/// A single configuration option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigOption {
    #[serde(rename = "type")]
    pub option_type: OptionType,

    #[serde(default)]
    pub description: String,

    /// Default value; must match `option_type`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

/// Value type of a configuration option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    String,
    Int,
    Float,
    Boolean,
}

impl OptionType {
    /// Whether `value` is acceptable for this type
    pub fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (OptionType::String, Value::String(_)) => true,
            (OptionType::Int, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (OptionType::Float, Value::Number(_)) => true,
            (OptionType::Boolean, Value::Bool(_)) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OptionType::String => "string",
            OptionType::Int => "int",
            OptionType::Float => "float",
            OptionType::Boolean => "boolean",
        };
        f.write_str(name)
    }
}

impl Config {
    /// Parse and check `config.yaml` content
    pub fn parse(content: &[u8]) -> Result<Self> {
        let config: Config = serde_yaml::from_slice(content)?;
        config.check()?;
        Ok(config)
    }

    /// Reject defaults that don't match their declared type
    pub fn check(&self) -> Result<()> {
        for (name, option) in &self.options {
            if let Some(default) = &option.default
                && !option.option_type.accepts(default)
            {
                return Err(CoreError::InvalidCharm {
                    message: format!(
                        "config.yaml: default for option {name:?} is not a valid {}",
                        option.option_type
                    ),
                });
            }
        }
        Ok(())
    }

    /// Options that carry a default, keyed by option name
    pub fn default_settings(&self) -> BTreeMap<&str, &Value> {
        self.options
            .iter()
            .filter_map(|(name, option)| option.default.as_ref().map(|d| (name.as_str(), d)))
            .collect()
    }
}
