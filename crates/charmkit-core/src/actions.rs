//! Charm actions schema (`actions.yaml`)

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;

use crate::error::{CoreError, Result};

/// Actions a charm exposes, keyed by action name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Actions {
    pub actions: BTreeMap<String, ActionSpec>,
}

/// A single action definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionSpec {
    #[serde(default)]
    pub description: String,

    /// Parameter schemas keyed by parameter name
    #[serde(default)]
    pub params: BTreeMap<String, Value>,

    /// Parameters that must be supplied
    #[serde(default)]
    pub required: Vec<String>,

    #[serde(default = "default_true")]
    pub additional_properties: bool,
}

fn default_true() -> bool {
    true
}

impl Actions {
    /// Parse and check `actions.yaml` content
    pub fn parse(content: &[u8]) -> Result<Self> {
        let actions: Actions = serde_yaml::from_slice(content)?;

        for (name, spec) in &actions.actions {
            if !is_valid_action_name(name) {
                return Err(CoreError::InvalidCharm {
                    message: format!("actions.yaml: bad action name {name:?}"),
                });
            }
            if let Some(param) = spec.required.iter().find(|p| !spec.params.contains_key(*p)) {
                return Err(CoreError::InvalidCharm {
                    message: format!(
                        "actions.yaml: action {name:?} requires undeclared parameter {param:?}"
                    ),
                });
            }
        }

        Ok(actions)
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Lowercase letters, digits and dashes; must start with a letter and not end with a dash
fn is_valid_action_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    first.is_ascii_lowercase()
        && !name.ends_with('-')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
