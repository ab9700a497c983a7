//! Charm metadata (`metadata.yaml`)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{CoreError, Result};

/// Charm metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Meta {
    /// Charm name (required)
    pub name: String,

    /// One-line summary
    #[serde(default)]
    pub summary: String,

    #[serde(default)]
    pub description: String,

    /// Subordinate charms are deployed alongside a principal unit
    #[serde(default)]
    pub subordinate: bool,

    /// Supported series, in declaration order. The first entry is the default.
    #[serde(default)]
    pub series: Vec<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub categories: Vec<String>,

    /// Relations this charm provides
    #[serde(default)]
    pub provides: BTreeMap<String, Relation>,

    /// Relations this charm requires
    #[serde(default)]
    pub requires: BTreeMap<String, Relation>,

    /// Peer relations between units of this charm
    #[serde(default)]
    pub peers: BTreeMap<String, Relation>,

    /// Terms the deployer must agree to
    #[serde(default)]
    pub terms: Vec<String>,

    /// Minimum controller version able to deploy this charm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_juju_version: Option<String>,
}

impl Meta {
    /// Parse and check `metadata.yaml` content
    pub fn parse(content: &[u8]) -> Result<Self> {
        let meta: Meta = serde_yaml::from_slice(content)?;
        meta.check()?;
        Ok(meta)
    }

    /// Structural checks that serde alone can't express
    pub fn check(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(invalid("metadata.yaml: charm name is required"));
        }

        if let Some(series) = self.series.iter().find(|s| s.trim().is_empty()) {
            return Err(invalid(format!(
                "metadata.yaml: invalid series entry {series:?}"
            )));
        }

        let mut seen = BTreeMap::new();
        for (role, relations) in [
            ("provides", &self.provides),
            ("requires", &self.requires),
            ("peers", &self.peers),
        ] {
            for name in relations.keys() {
                if let Some(previous) = seen.insert(name.as_str(), role) {
                    return Err(invalid(format!(
                        "metadata.yaml: relation {name:?} is defined in both {previous} and {role}"
                    )));
                }
            }
        }

        if self.subordinate
            && !self
                .requires
                .values()
                .any(|r| r.scope == RelationScope::Container)
        {
            return Err(invalid(
                "metadata.yaml: subordinate charm requires at least one container-scoped relation",
            ));
        }

        Ok(())
    }

    /// All relations with their role, providers first
    pub fn relations(&self) -> impl Iterator<Item = (&str, RelationRole, &Relation)> {
        let provides = self
            .provides
            .iter()
            .map(|(name, rel)| (name.as_str(), RelationRole::Provider, rel));
        let requires = self
            .requires
            .iter()
            .map(|(name, rel)| (name.as_str(), RelationRole::Requirer, rel));
        let peers = self
            .peers
            .iter()
            .map(|(name, rel)| (name.as_str(), RelationRole::Peer, rel));

        provides.chain(requires).chain(peers)
    }
}

fn invalid(message: impl Into<String>) -> CoreError {
    CoreError::InvalidCharm {
        message: message.into(),
    }
}

/// Which side of a relation a charm sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationRole {
    Provider,
    Requirer,
    Peer,
}

/// Relation scope
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationScope {
    #[default]
    Global,
    Container,
}

/// A relation endpoint declared in metadata
///
/// Accepts both the shorthand `db: mysql` and the long form with an
/// `interface` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RelationSpec")]
pub struct Relation {
    pub interface: String,

    pub scope: RelationScope,

    /// Maximum number of related units, if bounded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    pub optional: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RelationSpec {
    Interface(String),
    Full {
        interface: String,
        #[serde(default)]
        scope: RelationScope,
        #[serde(default)]
        limit: Option<u32>,
        #[serde(default)]
        optional: bool,
    },
}

impl From<RelationSpec> for Relation {
    fn from(spec: RelationSpec) -> Self {
        match spec {
            RelationSpec::Interface(interface) => Relation {
                interface,
                scope: RelationScope::Global,
                limit: None,
                optional: false,
            },
            RelationSpec::Full {
                interface,
                scope,
                limit,
                optional,
            } => Relation {
                interface,
                scope,
                limit,
                optional,
            },
        }
    }
}
