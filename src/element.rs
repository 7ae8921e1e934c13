//! Metadata element context supplied by callers for each authorization check
//!
//! The connector never reads the metadata repository itself; callers hand it
//! a read-only view of the element being checked — its identity, creator, and
//! the classifications that drive the ownership, zone, and security-tag
//! policies.

use crate::constants::{
    ACCESS_GROUPS_PROPERTY, OWNERSHIP_CLASSIFICATION, OWNER_PROPERTY,
    OWNER_PROPERTY_NAME_PROPERTY, OWNER_TYPE_NAME_PROPERTY, SECURITY_TAGS_CLASSIFICATION,
    ZONE_MEMBERSHIP_CLASSIFICATION, ZONE_MEMBERSHIP_PROPERTY,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Enumerated kind of action being authorized.
///
/// The wire name is used both as a key into a user's explicit zone grants and
/// as a parameter when formatting directory group-name patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccessOperation {
    Create,
    Read,
    Update,
    Delete,
    Publish,
    Withdraw,
    Classify,
    Declassify,
    Attach,
    Detach,
}

impl AccessOperation {
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Read => "READ",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Publish => "PUBLISH",
            Self::Withdraw => "WITHDRAW",
            Self::Classify => "CLASSIFY",
            Self::Declassify => "DECLASSIFY",
            Self::Attach => "ATTACH",
            Self::Detach => "DETACH",
        }
    }
}

impl fmt::Display for AccessOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// A single classification attached to a metadata element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub name: String,
    /// Classification properties as loosely typed values; the connector only
    /// interprets the keys it recognizes.
    #[serde(default)]
    pub properties: HashMap<String, Value>,
}

impl Classification {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: HashMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }
}

/// Ownership details extracted from an element's `Ownership` classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ownership {
    pub owner: String,
    pub owner_type_name: Option<String>,
    pub owner_property_name: Option<String>,
}

/// Per-operation allow-lists extracted from a `SecurityTags` classification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityTags {
    /// Operation wire name -> user ids permitted for that operation.
    pub access_groups: HashMap<String, Vec<String>>,
}

/// Read-only view of the metadata element under evaluation.
///
/// Reconstructed by the caller for every authorization check; the connector
/// never persists or mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementContext {
    pub entity_guid: String,
    pub type_name: String,
    pub qualified_name: String,
    pub created_by: String,
    #[serde(default)]
    pub classifications: Vec<Classification>,
}

impl ElementContext {
    pub fn classification(&self, name: &str) -> Option<&Classification> {
        self.classifications.iter().find(|c| c.name == name)
    }

    /// Zone names recorded in the element's zone-membership classification.
    ///
    /// An element with no such classification has an empty zone list, which
    /// the zone policy evaluator denies.
    pub fn zone_membership(&self) -> Vec<String> {
        self.classification(ZONE_MEMBERSHIP_CLASSIFICATION)
            .and_then(|c| c.properties.get(ZONE_MEMBERSHIP_PROPERTY))
            .and_then(Value::as_array)
            .map(|zones| {
                zones
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn ownership(&self) -> Option<Ownership> {
        let classification = self.classification(OWNERSHIP_CLASSIFICATION)?;
        let owner = classification
            .properties
            .get(OWNER_PROPERTY)
            .and_then(Value::as_str)?
            .to_string();
        let string_property = |key: &str| {
            classification
                .properties
                .get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
        };
        Some(Ownership {
            owner,
            owner_type_name: string_property(OWNER_TYPE_NAME_PROPERTY),
            owner_property_name: string_property(OWNER_PROPERTY_NAME_PROPERTY),
        })
    }

    pub fn security_tags(&self) -> Option<SecurityTags> {
        let groups = self
            .classification(SECURITY_TAGS_CLASSIFICATION)?
            .properties
            .get(ACCESS_GROUPS_PROPERTY)?
            .as_object()?;
        let access_groups = groups
            .iter()
            .map(|(operation, users)| {
                let users = users
                    .as_array()
                    .map(|list| {
                        list.iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default();
                (operation.clone(), users)
            })
            .collect();
        Some(SecurityTags { access_groups })
    }
}

/// Minimal view of a connection entity used by connection selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub display_name: String,
    pub element: ElementContext,
}
