use crate::element::AccessOperation;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Account type recorded against a user in the directory store.
///
/// Gates the broad zone-category access groups; `Unknown` covers account
/// records with no recognized type and never matches a gated category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountType {
    Employee,
    Contractor,
    External,
    Digital,
    #[default]
    Unknown,
}

/// A user's account record as resolved from the directory store.
///
/// Built by a lookup at the start of every authorization check, never
/// persisted by the connector, and immutable for the duration of one check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub user_id: String,
    pub distinguished_name: String,
    /// Group names the account holds directly.
    #[serde(default)]
    pub security_groups: HashSet<String>,
    /// Role names; each role may itself resolve to a named list with its own
    /// distinguished name.
    #[serde(default)]
    pub security_roles: HashSet<String>,
    /// Zone name -> operations explicitly granted to this user in that zone.
    #[serde(default)]
    pub zone_access: HashMap<String, HashSet<AccessOperation>>,
    #[serde(default)]
    pub account_type: AccountType,
}

impl UserAccount {
    pub fn new(user_id: impl Into<String>, distinguished_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            distinguished_name: distinguished_name.into(),
            security_groups: HashSet::new(),
            security_roles: HashSet::new(),
            zone_access: HashMap::new(),
            account_type: AccountType::Unknown,
        }
    }

    pub fn has_explicit_zone_grant(&self, zone: &str, operation: AccessOperation) -> bool {
        self.zone_access
            .get(zone)
            .is_some_and(|operations| operations.contains(&operation))
    }
}

/// A named group record owned by the external directory store.
///
/// Membership is tested recursively: direct principals live in
/// `user_members`, nested groups in `list_members`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedList {
    pub display_name: String,
    pub distinguished_name: String,
    /// Principal identifiers that are direct members.
    #[serde(default)]
    pub user_members: HashSet<String>,
    /// Names of other named lists nested inside this one.
    #[serde(default)]
    pub list_members: HashSet<String>,
}

impl NamedList {
    pub fn new(display_name: impl Into<String>, distinguished_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            distinguished_name: distinguished_name.into(),
            user_members: HashSet::new(),
            list_members: HashSet::new(),
        }
    }
}
