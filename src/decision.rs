//! Internal authorization decision type
//!
//! Evaluators stay pure: they report `Allow` or `Deny(reason)` and never
//! construct errors. The facade translates a deny into the structured
//! not-authorized failure at its boundary.

use crate::element::AccessOperation;
use std::fmt;

/// Why an evaluator declined to grant access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    /// The element carries no zone membership at all.
    NoZones,
    /// No channel granted access for any of the element's zones.
    NoMatchingChannel,
    /// A personal zone requires the caller to be the element creator.
    PersonalZoneCreatorMismatch { zone: String },
    /// The element's security tags exclude the caller for this operation.
    SecurityTagVeto { operation: AccessOperation },
    /// The caller is not a member of the required group.
    NotInGroup { group: String },
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoZones => write!(f, "element has no zone membership"),
            Self::NoMatchingChannel => write!(f, "no zone channel granted access"),
            Self::PersonalZoneCreatorMismatch { zone } => {
                write!(f, "personal zone {} is restricted to its creator", zone)
            }
            Self::SecurityTagVeto { operation } => {
                write!(f, "security tags exclude the caller for {}", operation)
            }
            Self::NotInGroup { group } => write!(f, "caller is not a member of {}", group),
        }
    }
}

/// Outcome of one policy evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow)
    }
}
