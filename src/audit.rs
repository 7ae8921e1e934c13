//! Audit records for directory lookup failures
//!
//! Lookup failures from the external directory stores are never propagated to
//! callers; each one is converted into a structured audit record and emitted
//! through the `log` facade, then treated as a non-match by the evaluation
//! that triggered it.

use crate::directory::DirectoryError;
use chrono::{DateTime, Utc};
use log::warn;
use serde::Serialize;
use uuid::Uuid;

/// Structured record of a failed directory lookup.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    pub record_id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// Name of the metadata server this connector protects.
    pub server_name: String,
    /// Error class reported by the directory adapter.
    pub error_class: String,
    /// The identity or name that was being looked up.
    pub subject: String,
    /// Group under resolution when the failure occurred, if any.
    pub group_name: Option<String>,
    pub message: String,
}

impl AuditRecord {
    pub fn directory_failure(
        server_name: &str,
        error: &DirectoryError,
        subject: &str,
        group_name: Option<&str>,
    ) -> Self {
        Self {
            record_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            server_name: server_name.to_string(),
            error_class: error.class_name().to_string(),
            subject: subject.to_string(),
            group_name: group_name.map(str::to_string),
            message: error.to_string(),
        }
    }

    /// Emit the record through the `log` facade.
    pub fn emit(&self) {
        match serde_json::to_string(self) {
            Ok(json) => warn!(target: "zonegate::audit", "{}", json),
            Err(_) => warn!(
                target: "zonegate::audit",
                "directory lookup failed on {}: {} (subject {}, group {:?})",
                self.server_name, self.message, self.subject, self.group_name
            ),
        }
    }
}
