//! Directory store adapter
//!
//! Wraps one or more external secrets/directory stores behind a single
//! client. The connector resolves two kinds of records through it: user
//! accounts and named lists (groups). Multiple stores may be configured; a
//! lookup fans out across all of them and the first successful hit wins.
//!
//! Failure policy: a store error is audited and the remaining stores are
//! tried. A lookup that saw an error and no hit reports `Failed` rather than
//! `Missing`, so membership checks can fail closed while genuinely absent
//! groups keep their no-restriction default.

pub mod types;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use types::{AccountType, NamedList, UserAccount};

use crate::audit::AuditRecord;
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by a directory store implementation.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The store could not be reached at all.
    #[error("directory store unavailable: {0}")]
    Unavailable(String),

    /// The store answered but the lookup itself failed.
    #[error("directory lookup failed: {0}")]
    Lookup(String),

    /// The store returned a record the adapter could not interpret.
    #[error("malformed directory record: {0}")]
    Malformed(String),
}

impl DirectoryError {
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "Unavailable",
            Self::Lookup(_) => "Lookup",
            Self::Malformed(_) => "Malformed",
        }
    }
}

/// One external secrets/directory store.
///
/// Lookups are synchronous, blocking calls bounded by the underlying store's
/// own latency; a clean miss is `Ok(None)`, never an error.
pub trait DirectoryStore: Send + Sync {
    fn store_name(&self) -> &str;

    fn get_user(&self, user_id: &str) -> Result<Option<UserAccount>, DirectoryError>;

    fn get_named_list(&self, name: &str) -> Result<Option<NamedList>, DirectoryError>;
}

/// Outcome of a named-list lookup across every configured store.
#[derive(Debug, Clone)]
pub enum ListLookup {
    Found(NamedList),
    /// Every store answered and none holds the list.
    Missing,
    /// No store produced the list and at least one lookup errored.
    Failed,
}

/// Client querying all configured directory stores in order.
pub struct DirectoryClient {
    server_name: String,
    stores: Vec<Arc<dyn DirectoryStore>>,
}

impl DirectoryClient {
    pub fn new(server_name: impl Into<String>, stores: Vec<Arc<dyn DirectoryStore>>) -> Self {
        Self {
            server_name: server_name.into(),
            stores,
        }
    }

    pub fn server_name(&self) -> &str {
        &self.server_name
    }

    /// Resolve a user account, accepting the first hit.
    ///
    /// Store errors are audited and treated as a failed lookup; a user no
    /// store can produce is simply absent.
    pub fn find_user(&self, user_id: &str) -> Option<UserAccount> {
        for store in &self.stores {
            match store.get_user(user_id) {
                Ok(Some(account)) => return Some(account),
                Ok(None) => {}
                Err(error) => {
                    AuditRecord::directory_failure(&self.server_name, &error, user_id, None)
                        .emit();
                }
            }
        }
        None
    }

    /// Resolve a named list, accepting the first hit.
    pub fn find_named_list(&self, name: &str) -> ListLookup {
        let mut failed = false;
        for store in &self.stores {
            match store.get_named_list(name) {
                Ok(Some(list)) => return ListLookup::Found(list),
                Ok(None) => {}
                Err(error) => {
                    AuditRecord::directory_failure(&self.server_name, &error, name, Some(name))
                        .emit();
                    failed = true;
                }
            }
        }
        if failed {
            ListLookup::Failed
        } else {
            ListLookup::Missing
        }
    }
}
