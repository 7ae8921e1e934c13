//! In-memory directory store for tests and local experimentation
//!
//! Enabled through the `mock` feature (on by default). Lookups can be forced
//! to fail for specific names to exercise the fail-closed paths.

use super::{DirectoryError, DirectoryStore, NamedList, UserAccount};
use std::collections::{HashMap, HashSet};

#[derive(Default)]
pub struct MockDirectory {
    name: String,
    users: HashMap<String, UserAccount>,
    lists: HashMap<String, NamedList>,
    failing: HashSet<String>,
}

impl MockDirectory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_user(mut self, account: UserAccount) -> Self {
        self.users.insert(account.user_id.clone(), account);
        self
    }

    pub fn with_list(mut self, list: NamedList) -> Self {
        self.lists.insert(list.display_name.clone(), list);
        self
    }

    /// Force lookups for `name` (user or list) to error.
    pub fn failing_on(mut self, name: impl Into<String>) -> Self {
        self.failing.insert(name.into());
        self
    }
}

impl DirectoryStore for MockDirectory {
    fn store_name(&self) -> &str {
        &self.name
    }

    fn get_user(&self, user_id: &str) -> Result<Option<UserAccount>, DirectoryError> {
        if self.failing.contains(user_id) {
            return Err(DirectoryError::Lookup(format!(
                "simulated failure for user {}",
                user_id
            )));
        }
        Ok(self.users.get(user_id).cloned())
    }

    fn get_named_list(&self, name: &str) -> Result<Option<NamedList>, DirectoryError> {
        if self.failing.contains(name) {
            return Err(DirectoryError::Lookup(format!(
                "simulated failure for list {}",
                name
            )));
        }
        Ok(self.lists.get(name).cloned())
    }
}
