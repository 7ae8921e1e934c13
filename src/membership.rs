//! Recursive group membership resolution
//!
//! Determines whether a principal — by user id, distinguished name, or any of
//! the account's security roles — is a member of a named directory group,
//! following nested list-of-lists references.
//!
//! Two deliberately different defaults coexist here:
//!
//! - User membership (`is_member`) treats an unconfigured or absent group as
//!   "no restriction" and answers true.
//! - Zone-category membership (`is_name_in_group`) fails closed: an
//!   unconfigured or absent policy group places no zone in that category.
//!
//! Directory data is untrusted: nested references may be missing or cyclic,
//! so every walk carries a visited set, a depth bound, and a lookup budget.

use crate::config::LookupLimits;
use crate::directory::{DirectoryClient, ListLookup, NamedList, UserAccount};
use log::debug;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Clone)]
pub struct MembershipResolver {
    directory: Arc<DirectoryClient>,
    limits: LookupLimits,
}

/// Per-call traversal state: visited lists, consumed lookup budget.
struct GroupWalk {
    visited: HashSet<String>,
    lookups: usize,
    limits: LookupLimits,
}

impl GroupWalk {
    fn new(limits: LookupLimits) -> Self {
        Self {
            visited: HashSet::new(),
            lookups: 0,
            limits,
        }
    }

    /// Charge one directory call against the budget.
    fn charge(&mut self) -> bool {
        if self.lookups >= self.limits.max_directory_lookups {
            debug!("directory lookup budget exhausted after {} calls", self.lookups);
            return false;
        }
        self.lookups += 1;
        true
    }

    fn mark_visited(&mut self, list_name: &str) {
        self.visited.insert(list_name.to_lowercase());
    }

    fn already_visited(&self, list_name: &str) -> bool {
        self.visited.contains(&list_name.to_lowercase())
    }
}

impl MembershipResolver {
    pub fn new(directory: Arc<DirectoryClient>, limits: LookupLimits) -> Self {
        Self { directory, limits }
    }

    /// Test whether the account is a member of `group_name`.
    ///
    /// An empty or unset group name, or a group no configured store holds,
    /// means "no restriction" and answers true. A lookup error answers false:
    /// membership checks fail closed when the directory misbehaves.
    pub fn is_member(&self, account: &UserAccount, group_name: Option<&str>) -> bool {
        let name = match group_name.map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => return true,
        };
        let mut walk = GroupWalk::new(self.limits);
        if !walk.charge() {
            return false;
        }
        match self.directory.find_named_list(name) {
            ListLookup::Missing => true,
            ListLookup::Failed => false,
            ListLookup::Found(list) => {
                let role_dns = self.role_distinguished_names(account, &mut walk);
                self.account_in_list(account, &role_dns, &list, name, 0, &mut walk)
            }
        }
    }

    /// Test whether a bare name (a zone name) belongs to a policy group.
    ///
    /// Unlike user membership, an unconfigured or absent group matches
    /// nothing.
    pub fn is_name_in_group(&self, name: &str, group_name: &str) -> bool {
        let group_name = group_name.trim();
        if group_name.is_empty() {
            return false;
        }
        let mut walk = GroupWalk::new(self.limits);
        if !walk.charge() {
            return false;
        }
        match self.directory.find_named_list(group_name) {
            ListLookup::Found(list) => self.name_in_list(name, &list, group_name, 0, &mut walk),
            _ => false,
        }
    }

    /// Resolve each of the account's roles to its own named list and collect
    /// the distinguished names, so each visited list can be matched against
    /// them without re-querying the store.
    fn role_distinguished_names(&self, account: &UserAccount, walk: &mut GroupWalk) -> Vec<String> {
        let mut dns = Vec::new();
        for role in &account.security_roles {
            if !walk.charge() {
                break;
            }
            if let ListLookup::Found(role_list) = self.directory.find_named_list(role) {
                dns.push(role_list.distinguished_name);
            }
        }
        dns
    }

    fn account_in_list(
        &self,
        account: &UserAccount,
        role_dns: &[String],
        list: &NamedList,
        list_name: &str,
        depth: usize,
        walk: &mut GroupWalk,
    ) -> bool {
        walk.mark_visited(list_name);

        if list.user_members.contains(&account.user_id)
            || list.user_members.contains(&account.distinguished_name)
        {
            return true;
        }
        if account
            .security_roles
            .iter()
            .any(|role| list.user_members.contains(role))
        {
            return true;
        }
        if role_dns.iter().any(|dn| list.user_members.contains(dn)) {
            return true;
        }

        for nested in &list.list_members {
            if walk.already_visited(nested) {
                continue;
            }
            if depth + 1 >= self.limits.max_group_depth {
                debug!(
                    "group nesting depth bound {} reached under {}, skipping {}",
                    self.limits.max_group_depth, list_name, nested
                );
                continue;
            }
            if !walk.charge() {
                break;
            }
            // Missing or failed nested lists contribute nothing; the
            // no-restriction default applies only to the group named in the
            // top-level contract.
            if let ListLookup::Found(inner) = self.directory.find_named_list(nested) {
                if self.account_in_list(account, role_dns, &inner, nested, depth + 1, walk) {
                    return true;
                }
            }
        }
        false
    }

    fn name_in_list(
        &self,
        name: &str,
        list: &NamedList,
        list_name: &str,
        depth: usize,
        walk: &mut GroupWalk,
    ) -> bool {
        walk.mark_visited(list_name);

        if list.user_members.contains(name) {
            return true;
        }
        for nested in &list.list_members {
            if walk.already_visited(nested) || depth + 1 >= self.limits.max_group_depth {
                continue;
            }
            if !walk.charge() {
                break;
            }
            if let ListLookup::Found(inner) = self.directory.find_named_list(nested) {
                if self.name_in_list(name, &inner, nested, depth + 1, walk) {
                    return true;
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::mock::MockDirectory;
    use crate::directory::NamedList;

    fn resolver(store: MockDirectory) -> MembershipResolver {
        let client = DirectoryClient::new("test-server", vec![Arc::new(store)]);
        MembershipResolver::new(Arc::new(client), LookupLimits::default())
    }

    fn list(name: &str, users: &[&str], nested: &[&str]) -> NamedList {
        let mut l = NamedList::new(name, format!("cn={},ou=groups", name));
        l.user_members = users.iter().map(|u| u.to_string()).collect();
        l.list_members = nested.iter().map(|n| n.to_string()).collect();
        l
    }

    fn account(user_id: &str) -> UserAccount {
        UserAccount::new(user_id, format!("cn={},ou=people", user_id))
    }

    #[test]
    fn unset_group_means_no_restriction() {
        let r = resolver(MockDirectory::new("dir"));
        assert!(r.is_member(&account("alice"), None));
        assert!(r.is_member(&account("alice"), Some("")));
        assert!(r.is_member(&account("alice"), Some("  ")));
    }

    #[test]
    fn missing_group_means_no_restriction() {
        let r = resolver(MockDirectory::new("dir"));
        assert!(r.is_member(&account("alice"), Some("no-such-group")));
    }

    #[test]
    fn failed_lookup_denies() {
        let r = resolver(MockDirectory::new("dir").failing_on("flaky-group"));
        assert!(!r.is_member(&account("alice"), Some("flaky-group")));
    }

    #[test]
    fn direct_member_by_user_id_and_dn() {
        let store = MockDirectory::new("dir")
            .with_list(list("admins", &["alice"], &[]))
            .with_list(list("auditors", &["cn=bob,ou=people"], &[]));
        let r = resolver(store);
        assert!(r.is_member(&account("alice"), Some("admins")));
        assert!(r.is_member(&account("bob"), Some("auditors")));
        assert!(!r.is_member(&account("carol"), Some("admins")));
    }

    #[test]
    fn nested_list_resolution() {
        let store = MockDirectory::new("dir")
            .with_list(list("security-admins", &["alice"], &["ops-leads"]))
            .with_list(list("ops-leads", &["bob"], &[]));
        let r = resolver(store);
        assert!(r.is_member(&account("bob"), Some("security-admins")));
        assert!(!r.is_member(&account("carol"), Some("security-admins")));
    }

    #[test]
    fn role_matches_literally_and_by_resolved_dn() {
        let store = MockDirectory::new("dir")
            .with_list(list("stewards", &["data-steward"], &[]))
            .with_list(list("curators", &["cn=curator-role,ou=groups"], &[]))
            .with_list(list("curator-role", &[], &[]));
        let r = resolver(store);

        let mut by_name = account("dana");
        by_name.security_roles.insert("data-steward".to_string());
        assert!(r.is_member(&by_name, Some("stewards")));

        let mut by_dn = account("erin");
        by_dn.security_roles.insert("curator-role".to_string());
        assert!(r.is_member(&by_dn, Some("curators")));
    }

    #[test]
    fn cyclic_lists_terminate_without_match() {
        let store = MockDirectory::new("dir")
            .with_list(list("a", &[], &["b"]))
            .with_list(list("b", &[], &["a"]));
        let r = resolver(store);
        assert!(!r.is_member(&account("alice"), Some("a")));
    }

    #[test]
    fn self_referential_list_terminates() {
        let store = MockDirectory::new("dir").with_list(list("loop", &[], &["loop"]));
        let r = resolver(store);
        assert!(!r.is_member(&account("alice"), Some("loop")));
    }

    #[test]
    fn depth_bound_stops_deep_chains() {
        let mut store = MockDirectory::new("dir");
        // Chain g0 -> g1 -> ... -> g5, with the target user only at the end.
        for i in 0..5 {
            store = store.with_list(list(&format!("g{}", i), &[], &[&format!("g{}", i + 1)]));
        }
        store = store.with_list(list("g5", &["alice"], &[]));
        let client = DirectoryClient::new("test-server", vec![Arc::new(store)]);
        let shallow = MembershipResolver::new(
            Arc::new(client),
            LookupLimits {
                max_group_depth: 3,
                max_directory_lookups: 512,
            },
        );
        assert!(!shallow.is_member(&account("alice"), Some("g0")));

        let mut deep_store = MockDirectory::new("dir");
        for i in 0..5 {
            deep_store =
                deep_store.with_list(list(&format!("g{}", i), &[], &[&format!("g{}", i + 1)]));
        }
        deep_store = deep_store.with_list(list("g5", &["alice"], &[]));
        let deep = resolver(deep_store);
        assert!(deep.is_member(&account("alice"), Some("g0")));
    }

    #[test]
    fn missing_nested_list_is_skipped() {
        let store = MockDirectory::new("dir").with_list(list("parent", &[], &["dangling"]));
        let r = resolver(store);
        assert!(!r.is_member(&account("alice"), Some("parent")));
    }

    #[test]
    fn repeated_calls_are_idempotent() {
        let store = MockDirectory::new("dir")
            .with_list(list("security-admins", &["alice"], &["ops-leads"]))
            .with_list(list("ops-leads", &["bob"], &[]));
        let r = resolver(store);
        for _ in 0..3 {
            assert!(r.is_member(&account("bob"), Some("security-admins")));
            assert!(!r.is_member(&account("carol"), Some("security-admins")));
        }
    }

    #[test]
    fn zone_category_membership_fails_closed() {
        let store = MockDirectory::new("dir")
            .with_list(list("personal-zones", &["my-files"], &[]))
            .failing_on("flaky-zones");
        let r = resolver(store);
        assert!(r.is_name_in_group("my-files", "personal-zones"));
        assert!(!r.is_name_in_group("other-zone", "personal-zones"));
        // Absent or unconfigured policy groups place no zone in the category.
        assert!(!r.is_name_in_group("my-files", "no-such-group"));
        assert!(!r.is_name_in_group("my-files", ""));
        assert!(!r.is_name_in_group("my-files", "flaky-zones"));
    }

    #[test]
    fn zone_category_membership_follows_nesting() {
        let store = MockDirectory::new("dir")
            .with_list(list("readable-zones", &[], &["lake-zones"]))
            .with_list(list("lake-zones", &["data-lake"], &[]));
        let r = resolver(store);
        assert!(r.is_name_in_group("data-lake", "readable-zones"));
    }
}
