//! Common test utilities and fixtures for ZoneGate connector tests
//!
//! Provides a populated mock directory and a connector wired to it, shared by
//! the integration tests.

use std::collections::HashSet;
use std::sync::Arc;
use zonegate::directory::mock::MockDirectory;
use zonegate::{
    AccessOperation, AccountType, Classification, ConnectorConfig, ElementContext, NamedList,
    UserAccount, ZoneGateConnector,
};

/// Zones the fixture directory knows about. Every zone/operation group is
/// registered (empty unless a test scenario adds members) so the membership
/// no-restriction default does not mask channel behavior.
pub const FIXTURE_ZONES: &[&str] = &[
    "clinical",
    "my-files",
    "curation",
    "landing",
    "internal",
    "data-lake",
    "ingest",
    "restricted",
    "quarantine",
];

const FIXTURE_OPERATIONS: &[&str] = &[
    "CREATE", "READ", "UPDATE", "DELETE", "PUBLISH", "WITHDRAW",
];

pub fn list(name: &str, users: &[&str], nested: &[&str]) -> NamedList {
    let mut l = NamedList::new(name, format!("cn={},ou=groups,o=coco", name));
    l.user_members = users.iter().map(|u| u.to_string()).collect();
    l.list_members = nested.iter().map(|n| n.to_string()).collect();
    l
}

pub fn user(user_id: &str, account_type: AccountType) -> UserAccount {
    let mut account = UserAccount::new(user_id, format!("cn={},ou=people,o=coco", user_id));
    account.account_type = account_type;
    account
}

pub fn grant(account: &mut UserAccount, zone: &str, operation: AccessOperation) {
    account
        .zone_access
        .entry(zone.to_string())
        .or_insert_with(HashSet::new)
        .insert(operation);
}

/// An element carrying the given classifications.
pub fn element(qualified_name: &str, created_by: &str, classifications: Vec<Classification>) -> ElementContext {
    ElementContext {
        entity_guid: format!("guid-{}", qualified_name),
        type_name: "Asset".to_string(),
        qualified_name: qualified_name.to_string(),
        created_by: created_by.to_string(),
        classifications,
    }
}

/// Directory contents shared by the integration tests:
///
/// - `ann` administers the server; `tina` authors types.
/// - `alice` (employee) holds explicit READ/UPDATE grants on `clinical` and
///   may call the `asset-catalog` service.
/// - `sam` belongs to the `biz-ops` owner group.
/// - `carl` belongs to the `assets.sales-CREATE` element group.
/// - zone categories: `landing` all-users, `internal` employee-only,
///   `data-lake` readable, `ingest` automated, `restricted` non-external,
///   `my-files` personal, `curation` stewardship.
pub fn fixture_directory() -> MockDirectory {
    let mut store = MockDirectory::new("fixture")
        .with_list(list("server-admins", &["ann"], &[]))
        .with_list(list("server-operators", &[], &[]))
        .with_list(list("server-investigators", &[], &[]))
        .with_list(list("dynamic-type-authors", &["tina"], &[]))
        .with_list(list("instance-header-authors", &[], &[]))
        .with_list(list("metadata-server-asset-catalog", &["alice"], &[]))
        .with_list(list(
            "metadata-server-asset-catalog-searchAssets",
            &["alice"],
            &[],
        ))
        .with_list(list("assets.sales-CREATE", &["carl"], &[]))
        .with_list(list("biz-ops", &["sam"], &[]))
        .with_list(list("personal-zones", &["my-files"], &[]))
        .with_list(list("stewardship-zones", &["curation"], &[]))
        .with_list(list("all-user-zones", &["landing"], &[]))
        .with_list(list("employee-only-zones", &["internal"], &[]))
        .with_list(list("readable-zones", &["data-lake"], &[]))
        .with_list(list("automated-zones", &["ingest"], &[]))
        .with_list(list("non-external-zones", &["restricted"], &[]));

    for zone in FIXTURE_ZONES {
        for operation in FIXTURE_OPERATIONS {
            store = store.with_list(list(&format!("{}-zone-{}", zone, operation), &[], &[]));
        }
    }

    let mut alice = user("alice", AccountType::Employee);
    grant(&mut alice, "clinical", AccessOperation::Read);
    grant(&mut alice, "clinical", AccessOperation::Update);

    let mut dana = user("dana", AccountType::Employee);
    grant(&mut dana, "my-files", AccessOperation::Create);
    grant(&mut dana, "my-files", AccessOperation::Read);

    store
        .with_user(alice)
        .with_user(dana)
        .with_user(user("ann", AccountType::Employee))
        .with_user(user("tina", AccountType::Employee))
        .with_user(user("sam", AccountType::Employee))
        .with_user(user("carl", AccountType::Employee))
        .with_user(user("bob", AccountType::Contractor))
        .with_user(user("erin", AccountType::External))
        .with_user(user("etl-bot", AccountType::Digital))
}

pub fn fixture_config() -> ConnectorConfig {
    let mut config = ConnectorConfig::default();
    config.zone_baselines.supported = vec!["quarantine".to_string()];
    config
}

pub fn fixture_connector() -> ZoneGateConnector {
    let _ = env_logger::builder().is_test(true).try_init();
    ZoneGateConnector::new(fixture_config(), vec![Arc::new(fixture_directory())])
        .expect("fixture connector")
}
