//! Integration tests for the authorization facade.

mod common;

use common::{element, fixture_connector};
use serde_json::json;
use zonegate::constants::{
    ACCESS_GROUPS_PROPERTY, SECURITY_TAGS_CLASSIFICATION, ZONE_MEMBERSHIP_CLASSIFICATION,
    ZONE_MEMBERSHIP_PROPERTY,
};
use zonegate::{
    Classification, Connection, ConnectionSecurity, ElementSecurity, PlatformSecurity,
    RepositorySecurity, ServiceSecurity, ZoneGateError,
};

fn zoned(zones: &[&str]) -> Classification {
    Classification::new(ZONE_MEMBERSHIP_CLASSIFICATION)
        .with_property(ZONE_MEMBERSHIP_PROPERTY, json!(zones))
}

fn connection(name: &str, qualified_name: &str) -> Connection {
    Connection {
        display_name: name.to_string(),
        element: element(qualified_name, "alice", Vec::new()),
    }
}

#[test]
fn unknown_user_fails_immediately() {
    let c = fixture_connector();
    let asset = element("assets.sales", "alice", Vec::new());

    assert!(matches!(
        c.validate_user_for_element_read("ghost", &asset),
        Err(ZoneGateError::UnknownUser { .. })
    ));
    assert!(matches!(
        c.validate_user_for_new_server("ghost"),
        Err(ZoneGateError::UnknownUser { .. })
    ));
    assert!(matches!(
        c.validate_user_for_element_create("ghost", &asset),
        Err(ZoneGateError::UnknownUser { .. })
    ));
}

#[test]
fn server_admin_group_gates_new_server() {
    let c = fixture_connector();
    assert!(c.validate_user_for_new_server("ann").is_ok());
    assert!(matches!(
        c.validate_user_for_new_server("alice"),
        Err(ZoneGateError::Unauthorized { .. })
    ));
}

#[test]
fn empty_operator_group_denies_everyone() {
    let c = fixture_connector();
    for user_id in ["ann", "alice", "bob"] {
        assert!(matches!(
            c.validate_user_as_operator(user_id),
            Err(ZoneGateError::Unauthorized { .. })
        ));
        assert!(matches!(
            c.validate_user_as_investigator(user_id),
            Err(ZoneGateError::Unauthorized { .. })
        ));
    }
}

#[test]
fn service_groups_derive_from_patterns() {
    let c = fixture_connector();
    assert!(c.validate_user_for_service("alice", "asset-catalog").is_ok());
    assert!(matches!(
        c.validate_user_for_service("bob", "asset-catalog"),
        Err(ZoneGateError::Unauthorized { .. })
    ));

    assert!(c
        .validate_user_for_service_operation("alice", "asset-catalog", "searchAssets")
        .is_ok());
    assert!(matches!(
        c.validate_user_for_service_operation("bob", "asset-catalog", "searchAssets"),
        Err(ZoneGateError::Unauthorized { .. })
    ));
}

#[test]
fn unregistered_service_group_means_no_restriction() {
    // No group record exists for this service, so the membership default
    // applies and any known user passes.
    let c = fixture_connector();
    assert!(c.validate_user_for_service("bob", "unrestricted-service").is_ok());
}

#[test]
fn element_create_grants_creator_in_personal_zone() {
    let c = fixture_connector();
    let personal = element("dana.notes", "dana", vec![zoned(&["my-files"])]);
    assert!(c.validate_user_for_element_create("dana", &personal).is_ok());
}

#[test]
fn element_create_falls_back_to_element_group() {
    let c = fixture_connector();
    // No zones at all: the classification check denies, the qualified-name
    // group admits carl only.
    let asset = element("assets.sales", "carl", Vec::new());
    assert!(c.validate_user_for_element_create("carl", &asset).is_ok());
    assert!(matches!(
        c.validate_user_for_element_create("bob", &asset),
        Err(ZoneGateError::Unauthorized { .. })
    ));
}

#[test]
fn element_create_security_tag_veto_beats_element_group() {
    let c = fixture_connector();
    // carl is in the assets.sales-CREATE group, but the tag allow-list for
    // CREATE excludes him.
    let asset = element(
        "assets.sales",
        "carl",
        vec![Classification::new(SECURITY_TAGS_CLASSIFICATION)
            .with_property(ACCESS_GROUPS_PROPERTY, json!({"CREATE": ["alice"]}))],
    );
    assert!(matches!(
        c.validate_user_for_element_create("carl", &asset),
        Err(ZoneGateError::Unauthorized { .. })
    ));
}

#[test]
fn element_lifecycle_checks_pass_for_known_users() {
    let c = fixture_connector();
    let asset = element("assets.sales", "alice", Vec::new());
    let member = element("assets.sales.schema", "alice", Vec::new());

    assert!(c.validate_user_for_element_read("bob", &asset).is_ok());
    assert!(c.validate_user_for_element_detail_update("bob", &asset).is_ok());
    assert!(c.validate_user_for_element_status_update("bob", &asset).is_ok());
    assert!(c.validate_user_for_element_delete("bob", &asset).is_ok());
    assert!(c
        .validate_user_for_element_classify("bob", &asset, "Confidentiality")
        .is_ok());
    assert!(c
        .validate_user_for_element_declassify("bob", &asset, "Confidentiality")
        .is_ok());
    assert!(c.validate_user_for_element_attach("bob", &asset, &member).is_ok());
    assert!(c.validate_user_for_element_detach("bob", &asset, &member).is_ok());
    assert!(c.validate_user_for_element_add_feedback("bob", &asset).is_ok());
    assert!(c.validate_user_for_element_delete_feedback("bob", &asset).is_ok());

    assert!(c
        .validate_user_for_anchor_member_read("bob", &asset, &member)
        .is_ok());
    assert!(c
        .validate_user_for_anchor_member_update("bob", &asset, &member)
        .is_ok());
    assert!(c
        .validate_user_for_anchor_member_status_update("bob", &asset, &member)
        .is_ok());
    assert!(c
        .validate_user_for_anchor_member_classify("bob", &asset, &member, "Confidentiality")
        .is_ok());
    assert!(c
        .validate_user_for_anchor_member_add_feedback("bob", &asset, &member)
        .is_ok());
    assert!(c
        .validate_user_for_anchor_member_delete_feedback("bob", &asset, &member)
        .is_ok());
}

#[test]
fn type_author_group_gates_type_mutations() {
    let c = fixture_connector();
    assert!(c.validate_user_for_type_create("tina", "CustomAsset").is_ok());
    assert!(c.validate_user_for_type_update("tina", "CustomAsset").is_ok());
    assert!(c.validate_user_for_type_delete("tina", "CustomAsset").is_ok());
    assert!(matches!(
        c.validate_user_for_type_create("alice", "CustomAsset"),
        Err(ZoneGateError::Unauthorized { .. })
    ));
    // Reading types is a pass-through for any known user.
    assert!(c.validate_user_for_type_read("alice", "CustomAsset").is_ok());
}

#[test]
fn instance_header_changes_require_their_group() {
    let c = fixture_connector();
    let asset = element("assets.sales", "alice", Vec::new());
    for user_id in ["ann", "tina", "alice"] {
        assert!(matches!(
            c.validate_user_for_instance_re_identify(user_id, &asset),
            Err(ZoneGateError::Unauthorized { .. })
        ));
        assert!(matches!(
            c.validate_user_for_instance_re_type(user_id, &asset),
            Err(ZoneGateError::Unauthorized { .. })
        ));
        assert!(matches!(
            c.validate_user_for_instance_re_home(user_id, &asset),
            Err(ZoneGateError::Unauthorized { .. })
        ));
    }
}

#[test]
fn select_connection_handles_empty_and_single_candidates() {
    let c = fixture_connector();
    assert!(c.select_connection("alice", &[]).unwrap().is_none());

    let only = connection("primary", "conn.primary");
    let picked = c.select_connection("alice", &[only.clone()]).unwrap().unwrap();
    assert_eq!(picked.display_name, "primary");
}

#[test]
fn select_connection_picks_among_readable_candidates() {
    let c = fixture_connector();
    let candidates = vec![
        connection("primary", "conn.primary"),
        connection("replica", "conn.replica"),
        connection("archive", "conn.archive"),
    ];
    for _ in 0..8 {
        let picked = c.select_connection("alice", &candidates).unwrap().unwrap();
        assert!(candidates.iter().any(|cand| cand.display_name == picked.display_name));
    }
}

#[test]
fn select_connection_propagates_denial_for_unknown_user() {
    let c = fixture_connector();
    let candidates = vec![connection("primary", "conn.primary")];
    assert!(matches!(
        c.select_connection("ghost", &candidates),
        Err(ZoneGateError::UnknownUser { .. })
    ));
}
