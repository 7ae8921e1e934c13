//! Security capability traits
//!
//! The connector's public surface is split into independent capabilities, one
//! trait per concern, rather than one monolithic interface. Every method
//! carries a provided default body that denies with a structured
//! not-authorized failure; a connector grants by overriding the method and
//! falls back to this layered default when its own checks find no match.

use crate::element::{Connection, ElementContext};
use crate::error::{ZoneGateError, ZoneGateResult};

/// Platform-level administrative checks.
pub trait PlatformSecurity {
    /// May the user provision a new metadata server instance?
    fn validate_user_for_new_server(&self, user_id: &str) -> ZoneGateResult<()> {
        Err(ZoneGateError::unauthorized(
            user_id,
            "issue a new server instance",
        ))
    }

    /// May the user operate the platform (start/stop servers)?
    fn validate_user_as_operator(&self, user_id: &str) -> ZoneGateResult<()> {
        Err(ZoneGateError::unauthorized(user_id, "operate the platform"))
    }

    /// May the user inspect platform diagnostics?
    fn validate_user_as_investigator(&self, user_id: &str) -> ZoneGateResult<()> {
        Err(ZoneGateError::unauthorized(
            user_id,
            "investigate the platform",
        ))
    }
}

/// Per-service checks on one metadata server.
pub trait ServiceSecurity {
    fn validate_user_for_service(&self, user_id: &str, service_name: &str) -> ZoneGateResult<()> {
        Err(ZoneGateError::unauthorized(
            user_id,
            format!("call service {}", service_name),
        ))
    }

    fn validate_user_for_service_operation(
        &self,
        user_id: &str,
        service_name: &str,
        operation_name: &str,
    ) -> ZoneGateResult<()> {
        Err(ZoneGateError::unauthorized(
            user_id,
            format!("call {} on service {}", operation_name, service_name),
        ))
    }
}

/// Lifecycle checks for standalone metadata elements and for members of an
/// anchor element.
pub trait ElementSecurity {
    fn validate_user_for_element_create(
        &self,
        user_id: &str,
        element: &ElementContext,
    ) -> ZoneGateResult<()> {
        Err(ZoneGateError::unauthorized(
            user_id,
            format!("create element {}", element.qualified_name),
        ))
    }

    fn validate_user_for_element_read(
        &self,
        user_id: &str,
        element: &ElementContext,
    ) -> ZoneGateResult<()> {
        Err(ZoneGateError::unauthorized(
            user_id,
            format!("read element {}", element.qualified_name),
        ))
    }

    fn validate_user_for_element_detail_update(
        &self,
        user_id: &str,
        element: &ElementContext,
    ) -> ZoneGateResult<()> {
        Err(ZoneGateError::unauthorized(
            user_id,
            format!("update element {}", element.qualified_name),
        ))
    }

    fn validate_user_for_element_status_update(
        &self,
        user_id: &str,
        element: &ElementContext,
    ) -> ZoneGateResult<()> {
        Err(ZoneGateError::unauthorized(
            user_id,
            format!("update the status of element {}", element.qualified_name),
        ))
    }

    fn validate_user_for_element_delete(
        &self,
        user_id: &str,
        element: &ElementContext,
    ) -> ZoneGateResult<()> {
        Err(ZoneGateError::unauthorized(
            user_id,
            format!("delete element {}", element.qualified_name),
        ))
    }

    fn validate_user_for_element_classify(
        &self,
        user_id: &str,
        element: &ElementContext,
        classification_name: &str,
    ) -> ZoneGateResult<()> {
        Err(ZoneGateError::unauthorized(
            user_id,
            format!(
                "classify element {} with {}",
                element.qualified_name, classification_name
            ),
        ))
    }

    fn validate_user_for_element_declassify(
        &self,
        user_id: &str,
        element: &ElementContext,
        classification_name: &str,
    ) -> ZoneGateResult<()> {
        Err(ZoneGateError::unauthorized(
            user_id,
            format!(
                "remove {} from element {}",
                classification_name, element.qualified_name
            ),
        ))
    }

    fn validate_user_for_element_attach(
        &self,
        user_id: &str,
        element: &ElementContext,
        attached: &ElementContext,
    ) -> ZoneGateResult<()> {
        Err(ZoneGateError::unauthorized(
            user_id,
            format!(
                "attach {} to element {}",
                attached.qualified_name, element.qualified_name
            ),
        ))
    }

    fn validate_user_for_element_detach(
        &self,
        user_id: &str,
        element: &ElementContext,
        attached: &ElementContext,
    ) -> ZoneGateResult<()> {
        Err(ZoneGateError::unauthorized(
            user_id,
            format!(
                "detach {} from element {}",
                attached.qualified_name, element.qualified_name
            ),
        ))
    }

    fn validate_user_for_element_add_feedback(
        &self,
        user_id: &str,
        element: &ElementContext,
    ) -> ZoneGateResult<()> {
        Err(ZoneGateError::unauthorized(
            user_id,
            format!("add feedback to element {}", element.qualified_name),
        ))
    }

    fn validate_user_for_element_delete_feedback(
        &self,
        user_id: &str,
        element: &ElementContext,
    ) -> ZoneGateResult<()> {
        Err(ZoneGateError::unauthorized(
            user_id,
            format!("delete feedback on element {}", element.qualified_name),
        ))
    }

    fn validate_user_for_anchor_member_read(
        &self,
        user_id: &str,
        anchor: &ElementContext,
        member: &ElementContext,
    ) -> ZoneGateResult<()> {
        Err(ZoneGateError::unauthorized(
            user_id,
            format!(
                "read member {} of anchor {}",
                member.qualified_name, anchor.qualified_name
            ),
        ))
    }

    fn validate_user_for_anchor_member_update(
        &self,
        user_id: &str,
        anchor: &ElementContext,
        member: &ElementContext,
    ) -> ZoneGateResult<()> {
        Err(ZoneGateError::unauthorized(
            user_id,
            format!(
                "update member {} of anchor {}",
                member.qualified_name, anchor.qualified_name
            ),
        ))
    }

    fn validate_user_for_anchor_member_status_update(
        &self,
        user_id: &str,
        anchor: &ElementContext,
        member: &ElementContext,
    ) -> ZoneGateResult<()> {
        Err(ZoneGateError::unauthorized(
            user_id,
            format!(
                "update the status of member {} of anchor {}",
                member.qualified_name, anchor.qualified_name
            ),
        ))
    }

    fn validate_user_for_anchor_member_classify(
        &self,
        user_id: &str,
        anchor: &ElementContext,
        member: &ElementContext,
        classification_name: &str,
    ) -> ZoneGateResult<()> {
        Err(ZoneGateError::unauthorized(
            user_id,
            format!(
                "classify member {} of anchor {} with {}",
                member.qualified_name, anchor.qualified_name, classification_name
            ),
        ))
    }

    fn validate_user_for_anchor_member_add_feedback(
        &self,
        user_id: &str,
        anchor: &ElementContext,
        member: &ElementContext,
    ) -> ZoneGateResult<()> {
        Err(ZoneGateError::unauthorized(
            user_id,
            format!(
                "add feedback to member {} of anchor {}",
                member.qualified_name, anchor.qualified_name
            ),
        ))
    }

    fn validate_user_for_anchor_member_delete_feedback(
        &self,
        user_id: &str,
        anchor: &ElementContext,
        member: &ElementContext,
    ) -> ZoneGateResult<()> {
        Err(ZoneGateError::unauthorized(
            user_id,
            format!(
                "delete feedback on member {} of anchor {}",
                member.qualified_name, anchor.qualified_name
            ),
        ))
    }
}

/// Connection visibility and selection.
pub trait ConnectionSecurity {
    fn validate_user_for_connection(
        &self,
        user_id: &str,
        connection: &Connection,
    ) -> ZoneGateResult<()> {
        Err(ZoneGateError::unauthorized(
            user_id,
            format!("use connection {}", connection.display_name),
        ))
    }

    /// Pick one readable connection from the candidates, or `None` when no
    /// candidates were supplied at all.
    fn select_connection(
        &self,
        user_id: &str,
        candidates: &[Connection],
    ) -> ZoneGateResult<Option<Connection>> {
        let _ = candidates;
        Err(ZoneGateError::unauthorized(user_id, "select a connection"))
    }
}

/// Repository-level type and instance header checks.
pub trait RepositorySecurity {
    fn validate_user_for_type_create(&self, user_id: &str, type_name: &str) -> ZoneGateResult<()> {
        Err(ZoneGateError::unauthorized(
            user_id,
            format!("create type {}", type_name),
        ))
    }

    fn validate_user_for_type_read(&self, user_id: &str, type_name: &str) -> ZoneGateResult<()> {
        Err(ZoneGateError::unauthorized(
            user_id,
            format!("read type {}", type_name),
        ))
    }

    fn validate_user_for_type_update(&self, user_id: &str, type_name: &str) -> ZoneGateResult<()> {
        Err(ZoneGateError::unauthorized(
            user_id,
            format!("update type {}", type_name),
        ))
    }

    fn validate_user_for_type_delete(&self, user_id: &str, type_name: &str) -> ZoneGateResult<()> {
        Err(ZoneGateError::unauthorized(
            user_id,
            format!("delete type {}", type_name),
        ))
    }

    fn validate_user_for_instance_re_identify(
        &self,
        user_id: &str,
        element: &ElementContext,
    ) -> ZoneGateResult<()> {
        Err(ZoneGateError::unauthorized(
            user_id,
            format!("re-identify instance {}", element.entity_guid),
        ))
    }

    fn validate_user_for_instance_re_type(
        &self,
        user_id: &str,
        element: &ElementContext,
    ) -> ZoneGateResult<()> {
        Err(ZoneGateError::unauthorized(
            user_id,
            format!("re-type instance {}", element.entity_guid),
        ))
    }

    fn validate_user_for_instance_re_home(
        &self,
        user_id: &str,
        element: &ElementContext,
    ) -> ZoneGateResult<()> {
        Err(ZoneGateError::unauthorized(
            user_id,
            format!("re-home instance {}", element.entity_guid),
        ))
    }
}

/// The base security implementation: every capability method keeps its
/// provided default body, so every check refuses.
///
/// Connectors delegate to this when their own policy finds no match, keeping
/// the layered default-deny in one place.
pub struct DefaultDeny;

impl PlatformSecurity for DefaultDeny {}
impl ServiceSecurity for DefaultDeny {}
impl ElementSecurity for DefaultDeny {}
impl ConnectionSecurity for DefaultDeny {}
impl RepositorySecurity for DefaultDeny {}

/// Zone-list transforms computed per user.
pub trait ZoneSecurity {
    /// Zones the user may read from.
    fn supported_zones_for_user(&self, user_id: &str) -> ZoneGateResult<Vec<String>>;

    /// Zones new elements created by the user land in.
    fn default_zones_for_user(&self, user_id: &str) -> ZoneGateResult<Vec<String>>;

    /// Zones the user may publish into.
    fn publish_zones_for_user(&self, user_id: &str) -> ZoneGateResult<Vec<String>>;

    /// Zones the user may withdraw into.
    fn withdraw_zones_for_user(&self, user_id: &str) -> ZoneGateResult<Vec<String>>;
}
