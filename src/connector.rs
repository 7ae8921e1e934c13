//! Authorization facade
//!
//! `ZoneGateConnector` is the connector instance a metadata server holds for
//! its lifetime: immutable configuration, the directory client, and the three
//! evaluators, behind the capability traits the platform calls at each
//! lifecycle checkpoint.
//!
//! Every check follows the same layering: resolve the calling user's account
//! (unknown users fail immediately), apply this connector's group or
//! classification policy, and on no match delegate to [`DefaultDeny`] — the
//! base implementation whose every method refuses. The connector itself only
//! manufactures errors for unknown users and the security-tag veto.

use crate::capabilities::{
    ConnectionSecurity, DefaultDeny, ElementSecurity, PlatformSecurity, RepositorySecurity,
    ServiceSecurity, ZoneSecurity,
};
use crate::classification::ClassificationEvaluator;
use crate::config::{format_group_pattern, ConnectorConfig};
use crate::decision::{Decision, DenyReason};
use crate::directory::{DirectoryClient, DirectoryStore, UserAccount};
use crate::element::{AccessOperation, Connection, ElementContext};
use crate::error::{ZoneGateError, ZoneGateResult};
use crate::membership::MembershipResolver;
use crate::zones::ZonePolicyEvaluator;
use log::{debug, info};
use rand::Rng;
use std::sync::Arc;

pub struct ZoneGateConnector {
    config: Arc<ConnectorConfig>,
    directory: Arc<DirectoryClient>,
    membership: MembershipResolver,
    zones: ZonePolicyEvaluator,
    classification: ClassificationEvaluator,
}

impl ZoneGateConnector {
    pub fn new(
        config: ConnectorConfig,
        stores: Vec<Arc<dyn DirectoryStore>>,
    ) -> ZoneGateResult<Self> {
        config.validate()?;
        let config = Arc::new(config);
        let directory = Arc::new(DirectoryClient::new(config.server_name.clone(), stores));
        let membership = MembershipResolver::new(Arc::clone(&directory), config.limits);
        let zones = ZonePolicyEvaluator::new(Arc::clone(&config), membership.clone());
        let classification = ClassificationEvaluator::new(
            Arc::clone(&config),
            membership.clone(),
            zones.clone(),
        );
        info!(
            "zonegate connector started for server {}",
            config.server_name
        );
        Ok(Self {
            config,
            directory,
            membership,
            zones,
            classification,
        })
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    pub fn zone_evaluator(&self) -> &ZonePolicyEvaluator {
        &self.zones
    }

    pub fn classification_evaluator(&self) -> &ClassificationEvaluator {
        &self.classification
    }

    /// Resolve the calling user's account.
    ///
    /// Every check starts here; an identity no configured store can resolve
    /// fails immediately and is never retried.
    pub fn user_account(&self, user_id: &str) -> ZoneGateResult<UserAccount> {
        self.directory
            .find_user(user_id)
            .ok_or_else(|| ZoneGateError::unknown_user(user_id))
    }

    /// Resolve the account and test membership in `group_name`.
    ///
    /// Errors only when the account itself cannot be resolved; the membership
    /// answer is a plain boolean.
    pub fn validate_user_in_group(&self, user_id: &str, group_name: &str) -> ZoneGateResult<bool> {
        let account = self.user_account(user_id)?;
        Ok(self.membership.is_member(&account, Some(group_name)))
    }

    /// Stub policy shared by the pass-through checkpoints: any user with a
    /// resolvable account is granted.
    fn validate_known_user(&self, user_id: &str) -> ZoneGateResult<()> {
        self.user_account(user_id).map(|_| ())
    }
}

impl PlatformSecurity for ZoneGateConnector {
    fn validate_user_for_new_server(&self, user_id: &str) -> ZoneGateResult<()> {
        if self.validate_user_in_group(user_id, &self.config.fixed_groups.server_admins)? {
            return Ok(());
        }
        DefaultDeny.validate_user_for_new_server(user_id)
    }

    fn validate_user_as_operator(&self, user_id: &str) -> ZoneGateResult<()> {
        if self.validate_user_in_group(user_id, &self.config.fixed_groups.server_operators)? {
            return Ok(());
        }
        DefaultDeny.validate_user_as_operator(user_id)
    }

    fn validate_user_as_investigator(&self, user_id: &str) -> ZoneGateResult<()> {
        if self.validate_user_in_group(user_id, &self.config.fixed_groups.server_investigators)? {
            return Ok(());
        }
        DefaultDeny.validate_user_as_investigator(user_id)
    }
}

impl ServiceSecurity for ZoneGateConnector {
    fn validate_user_for_service(&self, user_id: &str, service_name: &str) -> ZoneGateResult<()> {
        let group = format_group_pattern(
            &self.config.group_patterns.server_service,
            &[self.config.server_name.as_str(), service_name],
        );
        if self.validate_user_in_group(user_id, &group)? {
            return Ok(());
        }
        DefaultDeny.validate_user_for_service(user_id, service_name)
    }

    fn validate_user_for_service_operation(
        &self,
        user_id: &str,
        service_name: &str,
        operation_name: &str,
    ) -> ZoneGateResult<()> {
        let group = format_group_pattern(
            &self.config.group_patterns.server_service_operation,
            &[
                self.config.server_name.as_str(),
                service_name,
                operation_name,
            ],
        );
        if self.validate_user_in_group(user_id, &group)? {
            return Ok(());
        }
        DefaultDeny.validate_user_for_service_operation(user_id, service_name, operation_name)
    }
}

impl ElementSecurity for ZoneGateConnector {
    fn validate_user_for_element_create(
        &self,
        user_id: &str,
        element: &ElementContext,
    ) -> ZoneGateResult<()> {
        let account = self.user_account(user_id)?;
        match self
            .classification
            .evaluate(&account, element, AccessOperation::Create)
        {
            Decision::Allow => Ok(()),
            // Hard veto: the group fallback must not rescue the request.
            Decision::Deny(DenyReason::SecurityTagVeto { .. }) => Err(
                ZoneGateError::unauthorized(
                    user_id,
                    format!("create element {}", element.qualified_name),
                ),
            ),
            Decision::Deny(reason) => {
                debug!(
                    "classification check declined create of {} for {}: {}; trying element group",
                    element.qualified_name, user_id, reason
                );
                let group = format_group_pattern(
                    &self.config.group_patterns.element,
                    &[
                        element.qualified_name.as_str(),
                        AccessOperation::Create.wire_name(),
                    ],
                );
                if self.membership.is_member(&account, Some(&group)) {
                    Ok(())
                } else {
                    DefaultDeny.validate_user_for_element_create(user_id, element)
                }
            }
        }
    }

    // The remaining element checkpoints are intentionally permissive
    // placeholders: any user with a resolvable account is granted, and only
    // an unknown identity denies.

    fn validate_user_for_element_read(
        &self,
        user_id: &str,
        _element: &ElementContext,
    ) -> ZoneGateResult<()> {
        self.validate_known_user(user_id)
    }

    fn validate_user_for_element_detail_update(
        &self,
        user_id: &str,
        _element: &ElementContext,
    ) -> ZoneGateResult<()> {
        self.validate_known_user(user_id)
    }

    fn validate_user_for_element_status_update(
        &self,
        user_id: &str,
        _element: &ElementContext,
    ) -> ZoneGateResult<()> {
        self.validate_known_user(user_id)
    }

    fn validate_user_for_element_delete(
        &self,
        user_id: &str,
        _element: &ElementContext,
    ) -> ZoneGateResult<()> {
        self.validate_known_user(user_id)
    }

    fn validate_user_for_element_classify(
        &self,
        user_id: &str,
        _element: &ElementContext,
        _classification_name: &str,
    ) -> ZoneGateResult<()> {
        self.validate_known_user(user_id)
    }

    fn validate_user_for_element_declassify(
        &self,
        user_id: &str,
        _element: &ElementContext,
        _classification_name: &str,
    ) -> ZoneGateResult<()> {
        self.validate_known_user(user_id)
    }

    fn validate_user_for_element_attach(
        &self,
        user_id: &str,
        _element: &ElementContext,
        _attached: &ElementContext,
    ) -> ZoneGateResult<()> {
        self.validate_known_user(user_id)
    }

    fn validate_user_for_element_detach(
        &self,
        user_id: &str,
        _element: &ElementContext,
        _attached: &ElementContext,
    ) -> ZoneGateResult<()> {
        self.validate_known_user(user_id)
    }

    fn validate_user_for_element_add_feedback(
        &self,
        user_id: &str,
        _element: &ElementContext,
    ) -> ZoneGateResult<()> {
        self.validate_known_user(user_id)
    }

    fn validate_user_for_element_delete_feedback(
        &self,
        user_id: &str,
        _element: &ElementContext,
    ) -> ZoneGateResult<()> {
        self.validate_known_user(user_id)
    }

    fn validate_user_for_anchor_member_read(
        &self,
        user_id: &str,
        _anchor: &ElementContext,
        _member: &ElementContext,
    ) -> ZoneGateResult<()> {
        self.validate_known_user(user_id)
    }

    fn validate_user_for_anchor_member_update(
        &self,
        user_id: &str,
        _anchor: &ElementContext,
        _member: &ElementContext,
    ) -> ZoneGateResult<()> {
        self.validate_known_user(user_id)
    }

    fn validate_user_for_anchor_member_status_update(
        &self,
        user_id: &str,
        _anchor: &ElementContext,
        _member: &ElementContext,
    ) -> ZoneGateResult<()> {
        self.validate_known_user(user_id)
    }

    fn validate_user_for_anchor_member_classify(
        &self,
        user_id: &str,
        _anchor: &ElementContext,
        _member: &ElementContext,
        _classification_name: &str,
    ) -> ZoneGateResult<()> {
        self.validate_known_user(user_id)
    }

    fn validate_user_for_anchor_member_add_feedback(
        &self,
        user_id: &str,
        _anchor: &ElementContext,
        _member: &ElementContext,
    ) -> ZoneGateResult<()> {
        self.validate_known_user(user_id)
    }

    fn validate_user_for_anchor_member_delete_feedback(
        &self,
        user_id: &str,
        _anchor: &ElementContext,
        _member: &ElementContext,
    ) -> ZoneGateResult<()> {
        self.validate_known_user(user_id)
    }
}

impl ConnectionSecurity for ZoneGateConnector {
    fn validate_user_for_connection(
        &self,
        user_id: &str,
        connection: &Connection,
    ) -> ZoneGateResult<()> {
        self.validate_user_for_element_read(user_id, &connection.element)
    }

    fn select_connection(
        &self,
        user_id: &str,
        candidates: &[Connection],
    ) -> ZoneGateResult<Option<Connection>> {
        if candidates.is_empty() {
            return Ok(None);
        }
        let mut readable = Vec::new();
        let mut last_denial = None;
        for candidate in candidates {
            match self.validate_user_for_connection(user_id, candidate) {
                Ok(()) => readable.push(candidate.clone()),
                Err(error) => last_denial = Some(error),
            }
        }
        match readable.len() {
            0 => Err(last_denial.unwrap_or_else(|| {
                ZoneGateError::unauthorized(user_id, "use any candidate connection")
            })),
            1 => Ok(readable.pop()),
            // Several readable candidates: pick uniformly at random.
            count => {
                let index = rand::thread_rng().gen_range(0..count);
                Ok(Some(readable.swap_remove(index)))
            }
        }
    }
}

impl RepositorySecurity for ZoneGateConnector {
    fn validate_user_for_type_create(&self, user_id: &str, type_name: &str) -> ZoneGateResult<()> {
        if self.validate_user_in_group(user_id, &self.config.fixed_groups.dynamic_type_authors)? {
            return Ok(());
        }
        DefaultDeny.validate_user_for_type_create(user_id, type_name)
    }

    /// Reading type definitions is a pass-through: any known user.
    fn validate_user_for_type_read(&self, user_id: &str, _type_name: &str) -> ZoneGateResult<()> {
        self.validate_known_user(user_id)
    }

    fn validate_user_for_type_update(&self, user_id: &str, type_name: &str) -> ZoneGateResult<()> {
        if self.validate_user_in_group(user_id, &self.config.fixed_groups.dynamic_type_authors)? {
            return Ok(());
        }
        DefaultDeny.validate_user_for_type_update(user_id, type_name)
    }

    fn validate_user_for_type_delete(&self, user_id: &str, type_name: &str) -> ZoneGateResult<()> {
        if self.validate_user_in_group(user_id, &self.config.fixed_groups.dynamic_type_authors)? {
            return Ok(());
        }
        DefaultDeny.validate_user_for_type_delete(user_id, type_name)
    }

    fn validate_user_for_instance_re_identify(
        &self,
        user_id: &str,
        element: &ElementContext,
    ) -> ZoneGateResult<()> {
        if self
            .validate_user_in_group(user_id, &self.config.fixed_groups.instance_header_authors)?
        {
            return Ok(());
        }
        DefaultDeny.validate_user_for_instance_re_identify(user_id, element)
    }

    fn validate_user_for_instance_re_type(
        &self,
        user_id: &str,
        element: &ElementContext,
    ) -> ZoneGateResult<()> {
        if self
            .validate_user_in_group(user_id, &self.config.fixed_groups.instance_header_authors)?
        {
            return Ok(());
        }
        DefaultDeny.validate_user_for_instance_re_type(user_id, element)
    }

    fn validate_user_for_instance_re_home(
        &self,
        user_id: &str,
        element: &ElementContext,
    ) -> ZoneGateResult<()> {
        if self
            .validate_user_in_group(user_id, &self.config.fixed_groups.instance_header_authors)?
        {
            return Ok(());
        }
        DefaultDeny.validate_user_for_instance_re_home(user_id, element)
    }
}

impl ZoneSecurity for ZoneGateConnector {
    fn supported_zones_for_user(&self, user_id: &str) -> ZoneGateResult<Vec<String>> {
        let account = self.user_account(user_id)?;
        Ok(self.zones.supported_zones_for_user(&account))
    }

    fn default_zones_for_user(&self, user_id: &str) -> ZoneGateResult<Vec<String>> {
        let account = self.user_account(user_id)?;
        Ok(self.zones.default_zones_for_user(&account))
    }

    fn publish_zones_for_user(&self, user_id: &str) -> ZoneGateResult<Vec<String>> {
        let account = self.user_account(user_id)?;
        Ok(self.zones.publish_zones_for_user(&account))
    }

    fn withdraw_zones_for_user(&self, user_id: &str) -> ZoneGateResult<Vec<String>> {
        let account = self.user_account(user_id)?;
        Ok(self.zones.withdraw_zones_for_user(&account))
    }
}
