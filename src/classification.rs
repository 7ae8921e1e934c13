//! Classification-driven access evaluation
//!
//! Composes the three classification-based policies carried on a metadata
//! element: the security-tags veto, ownership resolution, and governance-zone
//! membership. The security-tags check is a hard veto — when an operation's
//! access-group list exists and excludes the caller, no zone or ownership
//! result can rescue the request.

use crate::config::{format_group_pattern, ConnectorConfig};
use crate::decision::{Decision, DenyReason};
use crate::directory::UserAccount;
use crate::element::{AccessOperation, ElementContext};
use crate::membership::MembershipResolver;
use crate::zones::ZonePolicyEvaluator;
use log::debug;
use std::sync::Arc;

#[derive(Clone)]
pub struct ClassificationEvaluator {
    config: Arc<ConnectorConfig>,
    membership: MembershipResolver,
    zones: ZonePolicyEvaluator,
}

impl ClassificationEvaluator {
    pub fn new(
        config: Arc<ConnectorConfig>,
        membership: MembershipResolver,
        zones: ZonePolicyEvaluator,
    ) -> Self {
        Self {
            config,
            membership,
            zones,
        }
    }

    /// Full classification/ownership/zone evaluation for one element and
    /// operation.
    pub fn evaluate(
        &self,
        account: &UserAccount,
        element: &ElementContext,
        operation: AccessOperation,
    ) -> Decision {
        if let Some(tags) = element.security_tags() {
            if let Some(permitted) = tags.access_groups.get(operation.wire_name()) {
                if !permitted.iter().any(|user| user == &account.user_id) {
                    debug!(
                        "security tags on {} veto {} for {}",
                        element.entity_guid, operation, account.user_id
                    );
                    return Decision::Deny(DenyReason::SecurityTagVeto { operation });
                }
            }
        }

        let is_owner = self.is_user_owner(account, element);
        self.zones.evaluate(
            account,
            &element.zone_membership(),
            operation,
            Some(element.created_by.as_str()),
            is_owner,
        )
    }

    /// Resolve the element's owner group from the ownership classification
    /// and test the caller's membership in it.
    ///
    /// Elements without an ownership classification have no owner group and
    /// nobody counts as owner.
    pub fn is_user_owner(&self, account: &UserAccount, element: &ElementContext) -> bool {
        let Some(ownership) = element.ownership() else {
            return false;
        };
        let group = format_group_pattern(
            &self.config.group_patterns.owner,
            &[
                ownership.owner.as_str(),
                ownership.owner_type_name.as_deref().unwrap_or(""),
                ownership.owner_property_name.as_deref().unwrap_or(""),
            ],
        );
        self.membership.is_member(account, Some(&group))
    }
}
