//! Governance-zone policy evaluation
//!
//! Decides whether a user may perform an operation against an element's
//! governance zones. Three independent channels are tried per zone,
//! short-circuiting on the first grant:
//!
//! - explicit per-user zone grants carried on the account record;
//! - membership in the per-zone/operation directory group;
//! - for READ only, the broad zone-category groups gated by account type.
//!
//! An element whose zone list is empty is denied through this evaluator:
//! absent zone data never implicitly grants access.

use crate::config::{format_group_pattern, ConnectorConfig};
use crate::decision::{Decision, DenyReason};
use crate::directory::{AccountType, UserAccount};
use crate::element::AccessOperation;
use crate::membership::MembershipResolver;
use log::debug;
use std::sync::Arc;

#[derive(Clone)]
pub struct ZonePolicyEvaluator {
    config: Arc<ConnectorConfig>,
    membership: MembershipResolver,
}

impl ZonePolicyEvaluator {
    pub fn new(config: Arc<ConnectorConfig>, membership: MembershipResolver) -> Self {
        Self { config, membership }
    }

    /// Evaluate access to `zones` for `operation`.
    ///
    /// `element_creator` and `is_owner` feed the zone-instance policies for
    /// personal and stewardship zones.
    pub fn evaluate(
        &self,
        account: &UserAccount,
        zones: &[String],
        operation: AccessOperation,
        element_creator: Option<&str>,
        is_owner: bool,
    ) -> Decision {
        if zones.is_empty() {
            return Decision::Deny(DenyReason::NoZones);
        }

        for zone in zones {
            // Channel A: explicit grant recorded on the account.
            if account.has_explicit_zone_grant(zone, operation)
                && self.zone_instance_policies(zone, account, element_creator, is_owner)
            {
                debug!(
                    "zone {} grants {} to {} through explicit zone access",
                    zone, operation, account.user_id
                );
                return Decision::Allow;
            }

            // Channel B: per-zone/operation group membership.
            let group = format_group_pattern(
                &self.config.group_patterns.zone,
                &[zone, operation.wire_name()],
            );
            if self.membership.is_member(account, Some(&group))
                && self.zone_instance_policies(zone, account, element_creator, is_owner)
            {
                debug!(
                    "zone {} grants {} to {} through group {}",
                    zone, operation, account.user_id, group
                );
                return Decision::Allow;
            }

            // Channel C: zone categories, consulted for READ only.
            if operation == AccessOperation::Read
                && self.category_grant(zone, account.account_type)
            {
                debug!(
                    "zone {} grants READ to {} through a zone category",
                    zone, account.user_id
                );
                return Decision::Allow;
            }
        }
        Decision::Deny(DenyReason::NoMatchingChannel)
    }

    /// Zone-instance policies applied after a channel indicates provisional
    /// access.
    ///
    /// Personal zones are restricted to the element creator outright.
    /// Stewardship zones grant owners; a non-owner falls through to the
    /// unconditional grant at the end, which matches the behavior this
    /// connector replaces and is logged so the pass-through stays visible.
    fn zone_instance_policies(
        &self,
        zone: &str,
        account: &UserAccount,
        element_creator: Option<&str>,
        is_owner: bool,
    ) -> bool {
        let groups = &self.config.zone_policy_groups;
        if self.membership.is_name_in_group(zone, &groups.personal) {
            return element_creator == Some(account.user_id.as_str());
        }
        if self.membership.is_name_in_group(zone, &groups.stewardship) {
            if is_owner {
                return true;
            }
            debug!(
                "stewardship zone {} passed through for non-owner {}",
                zone, account.user_id
            );
        }
        true
    }

    /// First category group containing the zone decides; the account type
    /// either satisfies that category's gate or the category channel yields
    /// nothing for this zone.
    fn category_grant(&self, zone: &str, account_type: AccountType) -> bool {
        use AccountType::*;

        let groups = &self.config.zone_policy_groups;
        let categories: [(&str, fn(AccountType) -> bool); 5] = [
            (groups.all_users.as_str(), |_| true),
            (groups.employee_only.as_str(), |t| t == Employee),
            (groups.automated.as_str(), |t| t == Digital),
            (groups.readable.as_str(), |t| {
                matches!(t, Employee | Contractor | External)
            }),
            (groups.non_external.as_str(), |t| {
                matches!(t, Employee | Contractor)
            }),
        ];
        for (group, permits) in categories {
            if self.membership.is_name_in_group(zone, group) {
                return permits(account_type);
            }
        }
        false
    }

    /// Union a configured baseline with the zones the user holds an explicit
    /// grant for, for the given operation. Baseline order is preserved; the
    /// user's extra zones follow sorted.
    pub fn zones_for_operation(
        &self,
        account: &UserAccount,
        baseline: &[String],
        operation: AccessOperation,
    ) -> Vec<String> {
        let mut zones: Vec<String> = baseline.to_vec();
        let mut extra: Vec<String> = account
            .zone_access
            .iter()
            .filter(|(zone, operations)| {
                operations.contains(&operation) && !zones.contains(*zone)
            })
            .map(|(zone, _)| zone.clone())
            .collect();
        extra.sort();
        zones.extend(extra);
        zones
    }

    /// Zones the user may read from.
    pub fn supported_zones_for_user(&self, account: &UserAccount) -> Vec<String> {
        self.zones_for_operation(
            account,
            &self.config.zone_baselines.supported,
            AccessOperation::Read,
        )
    }

    /// Zones new elements created by the user land in.
    pub fn default_zones_for_user(&self, account: &UserAccount) -> Vec<String> {
        self.zones_for_operation(
            account,
            &self.config.zone_baselines.default,
            AccessOperation::Create,
        )
    }

    /// Zones the user may publish into.
    pub fn publish_zones_for_user(&self, account: &UserAccount) -> Vec<String> {
        self.zones_for_operation(
            account,
            &self.config.zone_baselines.publish,
            AccessOperation::Publish,
        )
    }

    /// Zones the user may withdraw into.
    pub fn withdraw_zones_for_user(&self, account: &UserAccount) -> Vec<String> {
        self.zones_for_operation(
            account,
            &self.config.zone_baselines.withdraw,
            AccessOperation::Withdraw,
        )
    }
}
