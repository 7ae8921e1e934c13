//! Connector configuration
//!
//! All policy knobs — group-name patterns, fixed group names, zone-category
//! policy groups, zone baselines, and lookup bounds — are read once when the
//! connector is constructed and are immutable for its lifetime. The host
//! platform can supply them as a flat option map (`from_options`) or as a
//! TOML file (`from_toml_file`); unset options keep their documented
//! defaults.

use crate::constants::*;
use crate::error::{ZoneGateError, ZoneGateResult};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Message-format style patterns used to derive concrete directory group
/// names. Placeholders `{0}`, `{1}`, ... are expanded positionally.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupPatterns {
    /// Parameters: server name, service name.
    pub server_service: String,
    /// Parameters: server name, service name, operation name.
    pub server_service_operation: String,
    /// Parameters: element qualified name, operation name.
    pub element: String,
    /// Parameters: owner, owner type name, owner property name.
    pub owner: String,
    /// Parameters: zone name, operation name.
    pub zone: String,
}

impl Default for GroupPatterns {
    fn default() -> Self {
        Self {
            server_service: "{0}-{1}".to_string(),
            server_service_operation: "{0}-{1}-{2}".to_string(),
            element: "{0}-{1}".to_string(),
            owner: "{0}".to_string(),
            zone: "{0}-zone-{1}".to_string(),
        }
    }
}

/// Fixed group names consulted by the administrative checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedGroups {
    pub server_admins: String,
    pub server_operators: String,
    pub server_investigators: String,
    pub dynamic_type_authors: String,
    pub instance_header_authors: String,
}

impl Default for FixedGroups {
    fn default() -> Self {
        Self {
            server_admins: "server-admins".to_string(),
            server_operators: "server-operators".to_string(),
            server_investigators: "server-investigators".to_string(),
            dynamic_type_authors: "dynamic-type-authors".to_string(),
            instance_header_authors: "instance-header-authors".to_string(),
        }
    }
}

/// Directory groups whose members are zone names, grouping zones into policy
/// categories. A zone's presence in one of these groups changes how the zone
/// policy evaluator treats it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ZonePolicyGroups {
    /// Zones where access additionally requires being the element creator.
    pub personal: String,
    /// Zones where access additionally consults element ownership.
    pub stewardship: String,
    /// READ category: any account type.
    pub all_users: String,
    /// READ category: employees only.
    pub employee_only: String,
    /// READ category: digital/automated accounts only.
    pub automated: String,
    /// READ category: employees, contractors, and external partners.
    pub readable: String,
    /// READ category: employees and contractors only.
    pub non_external: String,
}

impl Default for ZonePolicyGroups {
    fn default() -> Self {
        Self {
            personal: "personal-zones".to_string(),
            stewardship: "stewardship-zones".to_string(),
            all_users: "all-user-zones".to_string(),
            employee_only: "employee-only-zones".to_string(),
            automated: "automated-zones".to_string(),
            readable: "readable-zones".to_string(),
            non_external: "non-external-zones".to_string(),
        }
    }
}

/// Baseline zone lists unioned with a user's explicit grants by the zone-list
/// transforms.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneBaselines {
    /// Zones every user may read from.
    pub supported: Vec<String>,
    /// Zones new elements land in.
    pub default: Vec<String>,
    /// Zones elements may be published into.
    pub publish: Vec<String>,
    /// Zones elements may be withdrawn into.
    pub withdraw: Vec<String>,
}

/// Bounds on recursive group resolution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupLimits {
    /// Maximum nesting depth followed through `list_members`.
    pub max_group_depth: usize,
    /// Maximum directory calls charged to one top-level membership check.
    pub max_directory_lookups: usize,
}

impl Default for LookupLimits {
    fn default() -> Self {
        Self {
            max_group_depth: 32,
            max_directory_lookups: 512,
        }
    }
}

/// Complete connector configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorConfig {
    /// Name of the metadata server the connector protects; recorded in audit
    /// records.
    pub server_name: String,
    pub group_patterns: GroupPatterns,
    pub fixed_groups: FixedGroups,
    pub zone_policy_groups: ZonePolicyGroups,
    pub zone_baselines: ZoneBaselines,
    pub limits: LookupLimits,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            server_name: "metadata-server".to_string(),
            group_patterns: GroupPatterns::default(),
            fixed_groups: FixedGroups::default(),
            zone_policy_groups: ZonePolicyGroups::default(),
            zone_baselines: ZoneBaselines::default(),
            limits: LookupLimits::default(),
        }
    }
}

impl ConnectorConfig {
    /// Build a configuration from the host platform's flat option map.
    ///
    /// Unset options keep their defaults; unrecognized keys are logged and
    /// ignored.
    pub fn from_options(options: &HashMap<String, String>) -> ZoneGateResult<Self> {
        let mut config = Self::default();
        for (key, value) in options {
            match key.as_str() {
                OPT_SERVER_NAME => config.server_name = value.clone(),
                OPT_SERVER_SERVICE_PATTERN => {
                    config.group_patterns.server_service = value.clone();
                }
                OPT_SERVER_SERVICE_OPERATION_PATTERN => {
                    config.group_patterns.server_service_operation = value.clone();
                }
                OPT_ELEMENT_PATTERN => config.group_patterns.element = value.clone(),
                OPT_OWNER_PATTERN => config.group_patterns.owner = value.clone(),
                OPT_ZONE_PATTERN => config.group_patterns.zone = value.clone(),
                OPT_SERVER_ADMINS => config.fixed_groups.server_admins = value.clone(),
                OPT_SERVER_OPERATORS => config.fixed_groups.server_operators = value.clone(),
                OPT_SERVER_INVESTIGATORS => {
                    config.fixed_groups.server_investigators = value.clone();
                }
                OPT_DYNAMIC_TYPE_AUTHORS => {
                    config.fixed_groups.dynamic_type_authors = value.clone();
                }
                OPT_INSTANCE_HEADER_AUTHORS => {
                    config.fixed_groups.instance_header_authors = value.clone();
                }
                OPT_PERSONAL_ZONES_GROUP => config.zone_policy_groups.personal = value.clone(),
                OPT_STEWARDSHIP_ZONES_GROUP => {
                    config.zone_policy_groups.stewardship = value.clone();
                }
                OPT_ALL_USERS_ZONES_GROUP => config.zone_policy_groups.all_users = value.clone(),
                OPT_EMPLOYEE_ONLY_ZONES_GROUP => {
                    config.zone_policy_groups.employee_only = value.clone();
                }
                OPT_AUTOMATED_ZONES_GROUP => config.zone_policy_groups.automated = value.clone(),
                OPT_READABLE_ZONES_GROUP => config.zone_policy_groups.readable = value.clone(),
                OPT_NON_EXTERNAL_ZONES_GROUP => {
                    config.zone_policy_groups.non_external = value.clone();
                }
                OPT_SUPPORTED_ZONES => config.zone_baselines.supported = parse_zone_list(value),
                OPT_DEFAULT_ZONES => config.zone_baselines.default = parse_zone_list(value),
                OPT_PUBLISH_ZONES => config.zone_baselines.publish = parse_zone_list(value),
                OPT_WITHDRAW_ZONES => config.zone_baselines.withdraw = parse_zone_list(value),
                OPT_MAX_GROUP_DEPTH => {
                    config.limits.max_group_depth = parse_limit(key, value)?;
                }
                OPT_MAX_DIRECTORY_LOOKUPS => {
                    config.limits.max_directory_lookups = parse_limit(key, value)?;
                }
                other => {
                    warn!("ignoring unrecognized connector option {}", other);
                }
            }
        }
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file mirroring this struct's layout.
    pub fn from_toml_file(path: impl AsRef<Path>) -> ZoneGateResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ZoneGateError::Config(format!(
                "failed to read {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let config: Self = toml::from_str(&raw)
            .map_err(|e| ZoneGateError::Config(format!("invalid config file: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the evaluators rely on.
    pub fn validate(&self) -> ZoneGateResult<()> {
        let patterns = [
            ("zone group pattern", &self.group_patterns.zone, 2),
            ("element group pattern", &self.group_patterns.element, 2),
            (
                "server-service group pattern",
                &self.group_patterns.server_service,
                2,
            ),
            (
                "server-service-operation group pattern",
                &self.group_patterns.server_service_operation,
                3,
            ),
            ("owner group pattern", &self.group_patterns.owner, 1),
        ];
        for (label, pattern, arity) in patterns {
            if pattern.is_empty() {
                return Err(ZoneGateError::Config(format!("{} must not be empty", label)));
            }
            for index in 0..arity {
                let placeholder = format!("{{{}}}", index);
                if !pattern.contains(&placeholder) {
                    return Err(ZoneGateError::Config(format!(
                        "{} must reference placeholder {}",
                        label, placeholder
                    )));
                }
            }
        }
        if self.limits.max_group_depth == 0 {
            return Err(ZoneGateError::Config(
                "limits.max-group-depth must be at least 1".to_string(),
            ));
        }
        if self.limits.max_directory_lookups == 0 {
            return Err(ZoneGateError::Config(
                "limits.max-directory-lookups must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_zone_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|zone| !zone.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_limit(key: &str, value: &str) -> ZoneGateResult<usize> {
    value
        .parse::<usize>()
        .map_err(|_| ZoneGateError::Config(format!("option {} expects a number, got {:?}", key, value)))
}

/// Expand a message-format style pattern, substituting `{0}`, `{1}`, ...
/// positionally. Placeholders with no matching argument are kept literally.
pub fn format_group_pattern(pattern: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(pattern.len() + 16);
    let mut rest = pattern;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        match tail.find('}') {
            Some(close) => {
                match tail[1..close].parse::<usize>() {
                    Ok(index) if index < args.len() => out.push_str(args[index]),
                    _ => out.push_str(&tail[..=close]),
                }
                rest = &tail[close + 1..];
            }
            None => {
                out.push_str(tail);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
