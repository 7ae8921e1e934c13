/// Common constants used across the ZoneGate connector.
///
/// Classification names and property keys follow the metadata catalog's
/// conventions; option keys are the names recognized by
/// `ConnectorConfig::from_options`.
pub const OWNERSHIP_CLASSIFICATION: &str = "Ownership";
pub const ZONE_MEMBERSHIP_CLASSIFICATION: &str = "AssetZoneMembership";
pub const SECURITY_TAGS_CLASSIFICATION: &str = "SecurityTags";

pub const OWNER_PROPERTY: &str = "owner";
pub const OWNER_TYPE_NAME_PROPERTY: &str = "ownerTypeName";
pub const OWNER_PROPERTY_NAME_PROPERTY: &str = "ownerPropertyName";
pub const ZONE_MEMBERSHIP_PROPERTY: &str = "zoneMembership";
pub const ACCESS_GROUPS_PROPERTY: &str = "accessGroups";

// Recognized configuration option keys.
pub const OPT_SERVER_NAME: &str = "server.name";
pub const OPT_SERVER_SERVICE_PATTERN: &str = "groups.server-service-pattern";
pub const OPT_SERVER_SERVICE_OPERATION_PATTERN: &str = "groups.server-service-operation-pattern";
pub const OPT_ELEMENT_PATTERN: &str = "groups.element-pattern";
pub const OPT_OWNER_PATTERN: &str = "groups.owner-pattern";
pub const OPT_ZONE_PATTERN: &str = "groups.zone-pattern";
pub const OPT_SERVER_ADMINS: &str = "groups.server-admins";
pub const OPT_SERVER_OPERATORS: &str = "groups.server-operators";
pub const OPT_SERVER_INVESTIGATORS: &str = "groups.server-investigators";
pub const OPT_DYNAMIC_TYPE_AUTHORS: &str = "groups.dynamic-type-authors";
pub const OPT_INSTANCE_HEADER_AUTHORS: &str = "groups.instance-header-authors";
pub const OPT_PERSONAL_ZONES_GROUP: &str = "zones.personal-group";
pub const OPT_STEWARDSHIP_ZONES_GROUP: &str = "zones.stewardship-group";
pub const OPT_ALL_USERS_ZONES_GROUP: &str = "zones.all-users-group";
pub const OPT_EMPLOYEE_ONLY_ZONES_GROUP: &str = "zones.employee-only-group";
pub const OPT_AUTOMATED_ZONES_GROUP: &str = "zones.automated-group";
pub const OPT_READABLE_ZONES_GROUP: &str = "zones.readable-group";
pub const OPT_NON_EXTERNAL_ZONES_GROUP: &str = "zones.non-external-group";
pub const OPT_SUPPORTED_ZONES: &str = "zones.supported";
pub const OPT_DEFAULT_ZONES: &str = "zones.default";
pub const OPT_PUBLISH_ZONES: &str = "zones.publish";
pub const OPT_WITHDRAW_ZONES: &str = "zones.withdraw";
pub const OPT_MAX_GROUP_DEPTH: &str = "limits.max-group-depth";
pub const OPT_MAX_DIRECTORY_LOOKUPS: &str = "limits.max-directory-lookups";
