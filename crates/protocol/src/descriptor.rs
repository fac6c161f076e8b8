//! Repository descriptors.
//!
//! A descriptor is a repository-wide metadata key/value pair describing the
//! implementation's identity and capabilities. Values are either a single
//! string or an ordered list of strings.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Descriptor map as returned by a transport, keyed by descriptor name.
///
/// Keeps the order in which the transport produced the entries.
pub type Descriptors = IndexMap<String, DescriptorValue>;

/// Value of a single descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DescriptorValue {
    /// Single-valued descriptor
    Single(String),
    /// Multi-valued descriptor, order is significant
    Multiple(Vec<String>),
}

impl DescriptorValue {
    /// Returns the value if this descriptor is single-valued.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DescriptorValue::Single(value) => Some(value),
            DescriptorValue::Multiple(_) => None,
        }
    }

    /// Returns all values; a single-valued descriptor yields one element.
    pub fn values(&self) -> &[String] {
        match self {
            DescriptorValue::Single(value) => std::slice::from_ref(value),
            DescriptorValue::Multiple(values) => values,
        }
    }

    /// Returns true for multi-valued descriptors.
    pub fn is_multiple(&self) -> bool {
        matches!(self, DescriptorValue::Multiple(_))
    }

    /// Interprets a single value of `"true"` / `"false"` as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self.as_str()? {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }
}

impl From<&str> for DescriptorValue {
    fn from(value: &str) -> Self {
        DescriptorValue::Single(value.to_string())
    }
}

impl From<String> for DescriptorValue {
    fn from(value: String) -> Self {
        DescriptorValue::Single(value)
    }
}

impl From<Vec<String>> for DescriptorValue {
    fn from(values: Vec<String>) -> Self {
        DescriptorValue::Multiple(values)
    }
}

impl From<Vec<&str>> for DescriptorValue {
    fn from(values: Vec<&str>) -> Self {
        DescriptorValue::Multiple(values.into_iter().map(str::to_string).collect())
    }
}

/// Standard descriptor keys defined by the content repository API.
pub mod keys {
    pub const SPEC_VERSION_DESC: &str = "jcr.specification.version";
    pub const SPEC_NAME_DESC: &str = "jcr.specification.name";
    pub const REP_VENDOR_DESC: &str = "jcr.repository.vendor";
    pub const REP_VENDOR_URL_DESC: &str = "jcr.repository.vendor.url";
    pub const REP_NAME_DESC: &str = "jcr.repository.name";
    pub const REP_VERSION_DESC: &str = "jcr.repository.version";

    pub const WRITE_SUPPORTED: &str = "write.supported";
    pub const IDENTIFIER_STABILITY: &str = "identifier.stability";

    pub const OPTION_XML_IMPORT_SUPPORTED: &str = "option.xml.import.supported";
    pub const OPTION_XML_EXPORT_SUPPORTED: &str = "option.xml.export.supported";
    pub const OPTION_UNFILED_CONTENT_SUPPORTED: &str = "option.unfiled.content.supported";
    pub const OPTION_SIMPLE_VERSIONING_SUPPORTED: &str = "option.simple.versioning.supported";
    pub const OPTION_VERSIONING_SUPPORTED: &str = "option.versioning.supported";
    pub const OPTION_ACTIVITIES_SUPPORTED: &str = "option.activities.supported";
    pub const OPTION_BASELINES_SUPPORTED: &str = "option.baselines.supported";
    pub const OPTION_ACCESS_CONTROL_SUPPORTED: &str = "option.access.control.supported";
    pub const OPTION_LOCKING_SUPPORTED: &str = "option.locking.supported";
    pub const OPTION_OBSERVATION_SUPPORTED: &str = "option.observation.supported";
    pub const OPTION_JOURNALED_OBSERVATION_SUPPORTED: &str =
        "option.journaled.observation.supported";
    pub const OPTION_RETENTION_SUPPORTED: &str = "option.retention.supported";
    pub const OPTION_LIFECYCLE_SUPPORTED: &str = "option.lifecycle.supported";
    pub const OPTION_TRANSACTIONS_SUPPORTED: &str = "option.transactions.supported";
    pub const OPTION_WORKSPACE_MANAGEMENT_SUPPORTED: &str =
        "option.workspace.management.supported";
    pub const OPTION_UPDATE_PRIMARY_NODE_TYPE_SUPPORTED: &str =
        "option.update.primary.node.type.supported";
    pub const OPTION_UPDATE_MIXIN_NODE_TYPES_SUPPORTED: &str =
        "option.update.mixin.node.types.supported";
    pub const OPTION_SHAREABLE_NODES_SUPPORTED: &str = "option.shareable.nodes.supported";
    pub const OPTION_NODE_TYPE_MANAGEMENT_SUPPORTED: &str =
        "option.node.type.management.supported";
    pub const OPTION_NODE_AND_PROPERTY_WITH_SAME_NAME_SUPPORTED: &str =
        "option.node.and.property.with.same.name.supported";

    pub const NODE_TYPE_MANAGEMENT_INHERITANCE: &str = "node.type.management.inheritance";
    pub const NODE_TYPE_MANAGEMENT_OVERRIDES_SUPPORTED: &str =
        "node.type.management.overrides.supported";
    pub const NODE_TYPE_MANAGEMENT_PRIMARY_ITEM_NAME_SUPPORTED: &str =
        "node.type.management.primary.item.name.supported";
    pub const NODE_TYPE_MANAGEMENT_ORDERABLE_CHILD_NODES_SUPPORTED: &str =
        "node.type.management.orderable.child.nodes.supported";
    pub const NODE_TYPE_MANAGEMENT_RESIDUAL_DEFINITIONS_SUPPORTED: &str =
        "node.type.management.residual.definitions.supported";
    pub const NODE_TYPE_MANAGEMENT_AUTOCREATED_DEFINITIONS_SUPPORTED: &str =
        "node.type.management.autocreated.definitions.supported";
    pub const NODE_TYPE_MANAGEMENT_SAME_NAME_SIBLINGS_SUPPORTED: &str =
        "node.type.management.same.name.siblings.supported";
    pub const NODE_TYPE_MANAGEMENT_PROPERTY_TYPES: &str = "node.type.management.property.types";
    pub const NODE_TYPE_MANAGEMENT_MULTIVALUED_PROPERTIES_SUPPORTED: &str =
        "node.type.management.multivalued.properties.supported";
    pub const NODE_TYPE_MANAGEMENT_MULTIPLE_BINARY_PROPERTIES_SUPPORTED: &str =
        "node.type.management.multiple.binary.properties.supported";
    pub const NODE_TYPE_MANAGEMENT_VALUE_CONSTRAINTS_SUPPORTED: &str =
        "node.type.management.value.constraints.supported";
    // The misspelling is part of the published key.
    pub const NODE_TYPE_MANAGEMENT_UPDATE_IN_USE_SUPPORTED: &str =
        "node.type.management.update.in.use.suported";

    pub const QUERY_LANGUAGES: &str = "query.languages";
    pub const QUERY_STORED_QUERIES_SUPPORTED: &str = "query.stored.queries.supported";
    pub const QUERY_FULL_TEXT_SEARCH_SUPPORTED: &str = "query.full.text.search.supported";
    pub const QUERY_JOINS: &str = "query.joins";

    pub const LEVEL_1_SUPPORTED: &str = "level.1.supported";
    pub const LEVEL_2_SUPPORTED: &str = "level.2.supported";
    pub const OPTION_QUERY_SQL_SUPPORTED: &str = "option.query.sql.supported";
    pub const QUERY_XPATH_POS_INDEX: &str = "query.xpath.pos.index";
    pub const QUERY_XPATH_DOC_ORDER: &str = "query.xpath.doc.order";
}

/// Standard values published for the enumerated descriptors.
pub mod values {
    pub const IDENTIFIER_STABILITY_METHOD_DURATION: &str = "identifier.stability.method.duration";
    pub const IDENTIFIER_STABILITY_SAVE_DURATION: &str = "identifier.stability.save.duration";
    pub const IDENTIFIER_STABILITY_SESSION_DURATION: &str = "identifier.stability.session.duration";
    pub const IDENTIFIER_STABILITY_INDEFINITE_DURATION: &str =
        "identifier.stability.indefinite.duration";

    pub const NODE_TYPE_MANAGEMENT_INHERITANCE_MINIMAL: &str =
        "node.type.management.inheritance.minimal";
    pub const NODE_TYPE_MANAGEMENT_INHERITANCE_SINGLE: &str =
        "node.type.management.inheritance.single";
    pub const NODE_TYPE_MANAGEMENT_INHERITANCE_MULTIPLE: &str =
        "node.type.management.inheritance.multiple";

    pub const QUERY_JOINS_NONE: &str = "query.joins.none";
    pub const QUERY_JOINS_INNER: &str = "query.joins.inner";
    pub const QUERY_JOINS_INNER_OUTER: &str = "query.joins.inner.outer";
}

/// Every standard descriptor constant, keys first, then enumerated values.
pub const STANDARD_DESCRIPTORS: &[&str] = &[
    keys::SPEC_VERSION_DESC,
    keys::SPEC_NAME_DESC,
    keys::REP_VENDOR_DESC,
    keys::REP_VENDOR_URL_DESC,
    keys::REP_NAME_DESC,
    keys::REP_VERSION_DESC,
    keys::WRITE_SUPPORTED,
    keys::IDENTIFIER_STABILITY,
    keys::OPTION_XML_IMPORT_SUPPORTED,
    keys::OPTION_XML_EXPORT_SUPPORTED,
    keys::OPTION_UNFILED_CONTENT_SUPPORTED,
    keys::OPTION_SIMPLE_VERSIONING_SUPPORTED,
    keys::OPTION_VERSIONING_SUPPORTED,
    keys::OPTION_ACTIVITIES_SUPPORTED,
    keys::OPTION_BASELINES_SUPPORTED,
    keys::OPTION_ACCESS_CONTROL_SUPPORTED,
    keys::OPTION_LOCKING_SUPPORTED,
    keys::OPTION_OBSERVATION_SUPPORTED,
    keys::OPTION_JOURNALED_OBSERVATION_SUPPORTED,
    keys::OPTION_RETENTION_SUPPORTED,
    keys::OPTION_LIFECYCLE_SUPPORTED,
    keys::OPTION_TRANSACTIONS_SUPPORTED,
    keys::OPTION_WORKSPACE_MANAGEMENT_SUPPORTED,
    keys::OPTION_UPDATE_PRIMARY_NODE_TYPE_SUPPORTED,
    keys::OPTION_UPDATE_MIXIN_NODE_TYPES_SUPPORTED,
    keys::OPTION_SHAREABLE_NODES_SUPPORTED,
    keys::OPTION_NODE_TYPE_MANAGEMENT_SUPPORTED,
    keys::OPTION_NODE_AND_PROPERTY_WITH_SAME_NAME_SUPPORTED,
    keys::NODE_TYPE_MANAGEMENT_INHERITANCE,
    keys::NODE_TYPE_MANAGEMENT_OVERRIDES_SUPPORTED,
    keys::NODE_TYPE_MANAGEMENT_PRIMARY_ITEM_NAME_SUPPORTED,
    keys::NODE_TYPE_MANAGEMENT_ORDERABLE_CHILD_NODES_SUPPORTED,
    keys::NODE_TYPE_MANAGEMENT_RESIDUAL_DEFINITIONS_SUPPORTED,
    keys::NODE_TYPE_MANAGEMENT_AUTOCREATED_DEFINITIONS_SUPPORTED,
    keys::NODE_TYPE_MANAGEMENT_SAME_NAME_SIBLINGS_SUPPORTED,
    keys::NODE_TYPE_MANAGEMENT_PROPERTY_TYPES,
    keys::NODE_TYPE_MANAGEMENT_MULTIVALUED_PROPERTIES_SUPPORTED,
    keys::NODE_TYPE_MANAGEMENT_MULTIPLE_BINARY_PROPERTIES_SUPPORTED,
    keys::NODE_TYPE_MANAGEMENT_VALUE_CONSTRAINTS_SUPPORTED,
    keys::NODE_TYPE_MANAGEMENT_UPDATE_IN_USE_SUPPORTED,
    keys::QUERY_LANGUAGES,
    keys::QUERY_STORED_QUERIES_SUPPORTED,
    keys::QUERY_FULL_TEXT_SEARCH_SUPPORTED,
    keys::QUERY_JOINS,
    keys::LEVEL_1_SUPPORTED,
    keys::LEVEL_2_SUPPORTED,
    keys::OPTION_QUERY_SQL_SUPPORTED,
    keys::QUERY_XPATH_POS_INDEX,
    keys::QUERY_XPATH_DOC_ORDER,
    values::IDENTIFIER_STABILITY_METHOD_DURATION,
    values::IDENTIFIER_STABILITY_SAVE_DURATION,
    values::IDENTIFIER_STABILITY_SESSION_DURATION,
    values::IDENTIFIER_STABILITY_INDEFINITE_DURATION,
    values::NODE_TYPE_MANAGEMENT_INHERITANCE_MINIMAL,
    values::NODE_TYPE_MANAGEMENT_INHERITANCE_SINGLE,
    values::NODE_TYPE_MANAGEMENT_INHERITANCE_MULTIPLE,
    values::QUERY_JOINS_NONE,
    values::QUERY_JOINS_INNER,
    values::QUERY_JOINS_INNER_OUTER,
];

/// Returns true if `key` is one of the [`STANDARD_DESCRIPTORS`], key or value.
///
/// The comparison is exact and case-sensitive.
pub fn is_standard_descriptor(key: &str) -> bool {
    STANDARD_DESCRIPTORS.contains(&key)
}
