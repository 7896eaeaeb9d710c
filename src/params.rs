//! Call-time naming parameters and their normalization
//!
//! Callers pass an ordered list of JSON mappings. Each mapping associates a
//! component name with an attribute map, or one of the reserved collection names
//! with a flat map:
//!
//! ```json
//! [{
//!     "resource_type": { "fullname": "azurerm_resource_group" },
//!     "environment": { "fullname": "production", "shortcode": "prd" },
//!     "additional_components": { "department.fullname": "finance" },
//!     "additional_naming_patterns": { "azurerm_resource_group": "{basename}-{department}" }
//! }]
//! ```
//!
//! [`normalize`] folds that shape into [`NamingParameters`].

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::component::{ComponentValue, Slot};
use crate::store::is_valid_component_name;

/// Reserved key for dotted `component.attribute` entries
pub const ADDITIONAL_COMPONENTS_KEY: &str = "additional_components";
/// Reserved key for `resource_type -> template` entries
pub const ADDITIONAL_NAMING_PATTERNS_KEY: &str = "additional_naming_patterns";

/// Errors that can occur while normalizing call parameters
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("invalid parameter JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("failed to read parameters: {0}")]
    Io(#[from] std::io::Error),

    #[error("parameters must be a list of maps, found {found}")]
    NotAList { found: &'static str },

    #[error("parameter element {index} is not a map: found {found}")]
    ElementNotAMap { index: usize, found: &'static str },

    #[error("component {component} value is not a map: found {found}")]
    ComponentNotAMap {
        component: String,
        found: &'static str,
    },

    #[error("value for {key} must be a string, found {found}")]
    NotAString { key: String, found: &'static str },

    #[error("invalid key format in additional_components: {key} (expected componentName.attribute)")]
    InvalidDottedKey { key: String },

    #[error("invalid component name {name:?}: must be non-empty without '.', '{{', '}}', ':' or whitespace")]
    InvalidComponentName { name: String },
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}

/// Canonical call-time parameters consumed by the resolver
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamingParameters {
    /// Values for the fixed slots
    pub components: BTreeMap<Slot, ComponentValue>,
    /// Free-form components, by name
    pub additional_components: BTreeMap<String, ComponentValue>,
    /// Call-time pattern overrides, by resource type
    pub naming_patterns: BTreeMap<String, String>,
}

impl NamingParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_component(mut self, slot: Slot, value: ComponentValue) -> Self {
        self.components.insert(slot, value);
        self
    }

    pub fn with_additional_component(
        mut self,
        name: impl Into<String>,
        value: ComponentValue,
    ) -> Self {
        self.additional_components.insert(name.into(), value);
        self
    }

    pub fn with_naming_pattern(
        mut self,
        resource_type: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        self.naming_patterns
            .insert(resource_type.into(), template.into());
        self
    }

    /// Shorthand for setting the resource type's full name
    ///
    /// A shortcode or char already given for the resource type is kept.
    pub fn with_resource_type(mut self, resource_type: impl Into<String>) -> Self {
        let merged = self
            .components
            .remove(&Slot::ResourceType)
            .unwrap_or_default()
            .merged_with(&ComponentValue::full(resource_type));
        self.components.insert(Slot::ResourceType, merged);
        self
    }

    pub fn component(&self, slot: Slot) -> Option<&ComponentValue> {
        self.components.get(&slot)
    }

    /// The call-time resource type, when a non-empty full name was given
    pub fn resource_type(&self) -> Option<&str> {
        self.component(Slot::ResourceType)
            .map(|c| c.fullname_str())
            .filter(|s| !s.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
            && self.additional_components.is_empty()
            && self.naming_patterns.is_empty()
    }
}

/// Normalize a JSON document holding the parameter list
///
/// `null` and an empty string are treated as an empty list.
pub fn normalize_json(json: &str) -> Result<NamingParameters, NormalizeError> {
    if json.trim().is_empty() {
        return Ok(NamingParameters::default());
    }
    let value: Value = serde_json::from_str(json)?;
    match value {
        Value::Null => Ok(NamingParameters::default()),
        Value::Array(elements) => normalize(&elements),
        other => Err(NormalizeError::NotAList {
            found: json_kind(&other),
        }),
    }
}

/// Normalize an ordered set of parameter mappings
///
/// Later mappings override earlier ones attribute by attribute. Component names
/// that are not fixed slots become additional components, and dotted additional
/// components named after a slot are merged into that slot.
pub fn normalize(elements: &[Value]) -> Result<NamingParameters, NormalizeError> {
    let mut named: BTreeMap<String, ComponentValue> = BTreeMap::new();
    let mut dotted: BTreeMap<String, ComponentValue> = BTreeMap::new();
    let mut params = NamingParameters::default();

    for (index, element) in elements.iter().enumerate() {
        let map = element
            .as_object()
            .ok_or_else(|| NormalizeError::ElementNotAMap {
                index,
                found: json_kind(element),
            })?;
        debug!(index, keys = map.len(), "normalizing parameter element");

        for (name, value) in map {
            if value.is_null() {
                continue;
            }
            let entries = value
                .as_object()
                .ok_or_else(|| NormalizeError::ComponentNotAMap {
                    component: name.clone(),
                    found: json_kind(value),
                })?;

            match name.as_str() {
                ADDITIONAL_COMPONENTS_KEY => {
                    for (key, raw) in entries {
                        let (component, attribute) = split_dotted_key(key)?;
                        let Some(text) = string_value(key, raw)? else {
                            continue;
                        };
                        let target = dotted.entry(component.to_string()).or_default();
                        if !target.set_attribute(attribute, text) {
                            warn!(key = %key, "ignoring unknown component attribute");
                        }
                    }
                }
                ADDITIONAL_NAMING_PATTERNS_KEY => {
                    for (resource_type, raw) in entries {
                        if let Some(template) = string_value(resource_type, raw)? {
                            params
                                .naming_patterns
                                .insert(resource_type.clone(), template.to_string());
                        }
                    }
                }
                _ => {
                    let target = named.entry(name.clone()).or_default();
                    for (attribute, raw) in entries {
                        let key = format!("{}.{}", name, attribute);
                        let Some(text) = string_value(&key, raw)? else {
                            continue;
                        };
                        if attribute != "name" && !target.set_attribute(attribute, text) {
                            warn!(key = %key, "ignoring unknown component attribute");
                        }
                    }
                }
            }
        }
    }

    for (name, value) in named {
        params.insert_component(&name, &value)?;
    }
    for (name, value) in dotted {
        params.insert_component(&name, &value)?;
    }

    debug!(
        components = params.components.len(),
        additional = params.additional_components.len(),
        patterns = params.naming_patterns.len(),
        "normalized naming parameters"
    );
    Ok(params)
}

impl NamingParameters {
    fn insert_component(&mut self, name: &str, value: &ComponentValue) -> Result<(), NormalizeError> {
        if value.is_null() {
            return Ok(());
        }
        match Slot::from_name(name) {
            Some(slot) => {
                let merged = self.components.entry(slot).or_default().merged_with(value);
                self.components.insert(slot, merged);
            }
            None if !is_valid_component_name(name) => {
                return Err(NormalizeError::InvalidComponentName {
                    name: name.to_string(),
                });
            }
            None => {
                let merged = self
                    .additional_components
                    .entry(name.to_string())
                    .or_default()
                    .merged_with(value);
                self.additional_components.insert(name.to_string(), merged);
            }
        }
        Ok(())
    }
}

fn string_value<'a>(key: &str, value: &'a Value) -> Result<Option<&'a str>, NormalizeError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.as_str())),
        other => Err(NormalizeError::NotAString {
            key: key.to_string(),
            found: json_kind(other),
        }),
    }
}

fn split_dotted_key(key: &str) -> Result<(&str, &str), NormalizeError> {
    let mut parts = key.split('.');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(component), Some(attribute), None)
            if !component.is_empty() && !attribute.is_empty() =>
        {
            Ok((component, attribute))
        }
        _ => Err(NormalizeError::InvalidDottedKey {
            key: key.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_slot_components() {
        let params = normalize(&[json!({
            "resource_type": { "fullname": "azurerm_resource_group", "shortcode": "rg", "char": "r" },
            "environment": { "name": "env", "fullname": "production", "shortcode": "prd" }
        })])
        .unwrap();

        assert_eq!(params.resource_type(), Some("azurerm_resource_group"));
        assert_eq!(
            params.component(Slot::Environment),
            Some(&ComponentValue::full("production").with_shortcode("prd"))
        );
    }

    #[test]
    fn test_dotted_additional_components_are_grouped() {
        let params = normalize(&[json!({
            "additional_components": {
                "department.fullname": "finance",
                "department.shortcode": "fin",
                "team.char": "t"
            }
        })])
        .unwrap();

        assert_eq!(
            params.additional_components.get("department"),
            Some(&ComponentValue::full("finance").with_shortcode("fin"))
        );
        assert_eq!(
            params.additional_components.get("team"),
            Some(&ComponentValue::default().with_char("t"))
        );
    }

    #[test]
    fn test_dotted_slot_name_merges_into_slot() {
        let params = normalize(&[json!({
            "region": { "fullname": "westeurope", "shortcode": "we" },
            "additional_components": {
                "region.fullname": "Germany West Central",
                "region.shortcode": "gwc"
            }
        })])
        .unwrap();

        assert_eq!(
            params.component(Slot::Region),
            Some(&ComponentValue::full("Germany West Central").with_shortcode("gwc"))
        );
        assert!(params.additional_components.is_empty());
    }

    #[test]
    fn test_unknown_component_name_becomes_additional() {
        let params = normalize(&[json!({ "department": { "fullname": "finance" } })]).unwrap();
        assert!(params.components.is_empty());
        assert_eq!(
            params.additional_components.get("department"),
            Some(&ComponentValue::full("finance"))
        );
    }

    #[test]
    fn test_naming_patterns() {
        let params = normalize(&[
            json!({ "additional_naming_patterns": { "azurerm_resource_group": "{basename}-a" } }),
            json!({ "additional_naming_patterns": { "azurerm_resource_group": "{basename}-b" } }),
        ])
        .unwrap();
        assert_eq!(
            params.naming_patterns.get("azurerm_resource_group"),
            Some(&"{basename}-b".to_string())
        );
    }

    #[test]
    fn test_later_elements_override_attributes() {
        let params = normalize(&[
            json!({ "basename": { "fullname": "first", "shortcode": "fst" } }),
            json!({ "basename": { "fullname": "second" } }),
        ])
        .unwrap();
        assert_eq!(
            params.component(Slot::Basename),
            Some(&ComponentValue::full("second").with_shortcode("fst"))
        );
    }

    #[test]
    fn test_nulls_are_skipped() {
        let params = normalize(&[json!({
            "basename": null,
            "environment": { "fullname": null, "shortcode": "prd" }
        })])
        .unwrap();
        assert_eq!(params.component(Slot::Basename), None);
        assert_eq!(
            params.component(Slot::Environment),
            Some(&ComponentValue::default().with_shortcode("prd"))
        );
    }

    #[test]
    fn test_element_not_a_map() {
        let err = normalize(&[json!({}), json!("basename")]).unwrap_err();
        assert!(matches!(
            err,
            NormalizeError::ElementNotAMap {
                index: 1,
                found: "string"
            }
        ));
    }

    #[test]
    fn test_component_not_a_map() {
        let err = normalize(&[json!({ "basename": "example" })]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "component basename value is not a map: found string"
        );
    }

    #[test]
    fn test_invalid_dotted_keys() {
        for key in ["region", "a.b.c", ".fullname", "region."] {
            let err = normalize(&[json!({ "additional_components": { key: "x" } })]).unwrap_err();
            match err {
                NormalizeError::InvalidDottedKey { key: reported } => assert_eq!(reported, key),
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_invalid_dotted_key_with_null_value() {
        let err = normalize(&[json!({ "additional_components": { "a.b.c": null } })]).unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidDottedKey { key } if key == "a.b.c"));
    }

    #[test]
    fn test_invalid_component_names() {
        for name in ["a.b", "a:b", "a b", "{a}"] {
            let err = normalize(&[json!({ name: { "fullname": "x" } })]).unwrap_err();
            match err {
                NormalizeError::InvalidComponentName { name: reported } => assert_eq!(reported, name),
                other => panic!("unexpected error: {other}"),
            }
        }

        let err = normalize(&[json!({ "additional_components": { "a:b.fullname": "x" } })])
            .unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidComponentName { name } if name == "a:b"));
    }

    #[test]
    fn test_with_resource_type_keeps_other_representations() {
        let params = normalize(&[json!({
            "resource_type": { "fullname": "azurerm_key_vault", "shortcode": "rg", "char": "r" }
        })])
        .unwrap()
        .with_resource_type("azurerm_resource_group");

        assert_eq!(
            params.component(Slot::ResourceType),
            Some(
                &ComponentValue::full("azurerm_resource_group")
                    .with_shortcode("rg")
                    .with_char("r")
            )
        );
        assert_eq!(
            NamingParameters::new()
                .with_resource_type("azurerm_resource_group")
                .resource_type(),
            Some("azurerm_resource_group")
        );
    }

    #[test]
    fn test_non_string_attribute() {
        let err = normalize(&[json!({ "instance": { "fullname": 1 } })]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "value for instance.fullname must be a string, found number"
        );
    }

    #[test]
    fn test_normalize_json_accepts_empty_input() {
        assert!(normalize_json("").unwrap().is_empty());
        assert!(normalize_json("null").unwrap().is_empty());
        assert!(normalize_json("[]").unwrap().is_empty());
        assert!(matches!(
            normalize_json("{}"),
            Err(NormalizeError::NotAList { found: "map" })
        ));
    }
}
