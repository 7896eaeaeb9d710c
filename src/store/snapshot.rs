//! The persisted configuration snapshot and its JSON document format
//!
//! The document is a single JSON object. Each fixed slot is stored under its
//! `Default<Slot>` key, free-form components under `AdditionalComponents` and
//! pattern overrides under `AdditionalNamingPatterns`. Empty values are omitted.
//!
//! Decoding walks the document field by field instead of deriving, so a bad
//! value reports the exact path that failed.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::component::{ComponentValue, Slot};
use crate::params::json_kind;

pub const ADDITIONAL_COMPONENTS_FIELD: &str = "AdditionalComponents";
pub const ADDITIONAL_NAMING_PATTERNS_FIELD: &str = "AdditionalNamingPatterns";
pub const PROVIDER_INSTANCE_ID_FIELD: &str = "provider_instance_id";

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot document must be an object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("{path}: expected {expected}, found {found}")]
    InvalidField {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{path}: invalid key {key:?}")]
    InvalidKey { path: String, key: String },
}

/// Named defaults shared between invocations in one working directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigurationSnapshot {
    pub provider_instance_id: Option<String>,
    /// Default value per fixed slot; null components are never stored
    pub defaults: BTreeMap<Slot, ComponentValue>,
    pub additional_components: BTreeMap<String, ComponentValue>,
    /// Resource type to template
    pub additional_naming_patterns: BTreeMap<String, String>,
}

impl ConfigurationSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(mut self, slot: Slot, value: ComponentValue) -> Self {
        self.set_default(slot, value);
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
        self.additional_naming_patterns
            .insert(resource_type.into(), template.into());
        self
    }

    pub fn with_provider_instance_id(mut self, id: impl Into<String>) -> Self {
        self.provider_instance_id = Some(id.into()).filter(|s| !s.is_empty());
        self
    }

    /// Set a slot default; a null value clears the slot
    pub fn set_default(&mut self, slot: Slot, value: ComponentValue) {
        if value.is_null() {
            self.defaults.remove(&slot);
        } else {
            self.defaults.insert(slot, value);
        }
    }

    pub fn default_for(&self, slot: Slot) -> Option<&ComponentValue> {
        self.defaults.get(&slot)
    }

    pub fn is_empty(&self) -> bool {
        self.provider_instance_id.is_none()
            && self.defaults.is_empty()
            && self.additional_components.is_empty()
            && self.additional_naming_patterns.is_empty()
    }

    /// Layer `other` on top of this snapshot
    ///
    /// Every slot `other` sets replaces the slot here; map entries are replaced
    /// by name.
    pub fn overlay(&mut self, other: &ConfigurationSnapshot) {
        if other.provider_instance_id.is_some() {
            self.provider_instance_id = other.provider_instance_id.clone();
        }
        for (slot, value) in &other.defaults {
            self.set_default(*slot, value.clone());
        }
        for (name, value) in &other.additional_components {
            self.additional_components
                .insert(name.clone(), value.clone());
        }
        for (resource_type, template) in &other.additional_naming_patterns {
            self.additional_naming_patterns
                .insert(resource_type.clone(), template.clone());
        }
    }

    /// Serialize to the indented document written to disk
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Decode a parsed document; unknown top-level keys are ignored
    pub fn from_value(value: &Value) -> Result<Self, SnapshotError> {
        let document = value.as_object().ok_or(SnapshotError::NotAnObject {
            found: json_kind(value),
        })?;

        let mut snapshot = ConfigurationSnapshot::new();

        for slot in Slot::ALL {
            let key = slot.snapshot_key();
            if let Some(raw) = document.get(key) {
                if let Some(component) = decode_component(key, raw)? {
                    snapshot.set_default(slot, component);
                }
            }
        }

        if let Some(raw) = non_null(document, ADDITIONAL_COMPONENTS_FIELD) {
            let entries = expect_object(ADDITIONAL_COMPONENTS_FIELD, raw)?;
            for (name, raw) in entries {
                let path = format!("{}.{}", ADDITIONAL_COMPONENTS_FIELD, name);
                if !is_valid_component_name(name) {
                    return Err(SnapshotError::InvalidKey {
                        path: ADDITIONAL_COMPONENTS_FIELD.to_string(),
                        key: name.clone(),
                    });
                }
                if let Some(component) = decode_component(&path, raw)? {
                    snapshot.additional_components.insert(name.clone(), component);
                }
            }
        }

        if let Some(raw) = non_null(document, ADDITIONAL_NAMING_PATTERNS_FIELD) {
            let entries = expect_object(ADDITIONAL_NAMING_PATTERNS_FIELD, raw)?;
            for (resource_type, raw) in entries {
                if resource_type.is_empty() {
                    return Err(SnapshotError::InvalidKey {
                        path: ADDITIONAL_NAMING_PATTERNS_FIELD.to_string(),
                        key: resource_type.clone(),
                    });
                }
                let path = format!("{}.{}", ADDITIONAL_NAMING_PATTERNS_FIELD, resource_type);
                if let Some(template) = decode_string(&path, raw)? {
                    snapshot
                        .additional_naming_patterns
                        .insert(resource_type.clone(), template);
                }
            }
        }

        if let Some(raw) = document.get(PROVIDER_INSTANCE_ID_FIELD) {
            snapshot.provider_instance_id = decode_string(PROVIDER_INSTANCE_ID_FIELD, raw)?;
        }

        Ok(snapshot)
    }
}

/// Additional component names must be usable as `{name}` and `name.attribute`
pub(crate) fn is_valid_component_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['.', '{', '}', ':']) && !name.contains(char::is_whitespace)
}

fn non_null<'a>(document: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    document.get(key).filter(|v| !v.is_null())
}

fn expect_object<'a>(path: &str, value: &'a Value) -> Result<&'a Map<String, Value>, SnapshotError> {
    value.as_object().ok_or_else(|| SnapshotError::InvalidField {
        path: path.to_string(),
        expected: "object",
        found: json_kind(value),
    })
}

fn decode_string(path: &str, value: &Value) -> Result<Option<String>, SnapshotError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        other => Err(SnapshotError::InvalidField {
            path: path.to_string(),
            expected: "string",
            found: json_kind(other),
        }),
    }
}

fn decode_component(path: &str, value: &Value) -> Result<Option<ComponentValue>, SnapshotError> {
    if value.is_null() {
        return Ok(None);
    }
    let fields = expect_object(path, value)?;
    let field = |name: &str| match fields.get(name) {
        Some(raw) => decode_string(&format!("{}.{}", path, name), raw),
        None => Ok(None),
    };
    let component = ComponentValue::from_parts(field("fullname")?, field("shortcode")?, field("char")?);
    Ok(Some(component).filter(|c| !c.is_null()))
}

impl Serialize for ConfigurationSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for slot in Slot::ALL {
            if let Some(value) = self.defaults.get(&slot).filter(|v| !v.is_null()) {
                map.serialize_entry(slot.snapshot_key(), value)?;
            }
        }
        let components: BTreeMap<&String, &ComponentValue> = self
            .additional_components
            .iter()
            .filter(|(_, v)| !v.is_null())
            .collect();
        if !components.is_empty() {
            map.serialize_entry(ADDITIONAL_COMPONENTS_FIELD, &components)?;
        }
        if !self.additional_naming_patterns.is_empty() {
            map.serialize_entry(
                ADDITIONAL_NAMING_PATTERNS_FIELD,
                &self.additional_naming_patterns,
            )?;
        }
        if let Some(id) = self.provider_instance_id.as_deref().filter(|s| !s.is_empty()) {
            map.serialize_entry(PROVIDER_INSTANCE_ID_FIELD, id)?;
        }
        map.end()
    }
}
