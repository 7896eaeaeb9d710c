//! Naming configuration files
//!
//! The tool is configured from a TOML document holding the slot defaults, the
//! free-form additional components and any naming pattern overrides:
//!
//! ```toml
//! provider_instance_id = "team-a"
//!
//! [store]
//! lock_timeout_ms = 10000
//! retry_interval_ms = 50
//!
//! [defaults.environment]
//! fullname = "production"
//! shortcode = "prd"
//!
//! [additional_components.department]
//! fullname = "finance"
//! shortcode = "fin"
//!
//! [naming_patterns]
//! azurerm_resource_group = "rg-{basename}-{department:short}"
//! ```
//!
//! A configuration must pass [`NamingConfig::validate`] before it is stored.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::component::{ComponentValue, Slot};
use crate::store::{is_valid_component_name, ConfigurationSnapshot, StoreConfig};

/// Errors that can occur when loading or validating a configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse configuration TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("unknown component in [defaults]: {0}")]
    UnknownSlot(String),
    #[error("{}", ValidationIssues(.0))]
    Invalid(Vec<ValidationIssue>),
}

impl ConfigError {
    pub fn summary(&self) -> &'static str {
        match self {
            ConfigError::IoError(_) => "Configuration Unreadable",
            ConfigError::ParseError(_) => "Invalid Configuration File",
            ConfigError::UnknownSlot(_) | ConfigError::Invalid(_) => {
                "Invalid Component Configuration"
            }
        }
    }
}

/// One problem found by [`NamingConfig::validate`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    #[error("default {slot} must set at least one of fullname, shortcode or char")]
    EmptyDefault { slot: Slot },
    #[error("additional component {name:?} must set at least one of fullname, shortcode or char")]
    EmptyComponent { name: String },
    #[error("invalid additional component name {name:?}")]
    InvalidComponentName { name: String },
    #[error("naming pattern for {resource_type:?} is empty")]
    EmptyPattern { resource_type: String },
}

struct ValidationIssues<'a>(&'a [ValidationIssue]);

impl fmt::Display for ValidationIssues<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", issue)?;
        }
        Ok(())
    }
}

/// Lock settings from the `[store]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreSettings {
    pub lock_timeout_ms: Option<u64>,
    pub retry_interval_ms: Option<u64>,
}

/// A parsed naming configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamingConfig {
    pub provider_instance_id: Option<String>,
    pub store: StoreSettings,
    pub defaults: BTreeMap<Slot, ComponentValue>,
    pub additional_components: BTreeMap<String, ComponentValue>,
    /// Resource type to template
    pub naming_patterns: BTreeMap<String, String>,
}

/// TOML structure for deserializing configurations
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    provider_instance_id: Option<String>,
    #[serde(default)]
    store: StoreSettings,
    #[serde(default)]
    defaults: BTreeMap<String, TomlComponent>,
    #[serde(default)]
    additional_components: BTreeMap<String, TomlComponent>,
    #[serde(default)]
    naming_patterns: BTreeMap<String, String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlComponent {
    fullname: Option<String>,
    shortcode: Option<String>,
    char: Option<String>,
}

impl From<TomlComponent> for ComponentValue {
    fn from(c: TomlComponent) -> Self {
        ComponentValue::from_parts(c.fullname, c.shortcode, c.char)
    }
}

impl NamingConfig {
    /// Load configuration from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;

        let mut defaults = BTreeMap::new();
        for (name, component) in parsed.defaults {
            let slot = Slot::from_name(&name).ok_or(ConfigError::UnknownSlot(name))?;
            defaults.insert(slot, component.into());
        }

        Ok(NamingConfig {
            provider_instance_id: parsed.provider_instance_id.filter(|s| !s.is_empty()),
            store: parsed.store,
            defaults,
            additional_components: parsed
                .additional_components
                .into_iter()
                .map(|(name, component)| (name, component.into()))
                .collect(),
            naming_patterns: parsed.naming_patterns,
        })
    }

    /// Check every component and pattern, reporting all problems at once
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut issues = Vec::new();

        for (slot, value) in &self.defaults {
            if value.is_null() {
                issues.push(ValidationIssue::EmptyDefault { slot: *slot });
            }
        }

        for (name, value) in &self.additional_components {
            if !is_valid_component_name(name) {
                issues.push(ValidationIssue::InvalidComponentName { name: name.clone() });
            } else if value.is_null() {
                issues.push(ValidationIssue::EmptyComponent { name: name.clone() });
            }
        }

        for (resource_type, template) in &self.naming_patterns {
            if template.trim().is_empty() {
                issues.push(ValidationIssue::EmptyPattern {
                    resource_type: resource_type.clone(),
                });
            } else if !template.contains('{') {
                warn!(resource_type = %resource_type, template = %template, "naming pattern has no placeholders");
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(issues))
        }
    }

    /// The snapshot this configuration stores; call [`validate`](Self::validate) first
    pub fn to_snapshot(&self) -> ConfigurationSnapshot {
        let mut snapshot = ConfigurationSnapshot::new();
        snapshot.provider_instance_id = self.provider_instance_id.clone();
        for (slot, value) in &self.defaults {
            snapshot.set_default(*slot, value.clone());
        }
        snapshot.additional_components = self
            .additional_components
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        snapshot.additional_naming_patterns = self.naming_patterns.clone();
        snapshot
    }

    /// Validate and convert in one step
    pub fn validated_snapshot(&self) -> Result<ConfigurationSnapshot, ConfigError> {
        self.validate()?;
        Ok(self.to_snapshot())
    }

    /// Store settings for `dir`, or the default directory, with the `[store]` timings applied
    pub fn store_config(&self, dir: Option<PathBuf>) -> StoreConfig {
        let mut config = match dir {
            Some(dir) => StoreConfig::in_dir(dir),
            None => StoreConfig::default(),
        };
        if let Some(ms) = self.store.lock_timeout_ms {
            config = config.with_lock_timeout(Duration::from_millis(ms));
        }
        if let Some(ms) = self.store.retry_interval_ms {
            config = config.with_retry_interval(Duration::from_millis(ms));
        }
        config
    }
}
