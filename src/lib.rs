//! Resource Naming Tool - consistent cloud resource names from naming patterns
//!
//! This library resolves resource names such as `rg-example-prd-we` from a
//! naming pattern and a set of components, with defaults shared between
//! invocations through a locked configuration store.
//!
//! # Example
//!
//! ```rust
//! use resource_naming_tool::generate_resource_name;
//! use resource_naming_tool::store::{ConfigStore, StoreConfig};
//! use serde_json::json;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let store = ConfigStore::new(StoreConfig::in_dir(dir.path()));
//!
//! let name = generate_resource_name(&store, &[json!({
//!     "resource_type": { "fullname": "azurerm_resource_group" },
//!     "basename": { "fullname": "example" },
//!     "environment": { "fullname": "production", "shortcode": "prd" },
//!     "region": { "fullname": "westeurope", "shortcode": "we" }
//! })]).unwrap();
//!
//! assert_eq!(name, "rg-example-prd-we");
//! ```

pub mod component;
pub mod config;
pub mod error;
pub mod params;
pub mod store;
pub mod template;

pub use component::{ComponentValue, Format, Slot};
pub use config::{ConfigError, NamingConfig};
pub use error::NamingError;
pub use params::{normalize, normalize_json, NamingParameters, NormalizeError};
pub use store::{ConfigStore, ConfigurationSnapshot, StoreConfig, StoreError};
pub use template::{resolve, PatternTable, ResolutionContext};

use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;
use tracing::info;

/// Errors that can occur while configuring or generating names
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Naming(#[from] NamingError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Short title of the failure, paired with the `Display` detail
    pub fn summary(&self) -> &'static str {
        match self {
            Error::Normalize(_) => "Invalid Parameters",
            Error::Store(err) => err.summary(),
            Error::Naming(err) => err.summary(),
            Error::Config(err) => err.summary(),
        }
    }
}

/// A naming function bound to a store and optional function-scoped overrides
#[derive(Debug, Clone)]
pub struct NamingFunction {
    store: ConfigStore,
    overrides: Option<ConfigurationSnapshot>,
}

impl NamingFunction {
    pub fn new(store: ConfigStore) -> Self {
        Self {
            store,
            overrides: None,
        }
    }

    /// Layer `overrides` on top of the stored defaults for every call
    pub fn with_overrides(mut self, overrides: ConfigurationSnapshot) -> Self {
        self.overrides = Some(overrides);
        self
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// The effective defaults and patterns, read through the store lock
    pub fn context(&self) -> Result<ResolutionContext, Error> {
        let persisted = self.store.read()?;
        Ok(ResolutionContext::from_layers(
            persisted.as_ref(),
            self.overrides.as_ref(),
        ))
    }

    /// Normalize raw parameter mappings and resolve the name
    pub fn call(&self, elements: &[Value]) -> Result<String, Error> {
        let params = normalize(elements)?;
        self.call_with(&params)
    }

    /// Resolve the name for already-normalized parameters
    pub fn call_with(&self, params: &NamingParameters) -> Result<String, Error> {
        let ctx = self.context()?;
        Ok(resolve(params, &ctx)?)
    }
}

/// Generate a resource name against the stored defaults
pub fn generate_resource_name(store: &ConfigStore, elements: &[Value]) -> Result<String, Error> {
    NamingFunction::new(store.clone()).call(elements)
}

/// Validate `config` and make it the stored snapshot
pub fn configure(store: &ConfigStore, config: &NamingConfig) -> Result<ConfigurationSnapshot, Error> {
    let snapshot = config.validated_snapshot()?;
    store.write(&snapshot)?;
    info!(
        path = %store.path().display(),
        defaults = snapshot.defaults.len(),
        additional_components = snapshot.additional_components.len(),
        naming_patterns = snapshot.additional_naming_patterns.len(),
        "configuration stored"
    );
    Ok(snapshot)
}

/// Version and storage location of the tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub version: &'static str,
    pub store_path: PathBuf,
}

pub fn status(store: &ConfigStore) -> Status {
    Status {
        version: env!("CARGO_PKG_VERSION"),
        store_path: store.path(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_store() -> (tempfile::TempDir, ConfigStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(StoreConfig::in_dir(dir.path().join("naming")));
        (dir, store)
    }

    #[test]
    fn test_generate_without_configuration() {
        let (_dir, store) = temp_store();
        let name = generate_resource_name(
            &store,
            &[json!({
                "resource_type": { "fullname": "azurerm_storage_account" },
                "basename": { "fullname": "example" },
                "environment": { "char": "p" },
                "region": { "char": "w" },
                "instance": { "fullname": "00001" }
            })],
        )
        .unwrap();
        assert_eq!(name, "examplepw00001");
    }

    #[test]
    fn test_configure_then_generate() {
        let (_dir, store) = temp_store();
        let config = NamingConfig::from_str(
            r#"
[defaults.resource_type]
fullname = "azurerm_resource_group"

[defaults.environment]
fullname = "production"
shortcode = "prd"

[defaults.region]
fullname = "westeurope"
shortcode = "we"
"#,
        )
        .unwrap();
        configure(&store, &config).unwrap();

        let name = generate_resource_name(&store, &[json!({ "basename": { "fullname": "example" } })]).unwrap();
        assert_eq!(name, "rg-example-prd-we");
    }

    #[test]
    fn test_invalid_configuration_is_not_stored() {
        let (_dir, store) = temp_store();
        let config = NamingConfig::from_str("[defaults.basename]\nfullname = \"\"\n").unwrap();
        let err = configure(&store, &config).unwrap_err();
        assert_eq!(err.summary(), "Invalid Component Configuration");
        assert_eq!(store.read().unwrap(), None);
    }

    #[test]
    fn test_function_overrides() {
        let (_dir, store) = temp_store();
        store
            .write(&ConfigurationSnapshot::new().with_default(Slot::Basename, ComponentValue::full("stored")))
            .unwrap();
        let function = NamingFunction::new(store).with_overrides(
            ConfigurationSnapshot::new()
                .with_default(Slot::Basename, ComponentValue::full("scoped"))
                .with_naming_pattern("custom_type", "{basename}-custom"),
        );

        let name = function
            .call(&[json!({ "resource_type": { "fullname": "custom_type" } })])
            .unwrap();
        assert_eq!(name, "scoped-custom");
    }

    #[test]
    fn test_error_summaries() {
        let (_dir, store) = temp_store();
        let err = generate_resource_name(&store, &[json!({ "resource_type": { "fullname": "unknown_type" } })])
            .unwrap_err();
        assert_eq!(err.summary(), "Missing Pattern");
        assert_eq!(
            err.to_string(),
            "no naming pattern found for resource type: unknown_type"
        );

        let err = generate_resource_name(&store, &[json!(["not", "a", "map"])]).unwrap_err();
        assert_eq!(err.summary(), "Invalid Parameters");
    }

    #[test]
    fn test_status() {
        let (_dir, store) = temp_store();
        let status = status(&store);
        assert_eq!(status.version, env!("CARGO_PKG_VERSION"));
        assert!(status.store_path.ends_with("naming/provider-config.json"));
    }
}
