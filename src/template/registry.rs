//! Naming pattern table: built-in defaults overlaid by configured patterns

use std::collections::BTreeMap;
use std::fmt;

use super::builtin::BUILTIN_PATTERNS;

/// Where a naming pattern came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternSource {
    Builtin,
    Configuration,
    Call,
}

impl fmt::Display for PatternSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PatternSource::Builtin => "builtin",
            PatternSource::Configuration => "configuration",
            PatternSource::Call => "call",
        };
        f.write_str(s)
    }
}

/// A stored naming pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternEntry {
    pub template: String,
    pub source: PatternSource,
}

/// Registry of resource type to naming template
///
/// Later overlays win over earlier ones; the built-in table is never modified,
/// only shadowed.
#[derive(Debug, Clone, Default)]
pub struct PatternTable {
    patterns: BTreeMap<String, PatternEntry>,
}

impl PatternTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table holding the built-in patterns
    pub fn builtin() -> Self {
        let patterns = BUILTIN_PATTERNS
            .iter()
            .map(|(resource_type, template)| {
                (
                    resource_type.to_string(),
                    PatternEntry {
                        template: template.to_string(),
                        source: PatternSource::Builtin,
                    },
                )
            })
            .collect();
        Self { patterns }
    }

    /// Insert or replace a single pattern
    pub fn insert(
        &mut self,
        resource_type: impl Into<String>,
        template: impl Into<String>,
        source: PatternSource,
    ) {
        self.patterns.insert(
            resource_type.into(),
            PatternEntry {
                template: template.into(),
                source,
            },
        );
    }

    /// Overlay a set of patterns from one source
    pub fn overlay<'a>(
        &mut self,
        patterns: impl IntoIterator<Item = (&'a String, &'a String)>,
        source: PatternSource,
    ) {
        for (resource_type, template) in patterns {
            self.insert(resource_type.clone(), template.clone(), source);
        }
    }

    /// Get the template for a resource type
    pub fn get(&self, resource_type: &str) -> Option<&str> {
        self.patterns.get(resource_type).map(|e| e.template.as_str())
    }

    /// Get the full entry for a resource type
    pub fn entry(&self, resource_type: &str) -> Option<&PatternEntry> {
        self.patterns.get(resource_type)
    }

    /// Check if a resource type has a pattern
    pub fn contains(&self, resource_type: &str) -> bool {
        self.patterns.contains_key(resource_type)
    }

    /// Get all resource type names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.patterns.keys().map(|s| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PatternEntry)> {
        self.patterns.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Template;

    #[test]
    fn test_builtin_table_is_populated() {
        let table = PatternTable::builtin();
        assert!(table.len() >= 100);
        assert_eq!(
            table.get("azurerm_resource_group"),
            Some("rg-{basename}-{environment:short}-{region:short}")
        );
        assert_eq!(
            table.entry("aws_s3_bucket").map(|e| e.source),
            Some(PatternSource::Builtin)
        );
    }

    #[test]
    fn test_builtin_keys_are_unique() {
        let table = PatternTable::builtin();
        assert_eq!(table.len(), BUILTIN_PATTERNS.len());
    }

    #[test]
    fn test_builtin_templates_have_placeholders() {
        for (resource_type, template) in BUILTIN_PATTERNS {
            assert!(
                Template::parse(template).has_placeholders(),
                "{} has no placeholders",
                resource_type
            );
        }
    }

    #[test]
    fn test_overlay_replaces_and_extends() {
        let mut table = PatternTable::builtin();
        let mut config = BTreeMap::new();
        config.insert(
            "azurerm_resource_group".to_string(),
            "{basename}-rg".to_string(),
        );
        config.insert("custom_thing".to_string(), "ct-{basename}".to_string());
        table.overlay(&config, PatternSource::Configuration);

        assert_eq!(table.get("azurerm_resource_group"), Some("{basename}-rg"));
        assert_eq!(
            table.entry("custom_thing").map(|e| e.source),
            Some(PatternSource::Configuration)
        );
        assert_eq!(table.len(), BUILTIN_PATTERNS.len() + 1);
    }

    #[test]
    fn test_empty_table() {
        let table = PatternTable::new();
        assert!(table.is_empty());
        assert!(!table.contains("azurerm_resource_group"));
    }
}
