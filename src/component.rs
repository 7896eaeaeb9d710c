//! Component values and the fixed set of naming slots
//!
//! A component is one semantic part of a resource name (environment, region, ...)
//! carrying up to three representations. Slots are the well-known components the
//! engine understands natively; anything else is an additional component.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The three representations of a single naming component
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fullname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub char: Option<String>,
}

impl ComponentValue {
    /// Create a component with all three representations
    pub fn new(
        fullname: impl Into<String>,
        shortcode: impl Into<String>,
        char: impl Into<String>,
    ) -> Self {
        Self::from_parts(
            Some(fullname.into()),
            Some(shortcode.into()),
            Some(char.into()),
        )
    }

    /// Create a component that only has a full name
    pub fn full(fullname: impl Into<String>) -> Self {
        Self::from_parts(Some(fullname.into()), None, None)
    }

    /// Build from optional parts, dropping empty strings
    pub fn from_parts(
        fullname: Option<String>,
        shortcode: Option<String>,
        char: Option<String>,
    ) -> Self {
        fn non_empty(s: Option<String>) -> Option<String> {
            s.filter(|v| !v.is_empty())
        }
        Self {
            fullname: non_empty(fullname),
            shortcode: non_empty(shortcode),
            char: non_empty(char),
        }
    }

    pub fn with_shortcode(mut self, shortcode: impl Into<String>) -> Self {
        self.shortcode = Some(shortcode.into()).filter(|s| !s.is_empty());
        self
    }

    pub fn with_char(mut self, char: impl Into<String>) -> Self {
        self.char = Some(char.into()).filter(|s| !s.is_empty());
        self
    }

    /// True when no representation is present
    pub fn is_null(&self) -> bool {
        self.fullname_str().is_empty()
            && self.shortcode_str().is_empty()
            && self.char_str().is_empty()
    }

    pub fn fullname_str(&self) -> &str {
        self.fullname.as_deref().unwrap_or("")
    }

    pub fn shortcode_str(&self) -> &str {
        self.shortcode.as_deref().unwrap_or("")
    }

    pub fn char_str(&self) -> &str {
        self.char.as_deref().unwrap_or("")
    }

    /// The raw representation for `format`, without any fallback
    pub fn get(&self, format: Format) -> &str {
        match format {
            Format::Full => self.fullname_str(),
            Format::Short => self.shortcode_str(),
            Format::Char => self.char_str(),
        }
    }

    /// Value selection for call-time components
    ///
    /// `short` falls back to the full name, `char` to the first character of the
    /// full name.
    pub fn select(&self, format: Format) -> String {
        let value = self.get(format);
        if !value.is_empty() {
            return value.to_string();
        }
        match format {
            Format::Full => String::new(),
            Format::Short => self.fullname_str().to_string(),
            Format::Char => prefix(self.fullname_str(), 1),
        }
    }

    /// Value selection for configured defaults
    ///
    /// `short` falls back to at most the first three characters of the full name,
    /// `char` to its first character.
    pub fn select_default(&self, format: Format) -> String {
        let value = self.get(format);
        if !value.is_empty() {
            return value.to_string();
        }
        match format {
            Format::Full => String::new(),
            Format::Short => prefix(self.fullname_str(), 3),
            Format::Char => prefix(self.fullname_str(), 1),
        }
    }

    /// Overlay the non-empty fields of `other` on top of `self`
    pub fn merged_with(&self, other: &ComponentValue) -> ComponentValue {
        ComponentValue {
            fullname: other.fullname.clone().or_else(|| self.fullname.clone()),
            shortcode: other.shortcode.clone().or_else(|| self.shortcode.clone()),
            char: other.char.clone().or_else(|| self.char.clone()),
        }
    }

    /// Set a single attribute by name; returns false for unknown attributes
    pub(crate) fn set_attribute(&mut self, attribute: &str, value: &str) -> bool {
        let value = Some(value.to_string()).filter(|v| !v.is_empty());
        match attribute {
            "fullname" => self.fullname = value,
            "shortcode" => self.shortcode = value,
            "char" => self.char = value,
            _ => return false,
        }
        true
    }
}

fn prefix(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

/// Which representation of a component a placeholder asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Full,
    Short,
    Char,
}

impl Format {
    /// Parse an explicit `:full`, `:short` or `:char` suffix
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "full" => Some(Format::Full),
            "short" => Some(Format::Short),
            "char" => Some(Format::Char),
            _ => None,
        }
    }

    /// Implied format of a placeholder without a suffix
    ///
    /// `spelling` is the placeholder including its braces, so `{e}` is `char`,
    /// `{env}` is `short` and `{environment}` is `full`.
    pub fn implied_by(spelling: &str) -> Self {
        match spelling.chars().count() {
            0..=4 => Format::Char,
            5 => Format::Short,
            _ => Format::Full,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Full => "full",
            Format::Short => "short",
            Format::Char => "char",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fixed, well-known naming slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    ResourceType,
    ResourcePrefix,
    Basename,
    Environment,
    Region,
    Instance,
    Organization,
    BusinessUnit,
    CostCenter,
    Project,
    Application,
    Workload,
    Subscription,
    Location,
    Domain,
    Criticality,
    Initiative,
    Solution,
}

impl Slot {
    pub const ALL: [Slot; 18] = [
        Slot::ResourceType,
        Slot::ResourcePrefix,
        Slot::Basename,
        Slot::Environment,
        Slot::Region,
        Slot::Instance,
        Slot::Organization,
        Slot::BusinessUnit,
        Slot::CostCenter,
        Slot::Project,
        Slot::Application,
        Slot::Workload,
        Slot::Subscription,
        Slot::Location,
        Slot::Domain,
        Slot::Criticality,
        Slot::Initiative,
        Slot::Solution,
    ];

    /// Canonical placeholder and parameter name
    pub fn name(&self) -> &'static str {
        match self {
            Slot::ResourceType => "resource_type",
            Slot::ResourcePrefix => "resource_prefix",
            Slot::Basename => "basename",
            Slot::Environment => "environment",
            Slot::Region => "region",
            Slot::Instance => "instance",
            Slot::Organization => "organization",
            Slot::BusinessUnit => "business_unit",
            Slot::CostCenter => "cost_center",
            Slot::Project => "project",
            Slot::Application => "application",
            Slot::Workload => "workload",
            Slot::Subscription => "subscription",
            Slot::Location => "location",
            Slot::Domain => "domain",
            Slot::Criticality => "criticality",
            Slot::Initiative => "initiative",
            Slot::Solution => "solution",
        }
    }

    /// Short placeholder aliases, without braces
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Slot::ResourceType | Slot::ResourcePrefix | Slot::Basename => &[],
            Slot::Environment => &["env", "e"],
            Slot::Region => &["r"],
            Slot::Instance => &["inst", "i"],
            Slot::Organization => &["org", "o"],
            Slot::BusinessUnit => &["bu"],
            Slot::CostCenter => &["cc"],
            Slot::Project => &["proj", "p"],
            Slot::Application => &["app", "a"],
            Slot::Workload => &["wl", "w"],
            Slot::Subscription => &["sub", "s"],
            Slot::Location => &["loc"],
            Slot::Domain => &["d"],
            Slot::Criticality => &["crit", "c"],
            Slot::Initiative => &["init"],
            Slot::Solution => &["sol"],
        }
    }

    /// Top-level key of this slot in the persisted snapshot document
    pub fn snapshot_key(&self) -> &'static str {
        match self {
            Slot::ResourceType => "DefaultResourceType",
            Slot::ResourcePrefix => "DefaultResourcePrefix",
            Slot::Basename => "DefaultBasename",
            Slot::Environment => "DefaultEnvironment",
            Slot::Region => "DefaultRegion",
            Slot::Instance => "DefaultInstance",
            Slot::Organization => "DefaultOrganization",
            Slot::BusinessUnit => "DefaultBusinessUnit",
            Slot::CostCenter => "DefaultCostCenter",
            Slot::Project => "DefaultProject",
            Slot::Application => "DefaultApplication",
            Slot::Workload => "DefaultWorkload",
            Slot::Subscription => "DefaultSubscription",
            Slot::Location => "DefaultLocation",
            Slot::Domain => "DefaultDomain",
            Slot::Criticality => "DefaultCriticality",
            Slot::Initiative => "DefaultInitiative",
            Slot::Solution => "DefaultSolution",
        }
    }

    /// Look up a slot by its canonical name
    pub fn from_name(name: &str) -> Option<Slot> {
        Slot::ALL.iter().copied().find(|slot| slot.name() == name)
    }

    /// Look up a slot by canonical name or alias
    pub fn from_placeholder_name(name: &str) -> Option<Slot> {
        Slot::ALL
            .iter()
            .copied()
            .find(|slot| slot.name() == name || slot.aliases().contains(&name))
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Slot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Slot::from_name(s).ok_or_else(|| format!("unknown component slot: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fullname_only_fallbacks() {
        let value = ComponentValue::full("production");
        assert_eq!(value.select(Format::Short), "production");
        assert_eq!(value.select(Format::Char), "p");
        assert_eq!(value.select_default(Format::Short), "pro");
        assert_eq!(value.select_default(Format::Char), "p");
    }

    #[test]
    fn test_explicit_fields_win() {
        let value = ComponentValue::new("westeurope", "we", "w");
        assert_eq!(value.select(Format::Full), "westeurope");
        assert_eq!(value.select(Format::Short), "we");
        assert_eq!(value.select_default(Format::Char), "w");
    }

    #[test]
    fn test_short_default_of_short_fullname() {
        let value = ComponentValue::full("qa");
        assert_eq!(value.select_default(Format::Short), "qa");
    }

    #[test]
    fn test_empty_strings_are_absent() {
        let value = ComponentValue::from_parts(Some(String::new()), Some(String::new()), None);
        assert!(value.is_null());
        assert_eq!(value, ComponentValue::default());
    }

    #[test]
    fn test_implied_format_by_length() {
        assert_eq!(Format::implied_by("{e}"), Format::Char);
        assert_eq!(Format::implied_by("{cc}"), Format::Char);
        assert_eq!(Format::implied_by("{env}"), Format::Short);
        assert_eq!(Format::implied_by("{inst}"), Format::Full);
        assert_eq!(Format::implied_by("{region}"), Format::Full);
    }

    #[test]
    fn test_slot_lookup_by_alias() {
        assert_eq!(Slot::from_placeholder_name("env"), Some(Slot::Environment));
        assert_eq!(Slot::from_placeholder_name("r"), Some(Slot::Region));
        assert_eq!(Slot::from_placeholder_name("loc"), Some(Slot::Location));
        assert_eq!(Slot::from_placeholder_name("version"), None);
        assert_eq!(Slot::from_name("env"), None);
    }

    #[test]
    fn test_aliases_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for slot in Slot::ALL {
            assert!(seen.insert(slot.name()));
            for alias in slot.aliases() {
                assert!(seen.insert(alias), "duplicate alias {}", alias);
            }
        }
    }

    #[test]
    fn test_merge_prefers_overlay() {
        let base = ComponentValue::new("westeurope", "we", "w");
        let overlay = ComponentValue::default().with_shortcode("gwc");
        let merged = base.merged_with(&overlay);
        assert_eq!(merged.fullname_str(), "westeurope");
        assert_eq!(merged.shortcode_str(), "gwc");
    }
}
