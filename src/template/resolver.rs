//! Template resolution - turns a naming pattern and parameters into a name

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::component::{ComponentValue, Format, Slot};
use crate::error::{NamingError, MAX_NAME_LENGTH, MIN_NAME_LENGTH};
use crate::params::NamingParameters;
use crate::store::ConfigurationSnapshot;

use super::lexer::Span;
use super::pattern::{Placeholder, Segment, Target, Template};
use super::registry::{PatternSource, PatternTable};

/// Everything a call resolves against besides its own parameters
#[derive(Debug, Clone)]
pub struct ResolutionContext {
    /// Default value per slot
    pub defaults: BTreeMap<Slot, ComponentValue>,
    /// Default values for free-form placeholders
    pub additional_components: BTreeMap<String, ComponentValue>,
    pub patterns: PatternTable,
}

impl Default for ResolutionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionContext {
    /// Create a context with the built-in patterns and no defaults
    pub fn new() -> Self {
        Self {
            defaults: BTreeMap::new(),
            additional_components: BTreeMap::new(),
            patterns: PatternTable::builtin(),
        }
    }

    /// Build the context from the persisted snapshot and function overrides
    ///
    /// Overrides replace every slot they set and overlay both maps.
    pub fn from_layers(
        persisted: Option<&ConfigurationSnapshot>,
        overrides: Option<&ConfigurationSnapshot>,
    ) -> Self {
        let mut ctx = Self::new();
        for snapshot in [persisted, overrides].into_iter().flatten() {
            ctx.apply(snapshot);
        }
        ctx
    }

    fn apply(&mut self, snapshot: &ConfigurationSnapshot) {
        for (slot, value) in &snapshot.defaults {
            if !value.is_null() {
                self.defaults.insert(*slot, value.clone());
            }
        }
        for (name, value) in &snapshot.additional_components {
            self.additional_components
                .insert(name.clone(), value.clone());
        }
        self.patterns.overlay(
            &snapshot.additional_naming_patterns,
            PatternSource::Configuration,
        );
    }

    /// The configured resource type, if any
    pub fn default_resource_type(&self) -> Option<&str> {
        self.defaults
            .get(&Slot::ResourceType)
            .map(|c| c.fullname_str())
            .filter(|s| !s.is_empty())
    }
}

/// The pattern chosen for a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedPattern<'a> {
    pub resource_type: &'a str,
    pub template: &'a str,
    pub source: PatternSource,
}

/// Determine the effective resource type and look up its pattern
///
/// Call-time patterns win over the context's table.
pub fn select_pattern<'a>(
    params: &'a NamingParameters,
    ctx: &'a ResolutionContext,
) -> Result<SelectedPattern<'a>, NamingError> {
    let resource_type = params
        .resource_type()
        .or_else(|| ctx.default_resource_type())
        .ok_or(NamingError::MissingResourceType)?;

    let (template, source) = match params.naming_patterns.get(resource_type) {
        Some(template) => (template.as_str(), PatternSource::Call),
        None => match ctx.patterns.entry(resource_type) {
            Some(entry) => (entry.template.as_str(), entry.source),
            None => {
                return Err(NamingError::MissingPattern {
                    resource_type: resource_type.to_string(),
                })
            }
        },
    };

    Ok(SelectedPattern {
        resource_type,
        template,
        source,
    })
}

/// Resolve the name for the call's resource type
pub fn resolve(params: &NamingParameters, ctx: &ResolutionContext) -> Result<String, NamingError> {
    let selected = select_pattern(params, ctx)?;
    debug!(
        resource_type = selected.resource_type,
        pattern = selected.template,
        source = %selected.source,
        "selected naming pattern"
    );

    let name = render_template(&Template::parse(selected.template), params, ctx)?;
    info!(resource_type = selected.resource_type, name = %name, "generated resource name");
    Ok(name)
}

/// Substitute every placeholder of `template` and validate the result
pub fn render_template(
    template: &Template,
    params: &NamingParameters,
    ctx: &ResolutionContext,
) -> Result<String, NamingError> {
    let mut result = String::with_capacity(template.source.len());
    let mut unresolved: Vec<&Placeholder> = Vec::new();

    for segment in &template.segments {
        match segment {
            Segment::Literal(text) => result.push_str(text),
            Segment::Placeholder(placeholder) => {
                match placeholder_value(placeholder, params, ctx) {
                    Some(value) => result.push_str(&value),
                    None => {
                        debug!(placeholder = %placeholder.spelling, "no value for placeholder");
                        result.push_str(&placeholder.spelling);
                        unresolved.push(placeholder);
                    }
                }
            }
        }
    }

    validate(result, &unresolved)
}

fn placeholder_value(
    placeholder: &Placeholder,
    params: &NamingParameters,
    ctx: &ResolutionContext,
) -> Option<String> {
    let (value, from) = match &placeholder.target {
        Target::Slot { slot, format } => slot_value(*slot, *format, params, ctx)?,
        Target::Additional { name, format } => additional_value(name, *format, params, ctx)?,
        Target::Invalid => return None,
    };
    debug!(
        placeholder = %placeholder.spelling,
        value = %value,
        from,
        "resolved placeholder"
    );
    Some(value)
}

fn slot_value(
    slot: Slot,
    format: Format,
    params: &NamingParameters,
    ctx: &ResolutionContext,
) -> Option<(String, &'static str)> {
    let call = params
        .component(slot)
        .map(|c| c.select(format))
        .filter(|v| !v.is_empty());
    if let Some(value) = call {
        return Some((value, "call"));
    }
    ctx.defaults
        .get(&slot)
        .map(|c| c.select_default(format))
        .filter(|v| !v.is_empty())
        .map(|value| (value, "default"))
}

// No fallback between representations; each field comes from the call when set
fn additional_value(
    name: &str,
    format: Format,
    params: &NamingParameters,
    ctx: &ResolutionContext,
) -> Option<(String, &'static str)> {
    let pick = |source: &BTreeMap<String, ComponentValue>| {
        source
            .get(name)
            .map(|c| c.get(format))
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };
    pick(&params.additional_components)
        .map(|v| (v, "call"))
        .or_else(|| pick(&ctx.additional_components).map(|v| (v, "default")))
}

fn validate(result: String, unresolved: &[&Placeholder]) -> Result<String, NamingError> {
    if result.contains('{') {
        let (placeholders, spans): (Vec<String>, Vec<Span>) = if unresolved.is_empty() {
            // A substituted value brought the brace in; there is no template span
            (braced_fragments(&result), Vec::new())
        } else {
            unresolved
                .iter()
                .map(|p| (p.spelling.clone(), p.span.clone()))
                .unzip()
        };
        return Err(NamingError::Unresolved {
            placeholders,
            spans,
            result,
        });
    }

    let length = result.chars().count();
    if length == 0 {
        return Err(NamingError::Empty);
    }
    if length > MAX_NAME_LENGTH {
        return Err(NamingError::TooLong {
            name: result,
            length,
        });
    }
    if length < MIN_NAME_LENGTH {
        return Err(NamingError::TooShort {
            name: result,
            length,
        });
    }
    Ok(result)
}

/// Every `{...` fragment of `text`, closed where a `}` follows
fn braced_fragments(text: &str) -> Vec<String> {
    text.split('{')
        .skip(1)
        .map(|part| match part.split_once('}') {
            Some((inner, _)) => format!("{{{}}}", inner),
            None => format!("{{{}", part),
        })
        .collect()
}
