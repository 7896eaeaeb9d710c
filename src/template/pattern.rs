//! Parsed naming templates
//!
//! A template is split once into literal text and classified placeholders, so
//! resolution is a single pass over the segments.

use crate::component::{Format, Slot};

use super::lexer::{lex, Span, Token};

/// What a placeholder refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// One of the fixed slots, with the requested representation
    Slot { slot: Slot, format: Format },
    /// A free-form additional component
    Additional { name: String, format: Format },
    /// Cannot be resolved (empty name, unknown suffix, unterminated brace)
    Invalid,
}

/// A single `{...}` occurrence in a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// The text as written in the template, braces included
    pub spelling: String,
    pub target: Target,
    pub span: Span,
}

impl Placeholder {
    fn classify(inner: &str, span: Span) -> Self {
        let spelling = format!("{{{}}}", inner);
        let target = classify(inner, &spelling);
        Self {
            spelling,
            target,
            span,
        }
    }
}

fn classify(inner: &str, spelling: &str) -> Target {
    let (name, suffix) = match inner.split_once(':') {
        Some((name, suffix)) => (name, Some(suffix)),
        None => (inner, None),
    };
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Target::Invalid;
    }

    match Slot::from_placeholder_name(name) {
        Some(slot) => {
            let format = match suffix {
                Some(suffix) => match Format::from_suffix(suffix) {
                    Some(format) => format,
                    None => return Target::Invalid,
                },
                None => Format::implied_by(spelling),
            };
            Target::Slot { slot, format }
        }
        None => {
            // Additional components have no implied format: `{x}` is the full name
            let format = match suffix {
                Some(suffix) => match Format::from_suffix(suffix) {
                    Some(format) => format,
                    None => return Target::Invalid,
                },
                None => Format::Full,
            };
            Target::Additional {
                name: name.to_string(),
                format,
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(Placeholder),
}

/// A template split into literal text and placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub source: String,
    pub segments: Vec<Segment>,
}

impl Template {
    pub fn parse(source: &str) -> Self {
        let mut segments = Vec::new();
        for (token, span) in lex(source) {
            match token {
                Token::Literal(text) => segments.push(Segment::Literal(text)),
                Token::CloseBrace => segments.push(Segment::Literal("}".to_string())),
                Token::Placeholder(inner) => {
                    segments.push(Segment::Placeholder(Placeholder::classify(&inner, span)))
                }
                Token::Unterminated(spelling) => segments.push(Segment::Placeholder(Placeholder {
                    spelling,
                    target: Target::Invalid,
                    span,
                })),
            }
        }

        Self {
            source: source.to_string(),
            segments,
        }
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(p) => Some(p),
            Segment::Literal(_) => None,
        })
    }

    /// True when the template has at least one placeholder
    pub fn has_placeholders(&self) -> bool {
        self.placeholders().next().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(source: &str) -> Vec<Target> {
        Template::parse(source)
            .placeholders()
            .map(|p| p.target.clone())
            .collect()
    }

    #[test]
    fn test_canonical_and_suffixed() {
        assert_eq!(
            targets("{basename}-{environment:short}-{region:char}"),
            vec![
                Target::Slot {
                    slot: Slot::Basename,
                    format: Format::Full
                },
                Target::Slot {
                    slot: Slot::Environment,
                    format: Format::Short
                },
                Target::Slot {
                    slot: Slot::Region,
                    format: Format::Char
                },
            ]
        );
    }

    #[test]
    fn test_aliases_imply_format() {
        assert_eq!(
            targets("{env}{e}{inst}"),
            vec![
                Target::Slot {
                    slot: Slot::Environment,
                    format: Format::Short
                },
                Target::Slot {
                    slot: Slot::Environment,
                    format: Format::Char
                },
                Target::Slot {
                    slot: Slot::Instance,
                    format: Format::Full
                },
            ]
        );
    }

    #[test]
    fn test_alias_with_explicit_suffix() {
        assert_eq!(
            targets("{e:full}"),
            vec![Target::Slot {
                slot: Slot::Environment,
                format: Format::Full
            }]
        );
    }

    #[test]
    fn test_additional_component_defaults_to_full() {
        assert_eq!(
            targets("{v}{department:short}"),
            vec![
                Target::Additional {
                    name: "v".to_string(),
                    format: Format::Full
                },
                Target::Additional {
                    name: "department".to_string(),
                    format: Format::Short
                },
            ]
        );
    }

    #[test]
    fn test_invalid_placeholders() {
        assert_eq!(
            targets("{}{region:tiny}{a b}"),
            vec![Target::Invalid, Target::Invalid, Target::Invalid]
        );
    }

    #[test]
    fn test_unterminated_brace_is_one_placeholder() {
        let template = Template::parse("rg-{basename");
        let placeholders: Vec<_> = template.placeholders().collect();
        assert_eq!(placeholders.len(), 1);
        assert_eq!(placeholders[0].spelling, "{basename");
        assert_eq!(placeholders[0].span, 3..12);
        assert_eq!(placeholders[0].target, Target::Invalid);
    }

    #[test]
    fn test_unterminated_brace_keeps_following_placeholders() {
        let template = Template::parse("{base{e}-x");
        let spellings: Vec<_> = template
            .placeholders()
            .map(|p| (p.spelling.as_str(), p.target.clone()))
            .collect();
        assert_eq!(
            spellings,
            vec![
                ("{base", Target::Invalid),
                (
                    "{e}",
                    Target::Slot {
                        slot: Slot::Environment,
                        format: Format::Char
                    }
                ),
            ]
        );
    }

    #[test]
    fn test_stray_close_brace_is_literal() {
        let template = Template::parse("a}b");
        assert!(!template.has_placeholders());
    }
}
