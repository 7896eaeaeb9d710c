//! Naming templates and their resolution
//!
//! A naming pattern is a template such as `rg-{basename}-{env}-{region:short}`.
//! Placeholders name either one of the fixed [`Slot`](crate::component::Slot)s
//! (by canonical name or short alias) or a free-form additional component,
//! optionally followed by an explicit `:full`, `:short` or `:char` suffix.
//!
//! # Example
//!
//! ```rust
//! use resource_naming_tool::component::{ComponentValue, Slot};
//! use resource_naming_tool::params::NamingParameters;
//! use resource_naming_tool::template::{resolve, ResolutionContext};
//!
//! let params = NamingParameters::new()
//!     .with_resource_type("azurerm_resource_group")
//!     .with_component(Slot::Basename, ComponentValue::full("example"))
//!     .with_component(Slot::Environment, ComponentValue::full("production").with_shortcode("prd"))
//!     .with_component(Slot::Region, ComponentValue::full("westeurope").with_shortcode("we"));
//!
//! let name = resolve(&params, &ResolutionContext::new()).unwrap();
//! assert_eq!(name, "rg-example-prd-we");
//! ```

mod builtin;
mod lexer;
mod pattern;
mod registry;
mod resolver;

pub use builtin::BUILTIN_PATTERNS;
pub use lexer::{lex, Span, Token};
pub use pattern::{Placeholder, Segment, Target, Template};
pub use registry::{PatternEntry, PatternSource, PatternTable};
pub use resolver::{render_template, resolve, select_pattern, ResolutionContext, SelectedPattern};
