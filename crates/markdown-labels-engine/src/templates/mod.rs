//! The label template language.
//!
//! A template such as `(H.a),[L:1],*` describes one label segment per nesting
//! level: literal text, an optional parent marker and separator, and a counter
//! style name.
//!
//! ## Modules
//!
//! - [`cursor`] - character cursor used by the parser
//! - [`parser`] - [`TemplateParser`], which parses and caches templates

pub mod cursor;
pub mod parser;

use std::fmt;
use std::sync::Arc;

use crate::counters::CounterStyle;
use crate::selector::Selector;

pub use parser::TemplateParser;

/// What a template prescribes for the next level of nesting.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChildTemplate {
    /// The same template again, indefinitely (`,*`).
    Repeat,
    /// A different template.
    Next(Arc<LabelTemplate>),
}

/// A parsed label template. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LabelTemplate {
    pub prefix: String,
    pub separator: String,
    pub suffix: String,
    /// Which ancestor's label is prefixed in, if any.
    pub parent_type: Option<Selector>,
    /// `None` for pure-literal templates such as bullet glyphs.
    pub counter_style: Option<Arc<CounterStyle>>,
    pub child: Option<ChildTemplate>,
}

impl LabelTemplate {
    /// A template that only emits `text`.
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            prefix: text.into(),
            separator: String::new(),
            suffix: String::new(),
            parent_type: None,
            counter_style: None,
            child: None,
        }
    }

    /// The template for the next nesting level.
    pub fn child_template(self: &Arc<Self>) -> Option<Arc<LabelTemplate>> {
        match &self.child {
            None => None,
            Some(ChildTemplate::Repeat) => Some(Arc::clone(self)),
            Some(ChildTemplate::Next(next)) => Some(Arc::clone(next)),
        }
    }

    /// Whether this template produces a number, as opposed to fixed text.
    pub fn is_numbered(&self) -> bool {
        self.counter_style.is_some()
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, literal: &str) -> fmt::Result {
    write!(f, "\"{}\"", literal.replace('"', "\"\""))
}

impl fmt::Display for LabelTemplate {
    /// Writes the canonical source form, which parses back to an equal template.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.prefix.is_empty() || self.counter_style.is_none() {
            write_quoted(f, &self.prefix)?;
        }
        if let Some(style) = &self.counter_style {
            if let Some(parent) = self.parent_type {
                write!(f, "{parent}")?;
                write_quoted(f, &self.separator)?;
            }
            f.write_str(style.css_id())?;
            if !self.suffix.is_empty() {
                write_quoted(f, &self.suffix)?;
            }
        }
        match &self.child {
            None => Ok(()),
            Some(ChildTemplate::Repeat) => f.write_str(",*"),
            Some(ChildTemplate::Next(next)) => write!(f, ",{next}"),
        }
    }
}
