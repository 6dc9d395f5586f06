pub mod counters;
pub mod error;
pub mod labels;
pub mod selector;
pub mod templates;
pub mod tree;

use std::sync::Arc;

use counters::CounterRegistry;
use templates::TemplateParser;

// Re-export key types for easier usage
pub use error::{LabelError, TemplateError};
pub use labels::{InlineRewrite, LabelMode, LabelOutput, LabelSettings, LabelWarning, PlainText};
pub use selector::{ElementKind, Selector};
pub use templates::LabelTemplate;
pub use tree::markdown::parse_markdown;
pub use tree::{Document, NodeId};

/// Counter styles and parsed templates, shared by every document labelled
/// through it.
#[derive(Clone)]
pub struct LabelContext {
    parser: Arc<TemplateParser>,
}

impl LabelContext {
    pub fn new(registry: Arc<CounterRegistry>) -> Self {
        Self {
            parser: Arc::new(TemplateParser::new(registry)),
        }
    }

    pub fn parser(&self) -> &TemplateParser {
        &self.parser
    }
}

impl Default for LabelContext {
    fn default() -> Self {
        Self::new(CounterRegistry::shared())
    }
}

/// Labels documents with one set of settings.
///
/// ```
/// use markdown_labels_engine::{LabelSettings, Labels, parse_markdown};
///
/// let mut doc = parse_markdown("# Intro\n\n# Usage\n");
/// let settings = LabelSettings {
///     h_labels: Some("1. ".to_string()),
///     ..LabelSettings::default()
/// };
/// Labels::new(settings).apply(&mut doc).unwrap();
/// assert_eq!(
///     doc.to_html(),
///     concat!(
///         r#"<h1><span class="la-label">1. </span>Intro</h1>"#,
///         r#"<h1><span class="la-label">2. </span>Usage</h1>"#,
///     )
/// );
/// ```
pub struct Labels {
    settings: LabelSettings,
    context: LabelContext,
    rewrite: Arc<dyn InlineRewrite>,
}

impl Labels {
    pub fn new(settings: LabelSettings) -> Self {
        Self::with_context(settings, LabelContext::default())
    }

    pub fn with_context(settings: LabelSettings, context: LabelContext) -> Self {
        Self {
            settings,
            context,
            rewrite: Arc::new(PlainText),
        }
    }

    /// Replaces how label and reference text becomes document nodes.
    pub fn with_inline_rewrite(mut self, rewrite: Arc<dyn InlineRewrite>) -> Self {
        self.rewrite = rewrite;
        self
    }

    pub fn settings(&self) -> &LabelSettings {
        &self.settings
    }

    /// Labels `doc` in place: finds references, numbers headings and lists in
    /// document order, and fills in references as their targets are reached.
    pub fn apply(&self, doc: &mut Document) -> Result<LabelOutput, LabelError> {
        let processor = labels::LabelProcessor::new(
            self.context.parser(),
            &self.settings,
            Arc::clone(&self.rewrite),
        )?;
        processor.run(doc)
    }
}
