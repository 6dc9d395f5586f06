use thiserror::Error;

/// A label template could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("syntax error in label template \"{template}\" at offset {offset}: expected {expected}, found \"{fragment}\"")]
    Syntax {
        template: String,
        offset: usize,
        fragment: String,
        expected: &'static str,
    },

    #[error("unknown counter style \"{name}\" at offset {offset} in label template \"{template}\"")]
    UnknownCounterStyle {
        template: String,
        offset: usize,
        name: String,
    },
}

impl TemplateError {
    /// Character offset of the offending text.
    pub fn offset(&self) -> usize {
        match self {
            Self::Syntax { offset, .. } | Self::UnknownCounterStyle { offset, .. } => *offset,
        }
    }
}

/// Labelling a document failed.
#[derive(Error, Debug)]
pub enum LabelError {
    #[error("invalid {origin} label template")]
    Template {
        /// Where the template came from, e.g. `-label directive on <h2>` or `h_labels setting`.
        origin: String,
        #[source]
        source: TemplateError,
    },

    #[error("h_level must be between 1 and 6, got {0}")]
    InvalidHeadingLevel(u8),
}

impl LabelError {
    pub fn template(origin: impl Into<String>, source: TemplateError) -> Self {
        Self::Template {
            origin: origin.into(),
            source,
        }
    }
}
