//! Labelling: numbering headings and list items, and resolving references
//! to their labels.
//!
//! ## Modules
//!
//! - [`labeller`] - live numbering series and their interning
//! - [`render`] - text and CSS renderers
//! - [`directives`] - per-element `-label` / `-no-label` directives
//! - [`refs`] - `##` reference discovery and resolution
//! - [`processor`] - the tree walk tying it together
//! - [`settings`] - default templates and output mode

pub mod directives;
pub mod labeller;
pub mod processor;
pub mod refs;
pub mod render;
pub mod settings;

pub use directives::LabelWarning;
pub use labeller::{Labeller, LabellerId, Labellers};
pub use processor::{LabelOutput, LabelProcessor};
pub use refs::RefResolver;
pub use render::{CssRenderer, InlineRewrite, LabelRenderer, PlainText, Stylesheet, TextRenderer};
pub use settings::{LabelMode, LabelSettings};
