use thiserror::Error;

use crate::tree::{Document, NodeId};

/// Attribute names carrying a label template, strongest first.
pub const LABEL_DIRECTIVES: [&str; 2] = ["-label", "md-label"];
/// Attribute names suppressing a label, strongest first.
pub const NO_LABEL_DIRECTIVES: [&str; 2] = ["-no-label", "md-no-label"];

/// A recoverable problem found while labelling.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LabelWarning {
    #[error("<{tag}> has both {kept} and {ignored}; using {kept}")]
    DuplicateDirective {
        tag: String,
        kept: &'static str,
        ignored: &'static str,
    },

    #[error("<{tag}> cannot take a {directive} directive; ignoring it")]
    MisplacedDirective { tag: String, directive: &'static str },

    #[error("<{tag}> has both a label template and {directive}; leaving it unlabelled")]
    ConflictingDirectives { tag: String, directive: &'static str },
}

fn tag_of(doc: &Document, node: NodeId) -> String {
    doc.tag(node).unwrap_or_default().to_string()
}

fn record(warnings: &mut Vec<LabelWarning>, warning: LabelWarning) {
    log::warn!("{warning}");
    warnings.push(warning);
}

/// Removes every form of a directive from `node`, returning the strongest
/// form present and its value.
fn take(
    doc: &mut Document,
    node: NodeId,
    names: [&'static str; 2],
    warnings: &mut Vec<LabelWarning>,
) -> Option<(&'static str, String)> {
    let found: Vec<(&'static str, String)> = names
        .into_iter()
        .filter_map(|name| doc.remove_attr(node, name).map(|value| (name, value)))
        .collect();

    if let [(kept, _), (ignored, _), ..] = found.as_slice() {
        record(
            warnings,
            LabelWarning::DuplicateDirective {
                tag: tag_of(doc, node),
                kept: *kept,
                ignored: *ignored,
            },
        );
    }
    found.into_iter().next()
}

/// Consumes a label template directive.
pub fn take_label(
    doc: &mut Document,
    node: NodeId,
    warnings: &mut Vec<LabelWarning>,
) -> Option<String> {
    take(doc, node, LABEL_DIRECTIVES, warnings).map(|(_, template)| template)
}

/// Consumes a no-label directive, returning whether one was present.
pub fn take_no_label(doc: &mut Document, node: NodeId, warnings: &mut Vec<LabelWarning>) -> bool {
    take(doc, node, NO_LABEL_DIRECTIVES, warnings).is_some()
}

/// Removes directives from an element that cannot carry them, with a warning for each.
pub fn discard_misplaced(doc: &mut Document, node: NodeId, warnings: &mut Vec<LabelWarning>) {
    if take(doc, node, LABEL_DIRECTIVES, warnings).is_some() {
        record(
            warnings,
            LabelWarning::MisplacedDirective {
                tag: tag_of(doc, node),
                directive: LABEL_DIRECTIVES[0],
            },
        );
    }
    if take(doc, node, NO_LABEL_DIRECTIVES, warnings).is_some() {
        record(
            warnings,
            LabelWarning::MisplacedDirective {
                tag: tag_of(doc, node),
                directive: NO_LABEL_DIRECTIVES[0],
            },
        );
    }
}

/// Records that a label template was dropped in favour of a no-label directive.
pub fn conflicting(doc: &Document, node: NodeId, warnings: &mut Vec<LabelWarning>) {
    record(
        warnings,
        LabelWarning::ConflictingDirectives {
            tag: tag_of(doc, node),
            directive: NO_LABEL_DIRECTIVES[0],
        },
    );
}

/// Records a directive that was removed because it has no effect here.
pub fn misplaced(
    doc: &Document,
    node: NodeId,
    directive: &'static str,
    warnings: &mut Vec<LabelWarning>,
) {
    record(
        warnings,
        LabelWarning::MisplacedDirective {
            tag: tag_of(doc, node),
            directive,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn heading(attrs: &[(&str, &str)]) -> (Document, NodeId) {
        let mut doc = Document::new();
        let root = doc.root();
        let h = doc.append_element(root, "h2");
        for (name, value) in attrs {
            doc.set_attr(h, *name, *value);
        }
        (doc, h)
    }

    #[test]
    fn dash_form_wins_over_md_form() {
        let (mut doc, h) = heading(&[("-label", "(1)"), ("md-label", "[a]")]);
        let mut warnings = Vec::new();
        assert_eq!(take_label(&mut doc, h, &mut warnings).as_deref(), Some("(1)"));
        assert_eq!(doc.attrs(h).map(|a| a.len()), Some(0));
        assert_eq!(
            warnings,
            vec![LabelWarning::DuplicateDirective {
                tag: "h2".to_string(),
                kept: "-label",
                ignored: "md-label",
            }]
        );
    }

    #[test]
    fn md_form_alone_is_accepted() {
        let (mut doc, h) = heading(&[("md-no-label", "")]);
        let mut warnings = Vec::new();
        assert!(take_no_label(&mut doc, h, &mut warnings));
        assert!(!take_no_label(&mut doc, h, &mut warnings));
        assert!(warnings.is_empty());
    }

    #[test]
    fn misplaced_directives_are_removed_with_warnings() {
        let mut doc = Document::new();
        let root = doc.root();
        let p = doc.append_element(root, "p");
        doc.set_attr(p, "-label", "1");
        doc.set_attr(p, "-no-label", "");
        doc.set_attr(p, "id", "keep");
        let mut warnings = Vec::new();
        discard_misplaced(&mut doc, p, &mut warnings);

        assert_eq!(doc.attr(p, "id"), Some("keep"));
        assert!(!doc.has_attr(p, "-label"));
        let messages: Vec<String> = warnings.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            vec![
                "<p> cannot take a -label directive; ignoring it",
                "<p> cannot take a -no-label directive; ignoring it",
            ]
        );
    }
}
