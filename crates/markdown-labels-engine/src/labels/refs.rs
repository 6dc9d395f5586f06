use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, OnceLock};

use regex::Regex;

use super::render::InlineRewrite;
use crate::selector::Selector;
use crate::tree::{Document, NodeId, NodeKind};

pub const REF_CLASS: &str = "la-ref";

/// `##`, `##type` or `##{type}`.
fn marker_regex() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| {
        Regex::new(r"##(?:\{([A-Za-z0-9_-]+)\}|([A-Za-z0-9_-]+))?").expect("Invalid marker regex")
    })
}

/// Whether the byte at `index` is preceded by an odd run of backslashes.
fn is_escaped(text: &str, index: usize) -> bool {
    text[..index]
        .bytes()
        .rev()
        .take_while(|&b| b == b'\\')
        .count()
        % 2
        == 1
}

/// Finds label references inside local links and fills them in once their
/// targets are labelled.
pub struct RefResolver {
    rewrite: Arc<dyn InlineRewrite>,
    /// Pending placeholders by target id, then by selector.
    refs: HashMap<String, BTreeMap<Selector, Vec<NodeId>>>,
}

impl RefResolver {
    pub fn new(rewrite: Arc<dyn InlineRewrite>) -> Self {
        Self {
            rewrite,
            refs: HashMap::new(),
        }
    }

    /// Replaces every reference marker under a `<a href="#id">` with a
    /// `span.la-ref` placeholder holding the marker text.
    pub fn find_refs(&mut self, doc: &mut Document) {
        for node in doc.descendants(doc.root()) {
            if doc.tag(node) != Some("a") {
                continue;
            }
            let Some(target) = doc
                .attr(node, "href")
                .and_then(|href| href.strip_prefix('#'))
                .filter(|id| !id.is_empty())
                .map(str::to_string)
            else {
                continue;
            };
            self.find_in(doc, node, &target);
        }
    }

    fn find_in(&mut self, doc: &mut Document, element: NodeId, target: &str) {
        for child in doc.children(element).to_vec() {
            match doc.kind(child) {
                NodeKind::Text(_) => self.split_text(doc, child, target),
                NodeKind::Element { .. } if !doc.has_class(child, REF_CLASS) => {
                    self.find_in(doc, child, target)
                }
                NodeKind::Element { .. } => {}
            }
        }
    }

    fn split_text(&mut self, doc: &mut Document, node: NodeId, target: &str) {
        let Some(text) = doc.text(node).map(str::to_string) else {
            return;
        };

        let mut pieces = Vec::new();
        let mut last = 0;
        let mut search = 0;
        while let Some(caps) = marker_regex().captures_at(&text, search) {
            let Some(marker) = caps.get(0) else {
                break;
            };
            // An escaped `#` may still begin a marker of its own.
            if is_escaped(&text, marker.start()) {
                search = marker.start() + 1;
                continue;
            }
            search = marker.end();
            if marker.start() > last {
                pieces.push(doc.create_text(&text[last..marker.start()]));
            }

            let placeholder = doc.create_element("span");
            doc.set_attr(placeholder, "class", REF_CLASS);
            doc.append_text(placeholder, marker.as_str());
            pieces.push(placeholder);
            last = marker.end();

            let selector = match caps.get(1).or_else(|| caps.get(2)) {
                Some(name) => Selector::parse(name.as_str()),
                None => Some(Selector::Any),
            };
            match selector {
                Some(selector) => {
                    log::trace!("reference {:?} to #{target} ({selector})", marker.as_str());
                    self.refs
                        .entry(target.to_string())
                        .or_default()
                        .entry(selector)
                        .or_default()
                        .push(placeholder);
                }
                None => log::debug!("unknown selector in reference {:?}", marker.as_str()),
            }
        }

        if pieces.is_empty() {
            return;
        }
        if last < text.len() {
            pieces.push(doc.create_text(&text[last..]));
        }
        doc.replace_with(node, &pieces);
    }

    /// Fills in placeholders that target `node`'s id, using `lookup` to get the
    /// core label of the labeller each selector names. Placeholders whose
    /// lookup fails are left for a later node with the same id.
    pub fn resolve_refs(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        lookup: impl Fn(Selector) -> Option<String>,
    ) {
        let Some(id) = doc.attr(node, "id").map(str::to_string) else {
            return;
        };
        let Some(groups) = self.refs.get_mut(&id) else {
            return;
        };

        groups.retain(|&selector, placeholders| {
            let Some(label) = lookup(selector) else {
                return true;
            };
            for &placeholder in placeholders.iter() {
                for child in doc.children(placeholder).to_vec() {
                    doc.detach(child);
                }
                for replacement in self.rewrite.rewrite(doc, &label) {
                    doc.append_child(placeholder, replacement);
                }
            }
            false
        });

        if groups.is_empty() {
            self.refs.remove(&id);
        }
    }

    /// Number of reference groups still waiting for a target.
    pub fn pending(&self) -> usize {
        self.refs.values().map(BTreeMap::len).sum()
    }
}
