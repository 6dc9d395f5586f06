use std::sync::Arc;

use super::directives::{self, LABEL_DIRECTIVES, LabelWarning, NO_LABEL_DIRECTIVES};
use super::labeller::{LabellerId, Labellers};
use super::refs::RefResolver;
use super::render::{
    CssRenderer, InlineRewrite, LabelRenderer, RenderCx, Stylesheet, TextRenderer,
};
use super::settings::{LabelMode, LabelSettings};
use crate::error::LabelError;
use crate::selector::{ElementKind, Selector};
use crate::templates::{LabelTemplate, TemplateParser};
use crate::tree::{Document, NodeId};

/// What labelling produced besides the changes to the document.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LabelOutput {
    /// Generated CSS, one rule per line. Empty unless something needed styling.
    pub stylesheet: String,
    pub warnings: Vec<LabelWarning>,
}

/// The labellers in scope at the current point of the walk, innermost last.
#[derive(Debug, Default)]
struct Scopes {
    labellers: Labellers,
    stack: Vec<LabellerId>,
}

impl Scopes {
    /// Innermost labeller a selector refers to. `Any` and `List` skip
    /// labellers that do not number anything.
    fn find(&self, selector: Selector) -> Option<LabellerId> {
        let numbered_only = matches!(selector, Selector::Any | Selector::List);
        self.stack.iter().rev().copied().find(|&id| {
            let labeller = self.labellers.get(id);
            selector.matches(labeller.element_type)
                && (!numbered_only || labeller.template.is_numbered())
        })
    }

    fn find_kind(&self, kind: ElementKind) -> Option<LabellerId> {
        self.stack
            .iter()
            .rev()
            .copied()
            .find(|&id| self.labellers.get(id).element_type == kind)
    }

    fn push(&mut self, id: LabellerId) {
        self.stack.push(id);
    }

    fn remove(&mut self, id: LabellerId) {
        self.stack.retain(|&active| active != id);
    }

    /// Puts `new` in `old`'s place and drops everything that was built on `old`.
    fn replace(&mut self, old: LabellerId, new: LabellerId) {
        match self.stack.iter().position(|&active| active == old) {
            Some(index) => self.stack[index] = new,
            None => self.stack.push(new),
        }
        self.evict_children(old);
    }

    /// Removes every labeller descended from `id` from the stack.
    fn evict_children(&mut self, id: LabellerId) {
        for child in self.labellers.take_children(id) {
            self.remove(child);
            self.evict_children(child);
        }
    }

    /// Ends every section deeper than `level`.
    fn close_headings_below(&mut self, level: u8) {
        let closed: Vec<LabellerId> = self
            .stack
            .iter()
            .copied()
            .filter(|&id| {
                matches!(self.labellers.get(id).element_type, ElementKind::Heading(l) if l > level)
            })
            .collect();
        for id in closed {
            self.remove(id);
            self.evict_children(id);
        }
    }
}

/// Depth-first labelling walk over one document.
pub struct LabelProcessor<'a> {
    parser: &'a TemplateParser,
    h_level: u8,
    h_labels: Option<Arc<LabelTemplate>>,
    ol_labels: Option<Arc<LabelTemplate>>,
    ul_labels: Option<Arc<LabelTemplate>>,
    css: bool,
    scopes: Scopes,
    refs: RefResolver,
    headings: TextRenderer,
    lists: Box<dyn LabelRenderer>,
    stylesheet: Stylesheet,
    warnings: Vec<LabelWarning>,
}

fn parse_setting(
    parser: &TemplateParser,
    name: &str,
    source: Option<&str>,
) -> Result<Option<Arc<LabelTemplate>>, LabelError> {
    source
        .map(|source| {
            parser
                .parse(source)
                .map_err(|e| LabelError::template(format!("{name} setting"), e))
        })
        .transpose()
}

impl<'a> LabelProcessor<'a> {
    pub fn new(
        parser: &'a TemplateParser,
        settings: &LabelSettings,
        rewrite: Arc<dyn InlineRewrite>,
    ) -> Result<Self, LabelError> {
        if !(1..=6).contains(&settings.h_level) {
            return Err(LabelError::InvalidHeadingLevel(settings.h_level));
        }
        let css = settings.mode == LabelMode::Css;
        let lists: Box<dyn LabelRenderer> = if css {
            Box::new(CssRenderer::new(Arc::clone(&rewrite)))
        } else {
            Box::new(TextRenderer::new(Arc::clone(&rewrite)))
        };

        Ok(Self {
            parser,
            h_level: settings.h_level,
            h_labels: parse_setting(parser, "h_labels", settings.h_labels.as_deref())?,
            ol_labels: parse_setting(parser, "ol_labels", settings.ol_labels.as_deref())?,
            ul_labels: parse_setting(parser, "ul_labels", settings.ul_labels.as_deref())?,
            css,
            scopes: Scopes::default(),
            refs: RefResolver::new(Arc::clone(&rewrite)),
            headings: TextRenderer::new(rewrite),
            lists,
            stylesheet: Stylesheet::default(),
            warnings: Vec::new(),
        })
    }

    /// Labels `doc` in place.
    pub fn run(mut self, doc: &mut Document) -> Result<LabelOutput, LabelError> {
        self.refs.find_refs(doc);
        let root = doc.root();
        self.visit(doc, root)?;

        let pending = self.refs.pending();
        if pending > 0 {
            log::debug!("{pending} reference group(s) left unresolved");
        }
        Ok(LabelOutput {
            stylesheet: self.stylesheet.to_string(),
            warnings: self.warnings,
        })
    }

    fn visit(&mut self, doc: &mut Document, node: NodeId) -> Result<(), LabelError> {
        let Some(tag) = doc.tag(node) else {
            return Ok(());
        };
        match ElementKind::from_tag(tag) {
            Some(ElementKind::Heading(level)) => self.visit_heading(doc, node, level),
            Some(kind) => self.visit_list(doc, node, kind),
            None => self.visit_element(doc, node),
        }
    }

    fn parse_directive(&self, source: &str, tag: &str) -> Result<Arc<LabelTemplate>, LabelError> {
        self.parser.parse(source).map_err(|e| {
            LabelError::template(format!("{} directive on <{tag}>", LABEL_DIRECTIVES[0]), e)
        })
    }

    fn resolve_refs(&mut self, doc: &mut Document, node: NodeId) {
        let scopes = &self.scopes;
        self.refs.resolve_refs(doc, node, |selector| {
            scopes
                .find(selector)
                .map(|id| scopes.labellers.core_text(id))
        });
    }

    fn visit_heading(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        level: u8,
    ) -> Result<(), LabelError> {
        self.scopes.close_headings_below(level);

        let source = directives::take_label(doc, node, &mut self.warnings);
        if directives::take_no_label(doc, node, &mut self.warnings) {
            if source.is_some() {
                directives::conflicting(doc, node, &mut self.warnings);
            }
            let mut cx = RenderCx {
                doc,
                labellers: &self.scopes.labellers,
                stylesheet: &mut self.stylesheet,
            };
            self.headings.render_unlabelled(&mut cx, None, node);
        } else if let Some(labeller) = self.heading_labeller(level, source)? {
            self.scopes.labellers.increment(labeller);
            let mut cx = RenderCx {
                doc,
                labellers: &self.scopes.labellers,
                stylesheet: &mut self.stylesheet,
            };
            self.headings.render_labelled(&mut cx, labeller, None, node);
        }

        // Headings are not walked into.
        self.resolve_refs(doc, node);
        Ok(())
    }

    fn heading_labeller(
        &mut self,
        level: u8,
        source: Option<String>,
    ) -> Result<Option<LabellerId>, LabelError> {
        let kind = ElementKind::Heading(level);
        let tag = format!("h{level}");
        let directive = source
            .map(|source| self.parse_directive(&source, &tag))
            .transpose()?;

        if let Some(existing) = self.scopes.find_kind(kind) {
            let Some(template) = directive else {
                return Ok(Some(existing));
            };
            let parent = self.scopes.labellers.get(existing).parent;
            let replacement = self.scopes.labellers.create(kind, template, parent, false);
            self.scopes.replace(existing, replacement);
            return Ok(Some(replacement));
        }

        let template = directive
            .or_else(|| {
                let outer = self.scopes.find_kind(ElementKind::Heading(level - 1))?;
                self.scopes.labellers.get(outer).template.child_template()
            })
            .or_else(|| {
                (level == self.h_level)
                    .then(|| self.h_labels.clone())
                    .flatten()
            });
        let Some(template) = template else {
            return Ok(None);
        };

        let parent = template.parent_type.and_then(|s| self.scopes.find(s));
        let id = self.scopes.labellers.create(kind, template, parent, false);
        self.scopes.push(id);
        Ok(Some(id))
    }

    fn list_template(
        &self,
        tag: &str,
        kind: ElementKind,
        source: Option<String>,
    ) -> Result<Option<Arc<LabelTemplate>>, LabelError> {
        if let Some(source) = source {
            return self.parse_directive(&source, tag).map(Some);
        }
        Ok(match self.scopes.find_kind(kind) {
            Some(outer) => self.scopes.labellers.get(outer).template.child_template(),
            None if kind == ElementKind::OrderedList => self.ol_labels.clone(),
            None => self.ul_labels.clone(),
        })
    }

    fn visit_list(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        kind: ElementKind,
    ) -> Result<(), LabelError> {
        let tag = doc.tag(node).unwrap_or_default().to_string();
        let source = directives::take_label(doc, node, &mut self.warnings);
        if directives::take_no_label(doc, node, &mut self.warnings) {
            directives::misplaced(doc, node, NO_LABEL_DIRECTIVES[0], &mut self.warnings);
        }

        let Some(template) = self.list_template(&tag, kind, source)? else {
            return self.visit_element(doc, node);
        };
        let parent = template.parent_type.and_then(|s| self.scopes.find(s));
        let mut labeller = self.scopes.labellers.create(kind, template, parent, self.css);
        self.scopes.push(labeller);
        self.resolve_refs(doc, node);

        for item in doc.children(node).to_vec() {
            if doc.tag(item) != Some("li") {
                self.visit(doc, item)?;
                continue;
            }
            let content = doc.children(item).to_vec();

            let source = directives::take_label(doc, item, &mut self.warnings);
            if directives::take_no_label(doc, item, &mut self.warnings) {
                if source.is_some() {
                    directives::conflicting(doc, item, &mut self.warnings);
                }
                let mut cx = RenderCx {
                    doc,
                    labellers: &self.scopes.labellers,
                    stylesheet: &mut self.stylesheet,
                };
                self.lists.render_unlabelled(&mut cx, Some(node), item);
            } else {
                if let Some(source) = source {
                    let template = self.parse_directive(&source, "li")?;
                    let parent = self.scopes.labellers.get(labeller).parent;
                    let replacement = self
                        .scopes
                        .labellers
                        .create(kind, template, parent, self.css);
                    self.scopes.replace(labeller, replacement);
                    labeller = replacement;
                }
                self.scopes.labellers.increment(labeller);
                let mut cx = RenderCx {
                    doc,
                    labellers: &self.scopes.labellers,
                    stylesheet: &mut self.stylesheet,
                };
                self.lists.render_labelled(&mut cx, labeller, Some(node), item);
            }

            self.resolve_refs(doc, item);
            for child in content {
                self.visit(doc, child)?;
            }
            self.scopes.evict_children(labeller);
        }

        self.scopes.remove(labeller);
        Ok(())
    }

    fn visit_element(&mut self, doc: &mut Document, node: NodeId) -> Result<(), LabelError> {
        if doc.tag(node) == Some("li") {
            // Items of an unlabelled list.
            if directives::take_label(doc, node, &mut self.warnings).is_some() {
                directives::misplaced(doc, node, LABEL_DIRECTIVES[0], &mut self.warnings);
            }
            directives::take_no_label(doc, node, &mut self.warnings);
        } else {
            directives::discard_misplaced(doc, node, &mut self.warnings);
        }

        self.resolve_refs(doc, node);
        for child in doc.children(node).to_vec() {
            self.visit(doc, child)?;
        }
        Ok(())
    }
}
