use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use super::labeller::{LabellerId, Labellers};
use crate::tree::{Document, NodeId};

pub const LABELLED_CLASS: &str = "la-labelled";
pub const LABEL_CLASS: &str = "la-label";
pub const NO_LABEL_CLASS: &str = "la-no-label";

/// Turns label or reference text into document nodes.
///
/// Lets callers run their own inline markup over generated text.
pub trait InlineRewrite: Send + Sync {
    fn rewrite(&self, doc: &mut Document, text: &str) -> Vec<NodeId>;
}

/// Emits the text unchanged as a single text node.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainText;

impl InlineRewrite for PlainText {
    fn rewrite(&self, doc: &mut Document, text: &str) -> Vec<NodeId> {
        vec![doc.create_text(text)]
    }
}

/// Generated CSS rules, each kept once, in first-emitted order.
#[derive(Debug, Default)]
pub struct Stylesheet {
    rules: Vec<String>,
    seen: HashSet<String>,
}

impl Stylesheet {
    pub fn add(&mut self, rule: String) {
        if self.seen.insert(rule.clone()) {
            self.rules.push(rule);
        }
    }
}

impl fmt::Display for Stylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in &self.rules {
            writeln!(f, "{rule}")?;
        }
        Ok(())
    }
}

/// What a renderer may touch.
pub struct RenderCx<'a> {
    pub doc: &'a mut Document,
    pub labellers: &'a Labellers,
    pub stylesheet: &'a mut Stylesheet,
}

/// Puts a labeller's current label onto an element.
///
/// `container` is the list holding `element`, or `None` for standalone
/// elements such as headings.
pub trait LabelRenderer {
    fn render_labelled(
        &mut self,
        cx: &mut RenderCx<'_>,
        labeller: LabellerId,
        container: Option<NodeId>,
        element: NodeId,
    );

    fn render_unlabelled(
        &mut self,
        cx: &mut RenderCx<'_>,
        container: Option<NodeId>,
        element: NodeId,
    ) {
        if container.is_some() {
            cx.doc.add_class(element, NO_LABEL_CLASS);
        }
    }
}

fn hide_list_markers(stylesheet: &mut Stylesheet) {
    stylesheet.add(format!(".{LABELLED_CLASS}>li{{list-style-type:none;}}"));
}

/// Inserts the label text as a `span.la-label` before the element's content.
pub struct TextRenderer {
    rewrite: Arc<dyn InlineRewrite>,
    containers: HashSet<NodeId>,
}

impl TextRenderer {
    pub fn new(rewrite: Arc<dyn InlineRewrite>) -> Self {
        Self {
            rewrite,
            containers: HashSet::new(),
        }
    }
}

impl LabelRenderer for TextRenderer {
    fn render_labelled(
        &mut self,
        cx: &mut RenderCx<'_>,
        labeller: LabellerId,
        container: Option<NodeId>,
        element: NodeId,
    ) {
        if let Some(container) = container
            && self.containers.insert(container)
        {
            cx.doc.add_class(container, LABELLED_CLASS);
            hide_list_markers(cx.stylesheet);
        }

        let text = cx.labellers.text(labeller);
        let span = cx.doc.create_element("span");
        cx.doc.set_attr(span, "class", LABEL_CLASS);
        for node in self.rewrite.rewrite(cx.doc, &text) {
            cx.doc.append_child(span, node);
        }
        cx.doc.insert_child(element, 0, span);
    }
}

/// Emits counter rules so that the browser draws list labels itself.
///
/// Standalone elements have no container to scope a counter to, so they are
/// labelled as text.
pub struct CssRenderer {
    text: TextRenderer,
    containers: HashMap<NodeId, Container>,
}

/// How a container has been styled so far.
struct Container {
    /// Class given to the container by its first labeller.
    class: String,
    /// Labeller currently governing its items.
    current: LabellerId,
    /// Whether the labeller changed part-way through.
    switched: bool,
}

impl CssRenderer {
    pub fn new(rewrite: Arc<dyn InlineRewrite>) -> Self {
        Self {
            text: TextRenderer::new(rewrite),
            containers: HashMap::new(),
        }
    }
}

impl LabelRenderer for CssRenderer {
    fn render_labelled(
        &mut self,
        cx: &mut RenderCx<'_>,
        labeller: LabellerId,
        container: Option<NodeId>,
        element: NodeId,
    ) {
        let Some(container) = container else {
            return self.text.render_labelled(cx, labeller, None, element);
        };
        let Some(class) = cx.labellers.get(labeller).style_id.clone() else {
            return self.text.render_labelled(cx, labeller, Some(container), element);
        };

        hide_list_markers(cx.stylesheet);
        let numbered = cx.labellers.get(labeller).template.is_numbered();
        let content = cx.labellers.css_expr(labeller);

        let Some(state) = self.containers.get_mut(&container) else {
            cx.doc.add_class(container, LABELLED_CLASS);
            cx.doc.add_class(container, &class);
            let items = format!(".{class}>li:not(.{NO_LABEL_CLASS})");
            if numbered {
                cx.stylesheet.add(format!(".{class}{{counter-reset:{class};}}"));
                cx.stylesheet.add(format!("{items}{{counter-increment:{class};}}"));
            }
            cx.stylesheet.add(format!("{items}::before{{content:{content};}}"));
            self.containers.insert(
                container,
                Container {
                    class,
                    current: labeller,
                    switched: false,
                },
            );
            return;
        };

        if state.current != labeller {
            // Outranks the container's own item rules, which would otherwise
            // keep counting and drawing the first series.
            let items = format!(".{}>li.{class}:not(.{NO_LABEL_CLASS})", state.class);
            if numbered {
                cx.stylesheet.add(format!("{items}{{counter-increment:{class};}}"));
            }
            cx.stylesheet.add(format!("{items}::before{{content:{content};}}"));
            cx.doc.add_style(element, &format!("counter-reset:{class}"));
            state.current = labeller;
            state.switched = true;
        }
        if state.switched {
            cx.doc.add_class(element, &class);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counters::CounterRegistry;
    use crate::selector::ElementKind;
    use crate::templates::TemplateParser;
    use insta::assert_snapshot;

    fn list(doc: &mut Document, items: usize) -> (NodeId, Vec<NodeId>) {
        let root = doc.root();
        let ol = doc.append_element(root, "ol");
        let items = (0..items)
            .map(|i| {
                let li = doc.append_element(ol, "li");
                doc.append_text(li, &format!("item {i}"));
                li
            })
            .collect();
        (ol, items)
    }

    #[test]
    fn text_renderer_inserts_label_span() {
        let parser = TemplateParser::new(CounterRegistry::shared());
        let mut doc = Document::new();
        let (ol, items) = list(&mut doc, 2);
        let mut labellers = Labellers::new();
        let id = labellers.create(
            ElementKind::OrderedList,
            parser.parse("(a)").expect("parses"),
            None,
            false,
        );
        let mut stylesheet = Stylesheet::default();
        let mut renderer = TextRenderer::new(Arc::new(PlainText));

        for li in items {
            labellers.increment(id);
            let mut cx = RenderCx {
                doc: &mut doc,
                labellers: &labellers,
                stylesheet: &mut stylesheet,
            };
            renderer.render_labelled(&mut cx, id, Some(ol), li);
        }

        assert_snapshot!(
            doc.to_html(),
            @r#"<ol class="la-labelled"><li><span class="la-label">(a)</span>item 0</li><li><span class="la-label">(b)</span>item 1</li></ol>"#
        );
        assert_snapshot!(stylesheet.to_string(), @".la-labelled>li{list-style-type:none;}");
    }

    #[test]
    fn css_renderer_resets_counter_on_template_switch() {
        let parser = TemplateParser::new(CounterRegistry::shared());
        let mut doc = Document::new();
        let (ol, items) = list(&mut doc, 3);
        let mut labellers = Labellers::new();
        let first = labellers.create(
            ElementKind::OrderedList,
            parser.parse("1.").expect("parses"),
            None,
            true,
        );
        let second = labellers.create(
            ElementKind::OrderedList,
            parser.parse("(i)").expect("parses"),
            None,
            true,
        );
        let mut stylesheet = Stylesheet::default();
        let mut renderer = CssRenderer::new(Arc::new(PlainText));

        for (li, labeller) in items.into_iter().zip([first, second, second]) {
            labellers.increment(labeller);
            let mut cx = RenderCx {
                doc: &mut doc,
                labellers: &labellers,
                stylesheet: &mut stylesheet,
            };
            renderer.render_labelled(&mut cx, labeller, Some(ol), li);
        }

        assert_snapshot!(
            doc.to_html(),
            @r#"<ol class="la-labelled la-label0"><li>item 0</li><li class="la-label1" style="counter-reset:la-label1">item 1</li><li class="la-label1">item 2</li></ol>"#
        );
        assert_snapshot!(stylesheet.to_string(), @r#"
        .la-labelled>li{list-style-type:none;}
        .la-label0{counter-reset:la-label0;}
        .la-label0>li:not(.la-no-label){counter-increment:la-label0;}
        .la-label0>li:not(.la-no-label)::before{content:counter(la-label0,decimal) ".";}
        .la-label0>li.la-label1:not(.la-no-label){counter-increment:la-label1;}
        .la-label0>li.la-label1:not(.la-no-label)::before{content:"(" counter(la-label1,lower-roman) ")";}
        "#);
    }

    #[test]
    fn unlabelled_items_are_marked_only_inside_containers() {
        let mut doc = Document::new();
        let (ol, items) = list(&mut doc, 1);
        let heading = doc.append_element(doc.root(), "h1");
        let labellers = Labellers::new();
        let mut stylesheet = Stylesheet::default();
        let mut cx = RenderCx {
            doc: &mut doc,
            labellers: &labellers,
            stylesheet: &mut stylesheet,
        };
        let mut renderer = TextRenderer::new(Arc::new(PlainText));
        renderer.render_unlabelled(&mut cx, Some(ol), items[0]);
        renderer.render_unlabelled(&mut cx, None, heading);
        assert!(doc.has_class(items[0], NO_LABEL_CLASS));
        assert_eq!(doc.attr(heading, "class"), None);
    }
}
