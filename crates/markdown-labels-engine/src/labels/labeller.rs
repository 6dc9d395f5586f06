use std::collections::HashMap;
use std::sync::Arc;

use crate::selector::ElementKind;
use crate::templates::LabelTemplate;

/// Handle to a [`Labeller`] in a [`Labellers`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabellerId(usize);

/// One live numbering series.
#[derive(Debug)]
pub struct Labeller {
    pub element_type: ElementKind,
    pub template: Arc<LabelTemplate>,
    pub parent: Option<LabellerId>,
    pub count: i64,
    /// Shared by every labeller with the same template, parent and mode.
    pub intern_key: usize,
    /// Class and CSS counter name, in declarative-style mode only.
    pub style_id: Option<String>,
    /// Labellers created with this one as their parent.
    pub children: Vec<LabellerId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ParentKey {
    None,
    Interned(usize),
    /// A parent without a style id is inlined as literal text, so its current
    /// label is part of the identity.
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct InternKey {
    template: usize,
    parent: ParentKey,
    css: bool,
}

/// Arena of labellers plus the interning table for their style ids.
#[derive(Debug, Default)]
pub struct Labellers {
    arena: Vec<Labeller>,
    interned: HashMap<InternKey, usize>,
}

impl Labellers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new series at count 0.
    ///
    /// Structurally equal series (same template instance, equivalent parent,
    /// same mode) share an intern key and therefore a style id.
    pub fn create(
        &mut self,
        element_type: ElementKind,
        template: Arc<LabelTemplate>,
        parent: Option<LabellerId>,
        css: bool,
    ) -> LabellerId {
        let parent_key = match parent {
            None => ParentKey::None,
            Some(p) if css && self.get(p).style_id.is_none() => ParentKey::Text(self.core_text(p)),
            Some(p) => ParentKey::Interned(self.get(p).intern_key),
        };
        let key = InternKey {
            template: Arc::as_ptr(&template) as usize,
            parent: parent_key,
            css,
        };
        let next_key = self.interned.len();
        let intern_key = *self.interned.entry(key).or_insert(next_key);

        let id = LabellerId(self.arena.len());
        let style_id = css.then(|| format!("la-label{intern_key}"));
        log::debug!(
            "new {element_type:?} labeller {id:?} for template {template} \
             (parent {parent:?}, style {style_id:?})"
        );
        self.arena.push(Labeller {
            element_type,
            template,
            parent,
            count: 0,
            intern_key,
            style_id,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.arena[parent.0].children.push(id);
        }
        id
    }

    pub fn get(&self, id: LabellerId) -> &Labeller {
        &self.arena[id.0]
    }

    pub fn increment(&mut self, id: LabellerId) {
        self.arena[id.0].count += 1;
    }

    /// Empties and returns the list of labellers parented on `id`.
    pub fn take_children(&mut self, id: LabellerId) -> Vec<LabellerId> {
        std::mem::take(&mut self.arena[id.0].children)
    }

    /// The label without the template's own prefix and suffix, with the
    /// parent's core label and separator in front when there is a parent.
    pub fn core_text(&self, id: LabellerId) -> String {
        let labeller = self.get(id);
        let Some(style) = &labeller.template.counter_style else {
            return String::new();
        };
        let own = style.format(labeller.count);
        match labeller.parent.map(|p| self.core_text(p)) {
            Some(parent) if !parent.is_empty() => {
                format!("{parent}{}{own}", labeller.template.separator)
            }
            _ => own,
        }
    }

    /// The full label: prefix, core label, suffix.
    pub fn text(&self, id: LabellerId) -> String {
        let template = &self.get(id).template;
        format!("{}{}{}", template.prefix, self.core_text(id), template.suffix)
    }

    /// CSS `content` expression for the core label.
    pub fn css_expr_core(&self, id: LabellerId) -> String {
        let labeller = self.get(id);
        let Some(style) = &labeller.template.counter_style else {
            return String::new();
        };
        let Some(style_id) = &labeller.style_id else {
            return css_str(&self.core_text(id));
        };

        let counter = format!("counter({style_id},{})", style.css_id());
        match labeller.parent.map(|p| self.css_expr_core(p)) {
            Some(parent) if !parent.is_empty() => {
                join_css([parent, css_str(&labeller.template.separator), counter])
            }
            _ => counter,
        }
    }

    /// CSS `content` expression for the full label.
    pub fn css_expr(&self, id: LabellerId) -> String {
        let template = &self.get(id).template;
        join_css([
            css_str(&template.prefix),
            self.css_expr_core(id),
            css_str(&template.suffix),
        ])
    }
}

/// Quotes `s` as a CSS string, or returns nothing for an empty string.
pub fn css_str(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

fn join_css<const N: usize>(parts: [String; N]) -> String {
    parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
