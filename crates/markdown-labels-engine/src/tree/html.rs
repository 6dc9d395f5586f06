use html_escape::{encode_double_quoted_attribute, encode_text};

use super::{Document, NodeId, NodeKind};

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "meta", "link"];

impl Document {
    /// Serialises the whole document.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(self.root(), &mut out);
        out
    }

    /// Serialises `node` and everything below it.
    pub fn node_to_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_html(node, &mut out);
        out
    }

    fn write_html(&self, node: NodeId, out: &mut String) {
        match self.kind(node) {
            NodeKind::Text(text) => out.push_str(&encode_text(text)),
            NodeKind::Element { tag, attrs } => {
                if tag == Self::ROOT_TAG {
                    for &child in self.children(node) {
                        self.write_html(child, out);
                    }
                    return;
                }

                out.push('<');
                out.push_str(tag);
                for (name, value) in attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&encode_double_quoted_attribute(value));
                    out.push('"');
                }
                out.push('>');

                if VOID_ELEMENTS.contains(&tag.as_str()) {
                    return;
                }
                for &child in self.children(node) {
                    self.write_html(child, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn escapes_text_and_attributes() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.append_element(root, "a");
        doc.set_attr(a, "title", "say \"hi\" & <bye>");
        doc.append_text(a, "1 < 2 & 3");
        let br = doc.append_element(root, "br");
        doc.append_text(br, "ignored");

        assert_snapshot!(
            doc.to_html(),
            @r#"<a title="say &quot;hi&quot; &amp; &lt;bye&gt;">1 &lt; 2 &amp; 3</a><br>"#
        );
    }

    #[test]
    fn attributes_serialise_in_name_order() {
        let mut doc = Document::new();
        let root = doc.root();
        let h = doc.append_element(root, "h1");
        doc.set_attr(h, "id", "x");
        doc.set_attr(h, "class", "c");
        assert_eq!(doc.node_to_html(h), r#"<h1 class="c" id="x"></h1>"#);
    }
}
