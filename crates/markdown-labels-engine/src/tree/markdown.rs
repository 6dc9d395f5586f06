//! Builds a [`Document`] from markdown using pulldown-cmark.
//!
//! Heading attributes are enabled, so `# Title {#intro -label=H.1}` yields an
//! `h1` with `id="intro"` and a `-label` directive.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use super::{Document, NodeId};

/// Parses `content` into a document tree.
pub fn parse_markdown(content: &str) -> Document {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut processor = MarkdownProcessor::new();
    for event in Parser::new_ext(content, options) {
        processor.process_event(event);
    }
    processor.doc
}

fn heading_tag(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "h1",
        HeadingLevel::H2 => "h2",
        HeadingLevel::H3 => "h3",
        HeadingLevel::H4 => "h4",
        HeadingLevel::H5 => "h5",
        HeadingLevel::H6 => "h6",
    }
}

/// Strips one level of matching quotes from an attribute value.
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

/// Tracks the chain of open elements while events stream in.
struct MarkdownProcessor {
    doc: Document,
    open: Vec<NodeId>,
}

impl MarkdownProcessor {
    fn new() -> Self {
        let doc = Document::new();
        let root = doc.root();
        Self {
            doc,
            open: vec![root],
        }
    }

    fn current(&self) -> NodeId {
        self.open.last().copied().unwrap_or_else(|| self.doc.root())
    }

    fn open_element(&mut self, tag: &str) -> NodeId {
        let parent = self.current();
        let element = self.doc.append_element(parent, tag);
        self.open.push(element);
        element
    }

    fn close_element(&mut self) {
        if self.open.len() > 1 {
            self.open.pop();
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(TagEnd::Image) => {
                // alt text arrives as children; images are void
                let image = self.current();
                let alt = self.doc.text_content(image);
                for child in self.doc.children(image).to_vec() {
                    self.doc.detach(child);
                }
                self.doc.set_attr(image, "alt", alt);
                self.close_element();
            }
            Event::End(TagEnd::CodeBlock) => {
                self.close_element();
                self.close_element();
            }
            Event::End(_) => self.close_element(),
            Event::Text(text) => {
                let parent = self.current();
                self.doc.append_text(parent, &text);
            }
            Event::Code(code) => {
                let parent = self.current();
                let element = self.doc.append_element(parent, "code");
                self.doc.append_text(element, &code);
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                let parent = self.current();
                self.doc.append_text(parent, &html);
            }
            Event::SoftBreak => {
                let parent = self.current();
                self.doc.append_text(parent, "\n");
            }
            Event::HardBreak => {
                let parent = self.current();
                self.doc.append_element(parent, "br");
            }
            Event::Rule => {
                let parent = self.current();
                self.doc.append_element(parent, "hr");
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.open_element("p");
            }
            Tag::Heading {
                level,
                id,
                classes,
                attrs,
            } => {
                let heading = self.open_element(heading_tag(level));
                if let Some(id) = id {
                    self.doc.set_attr(heading, "id", id.to_string());
                }
                for class in classes {
                    self.doc.add_class(heading, &class);
                }
                for (key, value) in attrs {
                    let value = value.as_deref().map(unquote).unwrap_or_default();
                    self.doc.set_attr(heading, key.to_string(), value);
                }
            }
            Tag::BlockQuote(_) => {
                self.open_element("blockquote");
            }
            Tag::CodeBlock(kind) => {
                self.open_element("pre");
                let code = self.open_element("code");
                if let CodeBlockKind::Fenced(lang) = kind
                    && !lang.is_empty()
                {
                    self.doc.add_class(code, &format!("language-{lang}"));
                }
            }
            Tag::List(Some(start)) => {
                let list = self.open_element("ol");
                if start != 1 {
                    self.doc.set_attr(list, "start", start.to_string());
                }
            }
            Tag::List(None) => {
                self.open_element("ul");
            }
            Tag::Item => {
                self.open_element("li");
            }
            Tag::Emphasis => {
                self.open_element("em");
            }
            Tag::Strong => {
                self.open_element("strong");
            }
            Tag::Strikethrough => {
                self.open_element("del");
            }
            Tag::Link {
                dest_url, title, ..
            } => {
                let link = self.open_element("a");
                self.doc.set_attr(link, "href", dest_url.to_string());
                if !title.is_empty() {
                    self.doc.set_attr(link, "title", title.to_string());
                }
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                let image = self.open_element("img");
                self.doc.set_attr(image, "src", dest_url.to_string());
                if !title.is_empty() {
                    self.doc.set_attr(image, "title", title.to_string());
                }
            }
            _ => {
                self.open_element("div");
            }
        }
    }
}
