use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::cursor::Cursor;
use super::{ChildTemplate, LabelTemplate};
use crate::counters::{CounterRegistry, CounterStyle};
use crate::error::TemplateError;
use crate::selector::Selector;

/// Parses label templates, caching results by source string.
pub struct TemplateParser {
    registry: Arc<CounterRegistry>,
    cache: Mutex<HashMap<String, Arc<LabelTemplate>>>,
}

impl TemplateParser {
    pub fn new(registry: Arc<CounterRegistry>) -> Self {
        Self {
            registry,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Parses `source`, returning the cached instance for a source seen before.
    pub fn parse(&self, source: &str) -> Result<Arc<LabelTemplate>, TemplateError> {
        if let Ok(cache) = self.cache.lock()
            && let Some(hit) = cache.get(source)
        {
            return Ok(Arc::clone(hit));
        }

        let mut parser = Parser {
            registry: &self.registry,
            source,
            cur: Cursor::new(source),
        };
        let template = Arc::new(parser.parse_template()?);
        log::debug!("parsed label template {source:?} as {template}");

        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(source.to_string(), Arc::clone(&template));
        }
        Ok(template)
    }
}

/// Quoted strings are literals; anything else that is not alphanumeric or a
/// comma is literal on its own.
fn is_literal_char(c: char) -> bool {
    !(c.is_ascii_alphanumeric() || matches!(c, ',' | '"' | '\''))
}

fn is_parent_marker(c: char) -> bool {
    matches!(c.to_ascii_uppercase(), 'X' | 'L' | 'H')
}

struct Parser<'a> {
    registry: &'a CounterRegistry,
    source: &'a str,
    cur: Cursor,
}

impl Parser<'_> {
    fn parse_template(&mut self) -> Result<LabelTemplate, TemplateError> {
        let mut template = self.parse_segment()?;

        match self.cur.peek() {
            None => {}
            Some(',') => {
                self.cur.bump();
                let rest = self.cur.rest();
                if rest.trim() == "*" {
                    template.child = Some(ChildTemplate::Repeat);
                } else if rest.trim().is_empty() {
                    return Err(self.syntax(self.cur.pos(), "a template after \",\""));
                } else {
                    template.child = Some(ChildTemplate::Next(Arc::new(self.parse_template()?)));
                }
            }
            Some(_) => return Err(self.syntax(self.cur.pos(), "\",\" or end of template")),
        }
        Ok(template)
    }

    /// `literal* [ (parent-marker literal*)? name literal* ]`
    fn parse_segment(&mut self) -> Result<LabelTemplate, TemplateError> {
        self.cur.take_while(char::is_whitespace);
        let mut template = LabelTemplate::literal(self.parse_literal()?);

        if !self.cur.peek().is_some_and(|c| c.is_ascii_alphanumeric()) {
            return Ok(template);
        }

        let (parent, separator, style) = self.parse_counter()?;
        template.parent_type = parent;
        template.separator = separator;
        template.counter_style = Some(style);
        template.suffix = self.parse_literal()?;
        Ok(template)
    }

    fn parse_literal(&mut self) -> Result<String, TemplateError> {
        let mut out = String::new();
        loop {
            match self.cur.peek() {
                Some(quote @ ('"' | '\'')) => {
                    let start = self.cur.pos();
                    self.cur.bump();
                    loop {
                        match self.cur.bump() {
                            None => return Err(self.syntax(start, "a closing quote")),
                            Some(c) if c == quote => {
                                if self.cur.peek() == Some(quote) {
                                    self.cur.bump();
                                    out.push(quote);
                                } else {
                                    break;
                                }
                            }
                            Some(c) => out.push(c),
                        }
                    }
                }
                Some(c) if is_literal_char(c) => {
                    self.cur.bump();
                    out.push(c);
                }
                _ => return Ok(out),
            }
        }
    }

    /// Reads `[A-Za-z0-9]+(-[A-Za-z0-9]+)*`.
    fn parse_name(&mut self) -> String {
        let mut name = self.cur.take_while(|c| c.is_ascii_alphanumeric());
        while !name.is_empty()
            && self.cur.peek() == Some('-')
            && self.cur.peek_at(1).is_some_and(|c| c.is_ascii_alphanumeric())
        {
            self.cur.bump();
            name.push('-');
            name.push_str(&self.cur.take_while(|c| c.is_ascii_alphanumeric()));
        }
        name
    }

    /// Reads an optional parent marker and separator, then a counter style name.
    ///
    /// A marker reading only stands if a known style name follows it; otherwise
    /// the whole token is a style name (`hebrew`, `lao`).
    fn parse_counter(
        &mut self,
    ) -> Result<(Option<Selector>, String, Arc<CounterStyle>), TemplateError> {
        let start = self.cur.clone();
        let mut unknown: Option<(usize, String)> = None;

        if self.cur.peek().is_some_and(is_parent_marker) {
            let mut marker_lengths = vec![1];
            if self.cur.peek_at(1).is_some_and(|c| ('1'..='6').contains(&c)) {
                marker_lengths.insert(0, 2);
            }

            for len in marker_lengths {
                self.cur = start.clone();
                let marker: String = (0..len).filter_map(|_| self.cur.bump()).collect();
                let Some(selector) = Selector::parse(&marker) else {
                    continue;
                };
                let separator = self.parse_literal()?;
                let name_pos = self.cur.pos();
                let name = self.parse_name();
                if name.is_empty() {
                    continue;
                }
                match self.registry.get(&name) {
                    Some(style) => return Ok((Some(selector), separator, style)),
                    None if !separator.is_empty() && unknown.is_none() => {
                        unknown = Some((name_pos, name));
                    }
                    None => {}
                }
            }
            self.cur = start;
        }

        let name_pos = self.cur.pos();
        let name = self.parse_name();
        if let Some(style) = self.registry.get(&name) {
            return Ok((None, String::new(), style));
        }
        let (offset, name) = unknown.unwrap_or((name_pos, name));
        Err(TemplateError::UnknownCounterStyle {
            template: self.source.to_string(),
            offset,
            name,
        })
    }

    fn syntax(&self, offset: usize, expected: &'static str) -> TemplateError {
        TemplateError::Syntax {
            template: self.source.to_string(),
            offset,
            fragment: self.source.chars().skip(offset).collect(),
            expected,
        }
    }
}
