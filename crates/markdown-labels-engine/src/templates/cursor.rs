/// A character cursor over a template string.
///
/// Positions are character offsets, which is what error messages report.
#[derive(Clone)]
pub struct Cursor {
    chars: Vec<char>,
    /// Current index into `chars`.
    i: usize,
}

impl Cursor {
    pub fn new(s: &str) -> Self {
        Self {
            chars: s.chars().collect(),
            i: 0,
        }
    }

    pub fn pos(&self) -> usize {
        self.i
    }

    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.i).copied()
    }

    /// Peeks `n` characters ahead of the current one.
    pub fn peek_at(&self, n: usize) -> Option<char> {
        self.chars.get(self.i + n).copied()
    }

    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.i += 1;
        Some(c)
    }

    /// Advances while `pred` holds, returning what was consumed.
    pub fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.i;
        while self.peek().is_some_and(&pred) {
            self.i += 1;
        }
        self.chars[start..self.i].iter().collect()
    }

    /// The unconsumed input.
    pub fn rest(&self) -> String {
        self.chars[self.i.min(self.chars.len())..].iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_basics() {
        let mut cur = Cursor::new("αβ,");
        assert_eq!(cur.pos(), 0);
        assert_eq!(cur.peek(), Some('α'));
        assert_eq!(cur.peek_at(2), Some(','));
        assert_eq!(cur.bump(), Some('α'));
        assert_eq!(cur.pos(), 1);
        assert_eq!(cur.rest(), "β,");
    }

    #[test]
    fn take_while_stops_at_predicate() {
        let mut cur = Cursor::new("abc-1,");
        assert_eq!(cur.take_while(|c| c.is_ascii_alphabetic()), "abc");
        assert_eq!(cur.peek(), Some('-'));
        assert_eq!(cur.take_while(|c| c == 'z'), "");
    }

    #[test]
    fn bump_at_eof_returns_none() {
        let mut cur = Cursor::new("x");
        assert_eq!(cur.bump(), Some('x'));
        assert_eq!(cur.peek(), None);
        assert_eq!(cur.bump(), None);
        assert_eq!(cur.rest(), "");
    }
}
