use std::fmt;

/// The kinds of element that carry a numbering series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    /// `h1`..`h6`
    Heading(u8),
    /// `ol`
    OrderedList,
    /// `ul`
    UnorderedList,
}

impl ElementKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "ol" => Some(Self::OrderedList),
            "ul" => Some(Self::UnorderedList),
            _ => heading_level(tag).map(Self::Heading),
        }
    }

    pub fn is_list(self) -> bool {
        matches!(self, Self::OrderedList | Self::UnorderedList)
    }
}

/// Returns the level of an `h1`..`h6` tag.
pub fn heading_level(tag: &str) -> Option<u8> {
    let level = tag.strip_prefix('h')?;
    match level.as_bytes() {
        [digit @ b'1'..=b'6'] => Some(digit - b'0'),
        _ => None,
    }
}

/// Chooses which active labeller a template or reference refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Selector {
    /// `X`: the innermost labeller that numbers anything.
    Any,
    /// `L`: the innermost list labeller that numbers anything.
    List,
    /// `H`: the innermost heading labeller.
    Heading,
    /// `H1`..`H6`: the heading labeller of one level.
    HeadingLevel(u8),
}

impl Selector {
    /// Parses `x`, `l`, `h` or `h1`..`h6`, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "x" => Some(Self::Any),
            "l" => Some(Self::List),
            "h" => Some(Self::Heading),
            other => heading_level(other).map(Self::HeadingLevel),
        }
    }

    /// Whether a labeller for `kind` can satisfy this selector. For `Any` and
    /// `List` the caller still skips labellers without a counter.
    pub fn matches(self, kind: ElementKind) -> bool {
        match self {
            Self::Any => true,
            Self::List => kind.is_list(),
            Self::Heading => matches!(kind, ElementKind::Heading(_)),
            Self::HeadingLevel(level) => kind == ElementKind::Heading(level),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("X"),
            Self::List => f.write_str("L"),
            Self::Heading => f.write_str("H"),
            Self::HeadingLevel(level) => write!(f, "H{level}"),
        }
    }
}
