use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};

use super::algorithms::{ChineseSymbols, chinese, ethiopic};

/// Symbolic counters stop repeating after this many copies and fall back.
const MAX_SYMBOLIC_REPEAT: i64 = 60;

/// The numbering algorithm of a [`CounterStyle`] together with its symbol table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum System {
    /// Positional notation; `symbols[0]` is zero and the base is `symbols.len()`.
    Numeric(Vec<String>),
    /// Bijective base-N notation with no zero symbol.
    Alphabetic(Vec<String>),
    /// `(weight, symbol)` pairs in descending weight order, consumed greedily.
    Additive(Vec<(u64, String)>),
    /// Cycles through the symbols, repeating each one more time per lap.
    Symbolic(Vec<String>),
    /// Cycles through the symbols indefinitely.
    Cyclic(Vec<String>),
    /// A finite table starting at `first`.
    Fixed { first: i64, symbols: Vec<String> },
    /// Limited Chinese numbering (-9999..=9999 once negatives are split off).
    Chinese(ChineseSymbols),
    /// Ethiopic numbering, grouping digits in pairs.
    Ethiopic,
}

impl System {
    /// The range used when a style does not declare one.
    pub fn default_range(&self) -> CounterRange {
        match self {
            System::Numeric(_) | System::Fixed { .. } => CounterRange::UNBOUNDED,
            System::Alphabetic(_) | System::Symbolic(_) | System::Cyclic(_) => {
                CounterRange::from(1)
            }
            System::Additive(_) => CounterRange::from(0),
            System::Chinese(_) => CounterRange::new(Some(-9999), Some(9999)),
            System::Ethiopic => CounterRange::from(1),
        }
    }

    /// Whether negative values are shown as `negative.prefix + format(|n|) + negative.suffix`.
    pub fn uses_negative(&self) -> bool {
        !matches!(self, System::Cyclic(_) | System::Fixed { .. })
    }

    /// Produces the bare digits for `count`, or `None` when the algorithm has no
    /// representation for it.
    pub fn format_core(&self, count: i64) -> Option<String> {
        match self {
            System::Numeric(symbols) => numeric(symbols, count),
            System::Alphabetic(symbols) => alphabetic(symbols, count),
            System::Additive(symbols) => additive(symbols, count),
            System::Symbolic(symbols) => symbolic(symbols, count),
            System::Cyclic(symbols) => {
                if count < 1 || symbols.is_empty() {
                    return None;
                }
                let index = (count - 1) as usize % symbols.len();
                Some(symbols[index].clone())
            }
            System::Fixed { first, symbols } => {
                let index = usize::try_from(count.checked_sub(*first)?).ok()?;
                symbols.get(index).cloned()
            }
            System::Chinese(symbols) => chinese(symbols, count),
            System::Ethiopic => ethiopic(count),
        }
    }
}

fn numeric(symbols: &[String], count: i64) -> Option<String> {
    let base = symbols.len() as u64;
    if base < 2 || count < 0 {
        return None;
    }
    let mut count = count as u64;
    if count == 0 {
        return Some(symbols[0].clone());
    }
    let mut digits = Vec::new();
    while count > 0 {
        digits.push(symbols[(count % base) as usize].as_str());
        count /= base;
    }
    digits.reverse();
    Some(digits.concat())
}

fn alphabetic(symbols: &[String], count: i64) -> Option<String> {
    let base = symbols.len() as u64;
    if base < 2 || count < 1 {
        return None;
    }
    let mut count = count as u64;
    let mut digits = Vec::new();
    while count > 0 {
        count -= 1;
        digits.push(symbols[(count % base) as usize].as_str());
        count /= base;
    }
    digits.reverse();
    Some(digits.concat())
}

fn additive(symbols: &[(u64, String)], count: i64) -> Option<String> {
    if count < 0 {
        return None;
    }
    let mut remaining = count as u64;
    if remaining == 0 {
        return symbols
            .iter()
            .find(|(weight, _)| *weight == 0)
            .map(|(_, symbol)| symbol.clone());
    }

    let mut out = String::new();
    for (weight, symbol) in symbols {
        if *weight == 0 {
            continue;
        }
        let reps = remaining / weight;
        for _ in 0..reps {
            out.push_str(symbol);
        }
        remaining -= reps * weight;
        if remaining == 0 {
            return Some(out);
        }
    }
    None
}

fn symbolic(symbols: &[String], count: i64) -> Option<String> {
    if count < 1 || symbols.is_empty() {
        return None;
    }
    let n = symbols.len() as i64;
    let reps = (count - 1) / n + 1;
    if reps > MAX_SYMBOLIC_REPEAT {
        return None;
    }
    Some(symbols[((count - 1) % n) as usize].repeat(reps as usize))
}

/// Inclusive bounds on the values a style formats itself; either bound may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CounterRange {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl CounterRange {
    pub const UNBOUNDED: CounterRange = CounterRange {
        min: None,
        max: None,
    };

    pub fn new(min: Option<i64>, max: Option<i64>) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, count: i64) -> bool {
        self.min.is_none_or(|min| count >= min) && self.max.is_none_or(|max| count <= max)
    }
}

impl From<i64> for CounterRange {
    /// A range open at the top, starting at `min`.
    fn from(min: i64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }
}

/// Affixes wrapped around the absolute value of a negative count.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Negative {
    pub prefix: String,
    pub suffix: String,
}

impl Default for Negative {
    fn default() -> Self {
        Self {
            prefix: "-".to_string(),
            suffix: String::new(),
        }
    }
}

/// Minimum width of the digits, filled on the left with `symbol`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pad {
    pub width: usize,
    pub symbol: String,
}

/// An immutable rule mapping integers to display strings.
///
/// Values the style cannot represent (out of `range`, or rejected by the
/// algorithm) are handed to `fallback`, or rendered as plain decimal text when
/// there is none. Results are memoised per instance.
#[derive(Debug)]
pub struct CounterStyle {
    css_id: String,
    system: System,
    fallback: Option<Arc<CounterStyle>>,
    negative: Negative,
    prefix: String,
    suffix: String,
    range: CounterRange,
    pad: Option<Pad>,
    cache: Mutex<HashMap<i64, String>>,
}

impl CounterStyle {
    pub fn builder(css_id: impl Into<String>, system: System) -> CounterStyleBuilder {
        CounterStyleBuilder::new(css_id.into(), system)
    }

    pub fn css_id(&self) -> &str {
        &self.css_id
    }

    pub fn system(&self) -> &System {
        &self.system
    }

    pub fn fallback(&self) -> Option<&Arc<CounterStyle>> {
        self.fallback.as_ref()
    }

    pub fn range(&self) -> CounterRange {
        self.range
    }

    /// Formats `count`, falling back as needed. Never fails.
    pub fn format(&self, count: i64) -> String {
        if let Ok(cache) = self.cache.lock()
            && let Some(hit) = cache.get(&count)
        {
            return hit.clone();
        }

        let formatted = self
            .try_format(count)
            .unwrap_or_else(|| match &self.fallback {
                Some(fallback) => fallback.format(count),
                None => count.to_string(),
            });

        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(count, formatted.clone());
        }
        formatted
    }

    fn try_format(&self, count: i64) -> Option<String> {
        if !self.range.contains(count) {
            return None;
        }

        let negative = count < 0 && self.system.uses_negative();
        let core = if negative {
            self.system.format_core(count.checked_abs()?)?
        } else {
            self.system.format_core(count)?
        };

        let mut out = String::with_capacity(core.len() + self.prefix.len() + self.suffix.len());
        out.push_str(&self.prefix);
        if negative {
            out.push_str(&self.negative.prefix);
        }
        if let Some(pad) = &self.pad {
            let mut width = pad.width;
            if negative {
                width = width.saturating_sub(
                    self.negative.prefix.chars().count() + self.negative.suffix.chars().count(),
                );
            }
            let fill = width.saturating_sub(core.chars().count());
            for _ in 0..fill {
                out.push_str(&pad.symbol);
            }
        }
        out.push_str(&core);
        if negative {
            out.push_str(&self.negative.suffix);
        }
        out.push_str(&self.suffix);
        Some(out)
    }
}

impl PartialEq for CounterStyle {
    fn eq(&self, other: &Self) -> bool {
        self.css_id == other.css_id
            && self.system == other.system
            && self.fallback == other.fallback
            && self.negative == other.negative
            && self.prefix == other.prefix
            && self.suffix == other.suffix
            && self.range == other.range
            && self.pad == other.pad
    }
}

impl Eq for CounterStyle {}

impl Hash for CounterStyle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.css_id.hash(state);
        self.system.hash(state);
        self.fallback.hash(state);
        self.negative.hash(state);
        self.prefix.hash(state);
        self.suffix.hash(state);
        self.range.hash(state);
        self.pad.hash(state);
    }
}

/// Builds a [`CounterStyle`]; the range defaults to the system's own default.
pub struct CounterStyleBuilder {
    css_id: String,
    system: System,
    fallback: Option<Arc<CounterStyle>>,
    negative: Negative,
    prefix: String,
    suffix: String,
    range: Option<CounterRange>,
    pad: Option<Pad>,
}

impl CounterStyleBuilder {
    fn new(css_id: String, system: System) -> Self {
        Self {
            css_id,
            system,
            fallback: None,
            negative: Negative::default(),
            prefix: String::new(),
            suffix: String::new(),
            range: None,
            pad: None,
        }
    }

    pub fn fallback(mut self, fallback: Arc<CounterStyle>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn negative(mut self, prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        self.negative = Negative {
            prefix: prefix.into(),
            suffix: suffix.into(),
        };
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn range(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        self.range = Some(CounterRange::new(min, max));
        self
    }

    pub fn pad(mut self, width: usize, symbol: impl Into<String>) -> Self {
        self.pad = Some(Pad {
            width,
            symbol: symbol.into(),
        });
        self
    }

    pub fn build(self) -> CounterStyle {
        let range = self.range.unwrap_or_else(|| self.system.default_range());
        CounterStyle {
            css_id: self.css_id,
            system: self.system,
            fallback: self.fallback,
            negative: self.negative,
            prefix: self.prefix,
            suffix: self.suffix,
            range,
            pad: self.pad,
            cache: Mutex::new(HashMap::new()),
        }
    }
}

/// Splits a string into one symbol per character.
pub fn symbols(chars: &str) -> Vec<String> {
    chars.chars().map(String::from).collect()
}
