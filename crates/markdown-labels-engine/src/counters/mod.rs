//! Counter styles: rules that turn an integer into display text.
//!
//! ## Modules
//!
//! - [`style`] - [`CounterStyle`], its [`System`]s and range/negative/pad handling
//! - [`algorithms`] - Chinese and Ethiopic numbering
//! - [`registry`] - the predefined named styles

pub mod algorithms;
pub mod registry;
pub mod style;

pub use algorithms::ChineseSymbols;
pub use registry::CounterRegistry;
pub use style::{CounterRange, CounterStyle, CounterStyleBuilder, Negative, Pad, System, symbols};
