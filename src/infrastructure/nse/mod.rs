//! NSE symbol universe.

pub mod universe;

pub use universe::{NseSymbolUniverse, merge_universe};
