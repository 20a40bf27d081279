//! carrinho-vocab: Known-item vocabulary models and suggestion filter.
//!
//! The vocabulary maps item names to display glyphs (emoji). It combines a
//! fixed seed list of common grocery items with entries learned from the
//! user; name comparison is always trimmed and case-insensitive.

pub mod known;
pub mod seed;
pub mod suggest;

pub use known::*;
pub use seed::*;
pub use suggest::*;
