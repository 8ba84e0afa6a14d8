//! Chart spec builders.
//!
//! Each builder turns a normalized table or aggregate into a `ChartSpec`, or
//! `None` when there is nothing to draw. Rendering lives elsewhere (`plot`,
//! `tui`); these functions only decide data, labels and title.

pub mod builders;
pub mod histogram;

pub use builders::*;
pub use histogram::*;
