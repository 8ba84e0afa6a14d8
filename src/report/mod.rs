//! Reporting utilities: KPI cards, query output, and the Markdown summary.

pub mod format;
pub mod markdown;

pub use format::*;
pub use markdown::*;
