//! Folding a resolved profile hierarchy into one effective profile.
//!
//! Later profiles win for options and unit settings, `replace` swaps a whole
//! unit, `drop_<option>` deletes an inherited option, and `[script]` bodies
//! accumulate.

pub mod merger;

pub use merger::{MergeSummary, merge, summarize};
