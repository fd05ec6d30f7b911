//! Data preparation: CSV loading, time normalization, pivoting and top-N filtering.

/// Wide time×entity matrix.
pub mod pivot;
/// CSV loading and long-form records.
pub mod table;
/// Time parsing, range filtering and day/month conversion.
pub mod time;
/// Per-frame top-N filtering.
pub mod top_n;
