//! Month-end market capitalization collection.
//!
//! Builds the long-form `ticker,name,market_cap,date,market` CSV that feeds a race of the largest
//! listed companies, from daily per-ticker snapshots.

/// Month-end walk, column probing, top-N selection and CSV output.
pub mod monthly;
/// Snapshot sources.
pub mod source;
