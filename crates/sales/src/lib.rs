//! Sales domain module.
//!
//! A `Sale` is an immutable record of a completed checkout: once committed it
//! is never edited or deleted. Line items snapshot product attributes at sale
//! time, so later catalog edits cannot rewrite history.

pub mod sale;

pub use sale::{Sale, SaleItem};
