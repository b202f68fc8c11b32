//! Filtering pipeline

pub mod batch;
pub mod delete;
pub mod filter;
pub mod image;
pub mod score;

#[cfg(test)]
pub(crate) mod testing;

pub use batch::{BatchFilterRunner, BatchOutcome};
pub use filter::DirectoryFilter;
