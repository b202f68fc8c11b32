//! Core domain types

pub mod embedding;
pub mod plan;
pub mod topic;

pub use embedding::Embedding;
pub use plan::{DeletionReport, FilterDecision, RemovalPlan};
pub use topic::{ImageAsset, Topic};
