//! # tinydata
//!
//! Dataset curation for downloaded image collections: every image is scored
//! against its directory's topic with CLIP embeddings, and images below a
//! similarity threshold are planned for removal.

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod processing;
pub mod runtime;
pub mod ui;

pub use error::{Error, Result};
