//! Error types for the filtering pipeline.
//!
//! Each variant names the file, topic or item it concerns so a failed run
//! can be attributed without re-running it.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
	/// Image or text could not be prepared for the model
	#[error("Model input rejected for {subject}: {message}")]
	ModelInput { subject: String, message: String },

	/// A zero-norm embedding cannot be normalized
	#[error("Degenerate (zero-norm) embedding for {subject}")]
	DegenerateEmbedding { subject: String },

	/// Embeddings of different lengths were compared
	#[error("Embedding dimension mismatch: {left} vs {right}")]
	DimensionMismatch { left: usize, right: usize },

	/// File could not be decoded as an image
	#[error("Failed to decode image {path}: {message}")]
	ImageInput { path: PathBuf, message: String },

	/// A planned file could not be removed
	#[error("Failed to delete {path}: {source}")]
	Deletion {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// Invalid configuration value
	#[error("Invalid configuration: {0}")]
	Config(String),

	#[error("Model file not found: {0}")]
	ModelNotFound(PathBuf),

	#[error("Failed to load model {path}: {message}")]
	ModelLoad { path: PathBuf, message: String },

	#[error("Inference failed: {0}")]
	Inference(String),

	/// Directory could not be read
	#[error("Failed to list {path}: {message}")]
	Listing { path: PathBuf, message: String },

	/// Requested topic has no directory under the root
	#[error("Topic '{topic}' has no directory under {root}")]
	UnknownTopic { topic: String, root: PathBuf },

	/// Failure inside one topic, attributed to it
	#[error("Topic '{topic}' failed: {source}")]
	Topic {
		topic: String,
		#[source]
		source: Box<Error>,
	},
}

impl Error {
	pub(crate) fn model_input(subject: impl Into<String>, message: impl Into<String>) -> Self {
		Self::ModelInput {
			subject: subject.into(),
			message: message.into(),
		}
	}
}
