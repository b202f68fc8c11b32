//! Encoder seam between the filter pipeline and the model

use crate::core::{Embedding, ImageAsset};
use crate::error::Result;

/// A joint image/text encoder producing comparable embeddings.
///
/// Both calls are all-or-nothing: either every input gets an embedding, in
/// input order, or the call fails.
pub trait Encoder: Send + Sync {
	fn encode_images(&self, images: &[ImageAsset]) -> Result<Vec<Embedding>>;

	fn encode_text(&self, labels: &[&str]) -> Result<Vec<Embedding>>;
}
