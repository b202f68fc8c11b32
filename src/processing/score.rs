//! Cosine similarity between image and text embeddings

use ndarray::{Array1, Array2};

use crate::core::Embedding;
use crate::error::{Error, Result};

/// Normalize both vectors, then take their dot product
pub fn score(image: &Embedding, text: &Embedding) -> Result<f32> {
	check_dims(image, text)?;
	let image = image.normalized("image embedding")?;
	let text = text.normalized("text embedding")?;

	Ok(image
		.as_slice()
		.iter()
		.zip(text.as_slice())
		.map(|(a, b)| a * b)
		.sum())
}

/// Score N images against one text as a single `[N, D] x [D]` product.
///
/// Degenerate images are reported as `image #<index>`.
pub fn score_batch(images: &[Embedding], text: &Embedding) -> Result<Vec<f32>> {
	if images.is_empty() {
		return Ok(Vec::new());
	}

	let dim = text.dim();
	let text = Array1::from_vec(text.normalized("text embedding")?.as_slice().to_vec());

	let mut rows = Vec::with_capacity(images.len() * dim);
	for (i, image) in images.iter().enumerate() {
		if image.dim() != dim {
			return Err(Error::DimensionMismatch {
				left: image.dim(),
				right: dim,
			});
		}
		rows.extend_from_slice(image.normalized(&format!("image #{}", i))?.as_slice());
	}

	let matrix = Array2::from_shape_vec((images.len(), dim), rows)
		.map_err(|e| Error::Inference(format!("Failed to build score matrix: {}", e)))?;

	Ok(matrix.dot(&text).to_vec())
}

fn check_dims(a: &Embedding, b: &Embedding) -> Result<()> {
	if a.dim() != b.dim() {
		return Err(Error::DimensionMismatch {
			left: a.dim(),
			right: b.dim(),
		});
	}
	Ok(())
}
