//! Output tensor extraction shared by both towers

use ort::session::SessionOutputs;

use crate::config::EMBEDDING_DIM;
use crate::core::Embedding;
use crate::error::{Error, Result};

/// Split a `[batch, EMBEDDING_DIM]` output into one embedding per input.
///
/// `names` are tried in order; exports differ in what they call the
/// projected embedding.
pub fn extract_embeddings(
	outputs: &SessionOutputs,
	names: &[&str],
	batch: usize,
) -> Result<Vec<Embedding>> {
	let (name, value) = names
		.iter()
		.find_map(|name| outputs.get(*name).map(|v| (*name, v)))
		.ok_or_else(|| Error::Inference(format!("Model produced none of {:?}", names)))?;

	let (shape, data) = value
		.try_extract_tensor::<f32>()
		.map_err(|e| Error::Inference(format!("Failed to extract {}: {}", name, e)))?;
	let dims: Vec<usize> = shape.iter().map(|&x| x as usize).collect();

	match dims.as_slice() {
		[n, dim] if *n == batch && *dim == EMBEDDING_DIM => Ok(data
			.chunks_exact(EMBEDDING_DIM)
			.map(|chunk| Embedding::new(chunk.to_vec()))
			.collect()),
		_ => Err(Error::Inference(format!(
			"Unexpected {} shape {:?}, expected [{}, {}]",
			name, dims, batch, EMBEDDING_DIM
		))),
	}
}
