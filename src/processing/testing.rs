//! Deterministic encoder for pipeline tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::core::{Embedding, ImageAsset};
use crate::error::{Error, Result};
use crate::models::Encoder;

/// Maps file names to a target cosine against every label.
///
/// Images become `[s, sqrt(1 - s^2)]` and labels `[1, 0]`, so the score of
/// an image is its configured `s`. Unknown files encode to a zero vector.
#[derive(Default)]
pub struct ScoreEncoder {
	scores: HashMap<String, f32>,
	pub image_calls: AtomicUsize,
	pub text_calls: AtomicUsize,
}

impl ScoreEncoder {
	pub fn new(scores: &[(&str, f32)]) -> Self {
		Self {
			scores: scores.iter().map(|(n, s)| (n.to_string(), *s)).collect(),
			..Default::default()
		}
	}
}

impl Encoder for ScoreEncoder {
	fn encode_images(&self, images: &[ImageAsset]) -> Result<Vec<Embedding>> {
		self.image_calls.fetch_add(1, Ordering::SeqCst);
		Ok(images
			.iter()
			.map(|asset| {
				let name = asset.path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
				match self.scores.get(name) {
					Some(&s) => Embedding::new(vec![s, (1.0 - s * s).max(0.0).sqrt()]),
					None => Embedding::new(vec![0.0, 0.0]),
				}
			})
			.collect())
	}

	fn encode_text(&self, labels: &[&str]) -> Result<Vec<Embedding>> {
		self.text_calls.fetch_add(1, Ordering::SeqCst);
		labels
			.iter()
			.map(|label| {
				if label.trim().is_empty() {
					Err(Error::model_input(*label, "label has no token representation"))
				} else {
					Ok(Embedding::new(vec![1.0, 0.0]))
				}
			})
			.collect()
	}
}
