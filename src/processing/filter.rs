//! Per-directory filtering: list, decode, encode, score, decide.
//!
//! A plan is always computed without touching the files; deletion is a
//! separate step (see [`super::delete`]).

use crate::config::Threshold;
use crate::core::{FilterDecision, RemovalPlan, Topic};
use crate::error::{Error, Result};
use crate::models::Encoder;

use super::{image, score};

pub struct DirectoryFilter<'a, E: Encoder + ?Sized> {
	encoder: &'a E,
	threshold: Threshold,
}

impl<'a, E: Encoder + ?Sized> DirectoryFilter<'a, E> {
	pub fn new(encoder: &'a E, threshold: Threshold) -> Self {
		Self { encoder, threshold }
	}

	/// Decide which files in `topic` fall below the threshold.
	///
	/// Any undecodable file fails the whole directory; nothing is skipped.
	pub fn plan(&self, topic: &Topic) -> Result<RemovalPlan> {
		let files = topic.list_files()?;
		if files.is_empty() {
			crate::ui::debug(&format!("{}: empty directory", topic.name()));
			return Ok(RemovalPlan::empty(topic.name(), self.threshold));
		}

		let assets = image::load_all(&files)?;

		let image_embeddings = self.encoder.encode_images(&assets)?;
		if image_embeddings.len() != assets.len() {
			return Err(Error::Inference(format!(
				"Encoder returned {} embeddings for {} images",
				image_embeddings.len(),
				assets.len()
			)));
		}

		let text_embedding = self
			.encoder
			.encode_text(&[topic.name()])?
			.into_iter()
			.next()
			.ok_or_else(|| Error::Inference(format!("No embedding for topic '{}'", topic.name())))?;

		if text_embedding.is_degenerate() {
			return Err(Error::DegenerateEmbedding {
				subject: format!("topic '{}'", topic.name()),
			});
		}
		if let Some(i) = image_embeddings.iter().position(|e| e.is_degenerate()) {
			return Err(Error::DegenerateEmbedding {
				subject: files[i].display().to_string(),
			});
		}

		let scores = score::score_batch(&image_embeddings, &text_embedding)?;
		crate::ui::debug(&format!("{} scores: {:?}", topic.name(), scores));

		let decisions = files
			.into_iter()
			.zip(scores)
			.map(|(path, score)| FilterDecision::decide(path, score, self.threshold))
			.collect();

		Ok(RemovalPlan::new(topic.name(), self.threshold, decisions))
	}
}
