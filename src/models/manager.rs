//! Lazy model loading coordinator

use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;

use crate::config;
use crate::core::{Embedding, ImageAsset};
use crate::error::{Error, Result};

use super::text::TextModel;
use super::vision::VisionModel;
use super::Encoder;

/// Process-scoped CLIP handle. Construct once and share by reference; each
/// tower loads on first use, at most once even under concurrent callers.
pub struct ClipModel {
	vision: OnceCell<VisionModel>,
	text: OnceCell<TextModel>,
	vision_path: PathBuf,
	text_path: PathBuf,
	tokenizer_path: PathBuf,
}

impl ClipModel {
	/// Resolve model files from the configured locations
	pub fn new() -> Result<Self> {
		let missing = |name: &str| Error::ModelNotFound(PathBuf::from(name));

		let vision_path = config::get_vision_model_path().ok_or_else(|| missing(config::VISION_MODEL))?;
		let text_path = config::get_text_model_path().ok_or_else(|| missing(config::TEXT_MODEL))?;
		let tokenizer_path = config::get_tokenizer_path().ok_or_else(|| missing(config::TOKENIZER))?;

		Self::from_paths(vision_path, text_path, tokenizer_path)
	}

	pub fn from_paths(vision_path: PathBuf, text_path: PathBuf, tokenizer_path: PathBuf) -> Result<Self> {
		for path in [&vision_path, &text_path, &tokenizer_path] {
			if !path.exists() {
				return Err(Error::ModelNotFound(path.clone()));
			}
		}

		Ok(Self {
			vision: OnceCell::new(),
			text: OnceCell::new(),
			vision_path,
			text_path,
			tokenizer_path,
		})
	}

	pub fn vision_path(&self) -> &Path {
		&self.vision_path
	}

	fn vision(&self) -> Result<&VisionModel> {
		self.vision.get_or_try_init(|| {
			crate::ui::debug(&format!("Loading vision model: {}", self.vision_path.display()));
			let model = VisionModel::load(&self.vision_path)?;
			crate::ui::success("Vision model loaded");
			Ok(model)
		})
	}

	fn text(&self) -> Result<&TextModel> {
		self.text.get_or_try_init(|| {
			crate::ui::debug(&format!("Loading text model: {}", self.text_path.display()));
			let model = TextModel::load(&self.text_path, &self.tokenizer_path)?;
			crate::ui::success("Text model loaded");
			Ok(model)
		})
	}
}

impl Encoder for ClipModel {
	fn encode_images(&self, images: &[ImageAsset]) -> Result<Vec<Embedding>> {
		if images.is_empty() {
			return Ok(Vec::new());
		}
		self.vision()?.encode_batch(images)
	}

	fn encode_text(&self, labels: &[&str]) -> Result<Vec<Embedding>> {
		if labels.is_empty() {
			return Ok(Vec::new());
		}
		self.text()?.encode_batch(labels)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn missing_files_are_reported() {
		let dir = tempfile::tempdir().unwrap();
		let vision = dir.path().join(config::VISION_MODEL);
		let result = ClipModel::from_paths(
			vision.clone(),
			dir.path().join(config::TEXT_MODEL),
			dir.path().join(config::TOKENIZER),
		);
		assert!(matches!(result, Err(Error::ModelNotFound(p)) if p == vision));
	}

	#[test]
	fn construction_does_not_load_sessions() {
		let dir = tempfile::tempdir().unwrap();
		let paths: Vec<PathBuf> = [config::VISION_MODEL, config::TEXT_MODEL, config::TOKENIZER]
			.iter()
			.map(|name| {
				let p = dir.path().join(name);
				std::fs::write(&p, b"not a model").unwrap();
				p
			})
			.collect();

		let model = ClipModel::from_paths(paths[0].clone(), paths[1].clone(), paths[2].clone()).unwrap();
		assert!(model.encode_images(&[]).unwrap().is_empty());
		assert!(model.encode_text(&[]).unwrap().is_empty());
		assert!(model.vision.get().is_none());
	}
}
