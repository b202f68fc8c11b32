//! Application configuration and constants

use std::path::PathBuf;
use std::sync::OnceLock;

use crate::error::{Error, Result};

static CUSTOM_MODEL_DIR: OnceLock<PathBuf> = OnceLock::new();
static CUSTOM_VISION: OnceLock<PathBuf> = OnceLock::new();
static CUSTOM_TEXT: OnceLock<PathBuf> = OnceLock::new();
static CUSTOM_TOKENIZER: OnceLock<PathBuf> = OnceLock::new();

// === Model Files ===
pub const VISION_MODEL: &str = "vision_model.onnx";
pub const TEXT_MODEL: &str = "text_model.onnx";
pub const TOKENIZER: &str = "tokenizer.json";
pub const MODELS_DIR_ENV: &str = "TINYDATA_MODELS_DIR";

// === Model Parameters (CLIP ViT-B/32) ===
pub const INPUT_SIZE: u32 = 224;
pub const EMBEDDING_DIM: usize = 512;
pub const CONTEXT_LENGTH: usize = 77;
pub const PAD_TOKEN: &str = "<|endoftext|>";
pub const CLIP_MEAN: [f32; 3] = [0.48145466, 0.4578275, 0.40821073];
pub const CLIP_STD: [f32; 3] = [0.26862954, 0.26130258, 0.27577711];

// === Filter Defaults ===
pub const DEFAULT_THRESHOLD: f32 = 0.2;
pub const DEFAULT_ROOT: &str = "images";

pub fn set_model_dir(path: PathBuf) {
	let _ = CUSTOM_MODEL_DIR.set(path);
}

pub fn set_vision_model(path: PathBuf) {
	let _ = CUSTOM_VISION.set(path);
}

pub fn set_text_model(path: PathBuf) {
	let _ = CUSTOM_TEXT.set(path);
}

pub fn set_tokenizer(path: PathBuf) {
	let _ = CUSTOM_TOKENIZER.set(path);
}

/// Get models directory (custom override, TINYDATA_MODELS_DIR, or next to the executable)
pub fn models_dir() -> Option<PathBuf> {
	if let Some(custom) = CUSTOM_MODEL_DIR.get() {
		crate::ui::debug(&format!("Using custom model dir: {}", custom.display()));
		return Some(custom.clone());
	}

	if let Ok(env_path) = std::env::var(MODELS_DIR_ENV) {
		let path = PathBuf::from(&env_path);
		if path.is_dir() {
			crate::ui::debug(&format!("Using {}: {}", MODELS_DIR_ENV, env_path));
			return Some(path);
		}
	}

	if let Ok(exe) = std::env::current_exe() {
		if let Some(dir) = exe.parent() {
			let models = dir.join("models");
			if models.is_dir() {
				crate::ui::debug(&format!("Found models at: {}", models.display()));
				return Some(models);
			}
		}
	}

	None
}

pub fn get_vision_model_path() -> Option<PathBuf> {
	if let Some(custom) = CUSTOM_VISION.get() {
		return Some(custom.clone());
	}
	models_dir().map(|d| d.join(VISION_MODEL))
}

pub fn get_text_model_path() -> Option<PathBuf> {
	if let Some(custom) = CUSTOM_TEXT.get() {
		return Some(custom.clone());
	}
	models_dir().map(|d| d.join(TEXT_MODEL))
}

pub fn get_tokenizer_path() -> Option<PathBuf> {
	if let Some(custom) = CUSTOM_TOKENIZER.get() {
		return Some(custom.clone());
	}
	models_dir().map(|d| d.join(TOKENIZER))
}

/// Similarity cut-off; images scoring strictly below it are removed
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Threshold(f32);

impl Threshold {
	pub fn new(value: f32) -> Result<Self> {
		if value.is_finite() && (0.0..=1.0).contains(&value) {
			Ok(Self(value))
		} else {
			Err(Error::Config(format!(
				"threshold must be within [0.0, 1.0], got {}",
				value
			)))
		}
	}

	pub fn value(&self) -> f32 {
		self.0
	}

	/// Remove iff `score < threshold`; a score equal to the threshold survives
	#[allow(clippy::neg_cmp_op_on_partial_ord)]
	pub fn keeps(&self, score: f32) -> bool {
		!(score < self.0)
	}
}

impl Default for Threshold {
	fn default() -> Self {
		Self(DEFAULT_THRESHOLD)
	}
}

/// What happens to the rest of a batch when one topic fails.
///
/// The downloader's own filtering aborted on the first bad image; `Isolate`
/// deliberately keeps going and records the failure instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
	#[default]
	Isolate,
	Abort,
}
