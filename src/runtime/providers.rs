//! Execution provider selection

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use ort::ep::ExecutionProvider;
use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use ort::session::Session;

use crate::error::{Error, Result};
use crate::ui;

pub use crate::cli::Provider;

/// Tried in this order when the provider is `Auto`; CPU is the fallback
const AUTO_ORDER: [Provider; 4] = [
	Provider::Tensorrt,
	Provider::Cuda,
	Provider::Coreml,
	Provider::Xnnpack,
];

static SELECTED_PROVIDER: OnceLock<Provider> = OnceLock::new();
static ANNOUNCED: AtomicBool = AtomicBool::new(false);

/// First call wins; later calls are ignored
pub fn set_provider(p: Provider) {
	let _ = SELECTED_PROVIDER.set(p);
}

fn requested_provider() -> Provider {
	SELECTED_PROVIDER.get().copied().unwrap_or_default()
}

fn provider_name(p: Provider) -> &'static str {
	match p {
		Provider::Auto => "auto",
		Provider::Cpu => "CPU",
		Provider::Cuda => "CUDA",
		Provider::Tensorrt => "TensorRT",
		Provider::Coreml => "CoreML",
		Provider::Xnnpack => "XNNPACK",
	}
}

/// Build an ONNX session for `model_path` on the requested provider.
///
/// Both towers go through here, so the chosen provider is announced once.
pub fn create_session(model_path: &Path) -> Result<Session> {
	let load_error = |message: String| Error::ModelLoad {
		path: model_path.to_path_buf(),
		message,
	};

	let mut builder =
		Session::builder().map_err(|e| load_error(format!("session builder: {}", e)))?;

	let active = match requested_provider() {
		Provider::Auto => AUTO_ORDER.into_iter().find(|&p| register(&mut builder, p)),
		Provider::Cpu => None,
		requested => {
			let ok = register(&mut builder, requested);
			if !ok {
				ui::warn(&format!(
					"{} requested but unavailable, falling back to CPU",
					provider_name(requested)
				));
			}
			ok.then_some(requested)
		}
	};

	if !ANNOUNCED.swap(true, Ordering::Relaxed) {
		match active {
			Some(p) => ui::success(&format!("Using {} execution provider", provider_name(p))),
			None => ui::info("Using CPU execution provider"),
		}
	}

	builder
		.with_optimization_level(GraphOptimizationLevel::Level3)
		.map_err(|e| load_error(format!("optimization level: {}", e)))?
		.with_intra_threads(4)
		.map_err(|e| load_error(format!("thread count: {}", e)))?
		.commit_from_file(model_path)
		.map_err(|e| load_error(e.to_string()))
}

fn register(builder: &mut SessionBuilder, provider: Provider) -> bool {
	match provider {
		Provider::Auto | Provider::Cpu => false,
		Provider::Cuda => try_register(builder, ort::ep::CUDA::default(), provider),
		Provider::Tensorrt => try_register(builder, ort::ep::TensorRT::default(), provider),
		#[cfg(target_os = "macos")]
		Provider::Coreml => try_register(builder, ort::ep::CoreML::default(), provider),
		#[cfg(not(target_os = "macos"))]
		Provider::Coreml => {
			ui::debug("CoreML is only available on macOS");
			false
		}
		Provider::Xnnpack => try_register(builder, ort::ep::XNNPACK::default(), provider),
	}
}

fn try_register(builder: &mut SessionBuilder, ep: impl ExecutionProvider, provider: Provider) -> bool {
	let name = provider_name(provider);
	ui::debug(&format!("Trying provider: {}", name));

	if !ep.is_available().unwrap_or(false) {
		ui::debug(&format!("{} not available", name));
		return false;
	}

	match ep.register(builder) {
		Ok(_) => true,
		Err(e) => {
			ui::debug(&format!("{} registration failed: {}", name, e));
			false
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn auto_order_ends_before_cpu() {
		assert!(!AUTO_ORDER.contains(&Provider::Auto));
		assert!(!AUTO_ORDER.contains(&Provider::Cpu));
	}

	#[test]
	fn missing_model_is_a_load_error() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("missing.onnx");

		match create_session(&path) {
			Err(Error::ModelLoad { path: p, .. }) => assert_eq!(p, path),
			Err(other) => panic!("unexpected error: {}", other),
			Ok(_) => panic!("session created from a missing file"),
		}
	}
}
