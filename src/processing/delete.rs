//! Deletion of planned files

use std::fs;

use crate::core::{DeletionReport, RemovalPlan};
use crate::error::Error;

/// Remove exactly the files the plan marks for removal.
///
/// A file that cannot be removed (already gone, permission denied) is
/// recorded and the remaining files are still attempted.
pub fn execute(plan: &RemovalPlan) -> DeletionReport {
	let mut report = DeletionReport::default();

	for path in plan.removals() {
		match fs::remove_file(path) {
			Ok(()) => {
				crate::ui::debug(&format!("Deleted: {}", path.display()));
				report.deleted.push(path.to_path_buf());
			}
			Err(source) => {
				report.failed.push(Error::Deletion {
					path: path.to_path_buf(),
					source,
				});
			}
		}
	}

	report
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::Threshold;
	use crate::core::FilterDecision;

	fn plan(dir: &std::path::Path, scores: &[(&str, f32)]) -> RemovalPlan {
		let threshold = Threshold::default();
		let decisions = scores
			.iter()
			.map(|(name, s)| FilterDecision::decide(dir.join(name), *s, threshold))
			.collect();
		RemovalPlan::new("dogs", threshold, decisions)
	}

	#[test]
	fn deletes_only_planned_files() {
		let dir = tempfile::tempdir().unwrap();
		for name in ["keep.png", "drop.png"] {
			fs::write(dir.path().join(name), b"x").unwrap();
		}

		let report = execute(&plan(dir.path(), &[("keep.png", 0.5), ("drop.png", 0.1)]));
		assert!(report.is_clean());
		assert_eq!(report.deleted, vec![dir.path().join("drop.png")]);
		assert!(dir.path().join("keep.png").exists());
		assert!(!dir.path().join("drop.png").exists());
	}

	#[test]
	fn missing_file_is_reported_and_skipped() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("b.png"), b"x").unwrap();

		let report = execute(&plan(dir.path(), &[("a.png", 0.0), ("b.png", 0.0)]));
		assert_eq!(report.deleted, vec![dir.path().join("b.png")]);
		assert_eq!(report.failed.len(), 1);
		assert!(matches!(&report.failed[0], Error::Deletion { path, .. } if *path == dir.path().join("a.png")));
	}

	#[test]
	fn executing_twice_is_harmless() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("a.png"), b"x").unwrap();
		let plan = plan(dir.path(), &[("a.png", 0.0)]);

		assert!(execute(&plan).is_clean());
		let second = execute(&plan);
		assert!(second.deleted.is_empty());
		assert_eq!(second.failed.len(), 1);
	}
}
