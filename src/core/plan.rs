//! Per-image decisions and the removal plan built from them

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::Threshold;
use crate::error::Error;

/// Keep/remove verdict for one image
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterDecision {
	pub path: PathBuf,
	pub score: f32,
	pub keep: bool,
}

impl FilterDecision {
	pub fn decide(path: PathBuf, score: f32, threshold: Threshold) -> Self {
		Self {
			keep: threshold.keeps(score),
			path,
			score,
		}
	}
}

/// Scores and decisions for one topic directory, in listing order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemovalPlan {
	pub topic: String,
	pub threshold: f32,
	pub decisions: Vec<FilterDecision>,
}

impl RemovalPlan {
	pub fn new(topic: impl Into<String>, threshold: Threshold, decisions: Vec<FilterDecision>) -> Self {
		Self {
			topic: topic.into(),
			threshold: threshold.value(),
			decisions,
		}
	}

	pub fn empty(topic: impl Into<String>, threshold: Threshold) -> Self {
		Self::new(topic, threshold, Vec::new())
	}

	/// Paths marked for removal, in listing order
	pub fn removals(&self) -> impl Iterator<Item = &Path> {
		self.decisions
			.iter()
			.filter(|d| !d.keep)
			.map(|d| d.path.as_path())
	}

	pub fn removed_count(&self) -> usize {
		self.decisions.iter().filter(|d| !d.keep).count()
	}

	pub fn scores(&self) -> Vec<f32> {
		self.decisions.iter().map(|d| d.score).collect()
	}

	pub fn is_empty(&self) -> bool {
		self.removed_count() == 0
	}
}

/// Outcome of executing a plan. Failures never stop the remaining deletions.
#[derive(Debug, Default)]
pub struct DeletionReport {
	pub deleted: Vec<PathBuf>,
	pub failed: Vec<Error>,
}

impl DeletionReport {
	pub fn is_clean(&self) -> bool {
		self.failed.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn plan_for(scores: &[f32], threshold: f32) -> RemovalPlan {
		let threshold = Threshold::new(threshold).unwrap();
		let decisions = scores
			.iter()
			.enumerate()
			.map(|(i, &s)| FilterDecision::decide(PathBuf::from(format!("{}.jpg", i)), s, threshold))
			.collect();
		RemovalPlan::new("dogs", threshold, decisions)
	}

	#[test]
	fn removes_only_scores_below_threshold() {
		let plan = plan_for(&[0.35, 0.10, 0.21], 0.2);
		let removed: Vec<&Path> = plan.removals().collect();
		assert_eq!(removed, vec![Path::new("1.jpg")]);
		assert_eq!(plan.removed_count(), 1);
	}

	#[test]
	fn low_threshold_removes_nothing() {
		let plan = plan_for(&[0.35, 0.10, 0.21], 0.05);
		assert!(plan.is_empty());
		assert_eq!(plan.removed_count(), 0);
	}

	#[test]
	fn equal_score_is_kept() {
		let plan = plan_for(&[0.25], 0.25);
		assert_eq!(plan.removed_count(), 0);
	}

	#[test]
	fn removal_count_is_monotonic_in_threshold() {
		let scores = [0.02, 0.11, 0.19, 0.2, 0.27, 0.31, 0.5, 0.93];
		let mut previous = 0;
		for step in 0..=20 {
			let count = plan_for(&scores, step as f32 / 20.0).removed_count();
			assert!(count >= previous, "threshold {} removed fewer images", step);
			previous = count;
		}
	}
}
