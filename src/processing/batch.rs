//! Run the directory filter over every topic under a root

use std::collections::BTreeMap;
use std::path::Path;

use crate::config::{FailurePolicy, Threshold};
use crate::core::{RemovalPlan, Topic};
use crate::error::{Error, Result};
use crate::models::Encoder;

use super::filter::DirectoryFilter;

/// Plans for the topics that succeeded and errors for the ones that did not
#[derive(Debug, Default)]
pub struct BatchOutcome {
	pub plans: BTreeMap<String, RemovalPlan>,
	pub failures: BTreeMap<String, Error>,
}

impl BatchOutcome {
	pub fn is_complete(&self) -> bool {
		self.failures.is_empty()
	}

	pub fn total_removed(&self) -> usize {
		self.plans.values().map(RemovalPlan::removed_count).sum()
	}

	pub fn total_images(&self) -> usize {
		self.plans.values().map(|p| p.decisions.len()).sum()
	}
}

/// One shared encoder across all topics
pub struct BatchFilterRunner<'a, E: Encoder + ?Sized> {
	filter: DirectoryFilter<'a, E>,
	policy: FailurePolicy,
}

impl<'a, E: Encoder + ?Sized> BatchFilterRunner<'a, E> {
	pub fn new(encoder: &'a E, threshold: Threshold, policy: FailurePolicy) -> Self {
		Self {
			filter: DirectoryFilter::new(encoder, threshold),
			policy,
		}
	}

	/// Filter the named topics, or every subdirectory of `root` when `topics`
	/// is `None`. Unknown topic names fail the run before anything is encoded.
	pub fn run(&self, root: &Path, topics: Option<&[String]>) -> Result<BatchOutcome> {
		let topics = match topics {
			Some(names) => {
				let mut resolved: Vec<Topic> = Vec::with_capacity(names.len());
				for name in names {
					if resolved.iter().any(|t| t.name() == name) {
						continue;
					}
					resolved.push(Topic::resolve(root, name)?);
				}
				resolved
			}
			None => Topic::discover(root)?,
		};

		let mut outcome = BatchOutcome::default();
		let total = topics.len();

		for (index, topic) in topics.iter().enumerate() {
			crate::ui::debug(&format!("[{}/{}] Filtering {}", index + 1, total, topic.name()));

			match self.filter.plan(topic) {
				Ok(plan) => {
					outcome.plans.insert(topic.name().to_string(), plan);
				}
				Err(e) => match self.policy {
					FailurePolicy::Abort => {
						return Err(Error::Topic {
							topic: topic.name().to_string(),
							source: Box::new(e),
						});
					}
					FailurePolicy::Isolate => {
						crate::ui::warn(&format!("{}: {} (skipping topic)", topic.name(), e));
						outcome.failures.insert(topic.name().to_string(), e);
					}
				},
			}
		}

		Ok(outcome)
	}
}
