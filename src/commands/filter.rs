//! Filter command - score topic directories and drop mismatched images

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use colored::*;
use serde::Serialize;

use crate::cli::FilterArgs;
use crate::config::{self, FailurePolicy, Threshold};
use crate::core::{DeletionReport, FilterDecision, RemovalPlan};
use crate::models::ClipModel;
use crate::processing::{delete, BatchFilterRunner, BatchOutcome};
use crate::ui;

#[derive(Debug, Serialize)]
struct FilterExport<'a> {
	generated_at: DateTime<Utc>,
	root: String,
	threshold: f32,
	dry_run: bool,
	topics: Vec<TopicExport<'a>>,
}

#[derive(Debug, Serialize)]
struct TopicExport<'a> {
	topic: &'a str,
	#[serde(skip_serializing_if = "Option::is_none")]
	removed: Option<usize>,
	#[serde(skip_serializing_if = "Option::is_none")]
	images: Option<&'a [FilterDecision]>,
	#[serde(skip_serializing_if = "Option::is_none")]
	error: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	deleted: Option<usize>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	deletion_errors: Vec<String>,
}

pub fn run(args: &FilterArgs) -> Result<()> {
	let start = Instant::now();

	if let Some(dir) = &args.models_dir {
		config::set_model_dir(dir.clone());
	}
	if let Some(path) = &args.vision_model {
		config::set_vision_model(path.clone());
	}
	if let Some(path) = &args.text_model {
		config::set_text_model(path.clone());
	}
	if let Some(path) = &args.tokenizer {
		config::set_tokenizer(path.clone());
	}

	if !args.directory.is_dir() {
		anyhow::bail!("{} is not a directory", args.directory.display());
	}

	let threshold = Threshold::new(args.threshold)?;
	let policy = if args.fail_fast {
		FailurePolicy::Abort
	} else {
		FailurePolicy::Isolate
	};
	let topics = (!args.topics.is_empty()).then_some(args.topics.as_slice());

	ui::info(&format!(
		"Filtering {} (threshold {:.2}{})",
		ui::path_link(&args.directory, 60),
		threshold.value(),
		if args.delete { "" } else { ", dry run" }
	));

	let model = ClipModel::new().context(format!(
		"Model files not found. Pass --models <dir> or set {}",
		config::MODELS_DIR_ENV
	))?;
	ui::debug(&format!("Vision model: {}", model.vision_path().display()));

	let runner = BatchFilterRunner::new(&model, threshold, policy);
	let outcome = runner
		.run(&args.directory, topics)
		.with_context(|| format!("Filtering {} failed", args.directory.display()))?;

	print_summary(&outcome, threshold);

	let mut deletions = BTreeMap::new();
	let to_remove = outcome.total_removed();

	if to_remove == 0 {
		ui::success("Nothing to remove");
	} else if !args.delete {
		ui::info(&format!(
			"Dry run: {} images would be removed. Pass --delete to remove them.",
			to_remove
		));
	} else if args.auto_confirm || confirm(to_remove)? {
		for (topic, plan) in &outcome.plans {
			deletions.insert(topic.clone(), delete::execute(plan));
		}
		report_deletions(&deletions);
	} else {
		ui::info("Cancelled");
	}

	if let Some(export_path) = &args.export {
		export(export_path, &args.directory, threshold, &outcome, &deletions)?;
	}

	println!();
	ui::success(&format!(
		"Scored {} images across {} topics in {:.1}s",
		outcome.total_images(),
		outcome.plans.len(),
		start.elapsed().as_secs_f32()
	));

	if !outcome.is_complete() {
		anyhow::bail!(
			"{} of {} topics failed",
			outcome.failures.len(),
			outcome.failures.len() + outcome.plans.len()
		);
	}

	Ok(())
}

fn print_summary(outcome: &BatchOutcome, threshold: Threshold) {
	for (topic, plan) in &outcome.plans {
		ui::header(&format!("─── {} ───", topic));
		print_plan(plan, threshold);
	}

	for (topic, err) in &outcome.failures {
		ui::header(&format!("─── {} ───", topic));
		ui::error(&err.to_string());
	}
}

fn print_plan(plan: &RemovalPlan, threshold: Threshold) {
	if plan.decisions.is_empty() {
		ui::warn("No images");
		return;
	}

	for decision in &plan.decisions {
		let score = ui::score_label(decision.score, threshold.value());
		let marker = if decision.keep {
			"keep".dimmed()
		} else {
			"remove".bright_red().bold()
		};
		println!("  {} {} {}", score, marker, ui::path_link(&decision.path, 60));
	}

	let removed = plan.removed_count();
	let line = format!("{} of {} below threshold", removed, plan.decisions.len());
	if removed > 0 {
		ui::warn(&line);
	} else {
		ui::success(&line);
	}
}

fn confirm(count: usize) -> Result<bool> {
	print!("\nDelete {} images? [y/N]: ", count);
	io::stdout().flush()?;

	let mut input = String::new();
	io::stdin().read_line(&mut input)?;

	Ok(input.trim().eq_ignore_ascii_case("y"))
}

fn report_deletions(deletions: &BTreeMap<String, DeletionReport>) {
	let deleted: usize = deletions.values().map(|r| r.deleted.len()).sum();
	let failed: Vec<_> = deletions.values().flat_map(|r| r.failed.iter()).collect();

	for err in &failed {
		ui::warn(&err.to_string());
	}

	ui::success(&format!("Deleted {} images", deleted));
	if !failed.is_empty() {
		ui::warn(&format!("{} files could not be deleted", failed.len()));
	}
}

fn export(
	path: &Path,
	root: &Path,
	threshold: Threshold,
	outcome: &BatchOutcome,
	deletions: &BTreeMap<String, DeletionReport>,
) -> Result<()> {
	let report = build_export(root, threshold, outcome, deletions);
	let json = serde_json::to_string_pretty(&report)?;
	if path.to_str() == Some("-") {
		println!("{}", json);
	} else {
		std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
		ui::success(&format!("Exported to {}", path.display()));
	}

	Ok(())
}

/// A run is a dry run unless deletion actually happened; a declined
/// confirmation leaves `deletions` empty.
fn build_export<'a>(
	root: &Path,
	threshold: Threshold,
	outcome: &'a BatchOutcome,
	deletions: &BTreeMap<String, DeletionReport>,
) -> FilterExport<'a> {
	let mut topics: Vec<TopicExport> = outcome
		.plans
		.iter()
		.map(|(topic, plan)| {
			let deletion = deletions.get(topic);
			TopicExport {
				topic: topic.as_str(),
				removed: Some(plan.removed_count()),
				images: Some(plan.decisions.as_slice()),
				error: None,
				deleted: deletion.map(|r| r.deleted.len()),
				deletion_errors: deletion
					.map(|r| r.failed.iter().map(|e| e.to_string()).collect())
					.unwrap_or_default(),
			}
		})
		.collect();

	topics.extend(outcome.failures.iter().map(|(topic, err)| TopicExport {
		topic: topic.as_str(),
		removed: None,
		images: None,
		error: Some(err.to_string()),
		deleted: None,
		deletion_errors: Vec::new(),
	}));
	topics.sort_by(|a, b| a.topic.cmp(b.topic));

	FilterExport {
		generated_at: Utc::now(),
		root: root.display().to_string(),
		threshold: threshold.value(),
		dry_run: deletions.is_empty(),
		topics,
	}
}
