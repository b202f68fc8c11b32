use clap::builder::styling::{AnsiColor, Color, Style, Styles};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::{DEFAULT_ROOT, DEFAULT_THRESHOLD};

/// Execution provider for ONNX Runtime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Provider {
	/// Auto-detect best available (TensorRT → CUDA → CoreML → XNNPACK → CPU)
	#[default]
	Auto,
	/// CPU only
	Cpu,
	/// NVIDIA CUDA GPU
	Cuda,
	/// NVIDIA TensorRT (optimized inference)
	Tensorrt,
	/// Apple CoreML (macOS only)
	Coreml,
	/// XNNPACK (optimized CPU kernels)
	Xnnpack,
}

fn parse_threshold(s: &str) -> Result<f32, String> {
	let val: f32 = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
	if !(0.0..=1.0).contains(&val) {
		Err(format!("threshold must be between 0.0 and 1.0, got {}", val))
	} else {
		Ok(val)
	}
}

fn styles() -> Styles {
	let blue = Some(Color::Ansi(AnsiColor::Blue));
	Styles::styled()
		.header(Style::new().bold().fg_color(blue))
		.usage(Style::new().bold().fg_color(blue))
		.literal(Style::new().fg_color(blue))
		.placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))))
		.valid(Style::new().fg_color(blue))
		.invalid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))))
}

#[derive(Parser, Debug)]
#[command(
	name = "tinydata",
	author,
	version,
	about = "Discard downloaded images that do not match their topic",
	styles = styles(),
	after_help = format!(
		"{title}
  {bin} {filter}  {dry_args}                 {dry_desc}
  {bin} {filter}  {topic_args}  {topic_desc}
  {bin} {filter}  {del_args}          {del_desc}",
		title = "Examples:".bright_blue().bold(),
		bin = "tinydata".bright_blue(),
		filter = "filter".yellow(),
		dry_args = "-d ./images",
		dry_desc = "Score every topic, delete nothing".dimmed(),
		topic_args = "-t dogs,cats --threshold 0.25",
		topic_desc = "Only some topics, stricter".dimmed(),
		del_args = "-d ./images --delete --yes",
		del_desc = "Remove low-scoring images".dimmed(),
	),
)]
pub struct Cli {
	/// Enable verbose debug output
	#[arg(short = 'v', long = "verbose", global = true)]
	pub verbose: bool,

	/// Execution provider: auto, cpu, cuda, tensorrt, coreml, xnnpack
	#[arg(short = 'p', long = "provider", global = true, default_value = "auto")]
	pub provider: Provider,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Score images against their directory's topic and drop the mismatches
	Filter(FilterArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct FilterArgs {
	/// Root directory holding one subdirectory per topic
	#[arg(short = 'd', long = "dir", default_value = DEFAULT_ROOT)]
	pub directory: PathBuf,

	/// Topics to filter (comma-separated); defaults to every subdirectory
	#[arg(short = 't', long = "topics", value_delimiter = ',')]
	pub topics: Vec<String>,

	/// Images scoring below this similarity are removed (0.0-1.0)
	#[arg(short = 's', long = "threshold", default_value_t = DEFAULT_THRESHOLD, value_parser = parse_threshold)]
	pub threshold: f32,

	/// Actually delete files (default is a dry run)
	#[arg(long = "delete")]
	pub delete: bool,

	/// Skip the deletion confirmation prompt
	#[arg(short = 'y', long = "yes")]
	pub auto_confirm: bool,

	/// Abort the whole run on the first failing topic
	#[arg(long = "fail-fast")]
	pub fail_fast: bool,

	/// Write a JSON report to this file ('-' for stdout)
	#[arg(short = 'e', long = "export", value_name = "FILE")]
	pub export: Option<PathBuf>,

	/// Directory containing the model files
	#[arg(long = "models", value_name = "DIR")]
	pub models_dir: Option<PathBuf>,

	/// Vision model override
	#[arg(long = "vision-model", value_name = "FILE")]
	pub vision_model: Option<PathBuf>,

	/// Text model override
	#[arg(long = "text-model", value_name = "FILE")]
	pub text_model: Option<PathBuf>,

	/// Tokenizer override
	#[arg(long = "tokenizer", value_name = "FILE")]
	pub tokenizer: Option<PathBuf>,
}
