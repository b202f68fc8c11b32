//! Unified logging system

use colored::*;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};

static VERBOSE: AtomicBool = AtomicBool::new(false);

const LOGO: &str = r#"
  __  _             __      __
 / /_(_)___  __  __/ /___ _/ /_____ _
/ __/ / __ \/ / / / __  / __ `/ __/ __ `/
/ /_/ / / / / /_/ / /_/ / /_/ / /_/ /_/ /
\__/_/_/ /_/\__, /\__,_/\__,_/\__/\__,_/
           /____/                         "#;

const SLOGANS: &[&str] = &[
	"Small data, fewer regrets",
	"That dog was a muffin all along",
	"Your dataset called, it wants its cats back",
	"Cosine similarity, but make it tidy",
	"Garbage in? Not anymore",
	"Every image has to earn its folder",
	"We checked. It was not a dog.",
];

pub fn random_slogan() -> &'static str {
	let idx = rand::rng().random_range(0..SLOGANS.len());
	SLOGANS[idx]
}

pub fn print_logo() {
	println!("{}", LOGO.bright_blue().bold());
	println!("{}", random_slogan().dimmed().italic());
}

pub struct Log;

impl Log {
	pub fn set_verbose(enabled: bool) {
		VERBOSE.store(enabled, Ordering::Relaxed);
	}

	pub fn is_verbose() -> bool {
		VERBOSE.load(Ordering::Relaxed)
	}
}

pub fn info(msg: &str) {
	println!("{} {}", "ℹ".bright_blue().bold(), msg.bright_white());
}

pub fn success(msg: &str) {
	println!("{} {}", "✓".bright_green().bold(), msg.bright_white());
}

pub fn warn(msg: &str) {
	println!("{} {}", "⚠".bright_yellow().bold(), msg.bright_white());
}

pub fn error(msg: &str) {
	eprintln!("{} {}", "✗".bright_red().bold(), msg.bright_white());
}

pub fn debug(msg: &str) {
	if Log::is_verbose() {
		println!("{} {}", "⚙".bright_black().bold(), msg.dimmed());
	}
}

pub fn header(text: &str) {
	println!("\n{}", text.bright_blue().bold());
}

/// Score as a fixed-width decimal: red when it falls below the threshold
pub fn score_label(score: f32, threshold: f32) -> ColoredString {
	let text = format!("{:+.3}", score);
	if score < threshold {
		text.bright_red()
	} else {
		text.bright_green()
	}
}

/// Clickable file path (OSC 8 terminal hyperlink)
pub fn path_link(path: &std::path::Path, max_len: usize) -> String {
	let absolute = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

	let uri = if cfg!(windows) {
		let path_str = absolute.to_string_lossy();
		let cleaned = path_str.strip_prefix(r"\\?\").unwrap_or(&path_str);
		format!("file:///{}", cleaned.replace('\\', "/"))
	} else {
		format!("file://{}", absolute.display())
	};

	let filename = path
		.file_name()
		.and_then(|n| n.to_str())
		.unwrap_or("unknown");

	format!("\x1b]8;;{}\x1b\\{}\x1b]8;;\x1b\\", uri, shorten(filename, max_len))
}

/// Middle-elide long names, respecting char boundaries
fn shorten(name: &str, max_len: usize) -> String {
	let chars: Vec<char> = name.chars().collect();
	if chars.len() <= max_len || max_len < 8 {
		return name.to_string();
	}
	let head = max_len / 2;
	let tail = max_len - head - 3;
	let start: String = chars[..head].iter().collect();
	let end: String = chars[chars.len() - tail..].iter().collect();
	format!("{}...{}", start, end)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn shorten_keeps_short_names() {
		assert_eq!(shorten("dog.png", 60), "dog.png");
	}

	#[test]
	fn shorten_elides_middle() {
		let long = "a".repeat(30) + "-" + &"b".repeat(30) + ".jpg";
		let short = shorten(&long, 20);
		assert_eq!(short.chars().count(), 20);
		assert!(short.starts_with("aaaa") && short.ends_with(".jpg"));
		assert!(short.contains("..."));
	}

	#[test]
	fn shorten_handles_multibyte() {
		let name = "🐶".repeat(40);
		assert_eq!(shorten(&name, 10).chars().count(), 10);
	}
}
