//! Topics (one directory per label) and decoded image assets

use std::path::{Path, PathBuf};

use image::DynamicImage;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// A label and the directory holding its images
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
	name: String,
	dir: PathBuf,
}

impl Topic {
	/// Resolve a named topic under `root`. Matching is case-sensitive.
	pub fn resolve(root: &Path, name: &str) -> Result<Self> {
		let dir = root.join(name);
		let exact = dir
			.file_name()
			.and_then(|n| n.to_str())
			.is_some_and(|n| n == name);

		// Case-insensitive filesystems would otherwise accept "Dogs" for "dogs"
		let listed = exact
			&& std::fs::read_dir(root)
				.map(|entries| {
					entries
						.filter_map(|e| e.ok())
						.any(|e| e.file_name().to_str() == Some(name))
				})
				.unwrap_or(false);

		if !listed || !dir.is_dir() {
			return Err(Error::UnknownTopic {
				topic: name.to_string(),
				root: root.to_path_buf(),
			});
		}

		Ok(Self {
			name: name.to_string(),
			dir,
		})
	}

	/// Every immediate, non-hidden subdirectory of `root`, sorted by name.
	/// Links to directories count, as they do for [`Topic::resolve`].
	pub fn discover(root: &Path) -> Result<Vec<Self>> {
		if !root.is_dir() {
			return Err(Error::Listing {
				path: root.to_path_buf(),
				message: "not a directory".to_string(),
			});
		}

		let mut topics = Vec::new();
		for entry in WalkDir::new(root).min_depth(1).max_depth(1).sort_by_file_name() {
			let entry = entry.map_err(|e| Error::Listing {
				path: root.to_path_buf(),
				message: e.to_string(),
			})?;

			if !entry.path().is_dir() {
				warn_if_dangling(&entry);
				continue;
			}

			let Some(name) = entry.file_name().to_str() else {
				crate::ui::warn(&format!(
					"Skipping non UTF-8 directory: {}",
					entry.path().display()
				));
				continue;
			};

			if name.starts_with('.') {
				continue;
			}

			topics.push(Self {
				name: name.to_string(),
				dir: entry.path().to_path_buf(),
			});
		}

		Ok(topics)
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn dir(&self) -> &Path {
		&self.dir
	}

	/// Regular files (or links to them) directly inside the topic directory,
	/// in file-name order
	pub fn list_files(&self) -> Result<Vec<PathBuf>> {
		WalkDir::new(&self.dir)
			.min_depth(1)
			.max_depth(1)
			.sort_by_file_name()
			.into_iter()
			.filter_map(|entry| match entry {
				Ok(e) if e.path().is_file() => Some(Ok(e.into_path())),
				Ok(e) => {
					warn_if_dangling(&e);
					None
				}
				Err(e) => Some(Err(Error::Listing {
					path: self.dir.clone(),
					message: e.to_string(),
				})),
			})
			.collect()
	}
}

fn warn_if_dangling(entry: &walkdir::DirEntry) {
	if entry.path_is_symlink() && !entry.path().exists() {
		crate::ui::warn(&format!("Skipping dangling link: {}", entry.path().display()));
	}
}

/// A decoded image and the file it came from
#[derive(Debug, Clone)]
pub struct ImageAsset {
	pub path: PathBuf,
	pub image: DynamicImage,
}

impl ImageAsset {
	pub fn new(path: PathBuf, image: DynamicImage) -> Self {
		Self { path, image }
	}
}
