//! Image decoding

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::core::ImageAsset;
use crate::error::{Error, Result};

/// Decode one file. Empty, corrupt and zero-sized images are rejected.
pub fn load(path: &Path) -> Result<ImageAsset> {
	crate::ui::debug(&format!("Decoding image: {}", path.display()));

	let image = image::ImageReader::open(path)
		.and_then(|reader| reader.with_guessed_format())
		.map_err(|e| Error::ImageInput {
			path: path.to_path_buf(),
			message: e.to_string(),
		})?
		.decode()
		.map_err(|e| Error::ImageInput {
			path: path.to_path_buf(),
			message: format!("file may be corrupted or in an unsupported format: {}", e),
		})?;

	if image.width() == 0 || image.height() == 0 {
		return Err(Error::ImageInput {
			path: path.to_path_buf(),
			message: "image has zero width or height".to_string(),
		});
	}

	Ok(ImageAsset::new(path.to_path_buf(), image))
}

/// Decode all files in parallel. Order is preserved, and the first failing
/// file in listing order is the one reported.
pub fn load_all(paths: &[PathBuf]) -> Result<Vec<ImageAsset>> {
	let decoded: Vec<Result<ImageAsset>> = paths.par_iter().map(|p| load(p)).collect();
	decoded.into_iter().collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use image::{Rgb, RgbImage};
	use std::fs;

	#[test]
	fn decodes_png() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("ok.png");
		RgbImage::from_pixel(8, 6, Rgb([10, 20, 30])).save(&path).unwrap();

		let asset = load(&path).unwrap();
		assert_eq!(asset.path, path);
		assert_eq!((asset.image.width(), asset.image.height()), (8, 6));
	}

	#[test]
	fn zero_byte_file_is_image_input_error() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("empty.jpg");
		fs::write(&path, b"").unwrap();

		assert!(matches!(load(&path), Err(Error::ImageInput { path: p, .. }) if p == path));
	}

	#[test]
	fn load_all_reports_first_bad_file_in_order() {
		let dir = tempfile::tempdir().unwrap();
		let good = dir.path().join("a.png");
		let bad_one = dir.path().join("b.png");
		let bad_two = dir.path().join("c.png");
		RgbImage::new(4, 4).save(&good).unwrap();
		fs::write(&bad_one, b"garbage").unwrap();
		fs::write(&bad_two, b"more garbage").unwrap();

		let err = load_all(&[good, bad_one.clone(), bad_two]).unwrap_err();
		assert!(matches!(err, Error::ImageInput { path, .. } if path == bad_one));
	}
}
