//! Vision tower (CLIP ViT-B/32) for image embeddings

use std::path::Path;
use std::sync::Mutex;

use image::imageops::FilterType;
use image::DynamicImage;
use ndarray::Array3;
use ort::session::Session;
use rayon::prelude::*;

use crate::config::{CLIP_MEAN, CLIP_STD, INPUT_SIZE};
use crate::core::{Embedding, ImageAsset};
use crate::error::{Error, Result};

const OUTPUT_NAMES: &[&str] = &["image_embeds", "pooler_output"];

/// `Session::run` needs `&mut`, so the session sits behind a lock.
pub struct VisionModel {
    session: Mutex<Session>,
    input_name: String,
}

impl VisionModel {
    pub fn load(model_path: &Path) -> Result<Self> {
        let session = crate::runtime::create_session(model_path)?;

        let input_name = session
            .inputs()
            .first()
            .map(|i| i.name().to_string())
            .unwrap_or_else(|| "pixel_values".to_string());

        crate::ui::debug(&format!("Vision model input: {}", input_name));

        Ok(Self {
            session: Mutex::new(session),
            input_name,
        })
    }

    /// One inference call for the whole batch
    pub fn encode_batch(&self, images: &[ImageAsset]) -> Result<Vec<Embedding>> {
        if images.is_empty() {
            return Ok(Vec::new());
        }

        let size = INPUT_SIZE as usize;
        let shape = vec![images.len(), 3, size, size];
        let flat = pixel_values(images)?;

        let input = ort::value::Value::from_array((shape, flat))
            .map_err(|e| Error::Inference(format!("Failed to create input tensor: {}", e)))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| Error::Inference(format!("Session lock poisoned: {}", e)))?;

        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input])
            .map_err(|e| Error::Inference(format!("Vision inference failed: {}", e)))?;

        super::tensor::extract_embeddings(&outputs, OUTPUT_NAMES, images.len())
    }
}

/// Flattened NCHW pixels for a batch; an unusable image fails the batch
fn pixel_values(images: &[ImageAsset]) -> Result<Vec<f32>> {
    let tensors = images
        .par_iter()
        .map(|asset| {
            preprocess(&asset.image)
                .map_err(|message| Error::model_input(asset.path.display().to_string(), message))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(tensors.iter().flat_map(|t| t.iter().copied()).collect())
}

/// Resize-to-fill, then per-channel CLIP normalization into a CHW tensor
pub fn preprocess(img: &DynamicImage) -> std::result::Result<Array3<f32>, String> {
    if img.width() == 0 || img.height() == 0 {
        return Err(format!("image has zero size ({}x{})", img.width(), img.height()));
    }

    let resized = img.resize_to_fill(INPUT_SIZE, INPUT_SIZE, FilterType::Triangle);
    let rgb = resized.to_rgb8();
    let size = INPUT_SIZE as usize;

    let mut tensor = Array3::<f32>::zeros((3, size, size));
    for (x, y, px) in rgb.enumerate_pixels() {
        for c in 0..3 {
            tensor[[c, y as usize, x as usize]] = (px[c] as f32 / 255.0 - CLIP_MEAN[c]) / CLIP_STD[c];
        }
    }

    Ok(tensor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn preprocess_shape_is_fixed() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(640, 480));
        let tensor = preprocess(&img).unwrap();
        assert_eq!(tensor.shape(), &[3, 224, 224]);
    }

    #[test]
    fn preprocess_applies_clip_normalization() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 16, Rgb([255, 255, 255])));
        let tensor = preprocess(&img).unwrap();
        for c in 0..3 {
            let expected = (1.0 - CLIP_MEAN[c]) / CLIP_STD[c];
            assert!((tensor[[c, 100, 100]] - expected).abs() < 1e-4);
        }
    }

    #[test]
    fn preprocess_rejects_empty_image() {
        let img = DynamicImage::new_rgb8(0, 10);
        assert!(preprocess(&img).unwrap_err().contains("0x10"));
    }

    #[test]
    fn batch_pixels_are_laid_out_per_image() {
        let white = ImageAsset::new(
            "white.png".into(),
            DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([255, 255, 255]))),
        );
        let black = ImageAsset::new("black.png".into(), DynamicImage::new_rgb8(8, 8));

        let flat = pixel_values(&[white, black]).unwrap();
        let per_image = 3 * 224 * 224;
        assert_eq!(flat.len(), 2 * per_image);
        assert!(flat[0] > 0.0);
        assert!(flat[per_image] < 0.0);
    }

    #[test]
    fn zero_size_image_is_rejected_with_its_path() {
        let path = std::path::PathBuf::from("dogs").join("empty.png");
        let assets = [
            ImageAsset::new("dogs/ok.png".into(), DynamicImage::new_rgb8(4, 4)),
            ImageAsset::new(path.clone(), DynamicImage::new_rgb8(0, 0)),
        ];

        let err = pixel_values(&assets).unwrap_err();
        let expected = path.display().to_string();
        assert!(matches!(err, Error::ModelInput { ref subject, .. } if *subject == expected));
    }
}
