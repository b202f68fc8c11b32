//! Raw embedding vectors and L2 normalization

use crate::error::{Error, Result};

/// Raw model output; normalized only when scored
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding(Vec<f32>);

impl Embedding {
	pub fn new(data: Vec<f32>) -> Self {
		Self(data)
	}

	pub fn as_slice(&self) -> &[f32] {
		&self.0
	}

	pub fn dim(&self) -> usize {
		self.0.len()
	}

	pub fn norm(&self) -> f32 {
		self.0.iter().map(|x| x * x).sum::<f32>().sqrt()
	}

	/// Zero (or non-finite) vectors have no direction to compare
	pub fn is_degenerate(&self) -> bool {
		let norm = self.norm();
		norm == 0.0 || !norm.is_finite()
	}

	/// Unit-length copy; a zero vector is rejected
	pub fn normalized(&self, subject: &str) -> Result<Self> {
		if self.is_degenerate() {
			return Err(Error::DegenerateEmbedding {
				subject: subject.to_string(),
			});
		}
		let norm = self.norm();
		Ok(Self(self.0.iter().map(|x| x / norm).collect()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn normalizes_to_unit_length() {
		let e = Embedding::new(vec![3.0, 4.0]).normalized("test").unwrap();
		assert!((e.norm() - 1.0).abs() < 1e-6);
		assert!((e.as_slice()[0] - 0.6).abs() < 1e-6);
		assert!((e.as_slice()[1] - 0.8).abs() < 1e-6);
	}

	#[test]
	fn zero_vector_is_degenerate() {
		let err = Embedding::new(vec![0.0; 4]).normalized("img.png").unwrap_err();
		assert!(matches!(err, Error::DegenerateEmbedding { ref subject } if subject == "img.png"));
	}

	#[test]
	fn scaling_preserves_direction() {
		let e = Embedding::new(vec![1.0, -2.0, 0.5]);
		let a = e.normalized("a").unwrap();
		let b = Embedding::new(e.as_slice().iter().map(|x| x * 7.5).collect())
			.normalized("b")
			.unwrap();
		for (x, y) in a.as_slice().iter().zip(b.as_slice()) {
			assert!((x - y).abs() < 1e-6);
		}
	}
}
