//! # ONNX Model Management
//!
//! The `Encoder` seam and its CLIP implementation, loaded lazily per tower.

pub mod encoder;
pub mod manager;
pub mod tensor;
pub mod text;
pub mod vision;

pub use encoder::Encoder;
pub use manager::ClipModel;
