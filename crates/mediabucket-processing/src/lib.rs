//! mediabucket processing library
//!
//! Image detection and width-bounded resizing into the variants uploaded next to
//! every image.

pub mod image;
pub mod variants;

pub use crate::image::{ImageProcessor, ImageTransformer};
pub use variants::ImageVariant;

pub use ::image::ImageFormat;
