//! Image processing module
//!
//! - Header probing and orientation-aware decoding (processor)
//! - Width-bounded resizing and re-encoding (transformer)

pub mod processor;
pub mod transformer;

pub use processor::ImageProcessor;
pub use transformer::ImageTransformer;
