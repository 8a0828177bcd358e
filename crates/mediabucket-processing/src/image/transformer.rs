//! Image transformer - width-bounded resizing

use bytes::Bytes;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;

use super::processor::ImageProcessor;

pub struct ImageTransformer;

impl ImageTransformer {
    /// Output format for a mime type, if images of that type can be resized.
    ///
    /// Only formats that can be both decoded and re-encoded are resizable; other
    /// images (SVG, TIFF, HEIC, ...) are stored at full size only.
    pub fn resizable_format(mime: &str) -> Option<ImageFormat> {
        match mime.trim().to_lowercase().as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(ImageFormat::Jpeg),
            "image/png" => Some(ImageFormat::Png),
            "image/gif" => Some(ImageFormat::Gif),
            "image/webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    /// Scale the image down to `max_width`, preserving aspect ratio.
    ///
    /// Widths are measured after applying the EXIF orientation. Images already at
    /// most `max_width` wide are returned unchanged.
    pub fn resize_to_width(
        data: &Bytes,
        max_width: u32,
        format: ImageFormat,
    ) -> Result<Bytes, anyhow::Error> {
        let img = ImageProcessor::decode_oriented(data, format)?;

        let (width, height) = img.dimensions();
        if width <= max_width {
            return Ok(data.clone());
        }

        let new_height = ((height as u64 * max_width as u64) / width as u64).max(1) as u32;
        tracing::debug!(
            from_width = width,
            from_height = height,
            to_width = max_width,
            to_height = new_height,
            "Resizing image"
        );
        let resized = img.resize_exact(max_width, new_height, FilterType::Lanczos3);

        Self::encode(resized, format)
    }

    /// Same as `resize_to_width`, run on the blocking thread pool
    pub async fn resize_to_width_blocking(
        data: Bytes,
        max_width: u32,
        format: ImageFormat,
    ) -> Result<Bytes, anyhow::Error> {
        // Decode and resample are CPU-bound; keep them off the async workers.
        tokio::task::spawn_blocking(move || Self::resize_to_width(&data, max_width, format))
            .await?
    }

    fn encode(img: DynamicImage, format: ImageFormat) -> Result<Bytes, anyhow::Error> {
        // JPEG has no alpha channel; the WebP encoder only takes 8-bit RGBA/RGB.
        let img = match format {
            ImageFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8()),
            ImageFormat::WebP | ImageFormat::Gif => DynamicImage::ImageRgba8(img.to_rgba8()),
            _ => img,
        };

        let (width, height) = img.dimensions();
        let mut buffer = Vec::with_capacity((width * height * 3) as usize);
        img.write_to(&mut Cursor::new(&mut buffer), format)?;
        Ok(Bytes::from(buffer))
    }
}
