//! Image processor - header probing and orientation-aware decoding

use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader};
use std::io::Cursor;

pub struct ImageProcessor;

impl ImageProcessor {
    /// Displayed dimensions read from the header, without decoding pixel data.
    ///
    /// Width and height are swapped when the EXIF orientation rotates the image
    /// by a quarter turn.
    pub fn oriented_dimensions(data: &[u8], format: ImageFormat) -> Result<(u32, u32), anyhow::Error> {
        let mut decoder = ImageReader::with_format(Cursor::new(data), format).into_decoder()?;
        let (width, height) = decoder.dimensions();
        let orientation = decoder.orientation()?;

        if swaps_axes(orientation) {
            Ok((height, width))
        } else {
            Ok((width, height))
        }
    }

    /// Decode the image and apply its EXIF orientation to the pixels.
    ///
    /// Re-encoded images carry no EXIF, so the rotation has to be baked in.
    pub fn decode_oriented(data: &[u8], format: ImageFormat) -> Result<DynamicImage, anyhow::Error> {
        let mut decoder = ImageReader::with_format(Cursor::new(data), format).into_decoder()?;
        let orientation = decoder.orientation()?;
        let mut img = DynamicImage::from_decoder(decoder)?;
        if orientation != Orientation::NoTransforms {
            tracing::debug!(orientation = ?orientation, "Applying EXIF orientation");
            img.apply_orientation(orientation);
        }
        Ok(img)
    }
}

fn swaps_axes(orientation: Orientation) -> bool {
    matches!(
        orientation,
        Orientation::Rotate90
            | Orientation::Rotate270
            | Orientation::Rotate90FlipH
            | Orientation::Rotate270FlipH
    )
}
