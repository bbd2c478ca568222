use anyhow::{bail, Context, Result};
use image::{GrayImage, ImageBuffer, RgbImage};
use std::path::Path;

use crate::types::{Image, Plane};

pub struct JpegConfig {
    /// JPEG quality (1-100)
    pub quality: u8,
}

impl Default for JpegConfig {
    fn default() -> Self {
        JpegConfig { quality: 95 }
    }
}

/// Round and clamp a sample onto the displayable 8-bit range.
#[inline]
pub fn to_display_u8(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Interleaved 8-bit RGB bytes of an (H, W, 3) image.
pub fn to_rgb_bytes(image: &Image) -> Result<Vec<u8>> {
    let (_, _, channels) = image.dim();
    if channels != 3 {
        bail!("RGB output requires 3 channels, found {}", channels);
    }
    // Logical (H, W, C) order is interleaved RGB.
    Ok(image.iter().map(|&v| to_display_u8(v)).collect())
}

/// Encode an RGB image; format follows the output extension.
pub fn save_image<P: AsRef<Path>>(image: &Image, path: P, config: JpegConfig) -> Result<()> {
    let path = path.as_ref();
    let (height, width, _) = image.dim();

    let img_buffer: RgbImage = ImageBuffer::from_raw(width as u32, height as u32, to_rgb_bytes(image)?)
        .context("Failed to create image buffer from reconstructed data")?;

    if is_jpeg(path) {
        let mut output = std::fs::File::create(path)
            .context("Failed to create output file")?;
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut output, config.quality);
        img_buffer.write_with_encoder(encoder)
            .context("Failed to encode JPEG")?;
    } else {
        img_buffer.save(path)
            .with_context(|| format!("Failed to save {}", path.display()))?;
    }

    Ok(())
}

/// Encode a single plane (e.g. a chroma plane) as 8-bit grayscale.
/// `offset` is added before rounding so zero-centred chroma lands mid-range.
pub fn save_plane<P: AsRef<Path>>(plane: &Plane, path: P, offset: f64) -> Result<()> {
    let path = path.as_ref();
    let (height, width) = plane.dim();
    let bytes: Vec<u8> = plane.iter().map(|&v| to_display_u8(v + offset)).collect();

    let img_buffer: GrayImage = ImageBuffer::from_raw(width as u32, height as u32, bytes)
        .context("Failed to create grayscale buffer")?;
    img_buffer.save(path)
        .with_context(|| format!("Failed to save {}", path.display()))?;

    Ok(())
}

fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_clamping() {
        assert_eq!(to_display_u8(-12.0), 0);
        assert_eq!(to_display_u8(254.6), 255);
        assert_eq!(to_display_u8(300.0), 255);
        assert_eq!(to_display_u8(127.4), 127);
    }

    #[test]
    fn test_rgb_bytes_are_interleaved() {
        let image = Image::from_shape_fn((1, 2, 3), |(_, x, c)| (x * 10 + c) as f64);
        assert_eq!(to_rgb_bytes(&image).unwrap(), vec![0, 1, 2, 10, 11, 12]);
    }

    #[test]
    fn test_rgb_bytes_rejects_non_rgb() {
        assert!(to_rgb_bytes(&Image::zeros((2, 2, 4))).is_err());
    }
}
