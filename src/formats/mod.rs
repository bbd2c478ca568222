use std::path::Path;

use anyhow::{bail, Context, Result};
use ndarray::{Array2, Array3};
use tracing::info;

use crate::types::{Image, Plane};

const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff", "bmp"];

// 65535 / 255: decoding through 16 bits keeps 8-bit sources exact integers.
const U16_PER_U8: f64 = 257.0;

/// Decode an image file into an (H, W, 3) RGB array on the [0, 255] scale.
/// Higher bit depths are rescaled onto the same range; alpha is dropped.
pub fn read_rgb_image(path: &Path) -> Result<Image> {
    ensure_supported(path)?;
    let decoded = image::open(path)
        .with_context(|| format!("Failed to decode {}", path.display()))?;
    let rgb = decoded.to_rgb16();
    let (width, height) = (rgb.width() as usize, rgb.height() as usize);
    info!(path = %path.display(), width, height, "loaded RGB image");

    let samples: Vec<f64> = rgb
        .into_raw()
        .into_iter()
        .map(|v| v as f64 / U16_PER_U8)
        .collect();
    Array3::from_shape_vec((height, width, 3), samples).context("Failed to reshape RGB data")
}

/// Decode an image file into a single grayscale plane on the [0, 255] scale.
pub fn read_gray_plane(path: &Path) -> Result<Plane> {
    ensure_supported(path)?;
    let decoded = image::open(path)
        .with_context(|| format!("Failed to decode {}", path.display()))?;
    let luma = decoded.to_luma16();
    let (width, height) = (luma.width() as usize, luma.height() as usize);
    info!(path = %path.display(), width, height, "loaded grayscale image");

    let samples: Vec<f64> = luma
        .into_raw()
        .into_iter()
        .map(|v| v as f64 / U16_PER_U8)
        .collect();
    Array2::from_shape_vec((height, width), samples).context("Failed to reshape grayscale data")
}

/// True when the extension names a format this crate decodes.
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.iter().any(|s| ext.eq_ignore_ascii_case(s)))
        .unwrap_or(false)
}

fn ensure_supported(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("Image not found: {}", path.display());
    }
    if !is_supported(path) {
        bail!(
            "Unsupported file format: {}",
            path.extension()
                .and_then(|e| e.to_str())
                .unwrap_or("unknown")
        );
    }
    Ok(())
}
