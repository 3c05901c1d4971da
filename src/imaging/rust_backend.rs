//! Pure Rust rendition backend — zero external dependencies.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image` crate (pure Rust decoders) |
//! | Grain flatten + invert | per-pixel over `RgbaImage` / `GrayImage` |
//! | Thumbnail crop | [`calculations::center_crop_box`] + `crop_imm` |
//! | Thumbnail resize | `image::imageops::resize` with `Lanczos3` |
//! | Radial falloff | [`calculations::radial_alpha`] per pixel |
//! | Encode → PNG | `image` crate PNG encoder (by output extension) |
//!
//! Procreate reads grain images with inked areas white, so sources that
//! carry transparency are flattened onto white and inverted; opaque
//! sources are taken as-is in grayscale.

use super::backend::{BackendError, GrainBackend};
use super::calculations::{self, center_crop_box};
use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, ImageReader, Luma, Rgba, RgbaImage, imageops};
use std::path::Path;

/// Pure Rust backend using the `image` crate.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

fn save_png(img: &DynamicImage, path: &Path) -> Result<(), BackendError> {
    img.save(path).map_err(|e| {
        BackendError::ProcessingFailed(format!("Failed to encode {}: {}", path.display(), e))
    })
}

/// Flatten an RGBA image onto a white background, then invert to
/// grayscale.
fn flatten_invert(rgba: &RgbaImage) -> GrayImage {
    let (w, h) = rgba.dimensions();
    GrayImage::from_fn(w, h, |x, y| {
        let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
        let alpha = f32::from(a) / 255.0;
        let over = |c: u8| f32::from(c) * alpha + 255.0 * (1.0 - alpha);
        // Rec. 601 luma of the flattened pixel
        let luma = 0.299 * over(r) + 0.587 * over(g) + 0.114 * over(b);
        Luma([255 - luma.round().clamp(0.0, 255.0) as u8])
    })
}

impl GrainBackend for RustBackend {
    fn derive_grain(&self, source: &Path, output: &Path) -> Result<(), BackendError> {
        let img = load_image(source)?;
        let grain: GrayImage = if img.color().has_alpha() {
            flatten_invert(&img.to_rgba8())
        } else {
            img.to_luma8()
        };
        save_png(&DynamicImage::ImageLuma8(grain), output)
    }

    fn derive_thumbnail(
        &self,
        grain: &Path,
        output: &Path,
        size: (u32, u32),
    ) -> Result<(), BackendError> {
        let (target_w, target_h) = size;
        let img = load_image(grain)?;
        let (w, h) = (img.width(), img.height());

        let crop = center_crop_box(w, h, target_w, target_h);
        let cropped = img.crop_imm(crop.x, crop.y, crop.width, crop.height);
        let resized = imageops::resize(
            &cropped.to_luma8(),
            target_w,
            target_h,
            FilterType::Lanczos3,
        );

        let thumbnail = RgbaImage::from_fn(target_w, target_h, |x, y| {
            let Luma([l]) = *resized.get_pixel(x, y);
            let alpha = calculations::radial_alpha(x, y, target_w, target_h);
            Rgba([l, l, l, alpha])
        });
        save_png(&DynamicImage::ImageRgba8(thumbnail), output)
    }
}
