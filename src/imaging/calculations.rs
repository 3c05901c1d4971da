//! Pure dimension and mask math for the grain renditions.
//!
//! Kept free of I/O and pixel buffers so the geometry is unit testable
//! without decoding a single image.

/// A crop rectangle in source-image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Compute the centered crop of `(width, height)` matching the aspect
/// ratio `target_w:target_h`.
///
/// Wider-than-target images lose width, taller images lose height; the
/// center is preserved either way.
pub fn center_crop_box(width: u32, height: u32, target_w: u32, target_h: u32) -> CropBox {
    let img_ratio = f64::from(width) / f64::from(height);
    let target_ratio = f64::from(target_w) / f64::from(target_h);

    if img_ratio > target_ratio {
        let new_width = (f64::from(height) * target_ratio) as u32;
        let new_width = new_width.min(width).max(1);
        CropBox {
            x: (width - new_width) / 2,
            y: 0,
            width: new_width,
            height,
        }
    } else {
        let new_height = (f64::from(width) / target_ratio) as u32;
        let new_height = new_height.min(height).max(1);
        CropBox {
            x: 0,
            y: (height - new_height) / 2,
            width,
            height: new_height,
        }
    }
}

/// Radial alpha value for pixel `(x, y)` in a `width`×`height` image:
/// opaque at the center, fading to transparent at the corners.
pub fn radial_alpha(x: u32, y: u32, width: u32, height: u32) -> u8 {
    let cx = f64::from(width) / 2.0;
    let cy = f64::from(height) / 2.0;
    let dx = f64::from(x) - cx;
    let dy = f64::from(y) - cy;
    let distance = (dx * dx + dy * dy).sqrt();
    let max_distance = (cx * cx + cy * cy).sqrt();
    if max_distance == 0.0 {
        return 255;
    }
    let alpha = (1.0 - distance / max_distance) * 255.0;
    alpha.clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_image_crops_width() {
        // 400x100 cropped to 2:1 → 200 wide, centered
        let b = center_crop_box(400, 100, 2, 1);
        assert_eq!(
            b,
            CropBox {
                x: 100,
                y: 0,
                width: 200,
                height: 100
            }
        );
    }

    #[test]
    fn tall_image_crops_height() {
        // 100x400 cropped to 1:2 → 200 tall, centered
        let b = center_crop_box(100, 400, 1, 2);
        assert_eq!(
            b,
            CropBox {
                x: 0,
                y: 100,
                width: 100,
                height: 200
            }
        );
    }

    #[test]
    fn matching_ratio_is_full_frame() {
        let b = center_crop_box(1060, 324, 1060, 324);
        assert_eq!(b.x, 0);
        assert_eq!(b.y, 0);
        assert_eq!(b.width, 1060);
        assert_eq!(b.height, 324);
    }

    #[test]
    fn crop_never_exceeds_source() {
        let b = center_crop_box(3, 1000, 1060, 324);
        assert!(b.width <= 3);
        assert!(b.height <= 1000);
        assert!(b.width >= 1 && b.height >= 1);
    }

    #[test]
    fn radial_alpha_center_is_opaque() {
        assert_eq!(radial_alpha(50, 50, 100, 100), 255);
    }

    #[test]
    fn radial_alpha_corner_is_transparent() {
        assert_eq!(radial_alpha(0, 0, 100, 100), 0);
    }

    #[test]
    fn radial_alpha_falls_off_monotonically() {
        let center = radial_alpha(50, 50, 100, 100);
        let mid = radial_alpha(25, 50, 100, 100);
        let edge = radial_alpha(0, 50, 100, 100);
        assert!(center > mid);
        assert!(mid > edge);
    }
}
