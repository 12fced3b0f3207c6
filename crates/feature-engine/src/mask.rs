//! Otsu Foreground Masking

use image::{DynamicImage, GrayImage, Luma, Rgb};
use imageproc::contrast::otsu_level;
use tracing::debug;

/// Image with background pixels zeroed
#[derive(Debug, Clone)]
pub struct MaskedImage {
    /// Otsu level; pixels with gray value above it are foreground
    pub threshold: u8,
    /// Number of foreground pixels kept
    pub foreground_pixels: usize,
    /// Masked image (same channel layout as the input, alpha dropped)
    pub image: DynamicImage,
}

/// Binary foreground mask: `true` where `gray > otsu_level(gray)`
pub fn otsu_foreground(gray: &GrayImage) -> (u8, Vec<bool>) {
    let level = otsu_level(gray);
    let mask = gray.pixels().map(|p| p.0[0] > level).collect();
    (level, mask)
}

/// Threshold the grayscale version of `image` with Otsu's method and zero
/// every channel of the background pixels.
pub fn otsu_mask(image: &DynamicImage) -> MaskedImage {
    let gray = image.to_luma8();
    let (threshold, mask) = otsu_foreground(&gray);
    let foreground_pixels = mask.iter().filter(|&&m| m).count();

    let masked = match image {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageLuma16(_) | DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageLumaA16(_) => {
            let mut out = gray;
            for (pixel, &keep) in out.pixels_mut().zip(&mask) {
                if !keep {
                    *pixel = Luma([0]);
                }
            }
            DynamicImage::ImageLuma8(out)
        }
        _ => {
            let mut out = image.to_rgb8();
            for (pixel, &keep) in out.pixels_mut().zip(&mask) {
                if !keep {
                    *pixel = Rgb([0, 0, 0]);
                }
            }
            DynamicImage::ImageRgb8(out)
        }
    };

    debug!(
        threshold,
        foreground_pixels,
        total_pixels = mask.len(),
        "Applied Otsu mask"
    );

    MaskedImage {
        threshold,
        foreground_pixels,
        image: masked,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    /// Left half dark background, right half bright fruit
    fn split_image() -> RgbImage {
        RgbImage::from_fn(8, 4, |x, _| {
            if x < 4 {
                Rgb([20, 20, 20])
            } else {
                Rgb([220, 180, 40])
            }
        })
    }

    #[test]
    fn test_background_is_zeroed() {
        let masked = otsu_mask(&DynamicImage::ImageRgb8(split_image()));
        let rgb = masked.image.to_rgb8();
        assert_eq!(masked.foreground_pixels, 16);
        assert_eq!(rgb.get_pixel(0, 0), &Rgb([0, 0, 0]));
        assert_eq!(rgb.get_pixel(7, 3), &Rgb([220, 180, 40]));
    }

    #[test]
    fn test_threshold_separates_classes() {
        let gray = DynamicImage::ImageRgb8(split_image()).to_luma8();
        let (level, mask) = otsu_foreground(&gray);
        let dark = gray.get_pixel(0, 0).0[0];
        let bright = gray.get_pixel(7, 0).0[0];
        assert!(level >= dark && level < bright);
        assert_eq!(mask.iter().filter(|&&m| m).count(), 16);
    }

    #[test]
    fn test_grayscale_input_stays_grayscale() {
        let img = GrayImage::from_fn(4, 4, |x, _| Luma([if x < 2 { 5 } else { 250 }]));
        let masked = otsu_mask(&DynamicImage::ImageLuma8(img));
        assert!(matches!(masked.image, DynamicImage::ImageLuma8(_)));
        assert_eq!(masked.image.to_luma8().get_pixel(0, 0), &Luma([0]));
    }
}
