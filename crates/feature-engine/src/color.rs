//! Average Color Features

use crate::config::ColorMode;
use image::DynamicImage;

/// Arithmetic mean of each channel over all pixels.
///
/// `Rgb` yields `[red, green, blue]`; single-channel inputs are expanded so
/// all three averages are equal. `Intensity` yields the luma average.
pub fn average_channels(image: &DynamicImage, mode: ColorMode) -> Vec<f64> {
    let n = (image.width() as u64 * image.height() as u64) as f64;
    if n == 0.0 {
        return vec![0.0; channel_count(mode)];
    }

    match mode {
        ColorMode::Rgb => {
            let rgb = image.to_rgb8();
            let mut sums = [0u64; 3];
            for pixel in rgb.pixels() {
                for (sum, &c) in sums.iter_mut().zip(pixel.0.iter()) {
                    *sum += c as u64;
                }
            }
            sums.iter().map(|&s| s as f64 / n).collect()
        }
        ColorMode::Intensity => {
            let gray = image.to_luma8();
            let sum: u64 = gray.pixels().map(|p| p.0[0] as u64).sum();
            vec![sum as f64 / n]
        }
    }
}

/// Number of averages produced for a mode
pub fn channel_count(mode: ColorMode) -> usize {
    match mode {
        ColorMode::Rgb => 3,
        ColorMode::Intensity => 1,
    }
}
