use image::{DynamicImage, ImageResult, Rgb};

use crate::config::LeafConfig;

/// Advisory check for "does this look like a maize leaf": long and narrow,
/// and mostly green. Never blocks a prediction.
#[derive(Debug, Clone, Default)]
pub struct LeafHeuristic {
    config: LeafConfig,
}

impl LeafHeuristic {
    pub fn new(config: LeafConfig) -> Self {
        Self { config }
    }

    /// Takes the decode result shared with inference. Undecodable input
    /// counts as plausible.
    pub fn assess(&self, decoded: &ImageResult<DynamicImage>) -> bool {
        match decoded {
            Ok(image) => self.assess_image(image),
            Err(e) => {
                log::warn!("Leaf check could not decode image, assuming plausible: {}", e);
                true
            }
        }
    }

    pub fn assess_image(&self, image: &DynamicImage) -> bool {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        if width == 0 || height == 0 {
            log::warn!("Leaf check got an empty image, assuming plausible");
            return true;
        }

        let aspect_ratio = width as f32 / height as f32;
        if aspect_ratio < self.config.min_aspect_ratio {
            log::debug!(
                "Leaf check rejected aspect ratio {:.2} ({}x{})",
                aspect_ratio,
                width,
                height
            );
            return false;
        }

        let green = rgb.pixels().filter(|pixel| self.is_green(pixel)).count();
        let green_fraction = green as f64 / (width as f64 * height as f64);
        log::debug!("Leaf check green fraction {:.3}", green_fraction);
        green_fraction > self.config.min_green_fraction as f64
    }

    fn is_green(&self, pixel: &Rgb<u8>) -> bool {
        let (hue, saturation, value) = rgb_to_hsv(pixel);
        let (low, high) = self.config.hue_range;
        (low..=high).contains(&hue)
            && saturation >= self.config.min_saturation
            && value >= self.config.min_value
    }
}

/// Hue in degrees `0..360`, saturation and value in `0..=1`.
fn rgb_to_hsv(pixel: &Rgb<u8>) -> (f32, f32, f32) {
    let [r, g, b] = pixel.0.map(|channel| channel as f32 / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let hue = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    let saturation = if max == 0.0 { 0.0 } else { delta / max };

    (hue, saturation, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{png_bytes, solid_rgb};
    use image::RgbImage;

    const LEAF_GREEN: [u8; 3] = [34, 139, 34];
    const BLUE: [u8; 3] = [0, 0, 255];
    const RUST: [u8; 3] = [183, 65, 14];

    fn heuristic() -> LeafHeuristic {
        LeafHeuristic::default()
    }

    fn assess_bytes(bytes: &[u8]) -> bool {
        heuristic().assess(&image::load_from_memory(bytes))
    }

    #[test]
    fn solid_green_wide_image_is_plausible() {
        assert!(assess_bytes(&png_bytes(&solid_rgb(256, 128, LEAF_GREEN))));
    }

    #[test]
    fn solid_blue_wide_image_is_not() {
        assert!(!assess_bytes(&png_bytes(&solid_rgb(256, 128, BLUE))));
    }

    #[test]
    fn tall_or_square_images_fail_on_shape_alone() {
        assert!(!assess_bytes(&png_bytes(&solid_rgb(128, 256, LEAF_GREEN))));
        assert!(!assess_bytes(&png_bytes(&solid_rgb(128, 128, LEAF_GREEN))));
        assert!(!assess_bytes(&png_bytes(&solid_rgb(119, 100, LEAF_GREEN))));
    }

    #[test]
    fn ratio_exactly_at_threshold_passes_shape_check() {
        assert!(assess_bytes(&png_bytes(&solid_rgb(120, 100, LEAF_GREEN))));
    }

    #[test]
    fn rust_coloured_patch_is_not_green() {
        assert!(!assess_bytes(&png_bytes(&solid_rgb(300, 100, RUST))));
    }

    #[test]
    fn green_fraction_threshold() {
        let striped = |green_columns: u32| {
            let mut image = RgbImage::from_pixel(300, 100, Rgb(RUST));
            for x in 0..green_columns {
                for y in 0..100 {
                    image.put_pixel(x, y, Rgb(LEAF_GREEN));
                }
            }
            DynamicImage::ImageRgb8(image)
        };
        assert!(heuristic().assess_image(&striped(150)));
        assert!(!heuristic().assess_image(&striped(120)));
    }

    #[test]
    fn dark_or_washed_out_green_does_not_count() {
        assert!(!assess_bytes(&png_bytes(&solid_rgb(300, 100, [10, 30, 10]))));
        assert!(!assess_bytes(&png_bytes(&solid_rgb(300, 100, [220, 235, 220]))));
    }

    #[test]
    fn undecodable_bytes_fail_open() {
        assert!(assess_bytes(b"not an image at all"));
        assert!(assess_bytes(&[]));
    }

    #[test]
    fn hsv_conversion() {
        let (h, s, v) = rgb_to_hsv(&Rgb([0, 255, 0]));
        assert!((h - 120.0).abs() < 1e-3 && (s - 1.0).abs() < 1e-6 && (v - 1.0).abs() < 1e-6);
        let (h, _, _) = rgb_to_hsv(&Rgb([0, 0, 255]));
        assert!((h - 240.0).abs() < 1e-3);
        let (h, _, _) = rgb_to_hsv(&Rgb([255, 0, 128]));
        assert!(h > 300.0 && h < 360.0);
        assert_eq!(rgb_to_hsv(&Rgb([0, 0, 0])), (0.0, 0.0, 0.0));
    }
}
