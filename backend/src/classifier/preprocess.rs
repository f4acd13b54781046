use image::imageops::{self, FilterType};
use image::DynamicImage;
use ndarray::Array4;

use crate::config::{ClassifierConfig, TensorLayout};

/// Decodes an image and lays it out as the `1 x size x size x 3` (or
/// `1 x 3 x size x size`) float tensor the model was trained on.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    size: u32,
    filter: FilterType,
    layout: TensorLayout,
    scale: f32,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self {
            size: 128,
            filter: FilterType::Nearest,
            layout: TensorLayout::Nhwc,
            scale: 1.0,
        }
    }
}

impl Preprocessor {
    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self {
            size: config.input_size,
            filter: config.resize_filter.into(),
            layout: config.layout,
            scale: config.scale,
        }
    }

    pub fn tensor_from_image(&self, image: &DynamicImage) -> Array4<f32> {
        let rgb = imageops::resize(&image.to_rgb8(), self.size, self.size, self.filter);
        let side = self.size as usize;
        let scale = self.scale;
        let value = |x: usize, y: usize, c: usize| rgb.get_pixel(x as u32, y as u32)[c] as f32 * scale;

        match self.layout {
            TensorLayout::Nhwc => {
                Array4::from_shape_fn((1, side, side, 3), |(_, y, x, c)| value(x, y, c))
            }
            TensorLayout::Nchw => {
                Array4::from_shape_fn((1, 3, side, side), |(_, c, y, x)| value(x, y, c))
            }
        }
    }
}
