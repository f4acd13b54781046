use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use ndarray::{Array4, Axis};
use std::io::Cursor;

use crate::classifier::{Classifier, InferenceError};

pub fn solid_rgb(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)))
}

pub fn png_bytes(image: &DynamicImage) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .expect("encoding a test image as PNG");
    buffer.into_inner()
}

/// Always returns the same scores regardless of input.
pub struct FixedScores(pub Vec<f32>);

impl Classifier for FixedScores {
    fn scores(&self, _input: &Array4<f32>) -> Result<Vec<f32>, InferenceError> {
        Ok(self.0.clone())
    }
}

/// Scores each class by how close the image's mean colour is to a class
/// colour. Expects NHWC input.
pub struct MeanColorClassifier {
    centroids: Vec<[f32; 3]>,
}

impl MeanColorClassifier {
    pub fn maize() -> Self {
        Self {
            centroids: vec![
                [150.0, 140.0, 110.0],
                [183.0, 65.0, 14.0],
                [120.0, 110.0, 80.0],
                [34.0, 139.0, 34.0],
            ],
        }
    }
}

impl Classifier for MeanColorClassifier {
    fn scores(&self, input: &Array4<f32>) -> Result<Vec<f32>, InferenceError> {
        let pixels = input
            .index_axis(Axis(0), 0)
            .into_shape_with_order((input.shape()[1] * input.shape()[2], 3))
            .map_err(|e| InferenceError::Model(e.to_string()))?
            .to_owned();
        let mean = pixels
            .mean_axis(Axis(0))
            .ok_or(InferenceError::EmptyOutput)?;

        Ok(self
            .centroids
            .iter()
            .map(|centroid| {
                let distance: f32 = centroid
                    .iter()
                    .zip(mean.iter())
                    .map(|(c, m)| (c - m).powi(2))
                    .sum();
                -distance.sqrt()
            })
            .collect())
    }
}
