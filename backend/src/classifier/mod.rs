mod labels;
mod preprocess;
#[cfg(feature = "torch")]
mod torch;

pub use labels::ClassLabels;
pub use preprocess::Preprocessor;
#[cfg(feature = "torch")]
pub use torch::TorchClassifier;

use image::DynamicImage;
use ndarray::Array4;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("Preprocessing error: {0}")]
    Preprocessing(#[from] image::ImageError),
    #[error("Model error: {0}")]
    Model(String),
    #[error("Model returned no usable scores")]
    EmptyOutput,
    #[error("Model returned {got} scores but {expected} class labels are configured")]
    ClassCountMismatch { expected: usize, got: usize },
}

/// A pretrained image classifier: one score per class for a batch of one.
pub trait Classifier: Send + Sync {
    fn scores(&self, input: &Array4<f32>) -> Result<Vec<f32>, InferenceError>;
}

/// Process-wide inference handle: preprocessing, forward pass and top-1
/// selection over the configured labels.
#[derive(Clone)]
pub struct ClassifierService {
    model: Arc<dyn Classifier>,
    labels: ClassLabels,
    preprocessor: Preprocessor,
}

impl ClassifierService {
    pub fn new(model: Arc<dyn Classifier>, labels: ClassLabels, preprocessor: Preprocessor) -> Self {
        Self {
            model,
            labels,
            preprocessor,
        }
    }

    pub fn labels(&self) -> &ClassLabels {
        &self.labels
    }

    /// Returns the index of the top-scoring class. The index is always a
    /// valid position in `labels()`.
    pub fn predict(&self, image: &DynamicImage) -> Result<usize, InferenceError> {
        let input = self.preprocessor.tensor_from_image(image);
        let scores = self.model.scores(&input)?;
        log::debug!("Model scores: {:?}", scores);
        self.labels.checked_argmax(&scores)
    }
}

/// Index of the largest score. Ties go to the lowest index and NaN never wins.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &score) in scores.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((index, score)),
        }
    }
    best.map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{solid_rgb, FixedScores, MeanColorClassifier};

    fn labels(n: usize) -> ClassLabels {
        ClassLabels::new((0..n).map(|i| format!("class_{}", i)).collect()).unwrap()
    }

    fn service(model: Arc<dyn Classifier>, n: usize) -> ClassifierService {
        ClassifierService::new(model, labels(n), Preprocessor::default())
    }

    #[test]
    fn argmax_picks_highest() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), Some(1));
        assert_eq!(argmax(&[-3.0, -1.0, -2.0]), Some(1));
    }

    #[test]
    fn argmax_ties_resolve_to_lowest_index() {
        assert_eq!(argmax(&[0.5, 0.5, 0.1]), Some(0));
    }

    #[test]
    fn argmax_skips_nan() {
        assert_eq!(argmax(&[f32::NAN, 0.2, 0.1]), Some(1));
        assert_eq!(argmax(&[f32::NAN]), None);
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn predict_returns_top_class() {
        let svc = service(Arc::new(FixedScores(vec![0.1, 0.2, 0.6, 0.1])), 4);
        let image = solid_rgb(64, 64, [10, 200, 10]);
        assert_eq!(svc.predict(&image).unwrap(), 2);
    }

    #[test]
    fn predict_is_deterministic() {
        let svc = service(Arc::new(MeanColorClassifier::maize()), 4);
        let image = solid_rgb(128, 128, [183, 65, 14]);
        let first = svc.predict(&image).unwrap();
        for _ in 0..5 {
            assert_eq!(svc.predict(&image).unwrap(), first);
        }
    }

    #[test]
    fn predict_rejects_label_count_mismatch() {
        let svc = service(Arc::new(FixedScores(vec![0.1, 0.9, 0.0])), 2);
        let image = solid_rgb(8, 8, [0, 0, 0]);
        let err = svc.predict(&image).unwrap_err();
        assert!(matches!(
            err,
            InferenceError::ClassCountMismatch { expected: 2, got: 3 }
        ));
    }

    #[test]
    fn predict_rejects_empty_output() {
        let svc = service(Arc::new(FixedScores(Vec::new())), 2);
        let image = solid_rgb(8, 8, [0, 0, 0]);
        assert!(matches!(svc.predict(&image), Err(InferenceError::EmptyOutput)));
    }

    #[test]
    fn rust_coloured_patch_yields_index_in_bounds() {
        let svc = service(Arc::new(MeanColorClassifier::maize()), 4);
        let image = solid_rgb(128, 128, [183, 65, 14]);
        let index = svc.predict(&image).unwrap();
        assert!(index < svc.labels().len());
    }
}
