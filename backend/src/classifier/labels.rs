use shared::{display_name, ClassLabelInfo};
use std::sync::Arc;

use super::{argmax, InferenceError};
use crate::config::{validate_labels, ConfigError};

/// Ordered class identifiers; position `i` names model output `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassLabels {
    labels: Arc<[String]>,
}

impl ClassLabels {
    pub fn new(labels: Vec<String>) -> Result<Self, ConfigError> {
        validate_labels(&labels)?;
        Ok(Self {
            labels: labels.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn infos(&self) -> Vec<ClassLabelInfo> {
        self.labels
            .iter()
            .enumerate()
            .map(|(index, label)| ClassLabelInfo {
                index,
                label: label.clone(),
                display_name: display_name(label),
            })
            .collect()
    }

    pub(super) fn checked_argmax(&self, scores: &[f32]) -> Result<usize, InferenceError> {
        if scores.is_empty() {
            return Err(InferenceError::EmptyOutput);
        }
        if scores.len() != self.len() {
            return Err(InferenceError::ClassCountMismatch {
                expected: self.len(),
                got: scores.len(),
            });
        }
        argmax(scores).ok_or(InferenceError::EmptyOutput)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn maize() -> ClassLabels {
        ClassLabels::new(vec![
            "Corn_(maize)___Common_rust_".into(),
            "Corn_(maize)___healthy".into(),
        ])
        .unwrap()
    }

    #[test]
    fn lookup_is_bounded() {
        let labels = maize();
        assert_eq!(labels.get(1), Some("Corn_(maize)___healthy"));
        assert_eq!(labels.get(2), None);
    }

    #[test]
    fn infos_carry_display_names() {
        let infos = maize().infos();
        assert_eq!(infos[0].index, 0);
        assert_eq!(infos[0].display_name, "Corn maize - Common rust");
    }

    #[test]
    fn rejects_empty_list() {
        assert!(ClassLabels::new(Vec::new()).is_err());
    }
}
