use ndarray::Array4;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tch::{CModule, Device, Kind, Tensor};

use super::{Classifier, InferenceError};

impl From<tch::TchError> for InferenceError {
    fn from(err: tch::TchError) -> Self {
        InferenceError::Model(err.to_string())
    }
}

/// TorchScript model loaded once at startup. The libtorch handle is not
/// `Sync`, so forward passes take the lock; nothing mutates the module.
pub struct TorchClassifier {
    model: Mutex<CModule>,
    device: Device,
}

impl TorchClassifier {
    pub fn load(model_path: &Path) -> Result<Self, InferenceError> {
        let device = Device::cuda_if_available();
        let model = CModule::load_on_device(model_path, device)?;
        log::info!("Loaded TorchScript model {} on {:?}", model_path.display(), device);
        Ok(Self {
            model: Mutex::new(model),
            device,
        })
    }
}

/// The module is never mutated after load, so a panic in another forward
/// pass leaves it intact and the lock stays usable.
fn unpoisoned<T>(lock: &Mutex<T>) -> MutexGuard<'_, T> {
    lock.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Classifier for TorchClassifier {
    fn scores(&self, input: &Array4<f32>) -> Result<Vec<f32>, InferenceError> {
        let shape: Vec<i64> = input.shape().iter().map(|&dim| dim as i64).collect();
        let contiguous = input.as_standard_layout();
        let data = contiguous
            .as_slice()
            .ok_or_else(|| InferenceError::Model("input tensor is not contiguous".into()))?;
        let tensor = Tensor::from_slice(data)
            .view(shape.as_slice())
            .to_device(self.device);

        let output = {
            let model = unpoisoned(&self.model);
            tch::no_grad(|| model.forward_ts(&[tensor]))?
        };

        let output = output.softmax(-1, Kind::Float);
        let output_flat = output.to_device(Device::Cpu).to_kind(Kind::Float).view([-1]);
        let num_elements = output_flat.size()[0] as usize;
        let mut output_vec = vec![0.0f32; num_elements];
        output_flat.copy_data(&mut output_vec, num_elements);
        Ok(output_vec)
    }
}
