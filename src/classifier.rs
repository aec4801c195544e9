//! Checkpoint loading and the forward-pass call sequence.
//!
//! The checkpoint is an ONNX export of the trained network. Loading pins the
//! input to `1×3×224×224 f32`, optimizes the graph once, and keeps the
//! runnable plan around so repeated predictions do not re-read the file.

use std::path::Path;

use serde::Serialize;
use tract_onnx::prelude::*;

use crate::classes::{DiseaseClass, CLASS_COUNT};
use crate::error::ScanError;
use crate::preprocess::{preprocess_image, INPUT_SIZE};

/// Default checkpoint path, resolved against the working directory.
pub const DEFAULT_CHECKPOINT_PATH: &str = "eye_disease.onnx";

/// Outcome of a single forward pass.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    /// Argmax of the probability vector.
    pub class: DiseaseClass,
    /// Softmax output, positionally aligned with [`DiseaseClass::ALL`].
    pub probabilities: [f32; CLASS_COUNT],
}

impl Prediction {
    /// Probability assigned to the predicted class.
    pub fn confidence(&self) -> f32 {
        self.probabilities[self.class.index()]
    }
}

/// A loaded checkpoint, ready to classify fundus photographs.
#[derive(Debug)]
pub struct Classifier {
    plan: TypedRunnableModel<TypedModel>,
}

impl Classifier {
    /// Loads the checkpoint and prepares an optimized runnable plan.
    ///
    /// Fails with [`ScanError::Checkpoint`] when the file is missing or not a
    /// parseable ONNX graph, and with [`ScanError::ShapeMismatch`] when the
    /// graph's output width is not [`CLASS_COUNT`].
    pub fn load(path: impl AsRef<Path>) -> Result<Classifier, ScanError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let side = INPUT_SIZE as usize;
        let model = tract_onnx::onnx()
            .model_for_path(path)
            .map_err(|e| ScanError::checkpoint(&display, e.to_string()))?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(f32::datum_type(), tvec!(1, 3, side, side)),
            )
            .map_err(|e| ScanError::checkpoint(&display, e.to_string()))?
            .into_optimized()
            .map_err(|e| ScanError::checkpoint(&display, e.to_string()))?;

        // Reject checkpoints trained for a different label set up front,
        // rather than at the first prediction.
        let output_fact = model
            .output_fact(0)
            .map_err(|e| ScanError::checkpoint(&display, e.to_string()))?;
        if let Some(shape) = output_fact.shape.as_concrete() {
            let width = shape.last().copied().unwrap_or(0);
            if width != CLASS_COUNT {
                return Err(ScanError::ShapeMismatch { expected: CLASS_COUNT, actual: width });
            }
        }

        let plan = model
            .into_runnable()
            .map_err(|e| ScanError::checkpoint(&display, e.to_string()))?;

        Ok(Classifier { plan })
    }

    /// Classifies one uploaded image: preprocess, forward pass, softmax, argmax.
    ///
    /// Deterministic for a fixed checkpoint and input; no side effects.
    pub fn predict(&self, image_bytes: &[u8]) -> Result<Prediction, ScanError> {
        let input = preprocess_image(image_bytes)?;
        let tensor: Tensor = input.into();

        let outputs = self
            .plan
            .run(tvec!(tensor.into()))
            .map_err(|e| ScanError::Inference(e.to_string()))?;
        let view = outputs[0]
            .to_array_view::<f32>()
            .map_err(|e| ScanError::Inference(e.to_string()))?;

        let logits: Vec<f32> = view.iter().copied().collect();
        if logits.len() != CLASS_COUNT {
            return Err(ScanError::ShapeMismatch { expected: CLASS_COUNT, actual: logits.len() });
        }

        let soft = softmax(&logits);
        let mut probabilities = [0.0f32; CLASS_COUNT];
        probabilities.copy_from_slice(&soft);

        let class = DiseaseClass::ALL[argmax(&probabilities)];
        Ok(Prediction { class, probabilities })
    }
}

/// Numerically stable softmax over raw logits.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&v| (v - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|v| v / sum).collect()
}

/// Index of the largest value. Returns 0 for an empty slice.
pub fn argmax(values: &[f32]) -> usize {
    values
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0)
}
