use ndarray::Array4;
use std::path::Path;
use std::sync::Arc;
use tract_onnx::prelude::*;

use crate::errors::{ModelLoadError, ServiceError};
use crate::labels::{Emotion, LABEL_COUNT};
use crate::preprocess::{preprocess, INPUT_SHAPE};

/// Anything that can score a preprocessed tensor against the label table.
pub trait Classifier: Send + Sync {
    fn scores(&self, input: &Array4<f32>) -> Result<Vec<f32>, ServiceError>;
}

pub struct OnnxClassifier {
    model: TypedRunnableModel<TypedModel>,
}

impl OnnxClassifier {
    /// Loads and optimizes the model, then runs it once on a blank input so
    /// an incompatible artifact is caught before the server binds.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelLoadError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ModelLoadError::NotFound(path.to_path_buf()));
        }

        let runtime_err = |e: TractError| ModelLoadError::Runtime {
            path: path.to_path_buf(),
            reason: format!("{:#}", e),
        };

        let model = tract_onnx::onnx()
            .model_for_path(path)
            .map_err(runtime_err)?
            .with_input_fact(0, f32::fact(INPUT_SHAPE).into())
            .map_err(runtime_err)?
            .into_optimized()
            .map_err(runtime_err)?
            .into_runnable()
            .map_err(runtime_err)?;

        let classifier = OnnxClassifier { model };
        let warmup = classifier
            .scores(&Array4::zeros(INPUT_SHAPE))
            .map_err(|e| ModelLoadError::Runtime {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        if warmup.len() != LABEL_COUNT {
            return Err(ModelLoadError::OutputArity {
                expected: LABEL_COUNT,
                actual: warmup.len(),
            });
        }

        Ok(classifier)
    }
}

impl Classifier for OnnxClassifier {
    fn scores(&self, input: &Array4<f32>) -> Result<Vec<f32>, ServiceError> {
        let data: Vec<f32> = input.iter().copied().collect();
        let tensor = Tensor::from_shape(input.shape(), &data)
            .map_err(|e| ServiceError::Inference(e.to_string()))?;

        let result = self
            .model
            .run(tvec!(tensor.into()))
            .map_err(|e| ServiceError::Inference(e.to_string()))?;

        let output = result
            .first()
            .ok_or_else(|| ServiceError::Inference("model returned no outputs".to_string()))?
            .to_array_view::<f32>()
            .map_err(|e| ServiceError::Inference(e.to_string()))?;

        Ok(output.iter().copied().collect())
    }
}

/// Index of the highest score. Ties go to the lowest index and NaN never wins.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    if scores.is_empty() {
        return None;
    }
    let mut best = 0;
    for (index, &score) in scores.iter().enumerate().skip(1) {
        if score > scores[best] || (scores[best].is_nan() && !score.is_nan()) {
            best = index;
        }
    }
    Some(best)
}

/// Shared, read-only handle to the loaded model.
#[derive(Clone)]
pub struct Predictor {
    classifier: Arc<dyn Classifier>,
}

impl Predictor {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Predictor { classifier }
    }

    pub fn classify(&self, input: &Array4<f32>) -> Result<Emotion, ServiceError> {
        if input.shape() != INPUT_SHAPE {
            return Err(ServiceError::ShapeMismatch {
                expected: format!("{:?}", INPUT_SHAPE),
                actual: format!("{:?}", input.shape()),
            });
        }

        let scores = self.classifier.scores(input)?;
        if scores.len() != LABEL_COUNT {
            return Err(ServiceError::ShapeMismatch {
                expected: format!("{} scores", LABEL_COUNT),
                actual: format!("{} scores", scores.len()),
            });
        }

        argmax(&scores)
            .and_then(Emotion::from_index)
            .ok_or_else(|| ServiceError::Inference("no class could be selected".to_string()))
    }

    pub fn predict_bytes(&self, bytes: &[u8]) -> Result<Emotion, ServiceError> {
        let input = preprocess(bytes)?;
        self.classify(&input)
    }
}
