use crate::model::{ArtifactLoader, ImageTensor, ScoreError, ScoringFunction};
use std::io::Cursor;
use std::sync::Arc;
use tract_onnx::prelude::*;

type OnnxPlan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Loads ONNX graphs taking a single `[1, S, S, 3]` `f32` input.
pub struct OnnxRepository;

impl ArtifactLoader for OnnxRepository {
    fn deserialize(
        &self,
        bytes: &[u8],
        input_size: u32,
    ) -> Result<Arc<dyn ScoringFunction>, String> {
        let side = input_size as usize;
        let plan = tract_onnx::onnx()
            .model_for_read(&mut Cursor::new(bytes))
            .and_then(|model| model.with_input_fact(0, f32::fact([1, side, side, 3]).into()))
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| format!("{:#}", e))?;
        Ok(Arc::new(OnnxScorer { plan }))
    }
}

struct OnnxScorer {
    plan: OnnxPlan,
}

impl ScoringFunction for OnnxScorer {
    fn score(&self, tensor: &ImageTensor) -> Result<Vec<f32>, ScoreError> {
        let to_score_error = |e: TractError| ScoreError(format!("{:#}", e));

        let input = Tensor::from_shape(&tensor.shape(), tensor.data()).map_err(to_score_error)?;
        let outputs = self.plan.run(tvec!(input.into())).map_err(to_score_error)?;
        let output = outputs
            .first()
            .ok_or_else(|| ScoreError("model produced no outputs".to_string()))?;
        let scores = output
            .to_array_view::<f32>()
            .map_err(to_score_error)?
            .iter()
            .copied()
            .collect();
        Ok(scores)
    }
}
