use crate::model::{ClassLabels, ImageTensor, ModelArtifact, PredictionResult};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InferError {
    #[error("Model returned {actual} scores but {expected} class labels are configured")]
    ShapeMismatch { expected: usize, actual: usize },
    #[error("Model computation failed: {0}")]
    ComputationFailed(String),
}

/// Runs `artifact` on `tensor` and names the best-scoring class.
///
/// Ties resolve to the lowest index. Never retries.
pub fn infer(
    tensor: &ImageTensor,
    artifact: &ModelArtifact,
    labels: &ClassLabels,
) -> Result<PredictionResult, InferError> {
    let scores = artifact
        .score(tensor)
        .map_err(|e| InferError::ComputationFailed(e.to_string()))?;

    if scores.len() != labels.len() {
        return Err(InferError::ShapeMismatch {
            expected: labels.len(),
            actual: scores.len(),
        });
    }
    if let Some(index) = scores.iter().position(|v| !v.is_finite()) {
        return Err(InferError::ComputationFailed(format!(
            "non-finite score {} at index {}",
            scores[index], index
        )));
    }

    let predicted = argmax(&scores);
    let label = labels
        .get(predicted)
        .ok_or_else(|| InferError::ComputationFailed("model returned no scores".to_string()))?
        .to_string();

    Ok(PredictionResult {
        label,
        confidence: scores[predicted],
        scores,
    })
}

/// First maximum wins.
fn argmax(scores: &[f32]) -> usize {
    let mut best = 0;
    for (i, score) in scores.iter().enumerate().skip(1) {
        if *score > scores[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ScoreError, ScoringFunction};
    use std::sync::Arc;

    struct Fixed(Vec<f32>);

    impl ScoringFunction for Fixed {
        fn score(&self, _tensor: &ImageTensor) -> Result<Vec<f32>, ScoreError> {
            Ok(self.0.clone())
        }
    }

    struct Failing;

    impl ScoringFunction for Failing {
        fn score(&self, _tensor: &ImageTensor) -> Result<Vec<f32>, ScoreError> {
            Err(ScoreError("out of memory".to_string()))
        }
    }

    fn artifact(scorer: impl ScoringFunction + 'static) -> ModelArtifact {
        ModelArtifact::new("test", Arc::new(scorer))
    }

    fn labels() -> ClassLabels {
        ClassLabels::new(vec![
            "Acne".to_string(),
            "Eczema".to_string(),
            "Psoriasis".to_string(),
        ])
        .unwrap()
    }

    fn tensor() -> ImageTensor {
        ImageTensor::new(2, vec![0.0; 12])
    }

    #[test]
    fn unique_maximum_names_its_class() {
        let result = infer(&tensor(), &artifact(Fixed(vec![0.1, 0.2, 0.7])), &labels()).unwrap();

        assert_eq!(result.label, "Psoriasis");
        assert_eq!(result.confidence, 0.7);
        assert_eq!(result.scores, vec![0.1, 0.2, 0.7]);
    }

    #[test]
    fn exact_tie_picks_first_maximum() {
        let result = infer(&tensor(), &artifact(Fixed(vec![0.7, 0.7, 0.1])), &labels()).unwrap();

        assert_eq!(result.label, "Acne");
        assert_eq!(result.confidence, 0.7);
    }

    #[test]
    fn tie_after_first_index_still_prefers_earliest() {
        let result = infer(&tensor(), &artifact(Fixed(vec![0.1, 0.45, 0.45])), &labels()).unwrap();

        assert_eq!(result.label, "Eczema");
    }

    #[test]
    fn wrong_score_count_is_shape_mismatch() {
        let result = infer(&tensor(), &artifact(Fixed(vec![0.5, 0.5])), &labels());

        assert_eq!(
            result,
            Err(InferError::ShapeMismatch {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn scorer_failure_is_computation_failed() {
        let result = infer(&tensor(), &artifact(Failing), &labels());

        assert_eq!(
            result,
            Err(InferError::ComputationFailed("out of memory".to_string()))
        );
    }

    #[test]
    fn nan_score_is_computation_failed() {
        let result = infer(&tensor(), &artifact(Fixed(vec![0.1, f32::NAN, 0.2])), &labels());

        assert!(matches!(result, Err(InferError::ComputationFailed(_))));
    }
}
