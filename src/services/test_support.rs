//! Artifact formats used by tests: a JSON array of fixed scores, and a tiny
//! ONNX graph whose scores are the per-channel mean of the image.

use crate::model::{ArtifactLoader, ImageTensor, ScoreError, ScoringFunction};
use prost::Message;
use std::sync::Arc;
use tract_onnx::pb::attribute_proto::AttributeType;
use tract_onnx::pb::tensor_proto::DataType;
use tract_onnx::pb::tensor_shape_proto::{Dimension, dimension};
use tract_onnx::pb::{
    AttributeProto, GraphProto, ModelProto, NodeProto, OperatorSetIdProto, TensorShapeProto,
    TypeProto, ValueInfoProto, type_proto,
};

pub struct FixedScores(pub Vec<f32>);

impl ScoringFunction for FixedScores {
    fn score(&self, _tensor: &ImageTensor) -> Result<Vec<f32>, ScoreError> {
        Ok(self.0.clone())
    }
}

pub struct JsonScoresLoader;

impl ArtifactLoader for JsonScoresLoader {
    fn deserialize(
        &self,
        bytes: &[u8],
        _input_size: u32,
    ) -> Result<Arc<dyn ScoringFunction>, String> {
        let scores: Vec<f32> = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
        Ok(Arc::new(FixedScores(scores)))
    }
}

pub fn scores_artifact(scores: &[f32]) -> Vec<u8> {
    serde_json::to_vec(scores).unwrap()
}

fn float_value(name: &str, dims: &[i64]) -> ValueInfoProto {
    let dim = dims
        .iter()
        .map(|d| Dimension {
            value: Some(dimension::Value::DimValue(*d)),
            ..Default::default()
        })
        .collect();
    ValueInfoProto {
        name: name.to_string(),
        r#type: Some(TypeProto {
            value: Some(type_proto::Value::TensorType(type_proto::Tensor {
                elem_type: DataType::Float as i32,
                shape: Some(TensorShapeProto { dim }),
            })),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// `ReduceMean` over height and width: `[1, S, S, 3]` in, `[1, 3]` out.
pub fn channel_mean_onnx(side: u32) -> Vec<u8> {
    let side = side as i64;
    let node = NodeProto {
        input: vec!["image".to_string()],
        output: vec!["scores".to_string()],
        op_type: "ReduceMean".to_string(),
        attribute: vec![
            AttributeProto {
                name: "axes".to_string(),
                r#type: AttributeType::Ints as i32,
                ints: vec![1, 2],
                ..Default::default()
            },
            AttributeProto {
                name: "keepdims".to_string(),
                r#type: AttributeType::Int as i32,
                i: 0,
                ..Default::default()
            },
        ],
        ..Default::default()
    };
    let model = ModelProto {
        ir_version: 7,
        opset_import: vec![OperatorSetIdProto {
            domain: String::new(),
            version: 13,
        }],
        graph: Some(GraphProto {
            name: "channel_mean".to_string(),
            node: vec![node],
            input: vec![float_value("image", &[1, side, side, 3])],
            output: vec![float_value("scores", &[1, 3])],
            ..Default::default()
        }),
        ..Default::default()
    };
    model.encode_to_vec()
}
