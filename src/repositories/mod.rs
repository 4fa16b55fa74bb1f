pub mod model_file_repository;
pub mod onnx_repository;
