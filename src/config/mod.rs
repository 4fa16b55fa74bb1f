#[allow(clippy::module_inception)]
pub mod config;
pub mod input_size;
