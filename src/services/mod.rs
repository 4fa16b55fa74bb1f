pub mod classifier_service;
pub mod inference;
pub mod model_registry;
pub mod preprocessor;

#[cfg(test)]
pub mod test_support;
