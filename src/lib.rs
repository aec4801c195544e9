pub mod classes;
pub mod classifier;
pub mod error;
pub mod log;
pub mod preprocess;

// Convenience re-exports
pub use classes::{DiseaseClass, CLASS_COUNT};
pub use classifier::{Classifier, Prediction};
pub use error::ScanError;
pub use log::PredictionLog;
pub use preprocess::preprocess_image;
