use thiserror::Error;

/// Failures surfaced by the scan pipeline, separated by kind so callers can
/// tell a bad upload apart from a broken deployment.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The checkpoint file is missing, unreadable, or not a valid ONNX graph.
    #[error("failed to load checkpoint from {path}: {reason}")]
    Checkpoint { path: String, reason: String },

    /// The uploaded bytes could not be decoded as an image.
    #[error("could not decode image: {0}")]
    Decode(String),

    /// The loaded graph does not produce the expected number of classes.
    #[error("model output mismatch: expected {expected} classes, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// The forward pass itself failed.
    #[error("inference failed: {0}")]
    Inference(String),

    /// Filesystem failure (prediction log, branding assets).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScanError {
    /// Creates a checkpoint error.
    pub fn checkpoint(path: impl Into<String>, reason: impl Into<String>) -> Self {
        ScanError::Checkpoint { path: path.into(), reason: reason.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkpoint_error_names_the_path() {
        let err = ScanError::checkpoint("eye_disease.onnx", "no such file");
        assert!(err.to_string().contains("eye_disease.onnx"));
        assert!(err.to_string().contains("no such file"));
    }

    #[test]
    fn shape_mismatch_reports_both_sizes() {
        let err = ScanError::ShapeMismatch { expected: 4, actual: 1000 };
        let msg = err.to_string();
        assert!(msg.contains('4') && msg.contains("1000"));
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ScanError = io.into();
        assert!(matches!(err, ScanError::Io(_)));
    }
}
