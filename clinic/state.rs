use retinoscan::classifier::DEFAULT_CHECKPOINT_PATH;
use retinoscan::log::DEFAULT_LOG_PATH;
use retinoscan::{Classifier, Prediction, PredictionLog, ScanError};
use std::sync::{Arc, Mutex};

// ---------------------------------------------------------------------------
// Fixed working-directory paths
// ---------------------------------------------------------------------------

/// Clinic logo shown in the page header.
pub const LOGO_PATH: &str = "logo.png";
/// Illustration of the four conditions shown next to the logo.
pub const BANNER_PATH: &str = "banner.png";

// ---------------------------------------------------------------------------
// Scan result
// ---------------------------------------------------------------------------

/// One completed detection, kept so the result card can be re-rendered and
/// the uploaded photograph served back at `/scan/image`.
pub struct ScanResult {
    pub image_name:  String,
    pub image_bytes: Vec<u8>,
    pub prediction:  Prediction,
}

// ---------------------------------------------------------------------------
// Flash messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum FlashKind { Success, Error }

#[derive(Debug, Clone)]
pub struct FlashMessage {
    pub kind: FlashKind,
    pub text: String,
}

impl FlashMessage {
    pub fn success(text: impl Into<String>) -> Self {
        FlashMessage { kind: FlashKind::Success, text: text.into() }
    }
    pub fn error(text: impl Into<String>) -> Self {
        FlashMessage { kind: FlashKind::Error, text: text.into() }
    }
}

// ---------------------------------------------------------------------------
// Main state struct
// ---------------------------------------------------------------------------

pub struct ClinicState {
    /// Cached classifier — loaded from the checkpoint on first detection and
    /// reused for every prediction after that.
    classifier:    Option<Classifier>,
    /// Append-only CSV log of all predictions.
    pub log:       PredictionLog,
    /// Most recent successful scan, if any.
    pub last_scan: Option<ScanResult>,
    /// One-shot flash message for the next page render.
    pub flash:     Option<FlashMessage>,
}

impl ClinicState {
    pub fn new() -> Self {
        ClinicState {
            classifier: None,
            log:        PredictionLog::new(DEFAULT_LOG_PATH),
            last_scan:  None,
            flash:      None,
        }
    }

    /// Returns the classifier, loading the checkpoint on first use.
    pub fn classifier(&mut self) -> Result<&Classifier, ScanError> {
        let classifier = match self.classifier.take() {
            Some(c) => c,
            None => Classifier::load(DEFAULT_CHECKPOINT_PATH)?,
        };
        Ok(self.classifier.insert(classifier))
    }

    /// Takes and returns the current flash message, clearing it.
    pub fn take_flash(&mut self) -> Option<FlashMessage> {
        self.flash.take()
    }
}

/// Shared state type — an `Arc<Mutex<ClinicState>>` passed to every handler.
pub type SharedState = Arc<Mutex<ClinicState>>;
