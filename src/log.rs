//! Append-only CSV log of predictions.
//!
//! One row per successful prediction: the uploaded filename and the detected
//! label. The file is created lazily with a header row on first append and
//! grows without bound; rotation and dedup are deliberately out of scope.
//! Callers that share a log across threads must serialize appends themselves
//! (the clinic holds it behind its state mutex).

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::classes::DiseaseClass;
use crate::error::ScanError;

/// Header row written when the log file is first created.
pub const LOG_HEADER: &str = "Image Name,Detected Disease";

/// Default log path, resolved against the working directory.
pub const DEFAULT_LOG_PATH: &str = "predictions.csv";

/// Handle to the prediction log file.
pub struct PredictionLog {
    path: PathBuf,
}

impl PredictionLog {
    pub fn new(path: impl Into<PathBuf>) -> PredictionLog {
        PredictionLog { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether any prediction has been logged yet.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Appends one `(filename, label)` row, writing the header first when the
    /// file does not exist yet.
    pub fn append(&self, image_name: &str, class: DiseaseClass) -> Result<(), ScanError> {
        let write_header = !self.path.exists();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        if write_header {
            writeln!(file, "{}", LOG_HEADER)?;
        }
        writeln!(file, "{},{}", csv_field(image_name), csv_field(class.name()))?;
        Ok(())
    }

    /// Reads the whole log back, for the download endpoint.
    pub fn read(&self) -> Result<String, ScanError> {
        Ok(std::fs::read_to_string(&self.path)?)
    }
}

/// Quotes a field when it contains a comma, quote, or newline; embedded
/// quotes are doubled per CSV convention.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Unique scratch path so parallel tests do not collide.
    fn scratch_path(tag: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("retinoscan_log_{}_{}.csv", std::process::id(), tag));
        let _ = std::fs::remove_file(&path);
        path
    }

    #[test]
    fn first_append_creates_header() {
        let path = scratch_path("header");
        let log = PredictionLog::new(&path);
        assert!(!log.exists());

        log.append("left_eye.jpg", DiseaseClass::Cataract).unwrap();
        let contents = log.read().unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines, [LOG_HEADER, "left_eye.jpg,cataract"]);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn n_appends_give_n_plus_one_lines() {
        let path = scratch_path("growth");
        let log = PredictionLog::new(&path);

        for (i, class) in DiseaseClass::ALL.iter().enumerate() {
            log.append(&format!("scan_{}.png", i), *class).unwrap();
        }
        let contents = log.read().unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), DiseaseClass::ALL.len() + 1);
        for line in &lines {
            assert_eq!(line.split(',').count(), 2, "row should have 2 fields: {}", line);
        }

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn header_is_written_only_once() {
        let path = scratch_path("once");
        let log = PredictionLog::new(&path);
        log.append("a.jpg", DiseaseClass::Normal).unwrap();
        log.append("b.jpg", DiseaseClass::Glaucoma).unwrap();

        let contents = log.read().unwrap();
        assert_eq!(contents.matches(LOG_HEADER).count(), 1);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn awkward_filenames_are_quoted() {
        let path = scratch_path("quoting");
        let log = PredictionLog::new(&path);
        log.append("left, right.jpg", DiseaseClass::Normal).unwrap();
        log.append("she said \"look\".png", DiseaseClass::Cataract).unwrap();

        let contents = log.read().unwrap();
        assert!(contents.contains("\"left, right.jpg\",normal"));
        assert!(contents.contains("\"she said \"\"look\"\".png\",cataract"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn plain_fields_are_not_quoted() {
        assert_eq!(csv_field("scan.jpg"), "scan.jpg");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
    }
}
