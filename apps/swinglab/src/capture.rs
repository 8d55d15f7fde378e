//! # Capture Files
//!
//! JSON pose captures written by an external pose estimator:
//!
//! ```json
//! {
//!   "frames": [ { "timestamp": 0.0, "landmarks": [ { "x": 0.5, "y": 0.4, "z": 0.0, "visibility": 0.9 }, ... ] }, ... ],
//!   "video": { "frame_count": 90, "fps": 30.0, "duration": 3.0 }
//! }
//! ```
//!
//! `video` is optional; when present it is pre-checked before analysis.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use swinglab_core::{Ingestor, PoseFrame, SwingError, VideoInfo};

// =============================================================================
// LIMITS
// =============================================================================

/// Maximum capture file size (100 MB).
///
/// This prevents memory exhaustion from malicious or accidental large files.
pub const MAX_CAPTURE_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Maximum number of frames accepted from one capture.
pub const MAX_CAPTURE_FRAMES: usize = 100_000;

/// Maximum configuration file size (1 MB).
pub const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// One pose capture as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureFile {
    pub frames: Vec<PoseFrame>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoInfo>,
}

impl CaptureFile {
    /// Frames ready for analysis, after the video pre-check if metadata is present.
    pub fn into_frames(self) -> Result<Vec<PoseFrame>, SwingError> {
        if let Some(video) = &self.video {
            Ingestor::precheck_video(video)?;
        }
        Ok(self.frames)
    }
}

// =============================================================================
// FILE VALIDATION
// =============================================================================

/// Validate file path for security.
///
/// Canonicalizes the path (resolving symlinks and "..") and ensures it is a
/// regular file.
pub fn validate_file_path(path: &Path) -> Result<PathBuf, SwingError> {
    let canonical = path.canonicalize().map_err(|e| {
        SwingError::Io(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(SwingError::Io(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Validate file size before reading.
pub fn validate_file_size(path: &Path, max_size: u64) -> Result<(), SwingError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| SwingError::Io(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(SwingError::Io(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Read a file after path and size validation.
pub fn read_validated(path: &Path, max_size: u64) -> Result<Vec<u8>, SwingError> {
    let validated = validate_file_path(path)?;
    validate_file_size(&validated, max_size)?;
    std::fs::read(&validated).map_err(|e| SwingError::Io(format!("Read file: {}", e)))
}

// =============================================================================
// LOADING
// =============================================================================

/// Parse a capture from JSON bytes.
pub fn parse_capture(contents: &[u8]) -> Result<CaptureFile, SwingError> {
    let capture: CaptureFile = serde_json::from_slice(contents)
        .map_err(|e| SwingError::Serialization(format!("Invalid capture JSON: {}", e)))?;

    if capture.frames.len() > MAX_CAPTURE_FRAMES {
        return Err(SwingError::Serialization(format!(
            "Frame count {} exceeds maximum allowed {}",
            capture.frames.len(),
            MAX_CAPTURE_FRAMES
        )));
    }

    Ok(capture)
}

/// Load a capture file.
pub fn load_capture(path: &Path) -> Result<CaptureFile, SwingError> {
    tracing::info!("Loading capture from {:?}", path);
    let contents = read_validated(path, MAX_CAPTURE_FILE_SIZE)?;
    parse_capture(&contents)
}

/// Load a capture for a batch slot.
///
/// Read and parse failures are reported as upstream acquisition failures so
/// they occupy the slot like any other pose-estimator failure.
pub fn acquire_frames(path: &Path) -> Result<Vec<PoseFrame>, SwingError> {
    let capture = load_capture(path).map_err(|e| {
        SwingError::UpstreamAcquisition(format!("{}: {}", path.display(), e))
    })?;
    capture.into_frames()
}
