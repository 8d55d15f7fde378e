//! # Ingestor Module
//!
//! Pose sequence validation and normalization for the swinglab pipeline.
//!
//! - Reject sequences too short to contain a swing
//! - Reject malformed frames (wrong landmark count, non-finite values)
//! - Reject timestamps that do not strictly increase
//! - Clamp visibility into [0, 1]
//! - No smoothing, interpolation or gap filling

use crate::primitives::{LANDMARK_COUNT, MIN_FRAMES};
use crate::types::{Landmark, PoseFrame, PoseSequence, SwingError, VideoInfo};

/// The Ingestor turns raw pose-estimator output into a `PoseSequence`.
///
/// The Ingestor:
/// - Accepts frames exactly as the pose estimator produced them
/// - Validates shape and ordering
/// - Normalizes visibility so downstream stages can trust the range
pub struct Ingestor;

impl Ingestor {
    /// Validate a single frame.
    ///
    /// A frame is valid if:
    /// - The timestamp is finite
    /// - It holds exactly `LANDMARK_COUNT` landmarks
    /// - Every coordinate is finite
    ///
    /// Returns `SwingError::InvalidFrame` if validation fails.
    pub fn validate_frame(index: usize, frame: &PoseFrame) -> Result<(), SwingError> {
        if !frame.timestamp.is_finite() {
            return Err(SwingError::InvalidFrame {
                index,
                reason: format!("timestamp {} is not finite", frame.timestamp),
            });
        }

        if frame.landmarks.len() != LANDMARK_COUNT {
            return Err(SwingError::InvalidFrame {
                index,
                reason: format!(
                    "expected {} landmarks, got {}",
                    LANDMARK_COUNT,
                    frame.landmarks.len()
                ),
            });
        }

        if let Some(position) = frame
            .landmarks
            .iter()
            .position(|lm| !(lm.x.is_finite() && lm.y.is_finite() && lm.z.is_finite()))
        {
            return Err(SwingError::InvalidFrame {
                index,
                reason: format!("landmark {} has a non-finite coordinate", position),
            });
        }

        Ok(())
    }

    /// Clamp every visibility into [0, 1]; NaN becomes 0.
    #[must_use]
    pub fn normalize_frame(frame: PoseFrame) -> PoseFrame {
        let landmarks = frame
            .landmarks
            .into_iter()
            .map(|lm| Landmark {
                visibility: if lm.visibility.is_nan() {
                    0.0
                } else {
                    lm.visibility.clamp(0.0, 1.0)
                },
                ..lm
            })
            .collect();

        PoseFrame::new(frame.timestamp, landmarks)
    }

    /// Build a validated `PoseSequence`.
    ///
    /// # Errors
    /// - `SwingError::InsufficientFrames` if fewer than `MIN_FRAMES` frames
    /// - `SwingError::InvalidFrame` if any frame is malformed or its timestamp
    ///   does not strictly follow the previous one
    pub fn build(frames: Vec<PoseFrame>) -> Result<PoseSequence, SwingError> {
        if frames.len() < MIN_FRAMES {
            return Err(SwingError::InsufficientFrames {
                found: frames.len(),
                required: MIN_FRAMES,
            });
        }

        for (index, frame) in frames.iter().enumerate() {
            Self::validate_frame(index, frame)?;
        }

        for (index, pair) in frames.windows(2).enumerate() {
            if pair[1].timestamp <= pair[0].timestamp {
                return Err(SwingError::InvalidFrame {
                    index: index + 1,
                    reason: format!(
                        "timestamp {} does not follow {}",
                        pair[1].timestamp, pair[0].timestamp
                    ),
                });
            }
        }

        let frames = frames.into_iter().map(Self::normalize_frame).collect();
        Ok(PoseSequence::from_validated(frames))
    }

    /// Reject videos that cannot contain a swing before any pose work is done.
    ///
    /// # Errors
    /// - `SwingError::InvalidVideo` if fps or duration is not a positive number
    /// - `SwingError::InsufficientFrames` if the video has fewer than `MIN_FRAMES` frames
    pub fn precheck_video(info: &VideoInfo) -> Result<(), SwingError> {
        if !info.fps.is_finite() || info.fps <= 0.0 {
            return Err(SwingError::InvalidVideo(format!(
                "fps must be positive, got {}",
                info.fps
            )));
        }

        if !info.duration.is_finite() || info.duration <= 0.0 {
            return Err(SwingError::InvalidVideo(format!(
                "duration must be positive, got {}",
                info.duration
            )));
        }

        if info.frame_count < MIN_FRAMES {
            return Err(SwingError::InsufficientFrames {
                found: info.frame_count,
                required: MIN_FRAMES,
            });
        }

        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
