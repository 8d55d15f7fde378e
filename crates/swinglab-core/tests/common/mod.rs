//! Synthetic swing captures shared by unit tests, integration tests and benches.
//!
//! Unit tests reach this file through `crate::testing`; integration tests and
//! benches include it as `mod common`.

#![allow(dead_code)]

use swinglab_core::primitives::{
    LANDMARK_COUNT, LEFT_ANKLE, LEFT_HIP, LEFT_SHOULDER, LEFT_WRIST, RIGHT_ANKLE, RIGHT_HIP,
    RIGHT_SHOULDER, RIGHT_WRIST,
};
use swinglab_core::{Landmark, PoseFrame};

const ARM_LENGTH: f64 = 0.3;
const TOP_ANGLE: f64 = 2.4;
const FINISH_ANGLE: f64 = -2.0;

/// Club-arm angle (radians from hanging) for frame `k` of an `n`-frame swing.
fn arm_angle(k: usize, n: usize) -> f64 {
    let address_end = n / 5;
    let top = (n as f64 * 0.55).round() as usize;
    let impact = (n as f64 * 0.7).round() as usize;
    let k_f = k as f64;

    if k <= address_end {
        0.0
    } else if k <= top {
        TOP_ANGLE * (k_f - address_end as f64) / (top - address_end) as f64
    } else if k <= impact {
        let s = (k_f - top as f64) / (impact - top) as f64;
        TOP_ANGLE * (1.0 - s * s)
    } else {
        let r = (k_f - impact as f64) / (n - 1 - impact) as f64;
        FINISH_ANGLE * (1.0 - (1.0 - r) * (1.0 - r))
    }
}

/// Right-handed swing sampled at 30 fps with a clear wrist-speed peak at 70%
/// of the capture.
///
/// For 40 frames the segmenter finds impact at frame 28, giving a backswing
/// of 18 frames and a downswing of 3 (tempo ratio 6.0 before clamping).
pub fn swing(n: usize, visibility: f64) -> Vec<PoseFrame> {
    let impact = (n as f64 * 0.7).round() as usize;
    let top = (n as f64 * 0.55).round() as usize;

    (0..n)
        .map(|k| {
            let theta = arm_angle(k, n);
            let shoulder_turn = theta * 0.4;
            let hip_turn = theta * 0.3;
            let shift = if k <= top {
                0.0
            } else {
                0.06 * ((k - top) as f64 / (impact - top) as f64).min(1.0)
            };

            let mut landmarks = vec![Landmark::new(0.5, 0.5, 0.0, visibility); LANDMARK_COUNT];
            let (sc, ss) = (shoulder_turn.cos(), shoulder_turn.sin());
            landmarks[LEFT_SHOULDER] = Landmark::new(0.5 - 0.1 * sc, 0.35, -0.1 * ss, visibility);
            landmarks[RIGHT_SHOULDER] = Landmark::new(0.5 + 0.1 * sc, 0.35, 0.1 * ss, visibility);

            let (hc, hs) = (hip_turn.cos(), hip_turn.sin());
            let hip_x = 0.5 + shift;
            landmarks[LEFT_HIP] = Landmark::new(hip_x - 0.08 * hc, 0.6, -0.08 * hs, visibility);
            landmarks[RIGHT_HIP] = Landmark::new(hip_x + 0.08 * hc, 0.6, 0.08 * hs, visibility);

            let wrist = Landmark::new(
                0.5 + ARM_LENGTH * theta.sin(),
                0.35 + ARM_LENGTH * theta.cos(),
                0.0,
                visibility,
            );
            landmarks[RIGHT_WRIST] = wrist;
            landmarks[LEFT_WRIST] = Landmark { x: wrist.x - 0.02, ..wrist };

            landmarks[LEFT_ANKLE] = Landmark::new(0.4, 0.95, 0.0, visibility);
            landmarks[RIGHT_ANKLE] = Landmark::new(0.6, 0.95, 0.0, visibility);

            PoseFrame::new(k as f64 / 30.0, landmarks)
        })
        .collect()
}

/// Frames where every landmark sits still at the same point.
pub fn still(n: usize, visibility: f64) -> Vec<PoseFrame> {
    (0..n)
        .map(|k| PoseFrame::uniform(k as f64 / 30.0, Landmark::new(0.5, 0.5, 0.0, visibility)))
        .collect()
}
