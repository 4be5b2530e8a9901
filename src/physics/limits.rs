//! Kinematic limit of the (x, Q²) plane.
//!
//! With Q² = s·x·y and y ≤ 1, the largest reachable Q² at a given x is s·x.
//! The curve is sampled at log-spaced x so it renders as a straight line on
//! log-log axes.

use serde::Serialize;

use super::BeamConfig;

pub const LIMIT_POINTS: usize = 21;
pub const LIMIT_X_MIN: f64 = 1e-5;
pub const LIMIT_X_MAX: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KinematicLimitPoint {
    pub x: f64,
    #[serde(rename = "Q2")]
    pub q2: f64,
}

/// y = 1 boundary for `beam`, ordered by increasing x.
pub fn compute_limit(beam: BeamConfig) -> Vec<KinematicLimitPoint> {
    let s = beam.nominal_s();
    let log_min = LIMIT_X_MIN.log10();
    let log_max = LIMIT_X_MAX.log10();
    let steps = (LIMIT_POINTS - 1) as f64;

    (0..LIMIT_POINTS)
        .map(|i| {
            let log_x = log_min + (i as f64 / steps) * (log_max - log_min);
            let x = 10f64.powf(log_x);
            KinematicLimitPoint { x, q2: s * x }
        })
        .collect()
}
