//! Monte Carlo generator for neutral-current DIS events.
//!
//! Events are drawn by rejection sampling over a log-uniform (x, Q²) grid.
//! A quarter of the samples (when enabled) radiate an ISR photon off the
//! incoming electron, which lowers the effective centre-of-mass energy of
//! the hard scatter and pushes the event below the nominal y = 1 line.
//!
//! The generator is a pure function of its inputs: all randomness comes from
//! the caller's RNG and nothing is retained between calls.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use serde::Serialize;

use super::{BeamConfig, RunMode, ELECTRON_ENERGY};
use crate::error::{Error, Result};

pub const MAX_ATTEMPTS: u32 = 100;

pub const Q2_MIN: f64 = 1.0;
pub const Q2_MAX: f64 = 40000.0;
pub const X_MIN: f64 = 1e-5;
pub const X_MAX: f64 = 0.8;

pub const Y_MIN: f64 = 0.005;
pub const Y_MAX: f64 = 0.95;

/// Probability that a sample radiates when ISR is enabled.
pub const ISR_PROBABILITY: f64 = 0.25;
/// Electron energy that always survives the radiation, GeV.
pub const MIN_ELECTRON_ENERGY_AFTER_ISR: f64 = 2.0;

/// One accepted scattering event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhysicsEvent {
    pub id: i64,
    #[serde(rename = "beamEnergy")]
    pub beam: BeamConfig,
    #[serde(rename = "isISR")]
    pub is_isr: bool,
    #[serde(rename = "Q2")]
    pub q2: f64,
    pub x: f64,
    pub y: f64,
    /// Effective centre-of-mass energy squared, GeV².
    pub s: f64,
    #[serde(rename = "E_gamma")]
    pub e_gamma: f64,
    pub detected: bool,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
}

impl PhysicsEvent {
    pub fn sqrt_s(&self) -> f64 {
        self.s.sqrt()
    }

    /// Electron energy entering the hard scatter after radiation.
    pub fn effective_electron_energy(&self) -> f64 {
        ELECTRON_ENERGY - self.e_gamma
    }
}

/// Unnormalized d²σ/dx dQ² ~ (1/Q⁴) · Y₊ · F₂ with the toy F₂ = 0.5 · x^-0.2.
pub fn differential_cross_section(x: f64, q2: f64, y: f64) -> f64 {
    let propagator = 1.0 / q2.powi(2);
    let y_plus = 1.0 + (1.0 - y).powi(2);
    let f2 = 0.5 * x.powf(-0.2);
    propagator * y_plus * f2
}

/// Acceptance weight: the cross section with the propagator flattened out so
/// the log-uniform sampling covers the plane evenly. Not bounded by 1.
pub fn mc_weight(x: f64, q2: f64, y: f64) -> f64 {
    differential_cross_section(x, q2, y) * q2.powi(2)
}

/// Pick the beam for one event. Only `RunMode::All` consumes a draw.
pub fn resolve_beam<R: Rng + ?Sized>(mode: RunMode, rng: &mut R) -> BeamConfig {
    match mode.beam() {
        Some(beam) => beam,
        None => {
            let r: f64 = rng.gen();
            if r < 0.33 {
                BeamConfig::Her
            } else if r < 0.66 {
                BeamConfig::Mer
            } else {
                BeamConfig::Ler
            }
        }
    }
}

fn log_uniform<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    let u: f64 = rng.gen();
    (u * (max.ln() - min.ln()) + min.ln()).exp()
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Generate one event stamped with the current wall-clock time.
pub fn generate<R: Rng + ?Sized>(
    id: i64,
    mode: RunMode,
    allow_isr: bool,
    rng: &mut R,
) -> Result<PhysicsEvent> {
    generate_at(id, mode, allow_isr, rng, now_millis())
}

/// Generate one event with an explicit timestamp. For a given RNG state the
/// result is fully reproducible.
pub fn generate_at<R: Rng + ?Sized>(
    id: i64,
    mode: RunMode,
    allow_isr: bool,
    rng: &mut R,
    timestamp: u64,
) -> Result<PhysicsEvent> {
    let beam = resolve_beam(mode, rng);
    let ep = beam.proton_energy();
    let s_nominal = beam.nominal_s();

    for _ in 0..MAX_ATTEMPTS {
        let q2 = log_uniform(rng, Q2_MIN, Q2_MAX);
        let x = log_uniform(rng, X_MIN, X_MAX);

        let mut s = s_nominal;
        let mut is_isr = false;
        let mut e_gamma = 0.0;

        if allow_isr && rng.gen::<f64>() < ISR_PROBABILITY {
            is_isr = true;
            let z: f64 = rng.gen();
            e_gamma = z * (ELECTRON_ENERGY - MIN_ELECTRON_ENERGY_AFTER_ISR);
            s = 4.0 * (ELECTRON_ENERGY - e_gamma) * ep;
        }

        let y = q2 / (s * x);
        if !(y > Y_MIN && y < Y_MAX) {
            continue;
        }

        let weight = mc_weight(x, q2, y);
        if rng.gen::<f64>() < weight {
            return Ok(PhysicsEvent {
                id,
                beam,
                is_isr,
                q2,
                x,
                y,
                s,
                e_gamma,
                detected: true,
                timestamp,
            });
        }
    }

    Err(Error::SamplingExhausted {
        attempts: MAX_ATTEMPTS,
        beam,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn weight_cancels_propagator() {
        let (x, q2, y): (f64, f64, f64) = (0.01, 250.0, 0.3);
        let expected = (1.0 + 0.7f64.powi(2)) * 0.5 * x.powf(-0.2);
        assert!((mc_weight(x, q2, y) - expected).abs() < 1e-12);
    }

    #[test]
    fn cross_section_falls_with_q2() {
        let low = differential_cross_section(0.01, 10.0, 0.5);
        let high = differential_cross_section(0.01, 100.0, 0.5);
        assert!((low / high - 100.0).abs() < 1e-9);
    }

    #[test]
    fn weight_can_exceed_one() {
        // Small x pushes x^-0.2 well above 2; the weight is left unclamped.
        assert!(mc_weight(1e-5, 10.0, 0.1) > 1.0);
    }

    #[test]
    fn fixed_mode_does_not_draw() {
        let mut rng = StepRng::new(0, 1);
        assert_eq!(resolve_beam(RunMode::Ler, &mut rng), BeamConfig::Ler);
        // A draw would have advanced the counter.
        assert_eq!(rng.gen::<u64>(), 0);
    }

    #[test]
    fn all_mode_buckets() {
        // StepRng(0, 0) always yields 0.0, the HER bucket.
        let mut zeros = StepRng::new(0, 0);
        assert_eq!(resolve_beam(RunMode::All, &mut zeros), BeamConfig::Her);
        // u64::MAX maps to just below 1.0, the LER bucket.
        let mut ones = StepRng::new(u64::MAX, 0);
        assert_eq!(resolve_beam(RunMode::All, &mut ones), BeamConfig::Ler);
    }

    #[test]
    fn exhaustion_is_reported_not_fabricated() {
        // Every draw is 0.0: Q² = 1, x = 1e-5, so y ≈ 0.99 > 0.95 on all attempts.
        let mut rng = StepRng::new(0, 0);
        let err = generate_at(7, RunMode::Her, true, &mut rng, 0).unwrap_err();
        assert!(matches!(
            err,
            Error::SamplingExhausted { attempts: MAX_ATTEMPTS, beam: BeamConfig::Her }
        ));
    }

    #[test]
    fn event_carries_caller_id_and_timestamp() {
        let mut rng = StdRng::seed_from_u64(42);
        let event = generate_at(1234, RunMode::Mer, false, &mut rng, 99).unwrap();
        assert_eq!(event.id, 1234);
        assert_eq!(event.timestamp, 99);
        assert_eq!(event.beam, BeamConfig::Mer);
        assert!(event.detected);
    }

    #[test]
    fn serializes_with_display_field_names() {
        let mut rng = StdRng::seed_from_u64(5);
        let event = generate_at(1, RunMode::Her, false, &mut rng, 0).unwrap();
        let json = serde_json::to_value(event).unwrap();
        assert_eq!(json["beamEnergy"], "HER");
        assert_eq!(json["isISR"], false);
        assert!(json.get("Q2").is_some());
        assert!(json.get("E_gamma").is_some());
    }
}
