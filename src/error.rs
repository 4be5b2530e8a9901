use thiserror::Error;

use crate::physics::BeamConfig;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A run mode string that names no beam configuration.
    #[error("invalid beam configuration: {0:?} (expected HER, MER, LER or ALL)")]
    InvalidBeamConfig(String),

    /// No phase-space sample passed both the y window and the weight test.
    #[error("sampling exhausted after {attempts} attempts ({beam} beam)")]
    SamplingExhausted { attempts: u32, beam: BeamConfig },

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
