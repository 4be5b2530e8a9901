//! HERA beam model: the fixed electron beam and the three proton running
//! configurations used for the low/medium/high energy runs.

pub mod generator;
pub mod limits;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;

/// Electron beam energy in GeV, shared by every run configuration.
pub const ELECTRON_ENERGY: f64 = 27.5;

/// Proton beam configuration of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BeamConfig {
    #[serde(rename = "HER")]
    Her,
    #[serde(rename = "MER")]
    Mer,
    #[serde(rename = "LER")]
    Ler,
}

impl BeamConfig {
    pub fn all() -> &'static [BeamConfig] {
        &[BeamConfig::Her, BeamConfig::Mer, BeamConfig::Ler]
    }

    /// Proton beam energy in GeV.
    pub fn proton_energy(&self) -> f64 {
        match self {
            BeamConfig::Her => 920.0,
            BeamConfig::Mer => 575.0,
            BeamConfig::Ler => 460.0,
        }
    }

    /// Centre-of-mass energy squared at the nominal electron energy, GeV².
    pub fn nominal_s(&self) -> f64 {
        4.0 * ELECTRON_ENERGY * self.proton_energy()
    }

    pub fn label(&self) -> &'static str {
        match self {
            BeamConfig::Her => "HER",
            BeamConfig::Mer => "MER",
            BeamConfig::Ler => "LER",
        }
    }
}

impl fmt::Display for BeamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Beam selector for a run: one configuration, or `All` to mix the three
/// with equal probability per event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RunMode {
    #[serde(rename = "HER")]
    Her,
    #[serde(rename = "MER")]
    Mer,
    #[serde(rename = "LER")]
    Ler,
    #[serde(rename = "ALL")]
    All,
}

impl RunMode {
    pub fn all() -> &'static [RunMode] {
        &[RunMode::Her, RunMode::Mer, RunMode::Ler, RunMode::All]
    }

    pub fn label(&self) -> &'static str {
        match self {
            RunMode::Her => "HER",
            RunMode::Mer => "MER",
            RunMode::Ler => "LER",
            RunMode::All => "ALL",
        }
    }

    /// The fixed beam for single-configuration modes, `None` for `All`.
    pub fn beam(&self) -> Option<BeamConfig> {
        match self {
            RunMode::Her => Some(BeamConfig::Her),
            RunMode::Mer => Some(BeamConfig::Mer),
            RunMode::Ler => Some(BeamConfig::Ler),
            RunMode::All => None,
        }
    }
}

impl From<BeamConfig> for RunMode {
    fn from(beam: BeamConfig) -> Self {
        match beam {
            BeamConfig::Her => RunMode::Her,
            BeamConfig::Mer => RunMode::Mer,
            BeamConfig::Ler => RunMode::Ler,
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RunMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HER" => Ok(RunMode::Her),
            "MER" => Ok(RunMode::Mer),
            "LER" => Ok(RunMode::Ler),
            "ALL" => Ok(RunMode::All),
            _ => Err(Error::InvalidBeamConfig(s.to_string())),
        }
    }
}

// Same spellings as the `--mode` flag.
impl<'de> Deserialize<'de> for RunMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nominal_s_matches_beam_energies() {
        assert_eq!(BeamConfig::Her.nominal_s(), 4.0 * 27.5 * 920.0);
        assert_eq!(BeamConfig::Mer.nominal_s(), 4.0 * 27.5 * 575.0);
        assert_eq!(BeamConfig::Ler.nominal_s(), 4.0 * 27.5 * 460.0);
    }

    #[test]
    fn run_mode_parses_case_insensitively() {
        assert_eq!("her".parse::<RunMode>().unwrap(), RunMode::Her);
        assert_eq!(" Mer ".parse::<RunMode>().unwrap(), RunMode::Mer);
        assert_eq!("LER".parse::<RunMode>().unwrap(), RunMode::Ler);
        assert_eq!("all".parse::<RunMode>().unwrap(), RunMode::All);
    }

    #[test]
    fn run_mode_deserializes_like_it_parses() {
        let modes: Vec<RunMode> = serde_json::from_str(r#"["her", "Mer", "LER", " all "]"#).unwrap();
        assert_eq!(modes, RunMode::all());
        assert!(serde_json::from_str::<RunMode>(r#""XER""#).is_err());
        assert_eq!(serde_json::to_string(&RunMode::Ler).unwrap(), r#""LER""#);
    }

    #[test]
    fn unknown_run_mode_fails_fast() {
        let err = "XER".parse::<RunMode>().unwrap_err();
        assert!(matches!(err, Error::InvalidBeamConfig(ref s) if s == "XER"));
    }

    #[test]
    fn single_modes_map_to_their_beam() {
        for beam in BeamConfig::all() {
            assert_eq!(RunMode::from(*beam).beam(), Some(*beam));
        }
        assert_eq!(RunMode::All.beam(), None);
    }
}
