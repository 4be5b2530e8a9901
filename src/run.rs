//! Run driver: pulls fixed-size batches from the generator once per frame,
//! keeps the most recent events for display and accumulates run statistics.

use std::collections::VecDeque;
use std::io::{self, Write};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::physics::generator::{generate, PhysicsEvent};
use crate::physics::{BeamConfig, RunMode};

pub const DEFAULT_BATCH_SIZE: usize = 5;
pub const DEFAULT_BUFFER_CAPACITY: usize = 800;
/// Largest display buffer a config may ask for.
pub const MAX_BUFFER_CAPACITY: usize = 1_000_000;
/// Integrated luminosity credited per batch, pb⁻¹.
pub const DEFAULT_LUMINOSITY_PER_BATCH: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSettings {
    pub mode: RunMode,
    pub allow_isr: bool,
    pub batch_size: usize,
    pub buffer_capacity: usize,
    pub luminosity_per_batch: f64,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            mode: RunMode::All,
            allow_isr: true,
            batch_size: DEFAULT_BATCH_SIZE,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            luminosity_per_batch: DEFAULT_LUMINOSITY_PER_BATCH,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunStats {
    pub total_events: u64,
    pub isr_events: u64,
    /// Batch slots where the generator gave up.
    pub exhausted: u64,
    /// pb⁻¹
    pub integrated_luminosity: f64,
}

impl RunStats {
    pub fn isr_fraction(&self) -> f64 {
        if self.total_events == 0 {
            0.0
        } else {
            self.isr_events as f64 / self.total_events as f64
        }
    }
}

/// Bounded FIFO of recent events; the oldest is evicted first. Storage grows
/// with use up to the cap.
#[derive(Debug, Clone)]
pub struct EventBuffer {
    events: VecDeque<PhysicsEvent>,
    capacity: usize,
}

impl EventBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::new(),
            capacity,
        }
    }

    pub fn push(&mut self, event: PhysicsEvent) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub fn iter(&self) -> impl Iterator<Item = &PhysicsEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Non-ISR events of one beam configuration.
    pub fn standard(&self, beam: BeamConfig) -> impl Iterator<Item = &PhysicsEvent> {
        self.events.iter().filter(move |e| !e.is_isr && e.beam == beam)
    }

    /// Radiative events of any beam configuration.
    pub fn radiative(&self) -> impl Iterator<Item = &PhysicsEvent> {
        self.events.iter().filter(|e| e.is_isr)
    }
}

/// What the detector display shows for the latest event of a batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorHit {
    pub beam: BeamConfig,
    /// Scattered electron direction, degrees.
    pub electron_angle_deg: f64,
    pub has_photon: bool,
    /// Photon opening angle, radians. Zero without ISR.
    pub photon_angle: f64,
    pub photon_detected: bool,
}

impl DetectorHit {
    pub fn from_event<R: Rng + ?Sized>(event: &PhysicsEvent, rng: &mut R) -> Self {
        let photon_angle = if event.is_isr {
            rng.gen::<f64>() * 0.5
        } else {
            0.0
        };
        Self {
            beam: event.beam,
            electron_angle_deg: 10.0 + event.y * 160.0,
            has_photon: event.is_isr,
            photon_angle,
            photon_detected: event.detected,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub produced: usize,
    pub isr: usize,
    pub exhausted: usize,
}

pub struct Simulation {
    settings: RunSettings,
    rng: StdRng,
    buffer: EventBuffer,
    stats: RunStats,
    active_hit: Option<DetectorHit>,
}

impl Simulation {
    pub fn new(settings: RunSettings, rng: StdRng) -> Self {
        Self {
            buffer: EventBuffer::new(settings.buffer_capacity),
            settings,
            rng,
            stats: RunStats::default(),
            active_hit: None,
        }
    }

    pub fn seeded(settings: RunSettings, seed: u64) -> Self {
        Self::new(settings, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(settings: RunSettings) -> Self {
        Self::new(settings, StdRng::from_entropy())
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn buffer(&self) -> &EventBuffer {
        &self.buffer
    }

    pub fn active_hit(&self) -> Option<&DetectorHit> {
        self.active_hit.as_ref()
    }

    pub fn set_mode(&mut self, mode: RunMode) {
        self.settings.mode = mode;
    }

    pub fn set_allow_isr(&mut self, allow_isr: bool) {
        self.settings.allow_isr = allow_isr;
    }

    /// Run one batch. Exhausted slots are skipped; the next batch retries.
    pub fn step(&mut self) -> BatchReport {
        self.step_with(|_| {})
    }

    /// Like [`Simulation::step`], handing each produced event to `sink`.
    pub fn step_with<F: FnMut(&PhysicsEvent)>(&mut self, sink: F) -> BatchReport {
        self.step_slots(self.settings.batch_size, sink)
    }

    /// Run a batch of `slots` generator calls instead of the configured
    /// batch size. Luminosity is credited pro rata.
    pub fn step_slots<F: FnMut(&PhysicsEvent)>(
        &mut self,
        slots: usize,
        mut sink: F,
    ) -> BatchReport {
        let mut report = BatchReport::default();
        let mut last = None;

        for i in 0..slots {
            let id = (self.stats.total_events + report.produced as u64) as i64;
            match generate(id, self.settings.mode, self.settings.allow_isr, &mut self.rng) {
                Ok(event) => {
                    report.produced += 1;
                    if event.is_isr {
                        report.isr += 1;
                    }
                    sink(&event);
                    self.buffer.push(event);
                    last = Some(event);
                }
                Err(Error::SamplingExhausted { attempts, beam }) => {
                    debug!(slot = i, attempts, %beam, "generator exhausted, skipping slot");
                    report.exhausted += 1;
                }
                Err(e) => {
                    debug!(slot = i, error = %e, "generator failed, skipping slot");
                    report.exhausted += 1;
                }
            }
        }

        if let Some(event) = last {
            self.active_hit = Some(DetectorHit::from_event(&event, &mut self.rng));
        }

        self.stats.total_events += report.produced as u64;
        self.stats.isr_events += report.isr as u64;
        self.stats.exhausted += report.exhausted as u64;
        let share = slots as f64 / self.settings.batch_size.max(1) as f64;
        self.stats.integrated_luminosity += self.settings.luminosity_per_batch * share;

        trace!(
            produced = report.produced,
            isr = report.isr,
            exhausted = report.exhausted,
            total = self.stats.total_events,
            "batch complete"
        );
        report
    }

    /// Clear statistics, buffered events and the active hit. Settings and the
    /// RNG stream are kept.
    pub fn reset(&mut self) {
        debug!(total = self.stats.total_events, "run reset");
        self.stats = RunStats::default();
        self.buffer.clear();
        self.active_hit = None;
    }
}

/// Generate exactly `count` events and write each as one JSON line. The last
/// batch is cut short so nothing is generated that is not written. Returns
/// the statistics of this export alone.
pub fn write_json_lines<W: Write>(
    sim: &mut Simulation,
    count: u64,
    out: &mut W,
) -> Result<RunStats> {
    let start = *sim.stats();
    let batch = sim.settings().batch_size.max(1) as u64;
    let mut written = 0u64;

    while written < count {
        let slots = (count - written).min(batch) as usize;
        let mut write_err = None;
        let report = sim.step_slots(slots, |event| {
            if write_err.is_some() {
                return;
            }
            let line = serde_json::to_string(event)
                .map_err(io::Error::from)
                .and_then(|json| writeln!(out, "{}", json));
            if let Err(e) = line {
                write_err = Some(e);
            }
        });
        if let Some(e) = write_err {
            return Err(e.into());
        }
        written += report.produced as u64;
    }
    out.flush()?;

    let end = sim.stats();
    Ok(RunStats {
        total_events: end.total_events - start.total_events,
        isr_events: end.isr_events - start.isr_events,
        exhausted: end.exhausted - start.exhausted,
        integrated_luminosity: end.integrated_luminosity - start.integrated_luminosity,
    })
}
