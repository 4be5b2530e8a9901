use serde_json::Value;
use zeus_explorer::run::{write_json_lines, RunSettings, Simulation};
use zeus_explorer::{BeamConfig, RunMode};

/// The display buffer never grows past its capacity and keeps the newest ids.
#[test]
fn buffer_keeps_most_recent_events() {
    let settings = RunSettings {
        buffer_capacity: 40,
        ..RunSettings::default()
    };
    let mut sim = Simulation::seeded(settings, 4);
    for _ in 0..50 {
        sim.step();
        assert!(sim.buffer().len() <= 40);
    }
    let total = sim.stats().total_events as i64;
    let ids: Vec<i64> = sim.buffer().iter().map(|e| e.id).collect();
    assert_eq!(ids.len(), 40);
    assert_eq!(*ids.last().unwrap(), total - 1);
    assert!(ids.windows(2).all(|w| w[1] == w[0] + 1));
}

#[test]
fn stats_track_batches() {
    let mut sim = Simulation::seeded(RunSettings::default(), 12);
    let mut produced = 0u64;
    let mut isr = 0u64;
    for _ in 0..100 {
        let report = sim.step();
        assert_eq!(report.produced + report.exhausted, 5);
        produced += report.produced as u64;
        isr += report.isr as u64;
    }
    let stats = sim.stats();
    assert_eq!(stats.total_events, produced);
    assert_eq!(stats.isr_events, isr);
    assert!((stats.integrated_luminosity - 1.0).abs() < 1e-9);
    assert!(stats.isr_fraction() > 0.0 && stats.isr_fraction() < 1.0);
}

#[test]
fn mode_switch_applies_to_next_batch() {
    let mut sim = Simulation::seeded(RunSettings::default(), 6);
    sim.step();
    sim.set_mode(RunMode::Ler);
    sim.set_allow_isr(false);
    sim.reset();
    for _ in 0..20 {
        sim.step();
    }
    assert!(sim.buffer().iter().all(|e| e.beam == BeamConfig::Ler && !e.is_isr));
    assert_eq!(sim.buffer().standard(BeamConfig::Ler).count(), sim.buffer().len());
}

#[test]
fn seeded_runs_match() {
    let run = || {
        let mut sim = Simulation::seeded(RunSettings::default(), 123);
        for _ in 0..30 {
            sim.step();
        }
        sim.buffer()
            .iter()
            .map(|e| (e.id, e.beam, e.is_isr, e.q2, e.x, e.y, e.s, e.e_gamma))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn step_with_sees_every_produced_event() {
    let mut sim = Simulation::seeded(RunSettings::default(), 55);
    let mut seen = Vec::new();
    let report = sim.step_with(|e| seen.push(e.id));
    assert_eq!(seen.len(), report.produced);
    let buffered: Vec<i64> = sim.buffer().iter().map(|e| e.id).collect();
    assert_eq!(seen, buffered);
}

#[test]
fn detector_hit_follows_last_event() {
    let mut sim = Simulation::seeded(RunSettings::default(), 17);
    sim.step();
    let last = *sim.buffer().iter().last().unwrap();
    let hit = sim.active_hit().unwrap();
    assert_eq!(hit.beam, last.beam);
    assert_eq!(hit.has_photon, last.is_isr);
    assert!((hit.electron_angle_deg - (10.0 + 160.0 * last.y)).abs() < 1e-9);
}

fn export(count: u64, seed: u64) -> (Vec<Value>, zeus_explorer::run::RunStats, Simulation) {
    let mut sim = Simulation::seeded(RunSettings::default(), seed);
    let mut out = Vec::new();
    let stats = write_json_lines(&mut sim, count, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    (lines, stats, sim)
}

/// A count that is not a whole number of batches stops mid-batch.
#[test]
fn json_export_writes_exactly_count_lines() {
    for count in [0u64, 3, 5, 13] {
        let (lines, stats, sim) = export(count, 8);
        assert_eq!(lines.len() as u64, count);
        assert_eq!(stats.total_events, count);
        assert_eq!(sim.stats().total_events, count);
        let ids: Vec<i64> = lines.iter().map(|v| v["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, (0..count as i64).collect::<Vec<_>>());
    }
}

#[test]
fn json_export_uses_wire_field_names() {
    let (lines, _, _) = export(20, 2);
    for line in &lines {
        let obj = line.as_object().unwrap();
        for key in ["id", "beamEnergy", "isISR", "Q2", "x", "y", "s", "E_gamma", "detected", "timestamp"] {
            assert!(obj.contains_key(key), "missing {} in {}", key, line);
        }
        let beam = obj["beamEnergy"].as_str().unwrap();
        assert!(["HER", "MER", "LER"].contains(&beam));
    }
}

#[test]
fn json_export_stats_match_printed_events() {
    let (lines, stats, _) = export(3, 41);
    let isr = lines.iter().filter(|v| v["isISR"].as_bool().unwrap()).count() as u64;
    assert_eq!(stats.total_events, 3);
    assert_eq!(stats.isr_events, isr);
    // Three of five slots: 60% of a batch worth of luminosity.
    assert!((stats.integrated_luminosity - 0.006).abs() < 1e-12);
}
