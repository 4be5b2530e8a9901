use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::canvas::{Canvas, Circle, Line as Segment, Rectangle};
use ratatui::widgets::*;

use zeus_explorer::run::{DetectorHit, Simulation};
use zeus_explorer::BeamConfig;

use crate::views::{beam_color, View, ISR_COLOR};

// Scene coordinates: x to the right (proton direction), y downward, origin
// top-left. Flipped to the canvas' y-up frame when drawn.
const SCENE_W: f64 = 800.0;
const SCENE_H: f64 = 400.0;
const IP_X: f64 = 300.0;
const IP_Y: f64 = 200.0;
const MARGIN: f64 = 100.0;
const TRAIL_STEPS: f64 = 3.0;

const ELECTRON_COLOR: Color = Color::Rgb(239, 68, 68);
const HADRON_COLOR: Color = Color::Rgb(34, 197, 94);
const UNDETECTED_COLOR: Color = Color::Rgb(148, 163, 184);

#[derive(Clone, Copy, PartialEq, Debug)]
enum ParticleKind {
    Electron,
    Hadron,
    Photon,
}

#[derive(Clone, Copy, Debug)]
struct Particle {
    kind: ParticleKind,
    x: f64,
    y: f64,
    dx: f64,
    dy: f64,
    undetected: bool,
}

impl Particle {
    fn color(&self) -> Color {
        match self.kind {
            ParticleKind::Electron => ELECTRON_COLOR,
            ParticleKind::Hadron => HADRON_COLOR,
            ParticleKind::Photon if self.undetected => UNDETECTED_COLOR,
            ParticleKind::Photon => ISR_COLOR,
        }
    }

    fn in_scene(&self) -> bool {
        self.x > -MARGIN && self.x < SCENE_W + MARGIN && self.y > -MARGIN && self.y < SCENE_H + MARGIN
    }
}

/// Forward boost of the hadronic jet; higher proton energy throws it further
/// into the forward (proton) direction.
fn boost_factor(beam: BeamConfig) -> f64 {
    match beam {
        BeamConfig::Her => 4.0,
        BeamConfig::Mer => 3.0,
        BeamConfig::Ler => 2.0,
    }
}

fn spawn(hit: &DetectorHit) -> Vec<Particle> {
    let angle = hit.electron_angle_deg.to_radians();
    let mut out = vec![
        Particle {
            kind: ParticleKind::Electron,
            x: IP_X,
            y: IP_Y,
            dx: angle.cos() * 12.0,
            dy: angle.sin() * 12.0,
            undetected: false,
        },
        Particle {
            kind: ParticleKind::Hadron,
            x: IP_X,
            y: IP_Y,
            dx: -angle.cos() * 8.0 + boost_factor(hit.beam),
            dy: -angle.sin() * 8.0,
            undetected: false,
        },
    ];
    if hit.has_photon {
        // Radiated photons travel down the rear beam line into the PCAL.
        let vis_angle = if hit.photon_detected { 0.0 } else { hit.photon_angle.max(0.1) };
        out.push(Particle {
            kind: ParticleKind::Photon,
            x: IP_X,
            y: IP_Y,
            dx: -15.0 * vis_angle.cos(),
            dy: 15.0 * vis_angle.sin(),
            undetected: !hit.photon_detected,
        });
    }
    out
}

/// Side view of the central detector with the latest event's final state.
pub struct DetectorDisplay {
    particles: Vec<Particle>,
    last_hit: Option<DetectorHit>,
    seen_events: u64,
    show_trails: bool,
}

impl DetectorDisplay {
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
            last_hit: None,
            seen_events: 0,
            show_trails: true,
        }
    }
}

impl View for DetectorDisplay {
    fn update(&mut self, sim: &Simulation) {
        let total = sim.stats().total_events;
        if total < self.seen_events {
            // The run was reset underneath us
            self.particles.clear();
            self.last_hit = None;
        }
        if total != self.seen_events {
            if let Some(hit) = sim.active_hit() {
                self.particles.extend(spawn(hit));
                self.last_hit = Some(*hit);
            }
            self.seen_events = total;
        }

        for p in &mut self.particles {
            p.x += p.dx;
            p.y += p.dy;
        }
        self.particles.retain(Particle::in_scene);
    }

    fn handle_input(&mut self, key: KeyEvent) {
        if let KeyCode::Char('t') | KeyCode::Char('T') = key.code {
            self.show_trails = !self.show_trails;
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, _sim: &Simulation) {
        let mut title = vec![Span::styled(" ZEUS Detector Display ", Style::default().fg(Color::Rgb(148, 163, 184)))];
        if let Some(hit) = self.last_hit {
            title.push(Span::styled(
                format!("RUN: {} ", hit.beam),
                Style::default().fg(beam_color(hit.beam)).add_modifier(Modifier::BOLD),
            ));
            if hit.has_photon {
                title.push(Span::styled(
                    "+ ISR PHOTON ",
                    Style::default().fg(ISR_COLOR).add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK),
                ));
            }
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(51, 65, 85)))
            .title(Line::from(title));

        let particles = &self.particles;
        let show_trails = self.show_trails;
        let flip = |y: f64| SCENE_H - y;

        let canvas = Canvas::default()
            .block(block)
            .background_color(Color::Rgb(2, 6, 23))
            .marker(symbols::Marker::Braille)
            .x_bounds([0.0, SCENE_W])
            .y_bounds([0.0, SCENE_H])
            .paint(move |ctx| {
                // Beam pipe
                ctx.draw(&Segment::new(0.0, flip(IP_Y), SCENE_W, flip(IP_Y), Color::Rgb(71, 85, 105)));
                ctx.print(50.0, flip(180.0), Span::styled("Electron", Style::default().fg(Color::Rgb(71, 85, 105))));
                ctx.print(730.0, flip(180.0), Span::styled("Proton", Style::default().fg(Color::Rgb(71, 85, 105))));

                // Central detector: calorimeter box and inner tracker
                ctx.draw(&Rectangle {
                    x: 260.0,
                    y: flip(300.0),
                    width: 80.0,
                    height: 200.0,
                    color: Color::Rgb(51, 65, 85),
                });
                ctx.draw(&Rectangle {
                    x: 280.0,
                    y: flip(260.0),
                    width: 40.0,
                    height: 120.0,
                    color: Color::Rgb(71, 85, 105),
                });
                ctx.print(245.0, flip(85.0), Span::styled("Central Detector", Style::default().fg(Color::Rgb(59, 130, 246))));

                // Rear luminosity monitor
                ctx.draw(&Rectangle {
                    x: 20.0,
                    y: flip(240.0),
                    width: 20.0,
                    height: 80.0,
                    color: ISR_COLOR,
                });
                ctx.print(15.0, flip(145.0), Span::styled("PCAL", Style::default().fg(ISR_COLOR).add_modifier(Modifier::BOLD)));
                ctx.print(5.0, flip(255.0), Span::styled("Lumi Monitor", Style::default().fg(Color::Rgb(113, 63, 18))));

                ctx.layer();

                ctx.draw(&Circle {
                    x: IP_X,
                    y: flip(IP_Y),
                    radius: 4.0,
                    color: Color::White,
                });

                for p in particles {
                    if show_trails {
                        ctx.draw(&Segment::new(
                            p.x - p.dx * TRAIL_STEPS,
                            flip(p.y - p.dy * TRAIL_STEPS),
                            p.x,
                            flip(p.y),
                            p.color(),
                        ));
                    }
                    let radius = if p.kind == ParticleKind::Photon { 6.0 } else { 3.0 };
                    ctx.draw(&Circle {
                        x: p.x,
                        y: flip(p.y),
                        radius,
                        color: p.color(),
                    });
                }
            });

        frame.render_widget(canvas, area);
    }

    fn reset(&mut self) {
        self.particles.clear();
        self.last_hit = None;
        self.seen_events = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(beam: BeamConfig, has_photon: bool) -> DetectorHit {
        DetectorHit {
            beam,
            electron_angle_deg: 90.0,
            has_photon,
            photon_angle: 0.2,
            photon_detected: true,
        }
    }

    #[test]
    fn photon_only_with_isr() {
        assert_eq!(spawn(&hit(BeamConfig::Her, false)).len(), 2);
        let with_photon = spawn(&hit(BeamConfig::Her, true));
        assert_eq!(with_photon.len(), 3);
        let photon = with_photon[2];
        assert_eq!(photon.kind, ParticleKind::Photon);
        // Detected photons head straight back along the beam line.
        assert!(photon.dx < 0.0);
        assert_eq!(photon.dy, 0.0);
    }

    #[test]
    fn jet_boost_tracks_proton_energy() {
        let her = spawn(&hit(BeamConfig::Her, false))[1];
        let ler = spawn(&hit(BeamConfig::Ler, false))[1];
        assert!(her.dx > ler.dx);
    }

    #[test]
    fn particles_leave_the_scene() {
        let mut p = spawn(&hit(BeamConfig::Mer, false))[0];
        let mut frames = 0;
        while p.in_scene() {
            p.x += p.dx;
            p.y += p.dy;
            frames += 1;
            assert!(frames < 1000);
        }
    }
}
