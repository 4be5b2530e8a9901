use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::*;

use zeus_explorer::physics::limits::compute_limit;
use zeus_explorer::run::Simulation;
use zeus_explorer::{BeamConfig, PhysicsEvent};

use crate::views::{beam_color, View, ISR_COLOR};

// Axes are log10 of the physical quantity.
const LOG_X_MIN: f64 = -5.0;
const LOG_X_MAX: f64 = 0.0;
const LOG_Q2_MIN: f64 = 0.0;
const Q2_AXIS_MAX: f64 = 50000.0;

/// Q² versus Bjorken x for the buffered events, with the y = 1 line of each
/// beam configuration.
pub struct KinematicPlane {
    show_limits: bool,
    show_isr: bool,
    // Limit curves never change, so they are computed once in log space.
    limits: Vec<(BeamConfig, Vec<(f64, f64)>)>,
}

impl KinematicPlane {
    pub fn new() -> Self {
        let limits = BeamConfig::all()
            .iter()
            .map(|&beam| {
                let line: Vec<(f64, f64)> = compute_limit(beam)
                    .into_iter()
                    .map(|p| (p.x.log10(), p.q2.log10()))
                    .collect();
                (beam, dashed(&clip_to_top(&line, Q2_AXIS_MAX.log10())))
            })
            .collect();
        Self {
            show_limits: true,
            show_isr: true,
            limits,
        }
    }
}

/// Cut a polyline where it first crosses the horizontal line `top`, ending
/// it exactly on the edge.
fn clip_to_top(line: &[(f64, f64)], top: f64) -> Vec<(f64, f64)> {
    let mut out = Vec::with_capacity(line.len());
    for (i, &(x, y)) in line.iter().enumerate() {
        if y <= top {
            out.push((x, y));
            continue;
        }
        if let Some(&(px, py)) = i.checked_sub(1).and_then(|j| line.get(j)) {
            let t = (top - py) / (y - py);
            out.push((px + t * (x - px), top));
        }
        break;
    }
    out
}

// Dash and gap length, in samples of DASH_STEP decades.
const DASH_RUN: usize = 3;
const DASH_STEP: f64 = 0.03;

/// Resample a polyline and drop every other run of samples.
fn dashed(line: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut out = Vec::new();
    let mut k = 0usize;
    for w in line.windows(2) {
        let ((x0, y0), (x1, y1)) = (w[0], w[1]);
        let steps = (((x1 - x0).hypot(y1 - y0) / DASH_STEP).ceil() as usize).max(1);
        for i in 0..steps {
            if (k / DASH_RUN) % 2 == 0 {
                let t = i as f64 / steps as f64;
                out.push((x0 + t * (x1 - x0), y0 + t * (y1 - y0)));
            }
            k += 1;
        }
    }
    if let Some(&end) = line.last() {
        if (k / DASH_RUN) % 2 == 0 {
            out.push(end);
        }
    }
    out
}

fn to_log_point(e: &PhysicsEvent) -> (f64, f64) {
    (e.x.log10(), e.q2.log10())
}

fn decade_labels(from: i32, to: i32) -> Vec<String> {
    (from..=to).map(|p| format!("1e{}", p)).collect()
}

impl View for KinematicPlane {
    fn update(&mut self, _sim: &Simulation) {}

    fn handle_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('l') | KeyCode::Char('L') => self.show_limits = !self.show_limits,
            KeyCode::Char('g') | KeyCode::Char('G') => self.show_isr = !self.show_isr,
            _ => {}
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, sim: &Simulation) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(100, 180, 255)))
            .title(" The Kinematic Plane (Q² vs x) ")
            .title_style(Style::default().fg(Color::Rgb(120, 200, 255)).add_modifier(Modifier::BOLD));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Legend
                Constraint::Min(8),    // Chart
                Constraint::Length(1), // Help
            ])
            .split(inner);

        let buffer = sim.buffer();
        let standard: Vec<(BeamConfig, Vec<(f64, f64)>)> = BeamConfig::all()
            .iter()
            .map(|&beam| (beam, buffer.standard(beam).map(to_log_point).collect()))
            .collect();
        let radiative: Vec<(f64, f64)> = buffer.radiative().map(to_log_point).collect();

        // Legend with per-series counts
        let mut legend = Vec::new();
        for (beam, points) in &standard {
            legend.push(Span::styled(
                format!("● {} {:.0} GeV ({}) ", beam, beam.proton_energy(), points.len()),
                Style::default().fg(beam_color(*beam)).add_modifier(Modifier::BOLD),
            ));
        }
        legend.push(Span::styled(
            format!("★ ISR ({}){}", radiative.len(), if self.show_isr { "" } else { " hidden" }),
            Style::default().fg(ISR_COLOR).add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(Paragraph::new(Line::from(legend)), chunks[0]);

        let mut datasets = Vec::new();
        if self.show_limits {
            for (beam, points) in &self.limits {
                datasets.push(
                    Dataset::default()
                        .marker(symbols::Marker::Braille)
                        .graph_type(GraphType::Scatter)
                        .style(Style::default().fg(beam_color(*beam)).add_modifier(Modifier::DIM))
                        .data(points),
                );
            }
        }
        for (beam, points) in &standard {
            datasets.push(
                Dataset::default()
                    .marker(symbols::Marker::Dot)
                    .graph_type(GraphType::Scatter)
                    .style(Style::default().fg(beam_color(*beam)))
                    .data(points),
            );
        }
        if self.show_isr {
            datasets.push(
                Dataset::default()
                    .marker(symbols::Marker::Dot)
                    .graph_type(GraphType::Scatter)
                    .style(Style::default().fg(ISR_COLOR))
                    .data(&radiative),
            );
        }

        let chart = Chart::new(datasets)
            .x_axis(
                Axis::default()
                    .title("Bjorken x")
                    .style(Style::default().fg(Color::Rgb(100, 116, 139)))
                    .bounds([LOG_X_MIN, LOG_X_MAX])
                    .labels(decade_labels(-5, 0)),
            )
            .y_axis(
                Axis::default()
                    .title("Q² (GeV²)")
                    .style(Style::default().fg(Color::Rgb(100, 116, 139)))
                    .bounds([LOG_Q2_MIN, Q2_AXIS_MAX.log10()])
                    .labels(decade_labels(0, 4)),
            );
        frame.render_widget(chart, chunks[1]);

        let help = Line::from(vec![
            Span::styled(" L", Style::default().fg(Color::Rgb(80, 200, 255)).add_modifier(Modifier::BOLD)),
            Span::styled(format!(" limits {} ", if self.show_limits { "on" } else { "off" }), Style::default().fg(Color::Rgb(100, 100, 130))),
            Span::styled(" G", Style::default().fg(Color::Rgb(80, 200, 255)).add_modifier(Modifier::BOLD)),
            Span::styled(" ISR series ", Style::default().fg(Color::Rgb(100, 100, 130))),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}/{} events buffered", buffer.len(), buffer.capacity()),
                Style::default().fg(Color::Rgb(100, 100, 130)),
            ),
        ]);
        frame.render_widget(Paragraph::new(help), chunks[2]);
    }

    fn reset(&mut self) {
        self.show_limits = true;
        self.show_isr = true;
    }
}
