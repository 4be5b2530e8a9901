pub mod detector;
pub mod plane;

use crossterm::event::KeyEvent;
use ratatui::prelude::*;

use zeus_explorer::run::Simulation;
use zeus_explorer::BeamConfig;

/// A display panel fed from the running simulation.
pub trait View {
    /// Advance one animation frame.
    fn update(&mut self, sim: &Simulation);
    fn handle_input(&mut self, key: KeyEvent);
    fn render(&mut self, frame: &mut Frame, area: Rect, sim: &Simulation);
    fn reset(&mut self);
}

pub const ISR_COLOR: Color = Color::Rgb(234, 179, 8);

pub fn beam_color(beam: BeamConfig) -> Color {
    match beam {
        BeamConfig::Her => Color::Rgb(59, 130, 246),
        BeamConfig::Mer => Color::Rgb(34, 197, 94),
        BeamConfig::Ler => Color::Rgb(239, 68, 68),
    }
}
