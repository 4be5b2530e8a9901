pub mod controls;
pub mod tabs;

use ratatui::prelude::*;

use crate::app::{App, Tab};
use crate::views::View;

pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),    // Content
        ])
        .split(frame.area());

    tabs::render_tabs(frame, app, chunks[0]);

    match app.current_tab {
        Tab::Controls => controls::render_controls(frame, chunks[1], &app.simulation, app.selected_mode),
        Tab::Plane => app.plane.render(frame, chunks[1], &app.simulation),
        Tab::Detector => app.detector.render(frame, chunks[1], &app.simulation),
    }
}
