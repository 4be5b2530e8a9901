use ratatui::prelude::*;
use ratatui::widgets::*;

use zeus_explorer::run::Simulation;

use crate::app::{App, Tab};
use crate::views::ISR_COLOR;

const MUTED: Color = Color::Rgb(100, 116, 139);

/// Right side of the header: run state, beam selection, ISR and event count.
fn status_line(sim: &Simulation, running: bool) -> Line<'static> {
    let settings = sim.settings();
    let state = if running {
        Span::styled(
            " ● RUNNING ",
            Style::default().fg(Color::Rgb(74, 222, 128)).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(" ❚❚ PAUSED ", Style::default().fg(MUTED).add_modifier(Modifier::BOLD))
    };
    let isr = if settings.allow_isr {
        Span::styled("ISR on ", Style::default().fg(ISR_COLOR))
    } else {
        Span::styled("ISR off ", Style::default().fg(MUTED))
    };
    Line::from(vec![
        state,
        Span::styled(format!("{} ", settings.mode), Style::default().fg(Color::White)),
        isr,
        Span::styled(format!("{} ev ", sim.stats().total_events), Style::default().fg(MUTED)),
    ])
    .right_aligned()
}

pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::all()
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let style = if *t == app.current_tab {
                Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Rgb(120, 120, 140))
            };
            Line::from(vec![
                Span::styled(format!("F{}", i + 1), Style::default().fg(Color::Rgb(60, 150, 200))),
                Span::styled(t.title(), style),
            ])
        })
        .collect();

    let header = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
        .title(" ⚛ ZEUS Kinematic Explorer ")
        .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD))
        .title(status_line(&app.simulation, app.running));

    let tabs = Tabs::new(titles)
        .block(header)
        .select(app.current_tab.index())
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .divider(Span::styled("│", Style::default().fg(Color::Rgb(60, 60, 80))));

    frame.render_widget(tabs, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use zeus_explorer::run::RunSettings;
    use zeus_explorer::RunMode;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn status_reflects_run_settings() {
        let settings = RunSettings {
            mode: RunMode::Mer,
            allow_isr: false,
            ..RunSettings::default()
        };
        let mut sim = Simulation::seeded(settings, 3);
        let paused = text(&status_line(&sim, false));
        assert!(paused.contains("PAUSED"));
        assert!(paused.contains("MER"));
        assert!(paused.contains("ISR off"));
        assert!(paused.contains("0 ev"));

        let produced = sim.step().produced;
        let running = text(&status_line(&sim, true));
        assert!(running.contains("RUNNING"));
        assert!(running.contains(&format!("{} ev", produced)));
    }
}
