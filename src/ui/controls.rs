use ratatui::prelude::*;
use ratatui::widgets::*;

use zeus_explorer::run::Simulation;
use zeus_explorer::{BeamConfig, RunMode, ELECTRON_ENERGY};

use crate::views::{beam_color, ISR_COLOR};

struct ModeTile {
    key: &'static str,
    mode: RunMode,
    desc: &'static str,
    color: Color,
    border_color: Color,
}

const MODE_TILES: [ModeTile; 4] = [
    ModeTile { key: "1", mode: RunMode::Her, desc: "920 GeV protons", color: Color::Rgb(59, 130, 246), border_color: Color::Rgb(30, 64, 120) },
    ModeTile { key: "2", mode: RunMode::Mer, desc: "575 GeV protons", color: Color::Rgb(34, 197, 94), border_color: Color::Rgb(20, 100, 50) },
    ModeTile { key: "3", mode: RunMode::Ler, desc: "460 GeV protons", color: Color::Rgb(239, 68, 68), border_color: Color::Rgb(120, 35, 35) },
    ModeTile { key: "4", mode: RunMode::All, desc: "Mixed: all runs", color: Color::Rgb(226, 232, 240), border_color: Color::Rgb(71, 85, 105) },
];

fn render_mode_tile(frame: &mut Frame, area: Rect, tile: &ModeTile, highlighted: bool, active: bool) {
    let border_color = if highlighted { Color::Rgb(255, 220, 80) } else { tile.border_color };
    let border_type = if active { BorderType::Double } else { BorderType::Rounded };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 { return; }

    let name_color = if active { Color::Rgb(255, 255, 255) } else { tile.color };
    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("[{}] ", tile.key), Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
            Span::styled(tile.mode.label(), Style::default().fg(name_color).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(Span::styled(tile.desc, Style::default().fg(Color::Rgb(120, 120, 140)))),
    ];
    if active {
        lines.push(Line::from(Span::styled("● active", Style::default().fg(tile.color).add_modifier(Modifier::BOLD))));
    } else if highlighted {
        lines.push(Line::from(Span::styled("▶ Enter to select", Style::default().fg(Color::Rgb(255, 220, 80)))));
    }

    let p = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(p, inner);
}

fn key_line(key: &'static str, what: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("    {:<14}", key), Style::default().fg(Color::Rgb(80, 200, 255))),
        Span::styled(what, Style::default().fg(Color::Rgb(140, 140, 140))),
    ])
}

fn stat_line(label: &'static str, value: String, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<22}", label), Style::default().fg(Color::Rgb(100, 116, 139))),
        Span::styled(value, Style::default().fg(color).add_modifier(Modifier::BOLD)),
    ])
}

pub fn render_controls(frame: &mut Frame, area: Rect, sim: &Simulation, selected_mode: usize) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(55), // Beam controls + statistics
            Constraint::Percentage(45), // Keys + physics notes
        ])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Mode tiles
            Constraint::Length(3), // ISR toggle
            Constraint::Min(8),    // Statistics
        ])
        .split(columns[0]);

    // Run mode tiles
    let tile_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(left[0]);
    let settings = sim.settings();
    for (i, tile) in MODE_TILES.iter().enumerate() {
        render_mode_tile(frame, tile_areas[i], tile, i == selected_mode, tile.mode == settings.mode);
    }

    // ISR toggle
    let (isr_text, isr_style) = if settings.allow_isr {
        ("⚡ ISR enabled   [I] to disable", Style::default().fg(ISR_COLOR).add_modifier(Modifier::BOLD))
    } else {
        ("   ISR disabled  [I] to enable", Style::default().fg(Color::Rgb(100, 116, 139)))
    };
    let isr = Paragraph::new(Line::from(Span::styled(isr_text, isr_style)))
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded).border_style(Style::default().fg(Color::Rgb(51, 65, 85))));
    frame.render_widget(isr, left[1]);

    // Statistics
    let stats = sim.stats();
    let buffer = sim.buffer();
    let mut stat_lines = vec![
        Line::from(""),
        stat_line("Total events", format!("{}", stats.total_events), Color::White),
        stat_line("ISR events", format!("{} ({:.1}%)", stats.isr_events, stats.isr_fraction() * 100.0), ISR_COLOR),
        stat_line("Integrated luminosity", format!("{:.2} pb⁻¹", stats.integrated_luminosity), Color::Rgb(96, 165, 250)),
        stat_line("Exhausted slots", format!("{}", stats.exhausted), Color::Rgb(148, 163, 184)),
        stat_line("Displayed", format!("{}/{}", buffer.len(), buffer.capacity()), Color::Rgb(148, 163, 184)),
        Line::from(""),
    ];
    if let Some(last) = buffer.iter().last() {
        let color = if last.is_isr { ISR_COLOR } else { beam_color(last.beam) };
        stat_lines.push(stat_line(
            "Last event",
            format!("Q² {:.1} GeV²  x {:.2e}  y {:.3}", last.q2, last.x, last.y),
            color,
        ));
        stat_lines.push(stat_line(
            "  √s_eff / E_e",
            format!("{:.1} GeV / {:.1} GeV", last.sqrt_s(), last.effective_electron_energy()),
            color,
        ));
        stat_lines.push(Line::from(""));
    }
    for beam in BeamConfig::all() {
        stat_lines.push(Line::from(vec![
            Span::styled(format!("  {} ", beam), Style::default().fg(beam_color(*beam)).add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("√s = {:.0} GeV", beam.nominal_s().sqrt()),
                Style::default().fg(Color::Rgb(120, 120, 140)),
            ),
        ]));
    }
    let stats_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(51, 65, 85)))
        .title(" Statistics ")
        .title_style(Style::default().fg(Color::Rgb(96, 165, 250)).add_modifier(Modifier::BOLD));
    frame.render_widget(Paragraph::new(stat_lines).block(stats_block), left[2]);

    // Keys and physics notes
    let note = Style::default().fg(Color::Rgb(148, 163, 184));
    let right_lines = vec![
        Line::from(""),
        key_line("Space", "Run / pause"),
        key_line("1 2 3 4", "HER / MER / LER / ALL"),
        key_line("← → Enter", "Pick beam configuration"),
        key_line("I", "Toggle ISR"),
        key_line("R", "Reset run"),
        key_line("Tab / F1-F3", "Switch view"),
        key_line("Q / Esc", "Quit"),
        Line::from(""),
        Line::from(Span::styled("  Physics insight", Style::default().fg(Color::Rgb(226, 232, 240)).add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(format!("  Electrons at {:.1} GeV collide with protons.", ELECTRON_ENERGY), note)),
        Line::from(vec![
            Span::styled("  HER", Style::default().fg(beam_color(BeamConfig::Her)).add_modifier(Modifier::BOLD)),
            Span::styled(" events stay above the highest y = 1 line.", note),
        ]),
        Line::from(vec![
            Span::styled("  MER", Style::default().fg(beam_color(BeamConfig::Mer)).add_modifier(Modifier::BOLD)),
            Span::styled(" and ", note),
            Span::styled("LER", Style::default().fg(beam_color(BeamConfig::Ler)).add_modifier(Modifier::BOLD)),
            Span::styled(" lower the kinematic limit.", note),
        ]),
        Line::from(vec![
            Span::styled("  ISR", Style::default().fg(ISR_COLOR).add_modifier(Modifier::BOLD)),
            Span::styled(" photons carry energy away, so the hard", note),
        ]),
        Line::from(Span::styled("  scatter runs at reduced √s and reaches the", note)),
        Line::from(Span::styled("  region below the nominal HER limit.", note)),
    ];
    let right_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(51, 65, 85)))
        .title(" Beam Controls ")
        .title_style(Style::default().fg(Color::Rgb(96, 165, 250)).add_modifier(Modifier::BOLD));
    frame.render_widget(Paragraph::new(right_lines).block(right_block).wrap(Wrap { trim: false }), columns[1]);
}
