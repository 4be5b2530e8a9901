use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::info;

use zeus_explorer::run::Simulation;
use zeus_explorer::RunMode;

use crate::views::detector::DetectorDisplay;
use crate::views::plane::KinematicPlane;
use crate::views::View;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Tab {
    Controls,
    Plane,
    Detector,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::Controls, Tab::Plane, Tab::Detector]
    }

    pub fn title(&self) -> &str {
        match self {
            Tab::Controls => " Controls ",
            Tab::Plane => " Kinematic Plane ",
            Tab::Detector => " Detector ",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Controls => 0,
            Tab::Plane => 1,
            Tab::Detector => 2,
        }
    }
}

pub struct App {
    pub should_quit: bool,
    pub current_tab: Tab,
    pub running: bool,
    /// Highlighted run mode tile on the controls tab
    pub selected_mode: usize,
    pub simulation: Simulation,
    pub plane: KinematicPlane,
    pub detector: DetectorDisplay,
}

impl App {
    pub fn new(simulation: Simulation) -> Self {
        let selected_mode = mode_index(simulation.settings().mode);
        Self {
            should_quit: false,
            current_tab: Tab::Controls,
            running: false,
            selected_mode,
            simulation,
            plane: KinematicPlane::new(),
            detector: DetectorDisplay::new(),
        }
    }

    pub fn on_tick(&mut self) {
        if self.running {
            self.simulation.step();
        }
        // Particles keep flying while paused
        self.detector.update(&self.simulation);
        self.plane.update(&self.simulation);
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        // Ctrl+C always quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.prev_tab();
                } else {
                    self.next_tab();
                }
                return;
            }
            KeyCode::BackTab => {
                self.prev_tab();
                return;
            }
            KeyCode::F(n) if (1..=Tab::all().len() as u8).contains(&n) => {
                self.current_tab = Tab::all()[n as usize - 1];
                return;
            }
            KeyCode::Char(' ') => {
                self.running = !self.running;
                info!(running = self.running, "run toggled");
                return;
            }
            KeyCode::Char('1') => { self.select_mode(0); return; }
            KeyCode::Char('2') => { self.select_mode(1); return; }
            KeyCode::Char('3') => { self.select_mode(2); return; }
            KeyCode::Char('4') => { self.select_mode(3); return; }
            KeyCode::Char('i') | KeyCode::Char('I') => {
                let allow = !self.simulation.settings().allow_isr;
                self.simulation.set_allow_isr(allow);
                info!(allow_isr = allow, "ISR toggled");
                return;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.reset();
                return;
            }
            _ => {}
        }

        // Arrow navigation over the run mode tiles
        if matches!(self.current_tab, Tab::Controls) {
            let n = RunMode::all().len();
            match key.code {
                KeyCode::Right | KeyCode::Down => {
                    self.selected_mode = (self.selected_mode + 1) % n;
                    return;
                }
                KeyCode::Left | KeyCode::Up => {
                    self.selected_mode = (self.selected_mode + n - 1) % n;
                    return;
                }
                KeyCode::Enter => {
                    self.select_mode(self.selected_mode);
                    return;
                }
                _ => {}
            }
        }

        // Forward to active view
        match self.current_tab {
            Tab::Controls => {}
            Tab::Plane => self.plane.handle_input(key),
            Tab::Detector => self.detector.handle_input(key),
        }
    }

    fn select_mode(&mut self, idx: usize) {
        let mode = RunMode::all()[idx % RunMode::all().len()];
        self.selected_mode = mode_index(mode);
        if self.simulation.settings().mode != mode {
            self.simulation.set_mode(mode);
            info!(%mode, "beam configuration changed");
        }
    }

    fn reset(&mut self) {
        self.running = false;
        self.simulation.reset();
        self.detector.reset();
        self.plane.reset();
    }

    fn next_tab(&mut self) {
        let tabs = Tab::all();
        let idx = self.current_tab.index();
        self.current_tab = tabs[(idx + 1) % tabs.len()];
    }

    fn prev_tab(&mut self) {
        let tabs = Tab::all();
        let idx = self.current_tab.index();
        self.current_tab = tabs[(idx + tabs.len() - 1) % tabs.len()];
    }
}

fn mode_index(mode: RunMode) -> usize {
    RunMode::all().iter().position(|m| *m == mode).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zeus_explorer::run::RunSettings;

    fn app() -> App {
        App::new(Simulation::seeded(RunSettings::default(), 21))
    }

    fn press(app: &mut App, code: KeyCode) {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn paused_app_generates_nothing() {
        let mut app = app();
        app.on_tick();
        assert_eq!(app.simulation.stats().total_events, 0);
    }

    #[test]
    fn space_runs_and_ticks_generate() {
        let mut app = app();
        press(&mut app, KeyCode::Char(' '));
        assert!(app.running);
        for _ in 0..3 {
            app.on_tick();
        }
        assert!(app.simulation.stats().total_events > 0);
    }

    #[test]
    fn number_keys_select_mode() {
        let mut app = app();
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.simulation.settings().mode, RunMode::Ler);
        assert_eq!(app.selected_mode, 2);
        press(&mut app, KeyCode::Char('4'));
        assert_eq!(app.simulation.settings().mode, RunMode::All);
    }

    #[test]
    fn arrows_then_enter_apply_mode() {
        let mut app = app();
        // Default ALL is the last tile; Right wraps to HER
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.simulation.settings().mode, RunMode::Her);
    }

    #[test]
    fn reset_stops_and_clears() {
        let mut app = app();
        press(&mut app, KeyCode::Char(' '));
        app.on_tick();
        press(&mut app, KeyCode::Char('r'));
        assert!(!app.running);
        assert_eq!(app.simulation.stats().total_events, 0);
    }

    #[test]
    fn isr_toggle_flips_setting() {
        let mut app = app();
        assert!(app.simulation.settings().allow_isr);
        press(&mut app, KeyCode::Char('i'));
        assert!(!app.simulation.settings().allow_isr);
    }

    #[test]
    fn function_keys_jump_to_tabs() {
        let mut app = app();
        press(&mut app, KeyCode::F(3));
        assert_eq!(app.current_tab, Tab::Detector);
        press(&mut app, KeyCode::F(2));
        assert_eq!(app.current_tab, Tab::Plane);
        press(&mut app, KeyCode::F(9));
        assert_eq!(app.current_tab, Tab::Plane);
    }

    #[test]
    fn tabs_wrap_both_ways() {
        let mut app = app();
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.current_tab, Tab::Detector);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.current_tab, Tab::Controls);
    }
}
