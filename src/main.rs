mod app;
mod cli;
mod event;
mod logging;
mod ui;
mod views;

use std::io::{self, Write};
use std::process;
use std::time::Duration;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{error, info};

use zeus_explorer::config::Config;
use zeus_explorer::run::{self, Simulation};
use zeus_explorer::Result;

use app::App;
use event::{Event, EventHandler};

fn main() {
    let matches = cli::build_cli().get_matches();
    let headless = matches.get_one::<u64>("headless").copied();

    let cfg = match cli::config_from_matches(&matches) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(2);
        }
    };
    if let Err(e) = logging::init(&cfg, headless.is_some()) {
        eprintln!("{}", e);
        process::exit(2);
    }

    let result = match headless {
        Some(count) => run_headless(&cfg, count),
        None => run_tui(&cfg),
    };
    if let Err(e) = result {
        error!(error = %e, "exiting");
        eprintln!("{}", e);
        process::exit(1);
    }
}

fn simulation(cfg: &Config) -> Simulation {
    let settings = cfg.run_settings();
    match cfg.seed {
        Some(seed) => Simulation::seeded(settings, seed),
        None => Simulation::from_entropy(settings),
    }
}

/// Generate `count` events in batches and print them as JSON lines.
fn run_headless(cfg: &Config, count: u64) -> Result<()> {
    let mut sim = simulation(cfg);
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let stats = run::write_json_lines(&mut sim, count, &mut out)?;

    info!(
        events = stats.total_events,
        isr = stats.isr_events,
        exhausted = stats.exhausted,
        luminosity = stats.integrated_luminosity,
        "headless run complete"
    );
    Ok(())
}

fn run_tui(cfg: &Config) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    info!(mode = %cfg.mode, allow_isr = cfg.allow_isr, seed = ?cfg.seed, "explorer started");
    let mut app = App::new(simulation(cfg));
    let event_handler = EventHandler::new(Duration::from_millis(cfg.tick_ms));
    let result = main_loop(&mut terminal, &mut app, &event_handler);

    // Restore terminal even when the loop failed
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn main_loop<W: Write>(
    terminal: &mut Terminal<CrosstermBackend<W>>,
    app: &mut App,
    event_handler: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        match event_handler.next()? {
            Event::Tick => app.on_tick(),
            Event::Key(key) => app.on_key(key),
            // Redrawn at the top of the loop
            Event::Resize(..) => {}
        }

        if app.should_quit {
            let stats = app.simulation.stats();
            info!(events = stats.total_events, isr = stats.isr_events, "explorer stopped");
            return Ok(());
        }
    }
}
