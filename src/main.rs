// vpcmap - Radial VPC traffic map
// Renders cloud network interfaces and their flows as a chord-style
// diagram in the terminal.

mod app;
mod demo;
mod encode;
mod layout;
mod model;
mod normalize;
mod render;
mod scene;
mod theme;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use app::{event::handle_key_event, AppState, GroupingMode};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use layout::RingConfig;
use ratatui::{backend::CrosstermBackend, Terminal};

#[derive(Parser, Debug)]
#[command(name = "vpcmap", version, about = "Radial VPC traffic map")]
struct Cli {
    /// Snapshot JSON file (groups, interfaces, traffic). Omit to use the
    /// built-in demo data.
    snapshot: Option<PathBuf>,

    /// Initial grouping mode: group, subnet, az, or tag:<key>
    #[arg(short, long, default_value = "group")]
    grouping: GroupingMode,

    /// Base ring radius in layout units
    #[arg(short, long, default_value_t = 300.0)]
    radius: f64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (snapshot, source) = match &cli.snapshot {
        Some(path) => (model::load_snapshot(path)?, Some(path.clone())),
        None => (demo::demo_snapshot(), None),
    };

    let ring = RingConfig {
        base_radius: cli.radius,
        ..RingConfig::default()
    };
    let mut app = AppState::new(snapshot, source, ring);
    if cli.grouping != GroupingMode::Declared {
        app.grouping = cli.grouping;
        app.rebuild_scene();
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        app.maybe_reload();
        terminal.draw(|f| render::draw(f, app))?;

        if !app.running {
            return Ok(());
        }

        if event::poll(app.refresh_config.ui_interval())? {
            if let Event::Key(key) = event::read()? {
                handle_key_event(app, key.code);
            }
        }
    }
}
