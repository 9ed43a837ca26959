mod app;
mod config;
mod hass;
mod ui;
mod view_model;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::App;
use config::CardConfig;
use hass::HostBridge;

#[derive(Parser, Debug)]
#[command(name = "clima")]
#[command(about = "TUI climate dashboard card fed by a home-automation host")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(long, default_value = "~/.config/clima-card/config.toml")]
    config: String,

    /// Override the host snapshot file named in the configuration
    #[arg(long)]
    states: Option<PathBuf>,

    /// Override the host action file named in the configuration
    #[arg(long)]
    actions: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clima_card=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    // Load the card configuration; a mapping without entities is rejected here
    let mut config = CardConfig::load(&cli.config)?;
    if let Some(states) = cli.states {
        config.host.states_file = states;
    }
    if let Some(actions) = cli.actions {
        config.host.actions_file = actions;
    }

    let mut host = HostBridge::new(&config.host);
    let mut app = App::new(config);

    // Pick up a snapshot the host may already have written
    if let Some(snapshot) = host.poll_snapshot() {
        app.update_states(&snapshot);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run main loop
    let result = run_app(&mut terminal, &mut app, &mut host).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    host: &mut HostBridge,
) -> Result<()> {
    loop {
        // Pick up any snapshot the host refreshed since the last tick
        if let Some(snapshot) = host.poll_snapshot() {
            app.update_states(&snapshot);
        }

        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                match key.code {
                    KeyCode::Esc | KeyCode::Char('q') => return Ok(()),
                    KeyCode::Char('c') if key.modifiers.contains(event::KeyModifiers::CONTROL) => {
                        return Ok(());
                    }
                    KeyCode::Tab | KeyCode::Right => app.next_tab(),
                    KeyCode::BackTab | KeyCode::Left => app.prev_tab(),
                    KeyCode::Up | KeyCode::Char('k') => app.previous(),
                    KeyCode::Down | KeyCode::Char('j') => app.next(),
                    KeyCode::Enter => {
                        if let Some(request) = app.activate_selected() {
                            // fire and forget - the next snapshot is the only feedback
                            host.send(&request).await.ok();
                        }
                    }
                    KeyCode::Char(' ') => {
                        if let Some(request) = app.toggle_selected_heater() {
                            host.send(&request).await.ok();
                        }
                    }
                    _ => {}
                }
            }
        }
    }
}
