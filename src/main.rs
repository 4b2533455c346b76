use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use fundview::{
    app::{apply_action, handle_input, handle_mouse, Action, App},
    config::Config,
    logging, ui,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, time::Duration};
use tracing::{error, info};

fn main() -> Result<()> {
    let config_path = Config::config_path();
    let config = Config::load_from(&config_path)?;
    logging::init(&config.log_path())?;
    info!(config = %config_path.display(), "starting fundview");

    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("{err:?}");
        eprintln!("Error: {err:?}");
    }
    info!("fundview exited");

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        // Pick up any sign-in verdict from the worker thread (non-blocking)
        app.process_auth_results();

        terminal.draw(|f| ui::ui(f, app))?;
        // Note: clickable_regions are updated during ui() rendering

        if event::poll(Duration::from_millis(100))? {
            let action = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => handle_input(app, key.code),
                Event::Mouse(mouse) => handle_mouse(app, mouse.kind, mouse.column, mouse.row),
                _ => Action::None,
            };

            if !apply_action(app, action) {
                return Ok(());
            }
        }
    }
}
