//! navdeck - account workflows in the terminal
//!
//! Opens the account home screen. Each entry starts a multi-step flow in an
//! overlay host that shows as a side panel on wide terminals and as a
//! bottom sheet on narrow ones.

use std::io;
use std::time::Duration;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::{error, info};

use navdeck::application::{App, Host, Session};
use navdeck::infrastructure::{init_logging, ConfigRepository, FixtureBackend, Loader};
use navdeck::presentation::{render_ui, InputHandler};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Loads the configuration, starts logging and the loader worker, then
/// runs the event loop until the user quits from the home screen.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = ConfigRepository::default_path();
    let config = ConfigRepository::load(&config_path)?;
    init_logging(&config)?;
    info!(path = %config_path.display(), "navdeck starting");

    let loader = Loader::spawn(FixtureBackend, Duration::from_millis(config.loader_delay_ms))?;
    let session = Session::new(Host::new(config.drag_close_threshold));
    let mut app = App::new(session, config.layout());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, &loader);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(error = %err, "event loop failed");
        println!("{err:?}");
    }
    info!("navdeck stopped");

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, loader: &Loader) -> io::Result<()> {
    loop {
        let size = terminal.size()?;
        app.update_viewport(size.width, size.height);
        terminal.draw(|f| render_ui(f, app))?;

        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') if app.is_home() && !app.session.confirmation().is_open() => {
                        return Ok(());
                    }
                    _ => InputHandler::handle_key_event(app, key.code, key.modifiers),
                },
                Event::Mouse(mouse) => InputHandler::handle_mouse_event(app, mouse),
                _ => {}
            }
        }

        for job in app.take_jobs() {
            if !loader.submit(job) {
                app.status_message = Some("Marketplace is unreachable".to_string());
            }
        }
        for event in loader.drain() {
            app.handle_loader_event(event);
        }
        app.tick();
    }
}
