// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use anyhow::{Context, Result, anyhow};
use crossterm::{
    event::{self, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    io::{self},
    thread,
    time::Duration,
};
use tokio::{
    runtime::{self, Runtime},
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
};

use musicbox::{
    actions::events::{AppEvent, process_events},
    app::App,
    config::{self, AppConfig},
    library::{self, LibraryService},
    logging,
    player::AudioPlayer,
    theme::Theme,
    util,
    views::ViewContext,
};

/// The entry point of the application.
///
/// Loads the configuration, opens the library, manages the terminal
/// lifecycle, and returns an error if any part of the execution fails.
fn main() -> Result<()> {
    let config = config::load_config();

    logging::init(&config).context("Failed to initialise logging")?;

    tracing::info!("Starting musicbox with data directory {}", config.data_dir.display());

    let runtime = runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create async runtime")?;

    let library = library::open(&config);

    if !runtime.block_on(library.initialize()) {
        let reason = library.last_error().unwrap_or_else(|| "unknown error".to_string());
        return Err(anyhow!("Failed to initialise library: {}", reason));
    }

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let res = run(&runtime, &config, library.clone(), event_tx, &mut event_rx);

    runtime.block_on(library.shutdown());

    tracing::info!("Shutdown complete");

    res.context("Application error occurred")
}

fn run(
    runtime: &Runtime,
    config: &AppConfig,
    library: std::sync::Arc<dyn LibraryService>,
    event_tx: UnboundedSender<AppEvent>,
    event_rx: &mut UnboundedReceiver<AppEvent>,
) -> Result<()> {
    let context = ViewContext {
        library,
        runtime: runtime.handle().clone(),
        event_tx: event_tx.clone(),
        config: config.clone(),
    };

    let audio_player = AudioPlayer::new(event_tx.clone());

    let mut app = App::new(context, Box::new(audio_player));

    let mut terminal = setup_terminal(&app.theme)?;

    spawn_input_threads(&event_tx);

    let res = process_events(&mut terminal, &mut app, event_rx);
    restore_terminal(&mut terminal);

    res
}

/// Prepares the terminal for the TUI application.
///
/// This function performs the following side effects:
/// * Sets the terminal background color based on the provided theme.
/// * Enables raw mode to capture all keyboard input.
/// * Switches the terminal to the alternate screen buffer.
///
/// # Errors
///
/// Returns an error if raw mode cannot be enabled or if the alternate screen
/// cannot be entered.
fn setup_terminal(theme: &Theme) -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    // Set the background of the entire terminal window, without this we'd get
    // a thin black outline
    if let Some(hex) = Theme::to_hex(theme.background_colour) {
        util::term::set_terminal_bg(&hex);
    }

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// This reverses the changes made by [`setup_terminal`], and is best-effort
/// since it runs during cleanup.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) {
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    util::term::reset_terminal_bg();
    terminal.show_cursor().ok();
}

/// Spawns the threads feeding key presses and periodic ticks into the event
/// loop.
fn spawn_input_threads(event_tx: &UnboundedSender<AppEvent>) {
    // Translate raw key presses to application events, ignoring the release
    // and repeat events some terminals report.
    let tx_keys = event_tx.clone();
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(event::Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if tx_keys.send(AppEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    let _ = tx_keys.send(AppEvent::FatalError(format!("Failed to read terminal input: {}", e)));
                    break;
                }
            }
        }
    });

    // Send a periodic tick, this is effectively the minimum "frame rate" for
    // rendering the TUI application.
    let tx_tick = event_tx.clone();
    thread::spawn(move || {
        while tx_tick.send(AppEvent::Tick).is_ok() {
            thread::sleep(Duration::from_millis(250));
        }
    });
}
