use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use log::info;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use super::app::App;

/// Spin up the terminal backend, enter the draw loop, and keep processing input
/// until the user quits.
pub fn run_app(app: &mut App) -> Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode().context("failed to enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal backend")?;

    let result = event_loop(&mut terminal, app);

    cleanup_terminal(&mut terminal)?;
    info!("event=app_exit module=ui status={}", if result.is_ok() { "ok" } else { "error" });
    result
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal
            .draw(|frame| app.draw(frame))
            .context("failed to draw frame")?;

        if !event::poll(Duration::from_millis(250)).context("event polling failed")? {
            continue;
        }

        let Event::Key(key_event) = event::read().context("failed to read event")? else {
            continue;
        };
        if key_event.kind != KeyEventKind::Press {
            continue;
        }

        // AltGr arrives as Ctrl+Alt on Windows and must still type characters.
        let modifiers = key_event.modifiers;
        if modifiers.contains(KeyModifiers::CONTROL) && !modifiers.contains(KeyModifiers::ALT) {
            match control_chord(key_event.code) {
                ControlChord::ClearForm => app.handle_ctrl_l()?,
                ControlChord::Quit => return Ok(()),
                ControlChord::Ignore => {}
            }
            continue;
        }

        if app.handle_key(key_event.code)? {
            return Ok(());
        }
    }
}

/// What a Ctrl chord does. Unbound chords are swallowed rather than treated
/// as the bare key.
#[derive(Debug, PartialEq, Eq)]
enum ControlChord {
    ClearForm,
    Quit,
    Ignore,
}

fn control_chord(code: KeyCode) -> ControlChord {
    match code {
        KeyCode::Char('l') => ControlChord::ClearForm,
        KeyCode::Char('c') => ControlChord::Quit,
        _ => ControlChord::Ignore,
    }
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal
        .show_cursor()
        .context("failed to restore cursor visibility")
}
