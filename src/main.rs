//! Word Zones — turn-based word duels in the terminal
//!
//! Pick a zone. Take your turn. Beat the clock.

mod app;
mod game;
mod session;
mod storage;
mod store;
mod tui;

use app::{AppCoordinator, Screen};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use std::io;
use std::time::{Duration, Instant};
use storage::Storage;
use tui::Tui;

fn main() -> io::Result<()> {
    let storage = match Storage::open() {
        Ok(storage) => storage,
        Err(e) => {
            eprintln!("failed to open storage: {}", e);
            std::process::exit(1);
        }
    };

    let mut terminal = Tui::new()?;
    terminal.enter()?;

    let mut coordinator = AppCoordinator::new(storage);

    // Main event loop: render, poll input, tick once per second
    let tick_rate = Duration::from_secs(1);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| tui::render(frame, &coordinator))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    handle_key(&mut coordinator, key.code);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            coordinator.tick();
            last_tick = Instant::now();
        }

        if coordinator.should_quit {
            break;
        }
    }

    // Terminal cleanup happens automatically via Tui::drop
    Ok(())
}

/// Route a key press to the current screen
fn handle_key(coordinator: &mut AppCoordinator, code: KeyCode) {
    match &coordinator.screen {
        Screen::Menu { .. } => match code {
            KeyCode::Esc => coordinator.quit(),
            KeyCode::Up => coordinator.menu_up(),
            KeyCode::Down => coordinator.menu_down(),
            KeyCode::Tab => coordinator.menu_tab(),
            KeyCode::Enter => coordinator.menu_select(),
            KeyCode::Backspace => coordinator.menu_backspace(),
            KeyCode::Char(c) => {
                if c.is_ascii_alphanumeric() {
                    coordinator.menu_char(c);
                }
            }
            _ => {}
        },
        Screen::CategorySelect { .. } => match code {
            KeyCode::Esc => coordinator.go_to_menu(),
            KeyCode::Up => coordinator.menu_up(),
            KeyCode::Down => coordinator.menu_down(),
            KeyCode::Enter => coordinator.category_select(),
            _ => {}
        },
        Screen::Playing { .. } => match code {
            KeyCode::Esc => coordinator.go_to_menu(),
            KeyCode::Enter => coordinator.game_submit(),
            KeyCode::Backspace => coordinator.game_backspace(),
            KeyCode::Char(c) => {
                if c.is_ascii_alphabetic() {
                    coordinator.game_char(c.to_ascii_lowercase());
                }
            }
            _ => {}
        },
        Screen::Results { .. } | Screen::Stats { .. } | Screen::Error { .. } => match code {
            KeyCode::Esc | KeyCode::Enter => coordinator.go_to_menu(),
            _ => {}
        },
    }
}
