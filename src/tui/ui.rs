//! UI rendering using ratatui
//!
//! Supports multiple screens:
//! - Menu: Main menu with handle editing
//! - CategorySelect: Topic picker for category battles
//! - Playing: In-game screen (countdown, then the board)
//! - Results: End-of-session summary
//! - Stats: Profile record and practice bests
//! - Error: Error message display

use crate::app::{AppCoordinator, GameView, MenuOption, Screen};
use crate::game::GameMode;
use crate::game::wordlist::Category;
use crate::session::{SessionOutcome, SessionStatus};
use crate::storage::{MatchResult, PlayerProfile};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

/// Render the appropriate screen based on app state
pub fn render(frame: &mut Frame, coordinator: &AppCoordinator) {
    match &coordinator.screen {
        Screen::Menu {
            selected,
            handle_input,
            editing_handle,
        } => {
            render_menu(
                frame,
                *selected,
                &coordinator.handle,
                handle_input,
                *editing_handle,
            );
        }
        Screen::CategorySelect { selected } => {
            render_category_select(frame, *selected);
        }
        Screen::Playing { view } => {
            render_game(frame, view);
        }
        Screen::Results {
            outcome,
            result,
            profile,
            new_best,
        } => {
            render_results(frame, outcome, *result, profile, *new_best);
        }
        Screen::Stats { profile, bests } => {
            render_stats(frame, profile, bests);
        }
        Screen::Error { message } => {
            render_error(frame, message);
        }
    }
}

/// Render the main menu
fn render_menu(
    frame: &mut Frame,
    selected: usize,
    handle: &str,
    handle_input: &str,
    editing_handle: bool,
) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Logo
            Constraint::Length(3), // Handle input
            Constraint::Length(1), // Spacer
            Constraint::Min(6),    // Menu options
            Constraint::Length(2), // Footer
        ])
        .margin(2)
        .split(area);

    let logo = r#"
__        __            _   _____
\ \      / /__  _ __ __| | |__  /___  _ __   ___  ___
 \ \ /\ / / _ \| '__/ _` |   / // _ \| '_ \ / _ \/ __|
  \ V  V / (_) | | | (_| |  / /| (_) | | | |  __/\__ \
   \_/\_/ \___/|_|  \__,_| /____\___/|_| |_|\___||___/
"#;
    let logo_widget = Paragraph::new(logo)
        .style(Style::default().fg(Color::Yellow).bold())
        .alignment(Alignment::Center);
    frame.render_widget(logo_widget, layout[0]);

    // Handle input
    let handle_display = if editing_handle {
        format!("Handle: [{}]_", handle_input)
    } else {
        format!("Handle: {} (Tab to edit)", handle)
    };
    let handle_style = if editing_handle {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let handle_widget = Paragraph::new(handle_display)
        .style(handle_style)
        .alignment(Alignment::Center);
    frame.render_widget(handle_widget, layout[1]);

    // Menu options
    let items: Vec<ListItem> = MenuOption::all()
        .iter()
        .enumerate()
        .map(|(i, opt)| {
            let style = if i == selected {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default().fg(Color::White)
            };
            let prefix = if i == selected { "> " } else { "  " };
            ListItem::new(format!("{}{}", prefix, opt.label())).style(style)
        })
        .collect();

    let menu = List::new(items).block(Block::default());
    frame.render_widget(menu, layout[3]);

    let footer = Paragraph::new("↑↓ Navigate  Enter Select  Esc Quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, layout[4]);
}

/// Render the category picker
fn render_category_select(frame: &mut Frame, selected: usize) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(6),    // Category list
            Constraint::Length(2), // Footer
        ])
        .margin(1)
        .split(area);

    let header = Paragraph::new("Choose a Category")
        .style(Style::default().fg(Color::Cyan).bold())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, layout[0]);

    let items: Vec<ListItem> = Category::all()
        .iter()
        .enumerate()
        .map(|(i, category)| {
            let style = if i == selected {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default().fg(Color::White)
            };
            let prefix = if i == selected { "> " } else { "  " };
            ListItem::new(format!("{}{}", prefix, category.label())).style(style)
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Categories"));
    frame.render_widget(list, layout[1]);

    let footer = Paragraph::new("↑↓ Select  Enter Play  Esc Back")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, layout[2]);
}

/// Render the in-game screen
fn render_game(frame: &mut Frame, view: &GameView) {
    let area = frame.area();

    match view.session().status {
        SessionStatus::Waiting | SessionStatus::Countdown => {
            render_countdown(frame, area, view);
        }
        _ => {
            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3), // Header with mode, timers
                    Constraint::Min(0),    // Main content area
                ])
                .split(area);

            render_header(frame, layout[0], view);
            render_board(frame, layout[1], view);
        }
    }
}

/// Render the pre-game countdown
fn render_countdown(frame: &mut Frame, area: Rect, view: &GameView) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(30), // Top spacer
            Constraint::Length(5),      // Big countdown number
            Constraint::Length(3),      // Mode line
            Constraint::Percentage(30), // Bottom spacer
        ])
        .margin(2)
        .split(area);

    let count = view.countdown_left();
    let countdown_color = match count {
        0 | 1 => Color::Red,
        2 => Color::Yellow,
        _ => Color::Green,
    };
    let countdown = Paragraph::new(format!("{}", count.max(1)))
        .style(Style::default().fg(countdown_color).bold())
        .alignment(Alignment::Center);
    frame.render_widget(countdown, layout[1]);

    let mode_line = match view.session().category.as_deref().and_then(Category::from_key) {
        Some(category) => format!("{} — {}", view.mode().label(), category.label()),
        None => view.mode().label().to_string(),
    };
    let mode_widget = Paragraph::new(mode_line)
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center);
    frame.render_widget(mode_widget, layout[2]);
}

/// Render the header: mode, game timer, turn timer
fn render_header(frame: &mut Frame, area: Rect, view: &GameView) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(24), // Mode label
            Constraint::Min(16),    // Turn indicator (centered)
            Constraint::Length(22), // Timers
        ])
        .split(inner);

    let mode_line = match view.session().category.as_deref().and_then(Category::from_key) {
        Some(category) => format!("{} · {}", view.mode().label(), category.label()),
        None => view.mode().label().to_string(),
    };
    let mode_widget = Paragraph::new(mode_line)
        .style(Style::default().fg(Color::Yellow).bold())
        .alignment(Alignment::Left);
    frame.render_widget(mode_widget, header_layout[0]);

    // Turn indicator, plus the chain letter when constrained
    let turn_line = if view.is_local_turn() {
        match view.required_letter() {
            Some(letter) => format!("YOUR TURN — start with '{}'", letter.to_uppercase()),
            None => "YOUR TURN".to_string(),
        }
    } else {
        "Opponent is thinking...".to_string()
    };
    let turn_style = if view.is_local_turn() {
        Style::default().fg(Color::Green).bold()
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let turn_widget = Paragraph::new(turn_line)
        .style(turn_style)
        .alignment(Alignment::Center);
    frame.render_widget(turn_widget, header_layout[1]);

    // Game timer and turn timer
    let game_left = view.game_left();
    let timer_color = if game_left <= 10 {
        Color::Red
    } else if game_left <= 30 {
        Color::Yellow
    } else {
        Color::Green
    };
    let timers = Paragraph::new(format!(
        "{}  turn {:>2}s",
        format_timer(game_left),
        view.turn_left()
    ))
    .style(Style::default().fg(timer_color).bold())
    .alignment(Alignment::Right);
    frame.render_widget(timers, header_layout[2]);
}

/// Render the main board: input and scores on the left, word feed right
fn render_board(frame: &mut Frame, area: Rect, view: &GameView) {
    let horizontal_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(30),    // Input and scores
            Constraint::Length(28), // Word feed
        ])
        .split(area);

    render_input_area(frame, horizontal_layout[0], view);
    render_word_feed(frame, horizontal_layout[1], view);
}

/// Render the input/feedback/score area (left panel)
fn render_input_area(frame: &mut Frame, area: Rect, view: &GameView) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Input line
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Feedback line
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Local score
            Constraint::Length(1), // Opponent score
            Constraint::Length(1), // Practice best
            Constraint::Length(1), // Chain streak
            Constraint::Min(0),    // Remaining space
        ])
        .split(area);

    let input = Paragraph::new(format!("> {}_", view.input))
        .style(Style::default().fg(Color::White));
    frame.render_widget(input, main_layout[0]);

    let feedback_color = if view.feedback.starts_with("OK") {
        Color::Green
    } else if view.feedback.is_empty() {
        Color::White
    } else {
        Color::Red
    };
    let feedback = Paragraph::new(view.feedback.clone())
        .style(Style::default().fg(feedback_color));
    frame.render_widget(feedback, main_layout[2]);

    let local = Paragraph::new(format!("{}: {}", view.local_handle(), view.local_score()))
        .style(Style::default().fg(Color::Magenta).bold());
    frame.render_widget(local, main_layout[4]);

    let opponent = Paragraph::new(format!(
        "{}: {}",
        view.opponent_handle(),
        view.opponent_score()
    ))
    .style(Style::default().fg(Color::White));
    frame.render_widget(opponent, main_layout[5]);

    if let Some(best) = view.best_score {
        let best_widget = Paragraph::new(format!("Best: {}", best))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(best_widget, main_layout[6]);
    }

    if view.mode() == GameMode::WordChain && view.streak() > 0 {
        let streak = Paragraph::new(format!("Streak: x{}", view.streak()))
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(streak, main_layout[7]);
    }
}

/// Render the feed of accepted words (right panel)
fn render_word_feed(frame: &mut Frame, area: Rect, view: &GameView) {
    let items: Vec<ListItem> = view
        .word_feed
        .iter()
        .rev()
        .map(|entry| {
            let style = if entry.player == view.local_handle() {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(format!("{} +{} ({})", entry.word, entry.points, entry.player))
                .style(style)
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Words"));
    frame.render_widget(list, area);
}

/// Render the end-of-session results
fn render_results(
    frame: &mut Frame,
    outcome: &SessionOutcome,
    result: MatchResult,
    profile: &PlayerProfile,
    new_best: bool,
) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Banner
            Constraint::Length(4), // Final scores
            Constraint::Length(3), // Rewards
            Constraint::Min(4),    // Words played
            Constraint::Length(2), // Footer
        ])
        .margin(2)
        .split(area);

    let (banner_text, banner_color) = match result {
        MatchResult::Win => ("YOU WIN!", Color::Green),
        MatchResult::Draw => ("DRAW", Color::Yellow),
        MatchResult::Loss => ("YOU LOSE", Color::Red),
    };
    let banner = Paragraph::new(banner_text)
        .style(Style::default().fg(banner_color).bold())
        .alignment(Alignment::Center);
    frame.render_widget(banner, layout[0]);

    let scores = Paragraph::new(format!(
        "{}: {}   {}: {}",
        outcome.player_a, outcome.score_a, outcome.player_b, outcome.score_b
    ))
    .style(Style::default().fg(Color::White).bold())
    .alignment(Alignment::Center);
    frame.render_widget(scores, layout[1]);

    let mut rewards = format!(
        "+{} credits · {} rating {:.0} ({})",
        result.credits(),
        outcome.mode.label(),
        profile.rating_for(outcome.mode),
        profile.rank_for(outcome.mode),
    );
    if new_best {
        rewards.push_str(" · NEW BEST!");
    }
    let rewards_widget = Paragraph::new(rewards)
        .style(Style::default().fg(Color::Magenta))
        .alignment(Alignment::Center);
    frame.render_widget(rewards_widget, layout[2]);

    let longest = outcome
        .words_used
        .iter()
        .max_by_key(|w| w.chars().count())
        .map(String::as_str)
        .unwrap_or("—");
    let words = Paragraph::new(format!(
        "Longest word: {}\nWords played: {}",
        longest,
        outcome.words_used.join(", ")
    ))
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center)
    .wrap(ratatui::widgets::Wrap { trim: true });
    frame.render_widget(words, layout[3]);

    let footer = Paragraph::new("Enter Menu")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, layout[4]);
}

/// Render the profile stats screen
fn render_stats(frame: &mut Frame, profile: &PlayerProfile, bests: &[(String, Option<u32>)]) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(4), // Record
            Constraint::Length(3), // Ratings
            Constraint::Min(4),    // Practice bests
            Constraint::Length(2), // Footer
        ])
        .margin(1)
        .split(area);

    let header = Paragraph::new(format!("Stats — {}", profile.handle))
        .style(Style::default().fg(Color::Cyan).bold())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, layout[0]);

    let record = Paragraph::new(format!(
        "Played: {}   W {} / L {} / D {}   Credits: {}",
        profile.games_played(),
        profile.wins,
        profile.losses,
        profile.draws,
        profile.credits
    ))
    .style(Style::default().fg(Color::White))
    .alignment(Alignment::Center);
    frame.render_widget(record, layout[1]);

    let ratings = Paragraph::new(format!(
        "Category: {:.0} ({})   Chain: {:.0} ({})",
        profile.rating_for(GameMode::Category),
        profile.rank_for(GameMode::Category),
        profile.rating_for(GameMode::WordChain),
        profile.rank_for(GameMode::WordChain),
    ))
    .style(Style::default().fg(Color::Magenta))
    .alignment(Alignment::Center);
    frame.render_widget(ratings, layout[2]);

    let items: Vec<ListItem> = bests
        .iter()
        .map(|(label, best)| {
            let line = match best {
                Some(score) => format!("  {:<12} {}", label, score),
                None => format!("  {:<12} —", label),
            };
            ListItem::new(line).style(Style::default().fg(Color::White))
        })
        .collect();
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Best Scores"));
    frame.render_widget(list, layout[3]);

    let footer = Paragraph::new("Esc Back")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, layout[4]);
}

/// Render error screen
fn render_error(frame: &mut Frame, message: &str) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Percentage(40),
        ])
        .margin(2)
        .split(area);

    let error = Paragraph::new(format!("Error: {}", message))
        .style(Style::default().fg(Color::Red))
        .alignment(Alignment::Center);
    frame.render_widget(error, layout[1]);

    let hint = Paragraph::new("Press Esc to go back")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(hint, layout[2]);
}

/// Format seconds as M:SS
fn format_timer(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
