//! Application screen state management
//!
//! Handles transitions between different application screens:
//! - Main menu (with handle editing)
//! - Category picker
//! - Playing a session
//! - End-of-session results
//! - Profile stats
//!
//! The coordinator owns the storage handle; session results flow into the
//! profile exactly once, on the tick that observes completion.

use crate::game::wordlist::Category;
use crate::game::GameMode;
use crate::session::SessionOutcome;
use crate::storage::{MatchResult, PlayerProfile, Storage};

use super::state::GameView;

/// Menu option on the main screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    PlayCategory,
    PlayChain,
    Stats,
    Quit,
}

impl MenuOption {
    /// Get all menu options in order
    pub fn all() -> &'static [MenuOption] {
        &[
            MenuOption::PlayCategory,
            MenuOption::PlayChain,
            MenuOption::Stats,
            MenuOption::Quit,
        ]
    }

    /// Get the display label for this option
    pub fn label(&self) -> &'static str {
        match self {
            MenuOption::PlayCategory => "Category Battle",
            MenuOption::PlayChain => "Word Chain",
            MenuOption::Stats => "My Stats",
            MenuOption::Quit => "Quit",
        }
    }
}

/// The current application screen
pub enum Screen {
    /// Main menu
    Menu {
        selected: usize,
        handle_input: String,
        editing_handle: bool,
    },
    /// Choosing a category before a category battle
    CategorySelect { selected: usize },
    /// Playing a session
    Playing { view: GameView },
    /// End-of-session results
    Results {
        outcome: SessionOutcome,
        result: MatchResult,
        profile: PlayerProfile,
        new_best: bool,
    },
    /// Profile statistics
    Stats {
        profile: PlayerProfile,
        /// Practice bests, one row per mode/category
        bests: Vec<(String, Option<u32>)>,
    },
    /// Unrecoverable error
    Error { message: String },
}

/// Main application coordinator
pub struct AppCoordinator {
    /// Current screen
    pub screen: Screen,
    /// Local player handle
    pub handle: String,
    /// Whether the application should quit
    pub should_quit: bool,
    storage: Storage,
}

impl AppCoordinator {
    /// Create a new app coordinator starting at the menu. The handle comes
    /// from storage, falling back to the login name.
    pub fn new(storage: Storage) -> Self {
        let handle = storage
            .handle()
            .ok()
            .flatten()
            .unwrap_or_else(|| {
                std::env::var("USER")
                    .unwrap_or_else(|_| "Player".to_string())
                    .chars()
                    .take(12)
                    .collect()
            });

        Self {
            screen: Screen::Menu {
                selected: 0,
                handle_input: handle.clone(),
                editing_handle: false,
            },
            handle,
            should_quit: false,
            storage,
        }
    }

    /// Signal the application to quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Go back to the main menu
    pub fn go_to_menu(&mut self) {
        self.screen = Screen::Menu {
            selected: 0,
            handle_input: self.handle.clone(),
            editing_handle: false,
        };
    }

    /// Handle menu navigation (up)
    pub fn menu_up(&mut self) {
        match &mut self.screen {
            Screen::Menu {
                selected,
                editing_handle,
                ..
            } => {
                if !*editing_handle && *selected > 0 {
                    *selected -= 1;
                }
            }
            Screen::CategorySelect { selected } => {
                if *selected > 0 {
                    *selected -= 1;
                }
            }
            _ => {}
        }
    }

    /// Handle menu navigation (down)
    pub fn menu_down(&mut self) {
        match &mut self.screen {
            Screen::Menu {
                selected,
                editing_handle,
                ..
            } => {
                if !*editing_handle && *selected < MenuOption::all().len() - 1 {
                    *selected += 1;
                }
            }
            Screen::CategorySelect { selected } => {
                if *selected < Category::all().len() - 1 {
                    *selected += 1;
                }
            }
            _ => {}
        }
    }

    /// Handle menu character input (for handle editing)
    pub fn menu_char(&mut self, c: char) {
        if let Screen::Menu {
            handle_input,
            editing_handle,
            ..
        } = &mut self.screen
        {
            if *editing_handle && handle_input.len() < 12 {
                handle_input.push(c);
            }
        }
    }

    /// Handle menu backspace (for handle editing)
    pub fn menu_backspace(&mut self) {
        if let Screen::Menu {
            handle_input,
            editing_handle,
            ..
        } = &mut self.screen
        {
            if *editing_handle {
                handle_input.pop();
            }
        }
    }

    /// Handle Tab key to toggle handle editing
    pub fn menu_tab(&mut self) {
        let mut commit: Option<String> = None;
        if let Screen::Menu {
            handle_input,
            editing_handle,
            ..
        } = &mut self.screen
        {
            if *editing_handle {
                if handle_input.is_empty() {
                    *handle_input = self.handle.clone();
                } else {
                    commit = Some(handle_input.clone());
                }
            }
            *editing_handle = !*editing_handle;
        }
        if let Some(handle) = commit {
            self.set_handle(handle);
        }
    }

    fn set_handle(&mut self, handle: String) {
        // Persisting the handle is best-effort
        let _ = self.storage.set_handle(&handle);
        self.handle = handle;
    }

    /// Handle menu selection (Enter)
    pub fn menu_select(&mut self) {
        let selected = match &mut self.screen {
            Screen::Menu {
                selected,
                editing_handle,
                handle_input,
                ..
            } => {
                if *editing_handle {
                    // Enter finishes editing, same as Tab
                    let input = handle_input.clone();
                    *editing_handle = false;
                    if input.is_empty() {
                        if let Screen::Menu { handle_input, .. } = &mut self.screen {
                            *handle_input = self.handle.clone();
                        }
                    } else {
                        self.set_handle(input);
                    }
                    return;
                }
                *selected
            }
            _ => return,
        };

        match MenuOption::all()[selected] {
            MenuOption::PlayCategory => {
                self.screen = Screen::CategorySelect { selected: 0 };
            }
            MenuOption::PlayChain => {
                self.start_session(GameMode::WordChain, None);
            }
            MenuOption::Stats => {
                self.open_stats();
            }
            MenuOption::Quit => {
                self.should_quit = true;
            }
        }
    }

    /// Category picker selection (Enter)
    pub fn category_select(&mut self) {
        let selected = match &self.screen {
            Screen::CategorySelect { selected } => *selected,
            _ => return,
        };
        let category = Category::all()[selected];
        self.start_session(GameMode::Category, Some(category));
    }

    fn start_session(&mut self, mode: GameMode, category: Option<Category>) {
        match GameView::practice(mode, category, &self.handle) {
            Ok(mut view) => {
                view.best_score = self
                    .storage
                    .high_score(mode, category.map(|c| c.key()))
                    .unwrap_or(None);
                self.screen = Screen::Playing { view };
            }
            Err(e) => {
                self.screen = Screen::Error {
                    message: format!("Could not start session: {}", e),
                };
            }
        }
    }

    fn open_stats(&mut self) {
        let profile = match self.storage.profile_or_default(&self.handle) {
            Ok(profile) => profile,
            Err(e) => {
                self.screen = Screen::Error {
                    message: format!("Could not load profile: {}", e),
                };
                return;
            }
        };

        let mut bests = Vec::new();
        for category in Category::all() {
            let best = self
                .storage
                .high_score(GameMode::Category, Some(category.key()))
                .unwrap_or(None);
            bests.push((category.label().to_string(), best));
        }
        let chain_best = self
            .storage
            .high_score(GameMode::WordChain, None)
            .unwrap_or(None);
        bests.push(("Word Chain".to_string(), chain_best));

        self.screen = Screen::Stats { profile, bests };
    }

    /// Per-second tick (call from the main loop)
    pub fn tick(&mut self) {
        if let Screen::Playing { view } = &mut self.screen {
            view.tick();
            if view.is_over() {
                let category = view.session().category.clone();
                if let Some(outcome) = view.take_outcome() {
                    self.finish_session(outcome, category);
                }
            }
        }
    }

    /// Apply a sealed outcome to the profile and move to the results screen.
    fn finish_session(&mut self, outcome: SessionOutcome, category: Option<String>) {
        let result = match &outcome.winner {
            None => MatchResult::Draw,
            Some(winner) if *winner == self.handle => MatchResult::Win,
            Some(_) => MatchResult::Loss,
        };

        let profile = match self.storage.apply_result(&self.handle, outcome.mode, result) {
            Ok(profile) => profile,
            Err(e) => {
                self.screen = Screen::Error {
                    message: format!("Could not record result: {}", e),
                };
                return;
            }
        };

        // High score cache is best-effort
        let new_best = self
            .storage
            .record_high_score(outcome.mode, category.as_deref(), outcome.score_a)
            .unwrap_or(false);

        self.screen = Screen::Results {
            outcome,
            result,
            profile,
            new_best,
        };
    }

    /// Input while playing
    pub fn game_char(&mut self, c: char) {
        if let Screen::Playing { view } = &mut self.screen {
            view.on_char(c);
        }
    }

    pub fn game_backspace(&mut self) {
        if let Screen::Playing { view } = &mut self.screen {
            view.on_backspace();
        }
    }

    pub fn game_submit(&mut self) {
        if let Screen::Playing { view } = &mut self.screen {
            view.on_submit();
        }
    }
}
