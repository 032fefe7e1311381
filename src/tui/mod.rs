//! Terminal UI layer

mod terminal;
mod ui;

pub use terminal::Tui;
pub use ui::render;
