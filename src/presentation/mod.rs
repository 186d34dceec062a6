//! Presentation layer handling terminal UI and user input.
//!
//! Renders the account home, the overlay host as a side panel or bottom
//! sheet, and the confirmation dialog using ratatui, and maps keyboard and
//! mouse input onto the application state.

pub mod layout;
pub mod ui;
pub mod input;

pub use layout::*;
pub use ui::*;
pub use input::*;
