//! Application layer: the navigation core and the account-area state built
//! on top of it.
//!
//! The navigator, confirmation controller and host are owned by a single
//! [`Session`] created at startup; [`App`] drives it from user input.

pub mod navigator;
pub mod confirmation;
pub mod host;
pub mod session;
pub mod transition;
pub mod state;

pub use navigator::*;
pub use confirmation::*;
pub use host::*;
pub use session::*;
pub use transition::*;
pub use state::*;
