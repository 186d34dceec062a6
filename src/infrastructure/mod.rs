//! Infrastructure layer providing external service integrations.
//!
//! Configuration files, the log sink and the background loader that stands
//! in for the marketplace backend.

pub mod config;
pub mod logging;
pub mod loader;

pub use config::*;
pub use logging::*;
pub use loader::*;
