//! navdeck - view-stack navigation for account workflows
//!
//! A navigator that drives multi-step account flows inside one overlay
//! host, a single confirmation dialog that can hold off dismissal while an
//! action runs, and a host that presents as a side panel or a bottom sheet
//! depending on terminal width.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
