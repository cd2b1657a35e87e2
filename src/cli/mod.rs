//! Command-line presentation layer for smarta.
mod app;
mod main;

pub use app::*;
pub use main::*;
