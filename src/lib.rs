//! gamerec-tui library: application core shared between the binary and tests.

pub mod api;
pub mod app_core;
pub mod model;
pub mod theme;
pub mod ui;
