//! thunder-lineup library: player vehicle lineup lookup for the terminal.

pub mod app_core;
pub mod model;
pub mod runtime;
pub mod theme;
pub mod ui;
