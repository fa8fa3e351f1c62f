//! Terminal rendering for hellowave.
//!
//! Provides the ratatui draw sink, the status line and FPS tracking.

pub mod canvas;
pub mod fps;
pub mod ui;
