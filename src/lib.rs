//! Two heroes patrol vertical lanes, dodge the pointer and trade shots.
//!
//! The simulation core (`hero`, `arena`, `clock`, `game`) advances a fixed
//! tick and never touches the window. `input` and `render` adapt macroquad
//! to it.

pub mod arena;
pub mod clock;
pub mod config;
pub mod error;
pub mod game;
pub mod hero;
pub mod input;
pub mod logging;
pub mod render;
pub mod types;
pub mod utils;
