pub mod clock;
pub mod config;
pub mod error;
pub mod grid;
pub mod input;
pub mod items;
pub mod logging;
pub mod renderer;
pub mod round;
pub mod snake;
pub mod terminal_runtime;
pub mod ui;
