//! Moonlander: a terminal lunar lander.
//!
//! - `levels`: level parameter table (built-in or loaded from JSON)
//! - `model`: craft state, input snapshot, world constants
//! - `sim`: per-tick physics and touchdown evaluation
//! - `game`: lives/level progression state machine
//! - `scenery`: level-seeded starfield, moon and craters
//! - `input`, `render`, `app`: terminal front end

pub mod app;
pub mod config;
pub mod game;
pub mod input;
pub mod levels;
pub mod model;
pub mod render;
pub mod scenery;
pub mod sim;

pub use game::{Game, Phase, Signal, Transition};
pub use levels::{LevelSpec, LevelTable};
pub use model::{Craft, InputSnapshot};
pub use sim::{evaluate, step, Outcome};
