use crate::levels::LevelSpec;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// World size in pixels. The renderer scales this onto the terminal.
pub const SCREEN_W: f64 = 800.0;
pub const SCREEN_H: f64 = 600.0;

pub const PAD_HEIGHT: f64 = 10.0;
/// Top of the pad; touchdown is decided when the craft's bottom edge reaches it.
pub const GROUND_Y: f64 = SCREEN_H - PAD_HEIGHT;

/// Collision box. The drawn sprite is wider than this on the left.
pub const CRAFT_W: f64 = 40.0;
pub const CRAFT_H: f64 = 43.0;

pub const START_X: f64 = SCREEN_W / 2.0;
pub const START_Y: f64 = 50.0;

pub const STARTING_LIVES: u32 = 5;
pub const SAFE_DESCENT_SPEED: f64 = 1.5;
pub const TICK_HZ: u32 = 60;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

/// Held thrust keys for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub thrust_left: bool,
    pub thrust_right: bool,
    pub thrust_up: bool,
}

/// Kinematic and fuel state of one attempt at a level.
#[derive(Clone, Debug, PartialEq)]
pub struct Craft {
    pub pos: Vec2,
    pub vel: Vec2,
    pub fuel: i32,
    pub pad_x: f64,
}

impl Craft {
    /// Fresh craft for `level`. The pad position is the first draw from the
    /// level's seeded generator, so the same level always gets the same pad.
    pub fn spawn(level_index: usize, spec: &LevelSpec) -> Self {
        let mut rng = level_rng(level_index);
        let max_x = (SCREEN_W - spec.pad_width).max(0.0);
        let pad_x = rng.gen_range(0.0..=max_x);

        log::debug!("level {} attempt: pad at x={:.1}", level_index + 1, pad_x);

        Self {
            pos: Vec2::new(START_X, START_Y),
            vel: Vec2::ZERO,
            fuel: spec.starting_fuel,
            pad_x,
        }
    }

    pub fn speed(&self) -> f64 {
        self.vel.length()
    }

    pub fn fuel_percent(&self, spec: &LevelSpec) -> f64 {
        fuel_percent(self.fuel, spec.starting_fuel)
    }
}

/// Generator for everything derived from a level index. Each caller gets its
/// own instance; nothing shares generator state.
pub fn level_rng(level_index: usize) -> StdRng {
    StdRng::seed_from_u64(level_index as u64)
}

pub fn fuel_percent(fuel: i32, starting_fuel: i32) -> f64 {
    if starting_fuel <= 0 {
        return 0.0;
    }
    fuel as f64 / starting_fuel as f64 * 100.0
}
