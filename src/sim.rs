//! Per-tick physics and touchdown evaluation.
//!
//! Everything here is pure with respect to its arguments: no clocks, no
//! shared generators, one call per tick.

use crate::levels::LevelSpec;
use crate::model::{Craft, InputSnapshot, CRAFT_H, CRAFT_W, GROUND_Y, SAFE_DESCENT_SPEED, SCREEN_W};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    StillAirborne,
    Landed,
    Crashed,
}

/// Wrap `x` into `[0, width)`.
pub fn wrap_x(x: f64, width: f64) -> f64 {
    let w = x.rem_euclid(width);
    // rem_euclid can round up to `width` for tiny negative inputs
    if w >= width {
        0.0
    } else {
        w
    }
}

/// Advance the craft by one tick. Returns whether the main (up) engine fired.
pub fn step(craft: &mut Craft, level: &LevelSpec, input: &InputSnapshot) -> bool {
    let mut thrusting = false;

    if input.thrust_left && craft.fuel > 0 {
        craft.vel.x -= level.thrust_accel;
        craft.fuel -= level.fuel_burn_rate;
    }
    if input.thrust_right && craft.fuel > 0 {
        craft.vel.x += level.thrust_accel;
        craft.fuel -= level.fuel_burn_rate;
    }
    if input.thrust_up && craft.fuel > 0 {
        craft.vel.y -= level.thrust_accel;
        craft.fuel -= level.fuel_burn_rate;
        thrusting = true;
    }
    craft.fuel = craft.fuel.max(0);

    craft.vel.y += level.gravity;
    craft.vel.x += level.wind_accel;

    craft.pos.x += craft.vel.x;
    craft.pos.y += craft.vel.y;

    craft.pos.x = wrap_x(craft.pos.x, SCREEN_W);

    thrusting
}

/// Decide whether the craft has touched down, and how.
///
/// The horizontal window compares the craft's left edge against
/// `(pad_x, pad_x + pad_width - CRAFT_W)`, both bounds exclusive. Only
/// descent speed is checked; sideways drift does not matter.
pub fn evaluate(craft: &Craft, pad_width: f64) -> Outcome {
    if craft.pos.y + CRAFT_H < GROUND_Y {
        return Outcome::StillAirborne;
    }

    let x = craft.pos.x;
    let on_pad = craft.pad_x < x && x < craft.pad_x + pad_width - CRAFT_W;
    let soft = craft.vel.y < SAFE_DESCENT_SPEED;

    if on_pad && soft {
        Outcome::Landed
    } else {
        Outcome::Crashed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::LevelTable;
    use crate::model::Vec2;

    fn craft_at(x: f64, y: f64, dy: f64, pad_x: f64) -> Craft {
        Craft {
            pos: Vec2::new(x, y),
            vel: Vec2::new(0.0, dy),
            fuel: 100,
            pad_x,
        }
    }

    fn calm_level() -> LevelSpec {
        *LevelTable::builtin().get(0)
    }

    #[test]
    fn gravity_applies_with_no_input() {
        let level = calm_level();
        let mut c = craft_at(100.0, 100.0, 0.7, 0.0);
        let thrusting = step(&mut c, &level, &InputSnapshot::default());
        assert!(!thrusting);
        assert_eq!(c.vel.y, 0.7 + level.gravity);
        assert_eq!(c.vel.x, 0.0);
        assert_eq!(c.fuel, 100);
        assert_eq!(c.pos.y, 100.0 + (0.7 + level.gravity));
    }

    #[test]
    fn wind_pushes_every_tick() {
        let level = *LevelTable::builtin().get(4);
        let mut c = craft_at(100.0, 100.0, 0.0, 0.0);
        step(&mut c, &level, &InputSnapshot::default());
        step(&mut c, &level, &InputSnapshot::default());
        assert!((c.vel.x - 2.0 * level.wind_accel).abs() < 1e-12);
    }

    #[test]
    fn each_engine_burns_fuel() {
        let level = calm_level();
        let mut c = craft_at(100.0, 100.0, 0.0, 0.0);
        let input = InputSnapshot {
            thrust_left: true,
            thrust_right: true,
            thrust_up: true,
        };
        let thrusting = step(&mut c, &level, &input);
        assert!(thrusting);
        assert_eq!(c.fuel, 100 - 3 * level.fuel_burn_rate);
        assert!(c.vel.x.abs() < 1e-12);
        assert!((c.vel.y - (level.gravity - level.thrust_accel)).abs() < 1e-12);
    }

    #[test]
    fn fuel_clamps_to_zero_after_all_burns() {
        let level = *LevelTable::builtin().get(3); // burn 5
        let mut c = craft_at(100.0, 100.0, 0.0, 0.0);
        c.fuel = 3;
        let input = InputSnapshot {
            thrust_left: true,
            thrust_right: true,
            thrust_up: true,
        };
        let thrusting = step(&mut c, &level, &input);
        assert_eq!(c.fuel, 0);
        // only the left engine had fuel when checked
        assert!(!thrusting);
        assert!((c.vel.x - (-level.thrust_accel + level.wind_accel)).abs() < 1e-12);
    }

    #[test]
    fn empty_tank_gives_no_thrust() {
        let level = calm_level();
        let mut c = craft_at(100.0, 100.0, 0.0, 0.0);
        c.fuel = 0;
        let input = InputSnapshot {
            thrust_up: true,
            ..Default::default()
        };
        assert!(!step(&mut c, &level, &input));
        assert_eq!(c.vel.y, level.gravity);
    }

    #[test]
    fn x_wraps_both_ways() {
        assert_eq!(wrap_x(805.0, 800.0), 5.0);
        assert_eq!(wrap_x(-5.0, 800.0), 795.0);
        assert_eq!(wrap_x(800.0, 800.0), 0.0);
        assert_eq!(wrap_x(123.5, 800.0), 123.5);
        let tiny = wrap_x(-1e-18, 800.0);
        assert!((0.0..800.0).contains(&tiny));
    }

    #[test]
    fn step_wraps_position() {
        let level = calm_level();
        let mut c = craft_at(799.0, 100.0, 0.0, 0.0);
        c.vel.x = 3.0;
        step(&mut c, &level, &InputSnapshot::default());
        assert!((c.pos.x - 2.0).abs() < 1e-9);
    }

    #[test]
    fn airborne_above_ground_line() {
        // bottom edge one pixel above the pad, falling fast
        let c = craft_at(350.0, GROUND_Y - CRAFT_H - 1.0, 50.0, 300.0);
        assert_eq!(evaluate(&c, 150.0), Outcome::StillAirborne);
    }

    #[test]
    fn touchdown_window() {
        let y = GROUND_Y - CRAFT_H;
        assert_eq!(evaluate(&craft_at(405.0, y, 1.0, 300.0), 150.0), Outcome::Landed);
        assert_eq!(evaluate(&craft_at(405.0, y, 2.0, 300.0), 150.0), Outcome::Crashed);
        assert_eq!(evaluate(&craft_at(415.0, y, 1.0, 300.0), 150.0), Outcome::Crashed);
    }

    #[test]
    fn window_bounds_are_exclusive() {
        let y = GROUND_Y - CRAFT_H;
        assert_eq!(evaluate(&craft_at(300.0, y, 0.5, 300.0), 150.0), Outcome::Crashed);
        assert_eq!(evaluate(&craft_at(410.0, y, 0.5, 300.0), 150.0), Outcome::Crashed);
        assert_eq!(evaluate(&craft_at(300.5, y, 0.5, 300.0), 150.0), Outcome::Landed);
        assert_eq!(evaluate(&craft_at(350.0, y, 1.5, 300.0), 150.0), Outcome::Crashed);
    }

    #[test]
    fn sideways_drift_is_ignored() {
        let y = GROUND_Y - CRAFT_H + 0.2;
        let mut c = craft_at(350.0, y, 1.0, 300.0);
        c.vel.x = 9.0;
        assert_eq!(evaluate(&c, 150.0), Outcome::Landed);
    }
}
