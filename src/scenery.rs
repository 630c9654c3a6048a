//! Level backdrop: stars, a moon and its craters.
//!
//! Purely decorative. Generated from the level index alone, so a level always
//! looks the same and the generator never touches gameplay state.

use crate::model::{level_rng, SCREEN_H, SCREEN_W};
use rand::Rng;
use std::f64::consts::TAU;

pub const STAR_COUNT: usize = 100;
pub const CRATER_COUNT: usize = 10;
pub const MOON_RADIUS: f64 = 50.0;
const CRATER_ATTEMPTS: usize = 200;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Crater {
    /// Offset from the moon's centre.
    pub dx: f64,
    pub dy: f64,
    pub radius: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Scenery {
    pub stars: Vec<(f64, f64)>,
    pub moon_x: f64,
    pub moon_y: f64,
    pub moon_radius: f64,
    pub craters: Vec<Crater>,
}

pub fn generate(level_index: usize) -> Scenery {
    let mut rng = level_rng(level_index);

    let stars = (0..STAR_COUNT)
        .map(|_| {
            (
                rng.gen_range(0..=SCREEN_W as i32) as f64,
                rng.gen_range(0..=SCREEN_H as i32) as f64,
            )
        })
        .collect();

    let moon_x = rng.gen_range((SCREEN_W as i32 / 2)..=(SCREEN_W as i32 - 100)) as f64;
    let moon_y = rng.gen_range(50..=(SCREEN_H as i32 / 2)) as f64;

    let mut craters: Vec<Crater> = Vec::with_capacity(CRATER_COUNT);
    for _ in 0..CRATER_COUNT {
        let mut placed = false;
        for _ in 0..CRATER_ATTEMPTS {
            let radius = rng.gen_range(3..=15) as f64;
            let angle = rng.gen_range(0.0..TAU);
            // keep the crater inside the rim
            let max_dist = MOON_RADIUS - 1.5 * radius;
            let dist = rng.gen_range(0.0..=max_dist);

            let dx = (dist * angle.cos()).trunc();
            let dy = (dist * angle.sin()).trunc();

            let clear = craters.iter().all(|c| {
                let (ox, oy) = (dx - c.dx, dy - c.dy);
                let reach = radius + c.radius;
                ox * ox + oy * oy > reach * reach
            });
            if clear {
                craters.push(Crater { dx, dy, radius });
                placed = true;
                break;
            }
        }
        if !placed {
            log::warn!(
                "level {}: gave up placing crater {} after {} attempts",
                level_index + 1,
                craters.len() + 1,
                CRATER_ATTEMPTS
            );
        }
    }

    Scenery {
        stars,
        moon_x,
        moon_y,
        moon_radius: MOON_RADIUS,
        craters,
    }
}
