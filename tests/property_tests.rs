use moonlander::model::{Craft, Vec2, CRAFT_H, CRAFT_W, GROUND_Y, SCREEN_W};
use moonlander::sim::wrap_x;
use moonlander::{evaluate, step, Game, InputSnapshot, LevelTable, Outcome, Phase, Signal};
use proptest::prelude::*;

fn any_input() -> impl Strategy<Value = InputSnapshot> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(l, r, u)| InputSnapshot {
        thrust_left: l,
        thrust_right: r,
        thrust_up: u,
    })
}

proptest! {
    /// Property: wrapped x always lands in [0, width) and wrapping twice changes nothing
    #[test]
    fn wrap_is_in_range_and_idempotent(x in -1.0e6f64..1.0e6f64) {
        let w = wrap_x(x, SCREEN_W);
        prop_assert!((0.0..SCREEN_W).contains(&w), "{} wrapped to {}", x, w);
        prop_assert_eq!(wrap_x(w, SCREEN_W), w);
    }

    /// Property: fuel never rises and never goes negative while playing
    #[test]
    fn fuel_is_monotone_and_non_negative(
        level in 0usize..5,
        inputs in proptest::collection::vec(any_input(), 1..400)
    ) {
        let mut game = Game::starting_at(LevelTable::builtin(), level);
        let mut last = game.craft().fuel;
        for input in &inputs {
            if game.phase() != Phase::Playing {
                break;
            }
            game.tick(input);
            let fuel = game.craft().fuel;
            prop_assert!(fuel >= 0);
            prop_assert!(fuel <= last);
            last = fuel;
        }
    }

    /// Property: with the engines off and no wind, one tick adds exactly gravity to dy
    #[test]
    fn idle_tick_adds_gravity(dy in -5.0f64..5.0, y in 0.0f64..400.0, x in 0.0f64..800.0) {
        let level = *LevelTable::builtin().get(0);
        let mut craft = Craft { pos: Vec2::new(x, y), vel: Vec2::new(0.0, dy), fuel: 10, pad_x: 0.0 };
        step(&mut craft, &level, &InputSnapshot::default());
        prop_assert_eq!(craft.vel.y, dy + level.gravity);
        prop_assert_eq!(craft.fuel, 10);
    }

    /// Property: above the ground line nothing is decided
    #[test]
    fn airborne_above_ground(
        x in 0.0f64..800.0,
        gap in 1.0e-6f64..500.0,
        dy in -50.0f64..50.0,
        pad_x in 0.0f64..650.0
    ) {
        let craft = Craft {
            pos: Vec2::new(x, GROUND_Y - CRAFT_H - gap),
            vel: Vec2::new(0.0, dy),
            fuel: 0,
            pad_x,
        };
        prop_assert_eq!(evaluate(&craft, 150.0), Outcome::StillAirborne);
    }

    /// Property: at the ground, landing holds exactly when both the window and the speed hold
    #[test]
    fn landing_needs_window_and_speed(
        x in 0.0f64..800.0,
        dy in -1.0f64..4.0,
        pad_x in 0.0f64..650.0,
        sink in 0.0f64..20.0
    ) {
        let craft = Craft {
            pos: Vec2::new(x, GROUND_Y - CRAFT_H + sink),
            vel: Vec2::new(0.0, dy),
            fuel: 0,
            pad_x,
        };
        let in_window = pad_x < x && x < pad_x + 150.0 - CRAFT_W;
        let expected = if in_window && dy < 1.5 { Outcome::Landed } else { Outcome::Crashed };
        prop_assert_eq!(evaluate(&craft, 150.0), expected);
    }

    /// Property: any full reset gives level 0 and five lives
    #[test]
    fn full_reset_restores_defaults(start in 0usize..5, crashes in 1usize..5) {
        let mut game = Game::starting_at(LevelTable::builtin(), start);
        for _ in 0..crashes {
            let c = game.craft_mut();
            c.pos.y = GROUND_Y;
            c.vel.y = 10.0;
            game.tick(&InputSnapshot::default());
            game.signal(Signal::Advance);
        }
        // drain the rest of the lives
        while game.phase() != Phase::GameOver {
            let c = game.craft_mut();
            c.pos.y = GROUND_Y;
            c.vel.y = 10.0;
            game.tick(&InputSnapshot::default());
            if game.phase() == Phase::Crashed {
                game.signal(Signal::Advance);
            }
        }
        game.signal(Signal::Advance);
        prop_assert_eq!(game.level_index(), 0);
        prop_assert_eq!(game.lives(), 5);
        prop_assert_eq!(game.phase(), Phase::Playing);
    }

    /// Property: seeding a level twice gives the same pad
    #[test]
    fn pad_position_is_reproducible(level in 0usize..5) {
        let table = LevelTable::builtin();
        let spec = table.get(level);
        prop_assert_eq!(Craft::spawn(level, spec).pad_x, Craft::spawn(level, spec).pad_x);
    }
}
