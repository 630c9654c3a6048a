use crate::config::Settings;
use crate::game::{Game, Signal, Transition};
use crate::input::{collect_input_nonblocking, Control, KeyTracker};
use crate::render::{compose, Terminal};
use crate::scenery::{self, Scenery};
use std::time::{Duration, Instant};

struct App {
    settings: Settings,
    game: Game,
    term: Terminal,
    keys: KeyTracker,
    /// Level the cached backdrop belongs to.
    sky: (usize, Scenery),
    should_quit: bool,
}

impl App {
    fn init(settings: Settings) -> anyhow::Result<Self> {
        let game = Game::starting_at(settings.levels.clone(), settings.start_level);
        let term = Terminal::begin()?;
        let keys = KeyTracker::new(settings.hold, term.reports_release, Instant::now());
        let sky = (game.level_index(), scenery::generate(game.level_index()));

        Ok(Self {
            settings,
            game,
            term,
            keys,
            sky,
            should_quit: false,
        })
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let tick = self.settings.tick_duration();
        let mut next_tick = Instant::now();

        while !self.should_quit {
            self.term.resize_if_needed()?;

            let frame = collect_input_nonblocking(&mut self.keys)?;
            if frame.close_requested() {
                log::info!("window closed");
                break;
            }
            for control in frame.controls {
                let signal = match control {
                    Control::Advance => Signal::Advance,
                    Control::Quit => Signal::Quit,
                    _ => continue,
                };
                if self.game.signal(signal) == Some(Transition::Quit) {
                    log::info!("quit from game over screen");
                    self.should_quit = true;
                    break;
                }
            }
            if self.should_quit {
                break;
            }

            let input = self.keys.snapshot(Instant::now());
            self.game.tick(&input);

            self.render_frame()?;

            // fixed rate; if we fell behind, resync rather than burst
            next_tick += tick;
            let now = Instant::now();
            if next_tick < now {
                next_tick = now;
            }
            spin_sleep(next_tick);
        }
        Ok(())
    }

    fn render_frame(&mut self) -> anyhow::Result<()> {
        let level = self.game.level_index();
        if self.sky.0 != level {
            self.sky = (level, scenery::generate(level));
        }
        compose(
            &mut self.term.cur,
            &mut self.term.canvas,
            &self.game,
            &self.sky.1,
            self.settings.enable_color,
        );
        self.term.present(true)
    }
}

pub fn run(settings: Settings) -> anyhow::Result<()> {
    log::info!(
        "starting: {} levels, level {}, {} Hz",
        settings.levels.len(),
        settings.start_level + 1,
        settings.tick_hz
    );
    let mut app = App::init(settings)?;
    let res = app.run();
    // restore the terminal even when the loop failed
    let end = app.term.end();
    res.and(end)
}

/* -----------------------------
   Frame pacing helper
------------------------------ */

fn spin_sleep(until: Instant) {
    loop {
        let t = Instant::now();
        if t >= until {
            break;
        }
        let left = until - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}
