//! Level and lives progression.
//!
//! `Game` owns the one live `Craft`. Edge-triggered key signals are resolved
//! into named transitions first and only those are applied, so the dual use
//! of the advance key never leaks into the state machine.

use crate::levels::{LevelSpec, LevelTable};
use crate::model::{Craft, InputSnapshot, STARTING_LIVES};
use crate::sim::{self, Outcome};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Playing,
    Landed,
    Crashed,
    GameOver,
}

/// Raw edge-triggered signals from the input layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    Advance,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    AdvanceLevel,
    RetryLevel,
    ResetGame,
    Quit,
}

#[derive(Clone, Debug)]
pub struct Game {
    levels: LevelTable,
    level_index: usize,
    lives: u32,
    phase: Phase,
    craft: Craft,
    thrusting: bool,
}

impl Game {
    pub fn new(levels: LevelTable) -> Self {
        Self::starting_at(levels, 0)
    }

    /// Fresh game that begins on `level_index` (clamped to the table).
    pub fn starting_at(levels: LevelTable, level_index: usize) -> Self {
        let level_index = level_index.min(levels.last_index());
        let craft = Craft::spawn(level_index, levels.get(level_index));
        Self {
            levels,
            level_index,
            lives: STARTING_LIVES,
            phase: Phase::Playing,
            craft,
            thrusting: false,
        }
    }

    pub fn levels(&self) -> &LevelTable {
        &self.levels
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn level(&self) -> &LevelSpec {
        self.levels.get(self.level_index)
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn craft(&self) -> &Craft {
        &self.craft
    }

    /// Direct access for scripted scenarios; the frame loop never uses this.
    pub fn craft_mut(&mut self) -> &mut Craft {
        &mut self.craft
    }

    /// Whether the main engine fired on the last tick.
    pub fn thrusting(&self) -> bool {
        self.thrusting
    }

    pub fn is_final_level(&self) -> bool {
        self.level_index == self.levels.last_index()
    }

    /// Landed on the last level.
    pub fn has_won(&self) -> bool {
        self.phase == Phase::Landed && self.is_final_level()
    }

    /// Run one simulation tick. Returns `None` outside of `Playing`.
    pub fn tick(&mut self, input: &InputSnapshot) -> Option<Outcome> {
        self.thrusting = false;
        if self.phase != Phase::Playing {
            return None;
        }

        let level = *self.levels.get(self.level_index);
        self.thrusting = sim::step(&mut self.craft, &level, input);
        let outcome = sim::evaluate(&self.craft, level.pad_width);

        match outcome {
            Outcome::StillAirborne => {}
            Outcome::Landed => {
                log::info!(
                    "landed on level {} (x={:.1}, dy={:.3})",
                    self.level_index + 1,
                    self.craft.pos.x,
                    self.craft.vel.y
                );
                self.phase = Phase::Landed;
            }
            Outcome::Crashed => {
                self.lives = self.lives.saturating_sub(1);
                log::info!(
                    "crashed on level {} (x={:.1}, dy={:.3}), {} lives left",
                    self.level_index + 1,
                    self.craft.pos.x,
                    self.craft.vel.y,
                    self.lives
                );
                self.phase = if self.lives > 0 {
                    Phase::Crashed
                } else {
                    log::info!("game over");
                    Phase::GameOver
                };
            }
        }
        Some(outcome)
    }

    /// Map a signal onto the transition it means in the current phase.
    pub fn resolve(&self, signal: Signal) -> Option<Transition> {
        match (self.phase, signal) {
            (Phase::Landed, Signal::Advance) if self.is_final_level() => {
                Some(Transition::ResetGame)
            }
            (Phase::Landed, Signal::Advance) => Some(Transition::AdvanceLevel),
            (Phase::Crashed, Signal::Advance) => Some(Transition::RetryLevel),
            (Phase::GameOver, Signal::Advance) => Some(Transition::ResetGame),
            (Phase::GameOver, Signal::Quit) => Some(Transition::Quit),
            _ => None,
        }
    }

    /// Resolve and apply a signal. The caller exits on `Transition::Quit`.
    pub fn signal(&mut self, signal: Signal) -> Option<Transition> {
        let transition = self.resolve(signal)?;
        self.apply(transition);
        Some(transition)
    }

    fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::AdvanceLevel => {
                self.level_index = (self.level_index + 1).min(self.levels.last_index());
                log::info!("advancing to level {}", self.level_index + 1);
                self.reset_attempt();
            }
            Transition::RetryLevel => {
                log::info!("retrying level {}", self.level_index + 1);
                self.reset_attempt();
            }
            Transition::ResetGame => {
                log::info!("new game");
                self.level_index = 0;
                self.lives = STARTING_LIVES;
                self.reset_attempt();
            }
            Transition::Quit => {}
        }
    }

    fn reset_attempt(&mut self) {
        self.craft = Craft::spawn(self.level_index, self.levels.get(self.level_index));
        self.thrusting = false;
        self.phase = Phase::Playing;
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(LevelTable::builtin())
    }
}
