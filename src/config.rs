use crate::levels::LevelTable;
use crate::model::TICK_HZ;
use anyhow::{Context, Result};
use clap::Parser;
use std::{fs::File, path::PathBuf, time::Duration};

#[derive(Parser, Debug)]
#[command(name = "moonlander", about = "Land on the pad. Mind the wind.")]
pub struct Args {
    /// simulation ticks per second
    #[arg(long, default_value_t = TICK_HZ)]
    pub tick_hz: u32,

    /// JSON level table to play instead of the built-in one
    #[arg(long)]
    pub levels: Option<PathBuf>,

    /// start on this level (1-based)
    #[arg(long, default_value_t = 1)]
    pub level: usize,

    /// monochrome output
    #[arg(long)]
    pub no_color: bool,

    /// ms a thrust key stays held after its last key event, when the
    /// terminal cannot report releases
    #[arg(long, default_value_t = 150)]
    pub hold_ms: u64,

    /// write logs here (RUST_LOG filters, default info)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub tick_hz: u32,
    pub levels: LevelTable,
    pub start_level: usize,
    pub enable_color: bool,
    pub hold: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_hz: TICK_HZ,
            levels: LevelTable::builtin(),
            start_level: 0,
            enable_color: true,
            hold: Duration::from_millis(150),
        }
    }
}

impl Settings {
    pub fn from_args(args: &Args) -> Result<Self> {
        let levels = match &args.levels {
            Some(path) => LevelTable::load(path)?,
            None => LevelTable::builtin(),
        };
        let start_level = args.level.saturating_sub(1).min(levels.last_index());
        Ok(Self {
            tick_hz: args.tick_hz.clamp(10, 240),
            levels,
            start_level,
            enable_color: !args.no_color,
            hold: Duration::from_millis(args.hold_ms.max(1)),
        })
    }

    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_hz as f64)
    }
}

/// Route `log` output to a file. Without a file nothing is initialised and
/// log macros are no-ops; stderr belongs to the game screen.
pub fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("could not create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("logger already initialised")?;
    Ok(())
}
