use anyhow::Result;
use clap::Parser;
use moonlander::config::{init_logging, Args, Settings};

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_ref())?;
    let settings = Settings::from_args(&args)?;
    moonlander::app::run(settings)
}
