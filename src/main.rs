use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod jobs;
mod model;
mod services;

use config::Config;
use jobs::Command;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let arg = std::env::args().nth(1).unwrap_or_default();
    let cmd = Command::from(arg.as_str());
    if cmd == Command::Unknown {
        anyhow::bail!("unknown job {arg:?}\n{}", Command::USAGE);
    }

    let config = Config::load()?;
    tracing::info!("running {arg}");

    jobs::run(cmd, &config)?;
    Ok(())
}
