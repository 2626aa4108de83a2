mod cli;       // command-line surface
mod harness;   // wheel-speed test profile
mod logic;     // behavior controller loop
mod plant;     // kinematic plant loop
mod settings;  // settings file

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use kiwi_core::Session;

use cli::{Cli, Command};
use settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::try_parse_with_default(std::env::args_os()).unwrap_or_else(|err| err.exit());

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let args = cli.session().clone();
    kiwi_core::bus::period(args.freq)?;
    let settings = Settings::load(&args.config)?;
    let params = settings.behavior.with_frequency(args.freq);

    info!(cid = args.cid, freq = args.freq, verbose = args.verbose, "Kiwi started");
    let session = Session::new(args.cid);
    let stop = Arc::new(AtomicBool::new(false));

    let mut loops = Vec::new();
    if matches!(cli.command, Command::Logic(_) | Command::ClosedLoop(_)) {
        loops.push(logic::spawn(&session, params, settings.harness, args.verbose, Arc::clone(&stop))?);
    }
    if matches!(cli.command, Command::Sim(_) | Command::ClosedLoop(_)) {
        loops.push(plant::spawn(&session, args.freq, args.verbose, Arc::clone(&stop))?);
    }

    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested, stopping loops");
    stop.store(true, Ordering::Relaxed);

    for handle in loops {
        let name = handle.thread().name().unwrap_or("unnamed").to_string();
        if tokio::task::spawn_blocking(move || handle.join()).await?.is_err() {
            error!(name = %name, "Loop thread panicked");
        }
    }

    info!("Kiwi stopped");
    Ok(())
}
