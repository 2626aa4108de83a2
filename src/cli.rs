use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use kiwi_core::config::DEFAULT_CONFIG_PATH;

#[derive(Debug, Parser)]
#[command(name = "kiwi")]
#[command(about = "Tests the Kiwi platform by sending actuation commands and reacting to sensor input.", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the behavior controller
    Logic(SessionArgs),

    /// Run the kinematic plant model
    Sim(SessionArgs),

    /// Run controller and plant on the same session
    ClosedLoop(SessionArgs),
}

#[derive(Debug, Clone, Args)]
pub struct SessionArgs {
    /// Integration frequency in hertz
    #[arg(long)]
    pub freq: f32,

    /// Session identifier
    #[arg(long)]
    pub cid: u16,

    /// Log every published command
    #[arg(long)]
    pub verbose: bool,

    /// Settings file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
}

impl Cli {
    /// Parse `args`, running the behavior controller when no subcommand is
    /// named, so `kiwi --freq=10 --cid=111` behaves like `kiwi logic ...`.
    pub fn try_parse_with_default<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let needs_default = args.get(1).is_some_and(|first| {
            let first = first.to_string_lossy();
            first.starts_with('-') && !matches!(&*first, "-h" | "--help")
        });
        if needs_default {
            args.insert(1, OsString::from("logic"));
        }
        Self::try_parse_from(args)
    }

    pub fn session(&self) -> &SessionArgs {
        match &self.command {
            Command::Logic(args) | Command::Sim(args) | Command::ClosedLoop(args) => args,
        }
    }
}
