// crates/autok3s-cli/src/main.rs - CLI Application Entry Point
//
// STARTUP SEQUENCE:
// ┌──────────────┐   ┌──────────────────┐   ┌──────────────────┐   ┌────────────┐
// │ parse flags  │──▶│ bootstrap        │──▶│ resolve settings │──▶│ dispatch   │
// │ (clap)       │   │ (dirs, env, cfg) │   │ + providers      │   │ (commands) │
// └──────────────┘   └──────────────────┘   └──────────────────┘   └────────────┘
//
// The bootstrap runs exactly once, before any handler, whatever the
// subcommand. A fatal bootstrap failure is logged as one line and the process
// exits with status 1 without dispatching.
//
// EXIT CODES:
// - 0: help shown or command succeeded
// - 1: bootstrap failed, help could not be written, or the command failed
// - 2: invalid command line (reported by clap)

use autok3s_core::{Bootstrap, FilesystemLayout, GlobalSettings, ProviderRegistry};
use clap::Parser;
use std::process::ExitCode;
use tracing::error;

mod banner;
mod cli;
mod commands;
mod context;
mod logging;

use cli::Cli;
use context::Context;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let log = logging::init(cli.debug);

    let ctx = match bootstrap(&cli, &log) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("{e:#}");
            return ExitCode::FAILURE;
        }
    };

    match commands::dispatch(&ctx, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Prepare the environment and build the context every handler receives
fn bootstrap(cli: &Cli, log: &logging::LogHandle) -> anyhow::Result<Context> {
    let flags = cli.flag_overrides();
    let layout = FilesystemLayout::new(flags.config_dir())?;
    let ready = Bootstrap::new(layout).run()?;

    let settings = GlobalSettings::resolve(&flags, ready.config())?;
    if settings.debug && !cli.debug {
        log.enable_debug();
    }

    let providers = ProviderRegistry::builtin()?;
    Ok(Context::new(settings, ready, providers))
}
