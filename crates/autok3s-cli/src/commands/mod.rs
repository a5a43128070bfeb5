// crates/autok3s-cli/src/commands/mod.rs - Command handlers
//
// - root: banner and help when no subcommand is given
// - version: binary version and registered providers

pub mod root;
pub mod version;

use anyhow::Result;
use tracing::debug;

use crate::cli::Commands;
use crate::context::Context;

/// Route to the selected handler, or the root action when none was given
pub fn dispatch(ctx: &Context, command: Option<Commands>) -> Result<()> {
    let settings = ctx.settings();
    let ready = ctx.ready();
    debug!(
        cfg = %settings.cfg_path().display(),
        config = %ready.config().path().display(),
        state = %ready.layout().state_dir().display(),
        retry = settings.retry_steps(),
        kubeconfig = %ready.kubeconfig().display(),
        kubeconfig_exported = ready.kubeconfig_exported(),
        "environment ready"
    );

    match command {
        None => root::handle(),
        Some(Commands::Version) => version::handle(ctx),
    }
}
