// crates/autok3s-cli/src/commands/version.rs - Version command

use anyhow::{Context as _, Result};
use std::io::{self, Write};

use crate::context::Context;

/// Print the binary version and the providers available to cluster commands
pub fn handle(ctx: &Context) -> Result<()> {
    let mut out = io::stdout().lock();
    render(&mut out, ctx).context("failed to write version")
}

fn render(out: &mut impl Write, ctx: &Context) -> io::Result<()> {
    writeln!(out, "autok3s version v{}", env!("CARGO_PKG_VERSION"))?;
    writeln!(out, "providers:")?;
    for name in ctx.providers().names() {
        // Registry names always resolve
        if let Ok(provider) = ctx.providers().create(name) {
            writeln!(out, "  {:<10} {}", provider.name(), provider.description())?;
        }
    }
    out.flush()
}
