// crates/autok3s-cli/src/commands/root.rs - Default action of the bare command

use anyhow::{Context as _, Result};
use clap::CommandFactory;
use std::fmt::Display;
use std::io::{self, Write};

use crate::banner;
use crate::cli::Cli;

/// Print the banner followed by the root help to stdout
///
/// Any write failure is returned so main can exit with status 1.
pub fn handle() -> Result<()> {
    let mut out = io::stdout().lock();
    render(&mut out, banner::BANNER).context("failed to render help")
}

/// Write `banner` and the rendered help into `out`
pub fn render(out: &mut impl Write, banner: impl Display) -> io::Result<()> {
    let help = Cli::command().render_help();
    write!(out, "{banner}")?;
    write!(out, "{help}")?;
    out.flush()
}
