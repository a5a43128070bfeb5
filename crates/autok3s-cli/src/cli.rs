use autok3s_core::FlagOverrides;
use autok3s_core::settings::DEFAULT_RETRY_STEPS;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Root command
///
/// `--debug` is global and may follow any subcommand. `--cfg` and `--retry`
/// are accepted at the root only; subcommands read the resolved values from
/// the context instead of re-parsing them.
#[derive(Parser, Debug)]
#[command(name = "autok3s")]
#[command(about = "autok3s is used to manage the lifecycle of K3s on multiple cloud providers")]
#[command(
    long_about = "autok3s is used to manage the lifecycle of K3s on multiple cloud providers."
)]
#[command(version)]
pub struct Cli {
    /// Enable log debug level
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Path to the cfg directory to use for CLI requests [default: ~/.autok3s]
    #[arg(short, long, value_name = "PATH")]
    pub cfg: Option<PathBuf>,

    #[arg(short, long, value_name = "STEPS", help = retry_help())]
    pub retry: Option<u32>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Only the flags the user actually passed
    pub fn flag_overrides(&self) -> FlagOverrides {
        FlagOverrides {
            debug: self.debug,
            cfg_path: self.cfg.clone(),
            retry: self.retry,
        }
    }
}

fn retry_help() -> String {
    format!(
        "The number of retries waiting for the desired state \
         [default: {DEFAULT_RETRY_STEPS}, or `retry` from config.yaml]"
    )
}

/// Subcommands attached to the root
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Display autok3s version and the registered providers
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;
    use autok3s_core::{Config, GlobalSettings};
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_args_means_no_subcommand() {
        let cli = Cli::try_parse_from(["autok3s"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.debug);
        assert!(cli.cfg.is_none());
        assert!(cli.retry.is_none());
    }

    #[test]
    fn test_retry_flag_lands_in_settings() {
        let cli = Cli::try_parse_from(["autok3s", "--retry", "10"]).unwrap();
        let settings = GlobalSettings::resolve(&cli.flag_overrides(), &Config::default()).unwrap();
        assert_eq!(settings.retry_steps(), 10);
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from(["autok3s", "-d", "-c", "/tmp/k3s", "-r", "2"]).unwrap();
        assert!(cli.debug);
        assert_eq!(cli.cfg, Some(PathBuf::from("/tmp/k3s")));
        assert_eq!(cli.retry, Some(2));
    }

    #[test]
    fn test_negative_retry_rejected_by_parser() {
        assert!(Cli::try_parse_from(["autok3s", "--retry", "-1"]).is_err());
    }

    #[test]
    fn test_debug_is_inherited_by_subcommands() {
        let cli = Cli::try_parse_from(["autok3s", "version", "--debug"]).unwrap();
        assert!(cli.debug);
        assert!(matches!(cli.command, Some(Commands::Version)));
    }

    #[test]
    fn test_cfg_and_retry_are_root_only() {
        assert!(Cli::try_parse_from(["autok3s", "version", "--retry", "3"]).is_err());
        assert!(Cli::try_parse_from(["autok3s", "version", "--cfg", "/tmp"]).is_err());

        let cli = Cli::try_parse_from(["autok3s", "--retry", "3", "version"]).unwrap();
        assert_eq!(cli.retry, Some(3));
    }

    #[test]
    fn test_retry_help_tracks_default_constant() {
        for help in [
            Cli::command().render_help().to_string(),
            Cli::command().render_long_help().to_string(),
        ] {
            assert!(help.contains(&format!("[default: {DEFAULT_RETRY_STEPS},")));
        }
    }
}
