use crate::config::ShellConfig;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{ArgGroup, Parser};
use tracing::Level;

/// Minimal desktop shell with a background loader and live log panel
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "spinshell", version, about)]
#[command(group(ArgGroup::new("level").args(["quiet", "warning", "verbose", "debug"])))]
pub struct Cli {
    /// Set console logging to ERROR
    #[arg(short, long)]
    pub quiet: bool,

    /// Set console logging to WARNING
    #[arg(short, long)]
    pub warning: bool,

    /// Set console logging to INFO
    #[arg(short, long)]
    pub verbose: bool,

    /// Set console logging to DEBUG
    #[arg(short, long)]
    pub debug: bool,

    /// Store logs in a rotating file under the logs directory
    #[arg(long, overrides_with = "no_log")]
    pub log: bool,

    /// Do not write a log file (default)
    #[arg(long = "no-log", overrides_with = "log")]
    pub no_log: bool,

    /// Optional YAML settings file
    #[arg(long, value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Show the window fullscreen
    #[arg(long, conflicts_with = "maximized")]
    pub fullscreen: bool,

    /// Show the window maximized
    #[arg(long)]
    pub maximized: bool,
}

impl Cli {
    /// Console log level selected by the flags (INFO by default)
    pub fn console_level(&self) -> Level {
        if self.quiet {
            Level::ERROR
        } else if self.warning {
            Level::WARN
        } else if self.debug {
            Level::DEBUG
        } else {
            Level::INFO
        }
    }

    /// Whether rotating file logging is enabled
    pub fn log_to_file(&self) -> bool {
        self.log && !self.no_log
    }

    /// `--config` made absolute against `launch_dir`
    ///
    /// Must be resolved before the working directory moves to the
    /// installation directory.
    pub fn config_path(&self, launch_dir: &Utf8Path) -> Option<Utf8PathBuf> {
        self.config
            .as_deref()
            .map(|path| crate::config::resolve_against(path, launch_dir))
    }

    /// Apply command line overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut ShellConfig) {
        if self.fullscreen {
            config.window.fullscreen = true;
            config.window.maximized = false;
        }
        if self.maximized {
            config.window.maximized = true;
            config.window.fullscreen = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("spinshell").chain(args.iter().copied()))
    }

    #[test]
    fn test_default_level_is_info() {
        let cli = parse(&[]).unwrap();
        assert_eq!(cli.console_level(), Level::INFO);
        assert!(!cli.log_to_file());
    }

    #[test]
    fn test_level_flags() {
        assert_eq!(parse(&["-q"]).unwrap().console_level(), Level::ERROR);
        assert_eq!(parse(&["--warning"]).unwrap().console_level(), Level::WARN);
        assert_eq!(parse(&["-v"]).unwrap().console_level(), Level::INFO);
        assert_eq!(parse(&["--debug"]).unwrap().console_level(), Level::DEBUG);
    }

    #[test]
    fn test_level_flags_are_exclusive() {
        assert!(parse(&["-q", "-d"]).is_err());
    }

    #[test]
    fn test_log_and_no_log_last_wins() {
        assert!(parse(&["--log"]).unwrap().log_to_file());
        assert!(!parse(&["--log", "--no-log"]).unwrap().log_to_file());
        assert!(parse(&["--no-log", "--log"]).unwrap().log_to_file());
    }

    #[test]
    fn test_positional_arguments_rejected() {
        assert!(parse(&["extra"]).is_err());
    }

    #[test]
    fn test_config_path_resolved_against_launch_dir() {
        let launch = Utf8Path::new("/home/user/work");
        assert_eq!(parse(&[]).unwrap().config_path(launch), None);
        assert_eq!(
            parse(&["--config", "mine.yaml"]).unwrap().config_path(launch),
            Some(Utf8PathBuf::from("/home/user/work/mine.yaml"))
        );
    }

    #[test]
    fn test_window_mode_overrides() {
        let mut config = ShellConfig::default();
        parse(&["--maximized"]).unwrap().apply_overrides(&mut config);
        assert!(config.window.maximized);
        assert!(!config.window.fullscreen);

        assert!(parse(&["--fullscreen", "--maximized"]).is_err());
    }
}
