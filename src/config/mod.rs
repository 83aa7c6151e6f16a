use crate::loader::DEFAULT_LOAD_DELAY;
use crate::logging::{DEFAULT_LOG_CAPACITY, LOGS_MAX_COUNT, LOGS_MAX_SIZE};
use anyhow::{Context, Result, bail};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

/// Default tick period of the window controller
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100;

/// Complete shell configuration
///
/// Every field has a default, so an empty or partial YAML file is valid.
/// Without `--config` no file is read and [`ShellConfig::default`] is used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub window: WindowConfig,
    pub loader: LoaderConfig,
    pub logging: LoggingConfig,
}

/// Main window appearance and tick behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub fullscreen: bool,
    pub maximized: bool,
    /// Show the log panel and mirror log output into it
    pub show_log: bool,
    /// Number of lines retained by the log panel
    pub log_max_lines: usize,
    pub tick_interval_ms: u64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Main Window".to_string(),
            fullscreen: false,
            maximized: false,
            show_log: true,
            log_max_lines: DEFAULT_LOG_CAPACITY,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
        }
    }
}

impl WindowConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Initial data loader settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub delay_ms: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_LOAD_DELAY.as_millis() as u64,
        }
    }
}

impl LoaderConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Rotating log file settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for log files, relative to the installation directory
    pub dir: String,
    pub file_name: String,
    pub max_bytes: u64,
    pub max_backups: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: "logs".to_string(),
            file_name: "main.log".to_string(),
            max_bytes: LOGS_MAX_SIZE,
            max_backups: LOGS_MAX_COUNT,
        }
    }
}

/// Where a loaded [`ShellConfig`] came from
///
/// Loading usually happens before the log subscriber exists, so the caller
/// reports this once logging is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// No path was given
    Defaults,
    /// The path was given but no file exists there
    Missing(Utf8PathBuf),
    /// Settings were read from this file
    File(Utf8PathBuf),
}

impl ConfigSource {
    /// Log where the configuration came from
    pub fn report(&self) {
        match self {
            ConfigSource::Defaults => tracing::debug!("No config file given, using defaults"),
            ConfigSource::Missing(path) => {
                tracing::warn!("Config file not found at {}, using defaults", path)
            }
            ConfigSource::File(path) => tracing::info!("Loaded config from {}", path),
        }
    }
}

impl ShellConfig {
    /// Load configuration from an optional YAML file
    ///
    /// # Returns
    /// Defaults when `path` is `None` or the file does not exist
    ///
    /// # Errors
    /// If the file cannot be read, is not valid YAML, or fails validation
    pub fn load(path: Option<&Utf8Path>) -> Result<Self> {
        let (config, source) = Self::load_with_source(path)?;
        source.report();
        Ok(config)
    }

    /// Like [`ShellConfig::load`], but returns the [`ConfigSource`] instead
    /// of logging it
    pub fn load_with_source(path: Option<&Utf8Path>) -> Result<(Self, ConfigSource)> {
        let Some(path) = path else {
            return Ok((Self::default(), ConfigSource::Defaults));
        };

        if !path.exists() {
            return Ok((Self::default(), ConfigSource::Missing(path.to_path_buf())));
        }

        let file_contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path))?;

        let config: ShellConfig = serde_yaml_ng::from_str(&file_contents)
            .with_context(|| format!("Failed to parse config: {}", path))?;

        config
            .validate()
            .with_context(|| format!("Invalid config: {}", path))?;

        Ok((config, ConfigSource::File(path.to_path_buf())))
    }

    /// Save configuration as YAML
    pub fn save(&self, path: &Utf8Path) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(self).context("Failed to serialize config to YAML")?;

        fs::write(path, yaml_string)
            .with_context(|| format!("Failed to write config: {}", path))?;

        tracing::info!("Saved config to {}", path);
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.window.tick_interval_ms == 0 {
            bail!("window.tick_interval_ms must be greater than zero");
        }
        if self.window.show_log && self.window.log_max_lines == 0 {
            bail!("window.log_max_lines must be greater than zero when the log is shown");
        }
        if self.logging.file_name.trim().is_empty() {
            bail!("logging.file_name must not be empty");
        }
        Ok(())
    }
}

/// Resolve `path` against `base` unless it is already absolute
pub fn resolve_against(path: &Utf8Path, base: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Current working directory as a UTF-8 path
pub fn current_dir() -> Result<Utf8PathBuf> {
    let dir = std::env::current_dir().context("Failed to read working directory")?;
    Utf8PathBuf::try_from(dir).context("Working directory is not valid UTF-8")
}

/// Directory containing the running executable
pub fn install_dir() -> Result<Utf8PathBuf> {
    let exe = std::env::current_exe().context("Failed to locate executable")?;
    let exe = Utf8PathBuf::try_from(exe).context("Executable path is not valid UTF-8")?;

    exe.parent()
        .map(Utf8Path::to_path_buf)
        .with_context(|| format!("Executable has no parent directory: {}", exe))
}

/// Make the installation directory the working directory
///
/// Relative paths (such as the log directory) resolve against it.
pub fn enter_install_dir() -> Result<Utf8PathBuf> {
    let dir = install_dir()?;
    std::env::set_current_dir(&dir)
        .with_context(|| format!("Failed to change directory to {}", dir))?;
    Ok(dir)
}
