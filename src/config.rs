use crate::format::OutputMode;
use crate::level::Level;
use std::path::PathBuf;

/// Logger configuration, read once at construction.
///
/// **Fields**
/// - `name`: logical stream name; file output lands at `<dir>/<name>`
///   with the WARN tier at `<dir>/<name>-common-error`.
/// - `level`: single minimum level shared by both tiers.
/// - `mode`: text or JSON encoding.
/// - `console`: mirror the INFO tier to stdout and the WARN tier to
///   stderr.
/// - `file_out`: rotating file output; `None` disables it. If both
///   `console` is false and `file_out` is `None`, construction falls
///   back to console output rather than producing zero destinations.
#[derive(Clone, Debug)]
pub struct Config {
    pub name: String,
    pub level: Level,
    pub mode: OutputMode,
    pub console: bool,
    pub file_out: Option<FileOutConfig>,
}

/// Rotating file output settings.
#[derive(Clone, Debug)]
pub struct FileOutConfig {
    /// Directory holding physical files and aliases. `None` means
    /// `<working directory>/logs`.
    pub directory: Option<PathBuf>,
    /// Maximum age of a physical file before it is pruned.
    pub retention_hours: u64,
    /// Width of one rotation boundary.
    pub rotation_hours: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: "app".to_string(),
            level: Level::Info,
            mode: OutputMode::Text,
            console: true,
            file_out: None,
        }
    }
}

impl Default for FileOutConfig {
    fn default() -> Self {
        Self {
            directory: None,
            retention_hours: 168,
            rotation_hours: 24,
        }
    }
}

impl Config {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_mode(mut self, mode: OutputMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    /// Enable file output with default rotation and retention.
    pub fn with_file_out(mut self, directory: impl Into<PathBuf>) -> Self {
        self.file_out = Some(FileOutConfig {
            directory: Some(directory.into()),
            ..FileOutConfig::default()
        });
        self
    }

    pub fn with_file_config(mut self, file_out: FileOutConfig) -> Self {
        self.file_out = Some(file_out);
        self
    }
}
