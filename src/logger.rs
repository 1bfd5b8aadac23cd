use crate::config::Config;
use crate::destination::{Console, Destination};
use crate::error::InitError;
use crate::fanout::FanOut;
use crate::level::Level;
use crate::record::Record;
use crate::rotating::RotatingFileSink;
use crate::router::SeverityRouter;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The record-emission surface.
///
/// A `Logger` is constructed once from a [`Config`] and passed by
/// reference (or `Arc`) to callers; there is no hidden global in the
/// core. Construction wires both tiers: file output (when enabled)
/// routes the INFO tier to `<dir>/<name>` and the WARN tier to
/// `<dir>/<name>-common-error`, console output routes the INFO tier to
/// stdout and the WARN tier to stderr.
///
/// Emission is synchronous: `emit` formats the record and completes the
/// write chain before returning. Call [`Logger::flush`] before process
/// exit.
pub struct Logger {
    router: SeverityRouter,
    name: String,
    console_fallback: bool,
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("console_fallback", &self.console_fallback)
            .finish_non_exhaustive()
    }
}

impl Logger {
    /// Build a logger from `config`.
    ///
    /// Fails with [`InitError`] when the log directory is unusable.
    /// When neither console nor file output is enabled, console output
    /// is force-enabled for both tiers and a single warning is emitted
    /// through it.
    pub fn new(config: Config) -> Result<Self, InitError> {
        let mut info: Vec<Arc<dyn Destination>> = Vec::new();
        let mut warn: Vec<Arc<dyn Destination>> = Vec::new();

        if let Some(file_out) = &config.file_out {
            let directory = match &file_out.directory {
                Some(directory) => directory.clone(),
                None => default_directory(),
            };
            bootstrap_directory(&directory)?;
            info.push(Arc::new(RotatingFileSink::new(
                &directory,
                config.name.clone(),
                file_out.rotation_hours,
                file_out.retention_hours,
            )));
            warn.push(Arc::new(RotatingFileSink::new(
                &directory,
                format!("{}-common-error", config.name),
                file_out.rotation_hours,
                file_out.retention_hours,
            )));
        }

        if config.console {
            info.push(Arc::new(Console::stdout()));
            warn.push(Arc::new(Console::stderr()));
        }

        // Both output modes disabled would leave zero destinations;
        // fall back to console rather than dropping everything.
        let console_fallback = info.is_empty();
        if console_fallback {
            info.push(Arc::new(Console::stdout()));
            warn.push(Arc::new(Console::stderr()));
        }

        let router = SeverityRouter::new(
            config.level,
            config.mode,
            FanOut::new(info),
            FanOut::new(warn),
        );
        let logger = Self {
            router,
            name: config.name,
            console_fallback,
        };
        if console_fallback {
            logger.warn("file and console output are both disabled; falling back to console output");
        }
        Ok(logger)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether construction had to force-enable console output.
    pub fn used_console_fallback(&self) -> bool {
        self.console_fallback
    }

    /// Router carrying the emission counters.
    pub fn router(&self) -> &SeverityRouter {
        &self.router
    }

    /// Emit one record. Caller file and line are resolved at the call
    /// site via `#[track_caller]`; no frame counting involved.
    #[track_caller]
    pub fn emit(
        &self,
        level: Level,
        message: impl Into<String>,
        fields: BTreeMap<String, serde_json::Value>,
    ) {
        let location = std::panic::Location::caller();
        let record =
            Record::new(level, message, fields).with_caller(location.file(), location.line());
        self.router.route(&record);
    }

    /// Route a record whose metadata was already resolved by the
    /// caller. Used by the tracing bridge.
    pub fn emit_record(&self, record: Record) {
        self.router.route(&record);
    }

    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.emit(Level::Debug, message, BTreeMap::new());
    }

    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.emit(Level::Info, message, BTreeMap::new());
    }

    #[track_caller]
    pub fn warn(&self, message: impl Into<String>) {
        self.emit(Level::Warn, message, BTreeMap::new());
    }

    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.emit(Level::Error, message, BTreeMap::new());
    }

    #[track_caller]
    pub fn fatal(&self, message: impl Into<String>) {
        self.emit(Level::Fatal, message, BTreeMap::new());
    }

    /// Flush every destination of both tiers. Required once before
    /// process shutdown.
    pub fn flush(&self) {
        self.router.sync();
    }
}

fn default_directory() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("logs")
}

/// Create the log directory if missing. A path that exists as anything
/// other than a directory is a configuration fault.
fn bootstrap_directory(path: &Path) -> Result<(), InitError> {
    match std::fs::metadata(path) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(InitError::NotADirectory(path.to_path_buf())),
        Err(_) => std::fs::create_dir_all(path).map_err(|source| InitError::CreateDirectory {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileOutConfig;
    use crate::format::OutputMode;
    use std::sync::atomic::Ordering;

    fn file_config(name: &str, dir: &Path) -> Config {
        Config::new(name)
            .with_console(false)
            .with_file_out(dir)
    }

    #[test]
    fn minimum_warn_keeps_only_the_error_record() {
        let dir = tempfile::tempdir().unwrap();
        let logger = Logger::new(
            file_config("svc", dir.path()).with_level(Level::Warn),
        )
        .unwrap();

        logger.debug("noise");
        logger.error("boom");
        logger.flush();

        let warn_out =
            std::fs::read_to_string(dir.path().join("svc-common-error")).unwrap();
        assert!(warn_out.contains("boom"));
        assert!(!warn_out.contains("noise"));
        // The INFO-tier stream never saw a record, so no alias exists.
        assert!(!dir.path().join("svc").exists());
    }

    #[test]
    fn info_and_warn_streams_are_disjoint_files() {
        let dir = tempfile::tempdir().unwrap();
        let logger = Logger::new(file_config("svc", dir.path())).unwrap();

        logger.info("routine");
        logger.warn("trouble");
        logger.flush();

        let info_out = std::fs::read_to_string(dir.path().join("svc")).unwrap();
        let warn_out =
            std::fs::read_to_string(dir.path().join("svc-common-error")).unwrap();
        assert!(info_out.contains("routine"));
        assert!(!info_out.contains("trouble"));
        assert!(warn_out.contains("trouble"));
        assert!(!warn_out.contains("routine"));
    }

    #[test]
    fn json_records_carry_the_call_site() {
        let dir = tempfile::tempdir().unwrap();
        let logger = Logger::new(
            file_config("svc", dir.path()).with_mode(OutputMode::Json),
        )
        .unwrap();

        logger.error("boom");
        logger.flush();

        let line = std::fs::read_to_string(dir.path().join("svc-common-error")).unwrap();
        let value: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
        assert_eq!(value["msg"], "boom");
        assert_eq!(value["level"], "ERROR");
        assert!(value["file"].as_str().unwrap().contains("logger.rs"));
    }

    #[test]
    fn zero_destinations_fall_back_to_console_with_one_warning() {
        let logger = Logger::new(Config::default().with_console(false)).unwrap();
        assert!(logger.used_console_fallback());
        assert_eq!(logger.router().records_total.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn configured_outputs_do_not_trigger_the_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let logger = Logger::new(file_config("svc", dir.path())).unwrap();
        assert!(!logger.used_console_fallback());
        assert_eq!(logger.router().records_total.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn path_occupied_by_a_file_is_a_configuration_fault() {
        let dir = tempfile::tempdir().unwrap();
        let occupied = dir.path().join("logs");
        std::fs::write(&occupied, "not a directory").unwrap();

        let err = Logger::new(file_config("svc", &occupied)).unwrap_err();
        assert!(matches!(err, InitError::NotADirectory(_)));
    }

    #[test]
    fn missing_directories_are_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let logger = Logger::new(file_config("svc", &nested)).unwrap();

        logger.info("hello");
        logger.flush();
        assert!(nested.join("svc").exists());
    }

    #[test]
    fn rotation_parameters_flow_through_the_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::new("svc").with_console(false).with_file_config(FileOutConfig {
            directory: Some(dir.path().to_path_buf()),
            retention_hours: 1,
            rotation_hours: 1,
        });
        let logger = Logger::new(config).unwrap();

        logger.info("hello");
        logger.flush();

        // Hourly rotation produces hour-stamped physical files.
        let produced: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .flatten()
            .filter_map(|e| e.file_name().to_str().map(str::to_string))
            .filter(|n| n.starts_with("svc."))
            .collect();
        assert_eq!(produced.len(), 1);
        assert_eq!(produced[0].len(), "svc.2024-05-06-07".len());
    }
}
