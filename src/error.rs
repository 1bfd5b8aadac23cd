use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal configuration faults detected at logger construction.
///
/// These abort initialization: silently ending up with an unusable file
/// destination would drop output without anyone noticing.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("log path {} exists but is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("cannot create log directory {}: {source}", .path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Reported by a fan-out when at least one member destination failed.
///
/// Every member is attempted before this is built, so it names only the
/// destinations that actually failed; the others received the write.
#[derive(Debug, Error)]
#[error("write failed for {}", summarize(.failures))]
pub struct PartialWriteError {
    pub failures: Vec<(String, io::Error)>,
}

impl PartialWriteError {
    /// Comma-separated names of the failed destinations.
    pub fn failed_names(&self) -> String {
        self.failures
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn summarize(failures: &[(String, io::Error)]) -> String {
    failures
        .iter()
        .map(|(name, e)| format!("{name}: {e}"))
        .collect::<Vec<_>>()
        .join("; ")
}
