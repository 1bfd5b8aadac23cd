use crate::destination::Destination;
use chrono::{DateTime, NaiveDate, Utc};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;

/// Time-rotated file destination for one logical stream.
///
/// Physical files live at `<directory>/<name>.<token>` where the token
/// is derived from the rotation boundary (`2024-05-06` for whole-day
/// intervals, `2024-05-06-07` otherwise), so names sort chronologically.
/// The bare `<directory>/<name>` path is a stable alias that always
/// points at the active physical file; log shipping tools follow the
/// alias and never see a half-updated target.
///
/// Every write runs check-rotate-append under one per-sink mutex, so
/// records are never interleaved and a boundary crossing rotates exactly
/// once. Files whose token is older than the retention window are
/// removed opportunistically after a write; a failed prune is reported
/// to stderr and never fails the write that triggered it.
pub struct RotatingFileSink {
    directory: PathBuf,
    logical_name: String,
    alias: PathBuf,
    rotation_secs: i64,
    retention_secs: i64,
    daily_tokens: bool,
    state: Mutex<SinkState>,
}

struct SinkState {
    file: Option<File>,
    /// Unix seconds of the boundary the active file belongs to. Only
    /// committed after a rotation fully succeeds, so a failed rotation
    /// is retried by the next write instead of poisoning the sink.
    boundary: Option<i64>,
}

impl RotatingFileSink {
    /// Create a sink for the logical stream `name` under `directory`.
    ///
    /// The directory must already exist (bootstrap happens at logger
    /// construction); the first write opens the first physical file.
    pub fn new(
        directory: impl Into<PathBuf>,
        name: impl Into<String>,
        rotation_hours: u64,
        retention_hours: u64,
    ) -> Self {
        let directory = directory.into();
        let logical_name = name.into();
        let rotation_hours = rotation_hours.max(1);
        Self {
            alias: directory.join(&logical_name),
            directory,
            logical_name,
            rotation_secs: rotation_hours as i64 * 3600,
            retention_secs: retention_hours as i64 * 3600,
            daily_tokens: rotation_hours % 24 == 0,
            state: Mutex::new(SinkState {
                file: None,
                boundary: None,
            }),
        }
    }

    /// Boundary containing `secs`, anchored at the Unix epoch. For the
    /// default 24h interval this is UTC midnight.
    fn boundary_for(&self, secs: i64) -> i64 {
        secs - secs.rem_euclid(self.rotation_secs)
    }

    fn token(&self, boundary: i64) -> String {
        let when = DateTime::<Utc>::from_timestamp(boundary, 0).unwrap_or_default();
        if self.daily_tokens {
            when.format("%Y-%m-%d").to_string()
        } else {
            when.format("%Y-%m-%d-%H").to_string()
        }
    }

    /// Parse a boundary token back to Unix seconds. Accepts both token
    /// shapes so leftovers from a previous interval config still age out.
    fn parse_token(token: &str) -> Option<i64> {
        if let Ok(date) = NaiveDate::parse_from_str(token, "%Y-%m-%d") {
            return Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp());
        }
        let (date, hour) = token.rsplit_once('-')?;
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
        let hour: u32 = hour.parse().ok()?;
        Some(date.and_hms_opt(hour, 0, 0)?.and_utc().timestamp())
    }

    fn physical_path(&self, boundary: i64) -> PathBuf {
        self.directory
            .join(format!("{}.{}", self.logical_name, self.token(boundary)))
    }

    fn write_at(&self, bytes: &[u8], now: DateTime<Utc>) -> io::Result<()> {
        // A poisoned lock only means another thread panicked mid-write;
        // keep logging rather than propagating the panic.
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let boundary = self.boundary_for(now.timestamp());
        if state.boundary != Some(boundary) {
            self.rotate(&mut state, boundary)?;
        }
        let file = state
            .file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "no active log file"))?;
        file.write_all(bytes)?;
        self.prune(now, boundary);
        Ok(())
    }

    /// Open the physical file for `boundary`, repoint the alias, then
    /// commit the new state. Nothing is appended while rotation runs;
    /// the lock held by the caller keeps it from racing another write.
    fn rotate(&self, state: &mut SinkState, boundary: i64) -> io::Result<()> {
        let physical = self.physical_path(boundary);
        let file = OpenOptions::new().create(true).append(true).open(&physical)?;
        self.update_alias(boundary)?;
        state.file = Some(file);
        state.boundary = Some(boundary);
        Ok(())
    }

    /// Atomically repoint the alias at the physical file for `boundary`.
    ///
    /// The link is created under a temporary name and renamed into
    /// place, so a reader of the alias sees either the old target or the
    /// new one, never a missing or half-written link.
    #[cfg(unix)]
    fn update_alias(&self, boundary: i64) -> io::Result<()> {
        let target = format!("{}.{}", self.logical_name, self.token(boundary));
        let staging = self
            .directory
            .join(format!("{}_symlink", self.logical_name));
        let _ = fs::remove_file(&staging);
        std::os::unix::fs::symlink(&target, &staging)?;
        fs::rename(&staging, &self.alias)
    }

    /// Without symlinks the alias is a hard link to the physical file.
    #[cfg(not(unix))]
    fn update_alias(&self, boundary: i64) -> io::Result<()> {
        let _ = fs::remove_file(&self.alias);
        fs::hard_link(self.physical_path(boundary), &self.alias)
    }

    /// Delete physical files whose boundary token has aged past the
    /// retention window. Best effort: failures are reported to stderr
    /// and never escalate into the triggering write. The alias carries
    /// no token and is never a candidate; the active boundary's file is
    /// skipped even when the window is shorter than the interval.
    fn prune(&self, now: DateTime<Utc>, current_boundary: i64) {
        let entries = match fs::read_dir(&self.directory) {
            Ok(entries) => entries,
            Err(e) => {
                eprintln!(
                    "log prune: cannot read {}: {}",
                    self.directory.display(),
                    e
                );
                return;
            }
        };
        let prefix = format!("{}.", self.logical_name);
        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let Some(token) = name.strip_prefix(&prefix) else {
                continue;
            };
            let Some(file_boundary) = Self::parse_token(token) else {
                continue;
            };
            if file_boundary == current_boundary {
                continue;
            }
            if now.timestamp() - file_boundary > self.retention_secs {
                if let Err(e) = fs::remove_file(entry.path()) {
                    eprintln!("log prune: cannot remove {}: {}", name, e);
                }
            }
        }
    }
}

impl Destination for RotatingFileSink {
    fn name(&self) -> &str {
        &self.logical_name
    }

    fn write(&self, bytes: &[u8]) -> io::Result<()> {
        self.write_at(bytes, Utc::now())
    }

    fn sync(&self) -> io::Result<()> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        match &state.file {
            Some(file) => file.sync_all(),
            None => Ok(()),
        }
    }
}
