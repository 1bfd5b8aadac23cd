use crate::fanout::FanOut;
use crate::format::{self, OutputMode};
use crate::level::Level;
use crate::record::Record;
use std::sync::atomic::{AtomicU64, Ordering};

/// The dual-pipeline core: one minimum level, two fan-outs.
///
/// Records at `Warn` and above go to the WARN tier, everything else to
/// the INFO tier; no record ever reaches both. The level gate is
/// logically single — the tiers decide where a passing record goes, not
/// whether it passes.
///
/// Write failures are swallowed here: a logging failure must never
/// crash the emitting thread, so a failed fan-out write becomes a
/// stderr warning and a counter increment.
pub struct SeverityRouter {
    min_level: Level,
    mode: OutputMode,
    info_tier: FanOut,
    warn_tier: FanOut,
    /// Records seen, before the level gate.
    pub records_total: AtomicU64,
    /// Records dropped below the minimum level.
    pub records_dropped: AtomicU64,
    /// Routed records whose fan-out reported at least one failure.
    pub write_failures: AtomicU64,
}

impl SeverityRouter {
    pub fn new(min_level: Level, mode: OutputMode, info_tier: FanOut, warn_tier: FanOut) -> Self {
        Self {
            min_level,
            mode,
            info_tier,
            warn_tier,
            records_total: AtomicU64::new(0),
            records_dropped: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
        }
    }

    pub fn min_level(&self) -> Level {
        self.min_level
    }

    /// Route one record to exactly one tier, or drop it.
    pub fn route(&self, record: &Record) {
        self.records_total.fetch_add(1, Ordering::Relaxed);
        if record.level < self.min_level {
            self.records_dropped.fetch_add(1, Ordering::Relaxed);
            return;
        }

        let bytes = format::encode(record, self.mode);
        let tier = if record.level >= Level::Warn {
            &self.warn_tier
        } else {
            &self.info_tier
        };
        if let Err(e) = tier.write(&bytes) {
            self.write_failures.fetch_add(1, Ordering::Relaxed);
            eprintln!("log write failed: {e}");
        }
    }

    /// Flush both tiers. Failures are reported the same way as write
    /// failures; shutdown must not turn into a panic either.
    pub fn sync(&self) {
        for tier in [&self.info_tier, &self.warn_tier] {
            if let Err(e) = tier.sync() {
                self.write_failures.fetch_add(1, Ordering::Relaxed);
                eprintln!("log sync failed: {e}");
            }
        }
    }
}
