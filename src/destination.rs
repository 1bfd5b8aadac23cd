use std::io::{self, Write};

/// A place encoded records can be durably written.
///
/// Implementations transport bytes to a concrete output (a standard
/// stream, a rotating file). `write` receives exactly one encoded,
/// newline-terminated record per call and must not interleave it with
/// records written by other threads. `sync` flushes anything buffered;
/// it is called on shutdown and may be called at any time in between.
///
/// Writes are synchronous: the emitting thread performs the whole write
/// chain before returning, so a slow destination adds latency to the
/// caller rather than unbounded buffering.
pub trait Destination: Send + Sync {
    /// Short name used when reporting partial write failures.
    fn name(&self) -> &str;

    /// Deliver one encoded record.
    fn write(&self, bytes: &[u8]) -> io::Result<()>;

    /// Flush buffered data to the underlying output.
    fn sync(&self) -> io::Result<()>;
}

/// Which standard stream a [`Console`] destination wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdStream {
    Stdout,
    Stderr,
}

/// Destination wrapping an already-open standard stream.
///
/// The stdlib stream locks serialize concurrent writers, so one record
/// is never interleaved with another.
pub struct Console {
    stream: StdStream,
}

impl Console {
    pub fn stdout() -> Self {
        Self {
            stream: StdStream::Stdout,
        }
    }

    pub fn stderr() -> Self {
        Self {
            stream: StdStream::Stderr,
        }
    }
}

impl Destination for Console {
    fn name(&self) -> &str {
        match self.stream {
            StdStream::Stdout => "stdout",
            StdStream::Stderr => "stderr",
        }
    }

    fn write(&self, bytes: &[u8]) -> io::Result<()> {
        match self.stream {
            StdStream::Stdout => io::stdout().lock().write_all(bytes),
            StdStream::Stderr => io::stderr().lock().write_all(bytes),
        }
    }

    fn sync(&self) -> io::Result<()> {
        match self.stream {
            StdStream::Stdout => io::stdout().lock().flush(),
            StdStream::Stderr => io::stderr().lock().flush(),
        }
    }
}
