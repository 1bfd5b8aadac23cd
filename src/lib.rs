pub mod config;
pub mod destination;
pub mod error;
pub mod fanout;
pub mod format;
pub mod level;
pub mod logger;
pub mod record;
pub mod rotating;
pub mod router;

#[cfg(feature = "tracing-bridge")]
pub mod layer;

pub mod init;
