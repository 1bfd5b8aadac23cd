use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a log record.
///
/// Levels form a total order (`Debug < Info < Warn < Error < Fatal`),
/// which is all the routing layer needs: a record passes the configured
/// minimum when `record.level >= min`, and belongs to the WARN tier when
/// `record.level >= Level::Warn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl Level {
    /// Upper-case name, as it appears in formatted output.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = std::convert::Infallible;

    /// Case-insensitive parse. Unknown names fall back to `Info`, the
    /// same default the configuration surface uses.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_uppercase().as_str() {
            "DEBUG" => Level::Debug,
            "WARN" => Level::Warn,
            "ERROR" => Level::Error,
            "FATAL" => Level::Fatal,
            _ => Level::Info,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_total() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
        assert!(Level::Error < Level::Fatal);
    }

    #[test]
    fn parse_is_case_insensitive_with_info_fallback() {
        assert_eq!("debug".parse::<Level>().unwrap(), Level::Debug);
        assert_eq!("ERROR".parse::<Level>().unwrap(), Level::Error);
        assert_eq!("Warn".parse::<Level>().unwrap(), Level::Warn);
        assert_eq!("nonsense".parse::<Level>().unwrap(), Level::Info);
    }

    #[test]
    fn display_is_upper_case() {
        assert_eq!(Level::Fatal.to_string(), "FATAL");
    }
}
