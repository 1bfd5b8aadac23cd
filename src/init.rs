use crate::logger::Logger;
use std::sync::{Arc, OnceLock};

static DEFAULT: OnceLock<Arc<Logger>> = OnceLock::new();

/// Install a process-wide default logger.
///
/// The core never relies on this: components take a `Logger` by
/// reference. The holder exists only for the application boundary,
/// where threading an explicit instance through is impractical.
/// Returns `false` if a default was already installed.
pub fn install(logger: Arc<Logger>) -> bool {
    DEFAULT.set(logger).is_ok()
}

/// The installed default logger, if any.
pub fn global() -> Option<Arc<Logger>> {
    DEFAULT.get().cloned()
}

/// Install `logger` as the process default and register a `tracing`
/// subscriber that forwards every event into it.
///
/// Panics if a global `tracing` subscriber is already set; call this
/// once, at startup.
#[cfg(feature = "tracing-bridge")]
pub fn init_tracing(logger: Arc<Logger>) {
    use crate::layer::TierLayer;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::Registry;

    install(Arc::clone(&logger));
    let subscriber = Registry::default().with(TierLayer::new(logger));
    tracing::subscriber::set_global_default(subscriber).expect("set global subscriber");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn the_first_install_wins() {
        let first = Arc::new(Logger::new(Config::new("first")).unwrap());
        let second = Arc::new(Logger::new(Config::new("second")).unwrap());

        install(Arc::clone(&first));
        install(second);

        let held = global().unwrap();
        assert_eq!(held.name(), "first");
    }
}
