use std::sync::Arc;
use tracing::{error, info, warn};

use tiered_log::config::Config;
use tiered_log::init::{global, init_tracing};
use tiered_log::level::Level;
use tiered_log::logger::Logger;

fn main() {
    let config = Config::new("bridge-demo")
        .with_level(Level::Debug)
        .with_file_out("./logs");
    let logger = Arc::new(Logger::new(config).expect("logger init"));
    init_tracing(logger);

    info!(user = "alice", "signed in");
    warn!(queue_depth = 512, "queue filling up");
    error!("request handler panicked");

    if let Some(logger) = global() {
        logger.flush();
    }
}
