use std::collections::BTreeMap;

use tiered_log::config::Config;
use tiered_log::format;
use tiered_log::level::Level;
use tiered_log::logger::Logger;

fn main() {
    let config = Config::new("demo").with_file_out("./logs");
    let logger = Logger::new(config).expect("logger init");

    logger.debug("dropped: below the default INFO minimum");
    logger.info("written to stdout and ./logs/demo");
    logger.warn("written to stderr and ./logs/demo-common-error");

    let mut fields = BTreeMap::new();
    fields.insert("attempt".to_string(), serde_json::Value::from(3));
    fields.insert(
        "took".to_string(),
        format::duration_ms(std::time::Duration::from_millis(125)),
    );
    logger.emit(Level::Error, "login failed", fields);

    logger.flush();
}
