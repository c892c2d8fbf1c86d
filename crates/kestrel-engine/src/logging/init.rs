use std::sync::Once;

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// `default_filter` follows `env_logger` filter syntax (e.g. "info" or
/// "kestrel_engine=debug,wgpu=warn") and applies when `RUST_LOG` is unset;
/// the environment always wins. Subsequent calls are ignored. Intended
/// usage is at the top of `main`, before the runtime is constructed.
pub fn init_logging(default_filter: &str) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.parse_filters(default_filter);
        }

        builder.init();

        log::debug!("logging initialized");
    });
}
