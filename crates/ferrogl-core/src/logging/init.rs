use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "warn",
/// "ferrogl_core=trace"). When it is `None`, `RUST_LOG` is consulted, then
/// `default_level`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub default_level: log::LevelFilter,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            default_level: log::LevelFilter::Info,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

fn builder(config: &LoggingConfig) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();

    match config.env_filter.clone().or_else(|| std::env::var("RUST_LOG").ok()) {
        Some(filter) => {
            builder.parse_filters(&filter);
        }
        None => {
            builder.filter_level(config.default_level);
        }
    }
    builder.write_style(config.write_style);
    builder
}

/// Initializes the global logger once.
///
/// Idempotent; later calls are ignored, as is a logger installed elsewhere.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        if builder(&config).try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });
}
