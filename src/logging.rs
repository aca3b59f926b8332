use env_logger::Env;

/// Installs env_logger. `RUST_LOG` wins over `default_level`.
pub fn init(default_level: &str) {
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();
}
