//! Logging setup
//!
//! Diagnostics go through the `log` facade. `env_logger` writes them to
//! stderr; `RUST_LOG` overrides the configured level. Call sites use the
//! `log` macros directly.

/// Initialize the logging system with a default filter such as `"info"`
///
/// Safe to call more than once; later calls are ignored.
pub fn init(default_level: &str) {
    let env = env_logger::Env::default().default_filter_or(default_level);
    let result = env_logger::Builder::from_env(env)
        .target(env_logger::Target::Stderr)
        .try_init();

    if result.is_err() {
        log::debug!("Logger already initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_does_not_panic() {
        init("debug");
        init("info");
    }
}
