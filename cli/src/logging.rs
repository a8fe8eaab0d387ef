//! Logging setup for the fusebox binary.
//!
//! Logs go to stderr so fired fuse messages on stdout stay readable.
//! Set `DEBUG_LOGGING=1` to enable debug output for fusebox crates.

use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub fn init() {
    let debug_logging = std::env::var("DEBUG_LOGGING").is_ok();

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(EnvFilter::new(filter_directive(debug_logging)))
        .init();

    tracing::debug!(debug_logging, "fusebox logging initialized");
}

/// Filter directives: INFO+ for everything, DEBUG+ for fusebox crates when
/// `DEBUG_LOGGING` is set
fn filter_directive(debug_logging: bool) -> &'static str {
    if debug_logging {
        "info,fusebox=debug,fusebox_cli=debug,fusebox_core=debug"
    } else {
        "info"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn test_default_filter_keeps_fired_info_lines() {
        let filter = EnvFilter::new(filter_directive(false));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_debug_filter_raises_fusebox_crates() {
        let filter = EnvFilter::new(filter_directive(true));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }
}
