use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_DIRECTIVE: &str = "xml_transit=info";
pub const VERBOSE_DIRECTIVE: &str = "xml_transit=debug,info";

/// Picks the filter directive: `RUST_LOG` wins, then an explicit level, then
/// the verbose flag.
pub fn filter_directive(verbose: bool, level: Option<&str>) -> String {
    match level {
        Some(level) => format!("xml_transit={}", level),
        None if verbose => VERBOSE_DIRECTIVE.to_string(),
        None => DEFAULT_DIRECTIVE.to_string(),
    }
}

/// Logs go to stderr so the report path printed on stdout stays clean.
pub fn init_cli_logger(verbose: bool, level: Option<&str>, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbose, level)));

    let registry = tracing_subscriber::registry().with(filter);
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    if json {
        registry.with(layer.json()).init();
    } else {
        registry.with(layer.compact()).init();
    }
}
