use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// HTTP stack crates that only get a say when something goes wrong.
const TRANSPORT_TARGETS: &[&str] = &["reqwest", "hyper", "hyper_util"];

/// Per-crate levels: the dashboard at debug when verbose, the HTTP stack at warn.
fn dashboard_targets(verbose: bool) -> Targets {
    if !verbose {
        return Targets::new().with_default(LevelFilter::OFF);
    }

    TRANSPORT_TARGETS
        .iter()
        .fold(Targets::new(), |targets, target| {
            targets.with_target(*target, LevelFilter::WARN)
        })
        .with_target("ufdash", LevelFilter::DEBUG)
}

/// Installs the global subscriber. Events go to stderr so the rendered
/// dashboard on stdout stays clean, and colors follow the terminal.
pub fn init_logging(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "off" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .pretty()
                .without_time()
                .with_ansi(console::colors_enabled_stderr())
                .with_writer(std::io::stderr),
        )
        .with(dashboard_targets(verbose))
        .with(env_filter)
        .init();
}
