use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Directives used when `RUST_LOG` is unset, blank or unparsable.
const DEFAULT_DIRECTIVES: &str = "info";

/// Install the global subscriber.
///
/// `RUST_LOG` is honoured as given (`RUST_LOG=debug` shows the Gemini
/// request events). Output is JSON unless `RUST_LOG_FORMAT` names another
/// format.
pub fn init_tracing() {
    let filter = env_filter(std::env::var("RUST_LOG").ok().as_deref());
    let format = std::env::var("RUST_LOG_FORMAT").ok();
    let registry = tracing_subscriber::registry().with(filter);

    if json_output(format.as_deref()) {
        registry
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }
}

fn env_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .map(str::trim)
        .filter(|directives| !directives.is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}

fn json_output(format: Option<&str>) -> bool {
    format.is_none_or(|format| format.trim().eq_ignore_ascii_case("json"))
}
