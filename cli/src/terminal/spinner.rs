use indicatif::ProgressStyle;
use tracing::Span;
use tracing_indicatif::IndicatifLayer;
use tracing_indicatif::span_ext::IndicatifSpanExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::terminal::logging::SweeprFormatter;
use crate::terminal::print::PRINT_TARGET;

const TICK_STRINGS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

/// Installs the global subscriber. Log lines are written through the
/// indicatif layer so they never tear the spinner.
///
/// `RUST_LOG` overrides the default filter, but console output on
/// [`PRINT_TARGET`] stays enabled either way.
pub fn init_logging(quiet: u8) {
    let indicatif_layer = IndicatifLayer::new();
    let env_filter: Option<String> = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::registry()
        .with(build_filter(quiet, env_filter.as_deref()))
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(SweeprFormatter)
                .with_writer(indicatif_layer.get_stdout_writer()),
        )
        .with(indicatif_layer)
        .init();
}

fn build_filter(quiet: u8, env_filter: Option<&str>) -> EnvFilter {
    let default_filter: &str = match quiet {
        0 => "info",
        _ => "warn",
    };
    let filter: EnvFilter = env_filter
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default_filter));

    match format!("{PRINT_TARGET}=info").parse::<Directive>() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

/// Turns `span` into a spinner counting finished probes out of `total`.
pub fn attach_progress(span: &Span, total: usize) {
    let style = ProgressStyle::with_template("{spinner:.blue} {msg} {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(TICK_STRINGS);

    span.pb_set_style(&style);
    span.pb_set_length(total as u64);
    span.pb_set_message("Probing hosts");
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
