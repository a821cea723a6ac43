//! Logging setup. All output goes to stderr so compiled policies can be piped
//! from stdout.

use eyre::{Result, WrapErr};
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing from settings; `RUST_LOG` is not consulted
pub fn init_tracing_with_config(level: &str, json_format: bool, include_spans: bool) -> Result<()> {
    let env_filter =
        EnvFilter::try_new(level).wrap_err_with(|| format!("Invalid log level: {level}"))?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    if json_format {
        Registry::default()
            .with(env_filter)
            .with(
                fmt_layer
                    .json()
                    .with_current_span(include_spans)
                    .with_span_list(include_spans),
            )
            .init();
    } else {
        Registry::default()
            .with(env_filter)
            .with(fmt_layer.pretty().with_ansi(true))
            .init();
    }

    tracing::debug!(level, json_format, include_spans, "Practice compiler logging initialized");
    Ok(())
}

/// Configure tracing for one compiler component
pub fn configure_component_tracing(component: &str) -> tracing::Span {
    tracing::info_span!("component", name = component)
}

/// Span covering the compilation of one policy document
pub fn create_compile_span(policy_path: &str, asset_name: &str) -> tracing::Span {
    tracing::info_span!(
        "compile",
        policy.path = policy_path,
        asset.name = asset_name,
        sections = tracing::field::Empty,
    )
}
