//! Tracing subscriber initialization with structured logging and optional
//! OpenTelemetry trace export.
//!
//! # Usage
//!
//! ```no_run
//! let directives = hxai_observe::tracing_setup::default_directives(0, false, None);
//!
//! // Structured logging only
//! hxai_observe::tracing_setup::init_tracing(&directives, false).unwrap();
//! ```

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use std::sync::OnceLock;

/// Stores the OTel tracer provider so it can be shut down cleanly on exit.
static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

/// Filter directives used when `RUST_LOG` is not set.
///
/// `verbose` is the `-v` count. `debug_level` is the legacy `DEBUG_LEVEL`
/// variable: 1 enables debug output for hxai crates, 2 or more enables
/// trace output (which includes prompts and raw model responses). The
/// louder of the two wins; `quiet` only applies when neither is set.
pub fn default_directives(verbose: u8, quiet: bool, debug_level: Option<u8>) -> String {
    let level = verbose.max(debug_level.unwrap_or(0));
    match level {
        0 if quiet => "error".to_string(),
        0 => "warn,hxai=info,tower_http=info".to_string(),
        1 => "info,hxai=debug".to_string(),
        _ => "debug,hxai=trace".to_string(),
    }
}

/// Initialize the global tracing subscriber.
///
/// - Always installs a structured `fmt` layer with target visibility and span
///   close timing.
/// - When `enable_otel` is true, additionally bridges tracing spans to
///   OpenTelemetry using a stdout exporter.
/// - `RUST_LOG` takes precedence over `default_directives`.
///
/// # Errors
///
/// Returns an error if the global subscriber has already been set.
pub fn init_tracing(
    default_directives: &str,
    enable_otel: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    if enable_otel {
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
            .build();
        let tracer = provider.tracer("hxai");
        let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);

        let _ = TRACER_PROVIDER.set(provider.clone());
        opentelemetry::global::set_tracer_provider(provider);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    Ok(())
}

/// Flush pending traces and shut down the OpenTelemetry tracer provider.
///
/// No-op when OTel was not enabled.
pub fn shutdown_tracing() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            eprintln!("Warning: OTel tracer provider shutdown error: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_quietish() {
        assert_eq!(default_directives(0, false, None), "warn,hxai=info,tower_http=info");
        assert_eq!(default_directives(0, true, None), "error");
    }

    #[test]
    fn test_debug_level_maps_to_debug_and_trace() {
        assert!(default_directives(0, false, Some(1)).contains("hxai=debug"));
        assert!(default_directives(0, false, Some(2)).contains("hxai=trace"));
        assert!(default_directives(0, true, Some(3)).contains("hxai=trace"));
    }

    #[test]
    fn test_verbose_flag_and_debug_level_take_the_louder() {
        assert_eq!(
            default_directives(2, false, Some(1)),
            default_directives(0, false, Some(2))
        );
    }

    #[test]
    fn test_directives_parse() {
        for level in 0..3 {
            let directives = default_directives(level, false, None);
            assert!(EnvFilter::try_new(&directives).is_ok(), "{directives}");
        }
    }

    #[test]
    fn test_hxai_directive_covers_workspace_crates() {
        let subscriber =
            tracing_subscriber::registry().with(EnvFilter::new(default_directives(1, false, None)));
        tracing::subscriber::with_default(subscriber, || {
            assert!(tracing::enabled!(target: "hxai_core::service", tracing::Level::DEBUG));
            assert!(tracing::enabled!(target: "hxai::http::router", tracing::Level::DEBUG));
            assert!(!tracing::enabled!(target: "hyper::proto", tracing::Level::DEBUG));
        });
    }

    #[test]
    fn test_shutdown_without_otel_is_noop() {
        shutdown_tracing();
    }
}
