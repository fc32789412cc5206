//! Structured logging for lsr-core.
//!
//! stdout carries command payloads only; every log line goes to stderr,
//! either human-formatted or as JSONL (see [`JsonlLayer`]). Events use
//! their name from [`event_names`] as the tracing target and carry a
//! `run_id` plus a [`Stage`]. Findings values are logged at debug level at
//! most, and the JSONL layer withholds them even then.

pub mod config;
pub mod events;
pub mod layer;

pub use config::{verbosity_level, LogConfig, LogFormat};
pub use events::{event_names, LogContext, Stage};
pub use layer::JsonlLayer;

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber. Call once, before the first event.
pub fn init_logging(config: &LogConfig) {
    // Targets are event names rather than module paths, so only the level
    // is meaningful as a filter.
    let filter = EnvFilter::new(config.level.to_string());
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Jsonl => registry.with(JsonlLayer::stderr()).init(),
        LogFormat::Human => {
            let human = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(std::io::stderr().is_terminal());
            if config.timestamps {
                registry.with(human).init();
            } else {
                registry.with(human.without_time()).init();
            }
        }
    }
}

/// `run-` followed by twelve hex digits.
pub fn generate_run_id() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("run-{}", &id[..12])
}

/// Emit a named event carrying the run id and stage from a [`LogContext`].
///
/// ```ignore
/// log_event!(ctx, INFO, event_names::REPORT_GENERATED, Stage::Compose,
///     "report generated", branch = %branch);
/// ```
#[macro_export]
macro_rules! log_event {
    ($ctx:expr, $level:ident, $event:expr, $stage:expr, $msg:expr $(, $($field:tt)+)?) => {
        tracing::event!(
            target: $event,
            tracing::Level::$level,
            run_id = %$ctx.run_id,
            stage = %$stage,
            $($($field)+,)?
            message = $msg
        )
    };
}
