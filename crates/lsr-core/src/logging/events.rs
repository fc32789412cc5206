//! Event names, pipeline stages, and the per-run context.

use std::fmt;

/// Where in the pipeline an event was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Startup and settings resolution.
    Init,
    /// Reading the findings document and `--set` overrides.
    Load,
    Classify,
    Compose,
    /// Writing the report file.
    Export,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Init => "init",
            Stage::Load => "load",
            Stage::Classify => "classify",
            Stage::Compose => "compose",
            Stage::Export => "export",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event names, used as the tracing target of every event.
///
/// The prefix before the dot is the stage.
pub mod event_names {
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";

    pub const CONFIG_LOADED: &str = "init.config_loaded";
    pub const CONFIG_DEFAULT_USED: &str = "init.config_default_used";
    pub const CONFIG_ERROR: &str = "init.config_error";

    pub const FINDINGS_LOADED: &str = "load.findings_loaded";
    pub const FIELD_ASSIGNED: &str = "load.field_assigned";
    pub const SELECTIONS_CLEARED: &str = "load.selections_cleared";

    pub const CLASSIFICATION_REFRESHED: &str = "classify.refreshed";

    pub const REPORT_GENERATED: &str = "compose.report_generated";
    pub const BRANCH_INCOMPLETE: &str = "compose.branch_incomplete";
    pub const SELECTION_UNRECOGNIZED: &str = "compose.selection_unrecognized";

    pub const REPORT_EXPORTED: &str = "export.report_exported";
    pub const EXPORT_FAILED: &str = "export.failed";
}

/// Identity of one CLI invocation, threaded through command handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogContext {
    pub run_id: String,
}

impl LogContext {
    pub fn new(run_id: impl Into<String>) -> Self {
        LogContext {
            run_id: run_id.into(),
        }
    }

    /// Root span for the run.
    ///
    /// Library code logs without a run id; entering this span lets the
    /// JSONL layer attach it.
    pub fn run_span(&self) -> tracing::Span {
        tracing::info_span!("run", run_id = %self.run_id)
    }
}
