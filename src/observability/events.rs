//! Observable events
//!
//! Every log line the crate emits names one of these.

use std::fmt;

use super::logger::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    ConfigLoaded,
    ServerStart,
    ServerStop,

    // Model store
    ModelLoaded,
    ModelMissing,
    ModelSaved,

    // Uploads
    UploadReceived,
    UploadRejected,

    // Explanation runs
    ExplainStart,
    FeaturesZeroFilled,
    ExplainComplete,
    ExplainFailed,

    // Export
    ExportWritten,
}

impl Event {
    /// Returns the event name written to the log
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ServerStart => "SERVER_START",
            Event::ServerStop => "SERVER_STOP",
            Event::ModelLoaded => "MODEL_LOADED",
            Event::ModelMissing => "MODEL_MISSING",
            Event::ModelSaved => "MODEL_SAVED",
            Event::UploadReceived => "UPLOAD_RECEIVED",
            Event::UploadRejected => "UPLOAD_REJECTED",
            Event::ExplainStart => "EXPLAIN_START",
            Event::FeaturesZeroFilled => "FEATURES_ZERO_FILLED",
            Event::ExplainComplete => "EXPLAIN_COMPLETE",
            Event::ExplainFailed => "EXPLAIN_FAILED",
            Event::ExportWritten => "EXPORT_WRITTEN",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::ModelMissing | Event::FeaturesZeroFilled | Event::UploadRejected => {
                Severity::Warn
            }
            Event::ExplainFailed => Severity::Error,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
