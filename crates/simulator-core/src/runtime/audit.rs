// crates/simulator-core/src/runtime/audit.rs
// ============================================================================
// Module: Simulator Audit Logging
// Description: Structured JSON-line events for plan step execution.
// Purpose: Record step lifecycle without coupling to a logging framework.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! The plan runner reports each step through a [`StepAuditSink`]. Events are
//! flat JSON objects written one per line. Parameter values are never logged,
//! only their types, because values may carry key names or file paths.
//!
//! [`FilteredAuditSink`] drops events below a minimum [`AuditLevel`] so the
//! command-line `--log-level` flag can silence routine events.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Deserialize;
use serde::Serialize;

use crate::core::StepErrorKind;

// ============================================================================
// SECTION: Levels
// ============================================================================

/// Severity of an audit event.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AuditLevel {
    /// Diagnostic detail.
    Debug,
    /// Routine step lifecycle.
    #[default]
    Info,
    /// Failed or rejected steps.
    Error,
}

impl AuditLevel {
    /// Parses a level label; returns `None` for unknown labels.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Returns the label of the level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Error => "error",
        }
    }
}

// ============================================================================
// SECTION: Events
// ============================================================================

/// Step lifecycle event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event severity.
    pub level: AuditLevel,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Step index.
    pub step: usize,
    /// Endpoint label as written in the step.
    pub endpoint: String,
    /// Method name.
    pub method: String,
    /// Unit budget, for `step_started`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_units: Option<u64>,
    /// Parameter type labels, for `step_started`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub param_types: Vec<String>,
    /// Error kind for failed or rejected steps.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<StepErrorKind>,
    /// Error text or diagnostic message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StepAuditEvent {
    /// Creates an event with a consistent timestamp and no optional fields.
    #[must_use]
    pub fn new(
        event: &'static str,
        level: AuditLevel,
        step: usize,
        endpoint: impl Into<String>,
        method: impl Into<String>,
    ) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event,
            level,
            timestamp_ms,
            step,
            endpoint: endpoint.into(),
            method: method.into(),
            max_units: None,
            param_types: Vec::new(),
            error_kind: None,
            message: None,
        }
    }

    /// Step accepted and about to be dispatched.
    #[must_use]
    pub fn started(
        step: usize,
        endpoint: &str,
        method: &str,
        max_units: u64,
        param_types: Vec<String>,
    ) -> Self {
        let mut event = Self::new("step_started", AuditLevel::Info, step, endpoint, method);
        event.max_units = Some(max_units);
        event.param_types = param_types;
        event
    }

    /// Step dispatched successfully.
    #[must_use]
    pub fn completed(step: usize, endpoint: &str, method: &str) -> Self {
        Self::new("step_completed", AuditLevel::Info, step, endpoint, method)
    }

    /// Step dispatched and failed; the run continues.
    #[must_use]
    pub fn failed(
        step: usize,
        endpoint: &str,
        method: &str,
        kind: StepErrorKind,
        message: String,
    ) -> Self {
        let mut event = Self::new("step_failed", AuditLevel::Error, step, endpoint, method);
        event.error_kind = Some(kind);
        event.message = Some(message);
        event
    }

    /// Step rejected before dispatch; the run halts.
    #[must_use]
    pub fn rejected(
        step: usize,
        endpoint: &str,
        method: &str,
        kind: StepErrorKind,
        message: String,
    ) -> Self {
        let mut event = Self::new("step_rejected", AuditLevel::Error, step, endpoint, method);
        event.error_kind = Some(kind);
        event.message = Some(message);
        event
    }

    /// Key creation found an existing key with the same name.
    #[must_use]
    pub fn named_key_reused(step: usize, method: &str, name: &str) -> Self {
        let mut event = Self::new("named_key_reused", AuditLevel::Debug, step, "key", method);
        event.message = Some(format!("key {name} already exists; reusing it"));
        event
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Destination for step audit events.
pub trait StepAuditSink {
    /// Records an audit event.
    fn record(&self, event: &StepAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrAuditSink;

impl StepAuditSink for StderrAuditSink {
    fn record(&self, event: &StepAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
#[derive(Debug)]
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl StepAuditSink for FileAuditSink {
    fn record(&self, event: &StepAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// Audit sink that drops all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAuditSink;

impl StepAuditSink for NoopAuditSink {
    fn record(&self, _event: &StepAuditEvent) {}
}

/// Audit sink that forwards events at or above a minimum level.
pub struct FilteredAuditSink {
    /// Wrapped sink.
    inner: Box<dyn StepAuditSink>,
    /// Minimum level forwarded to the wrapped sink.
    min_level: AuditLevel,
}

impl FilteredAuditSink {
    /// Wraps `inner`, forwarding only events at or above `min_level`.
    #[must_use]
    pub fn new(inner: Box<dyn StepAuditSink>, min_level: AuditLevel) -> Self {
        Self {
            inner,
            min_level,
        }
    }
}

impl StepAuditSink for FilteredAuditSink {
    fn record(&self, event: &StepAuditEvent) {
        if event.level >= self.min_level {
            self.inner.record(event);
        }
    }
}
