// crates/simulator-core/src/core/response.rs
// ============================================================================
// Module: Simulator Step Response
// Description: Structured per-step result with a human-readable report.
// Purpose: Carry exactly one success or failure outcome per step.
// Dependencies: base64, serde
// ============================================================================

//! ## Overview
//! Every step produces exactly one [`Response`]. Success fields and the error
//! are mutually exclusive: [`Response::set_error`] clears every success field,
//! so a failed response never carries a partial result.

// ============================================================================
// SECTION: Imports
// ============================================================================

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use serde::Serialize;

use crate::core::error::StepError;
use crate::core::error::StepErrorKind;
use crate::core::identifiers::ProgramId;

// ============================================================================
// SECTION: Response Types
// ============================================================================

/// Error carried by a failed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseError {
    /// Coarse error kind.
    pub kind: StepErrorKind,
    /// Display text of the error.
    pub message: String,
}

impl From<&StepError> for ResponseError {
    fn from(error: &StepError) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

/// Success payload of a response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    /// Generated program or call identifier, as text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Free-text message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    /// Completion time in unix seconds.
    pub timestamp: u64,
    /// Single execution result payload.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::core::step::base64_option"
    )]
    pub response: Option<Vec<u8>>,
    /// Caller balance after an execute call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<u64>,
}

/// Result of one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Step index.
    pub id: usize,
    /// Endpoint label as written in the step.
    pub endpoint: String,
    /// Method name.
    pub method: String,
    /// Error, when the step failed.
    pub error: Option<ResponseError>,
    /// Success payload.
    pub result: StepResult,
    /// Typed identifier generated by the step; only set on success.
    #[serde(skip)]
    generated: Option<ProgramId>,
}

impl Response {
    /// Creates an empty response for a step.
    #[must_use]
    pub fn new(id: usize, endpoint: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            id,
            endpoint: endpoint.into(),
            method: method.into(),
            error: None,
            result: StepResult::default(),
            generated: None,
        }
    }

    /// Creates a failed response for a step that was rejected before dispatch.
    #[must_use]
    pub fn rejected(
        id: usize,
        endpoint: impl Into<String>,
        method: impl Into<String>,
        error: &StepError,
    ) -> Self {
        let mut response = Self::new(id, endpoint, method);
        response.set_error(error);
        response
    }

    /// Sets the free-text message.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.result.msg = Some(message.into());
    }

    /// Records the identifier generated by the step.
    pub fn set_generated_id(&mut self, id: ProgramId) {
        self.result.id = Some(id.to_string());
        self.generated = Some(id);
    }

    /// Sets the single result payload; empty payloads are omitted.
    pub fn set_payload(&mut self, payload: Vec<u8>) {
        self.result.response = if payload.is_empty() { None } else { Some(payload) };
    }

    /// Sets the caller balance.
    pub const fn set_balance(&mut self, balance: u64) {
        self.result.balance = Some(balance);
    }

    /// Stamps the completion time.
    pub const fn set_timestamp(&mut self, timestamp: u64) {
        self.result.timestamp = timestamp;
    }

    /// Marks the response as failed and clears every success field.
    pub fn set_error(&mut self, error: &StepError) {
        self.result.id = None;
        self.result.msg = None;
        self.result.response = None;
        self.result.balance = None;
        self.generated = None;
        self.error = Some(ResponseError::from(error));
    }

    /// Returns the identifier generated by a successful step.
    #[must_use]
    pub const fn generated_id(&self) -> Option<ProgramId> {
        self.generated
    }

    /// Returns true when the step succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Renders a human-readable multi-line report.
    #[must_use]
    pub fn render_report(&self) -> String {
        let mut lines = vec![
            format!("step: {}", self.id),
            format!("endpoint: {}", self.endpoint),
            format!("method: {}", self.method),
        ];
        if let Some(msg) = &self.result.msg {
            lines.push(format!("message: {msg}"));
        }
        if let Some(id) = &self.result.id {
            lines.push(format!("id: {id}"));
        }
        if let Some(payload) = &self.result.response {
            lines.push(format!("response: {}", STANDARD.encode(payload)));
        }
        if let Some(balance) = self.result.balance {
            lines.push(format!("balance: {balance}"));
        }
        if let Some(error) = &self.error {
            lines.push(format!("error: [{}] {}", error.kind, error.message));
        }
        lines.push(format!("timestamp: {}", self.result.timestamp));
        lines.join("\n")
    }
}
