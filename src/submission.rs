//! Submission state machine.
//!
//! ```text
//!            begin()                complete(Ok)
//!   Idle ──────────────▶ Processing ─────────────▶ Success(payload)
//!    ▲                       │      complete(Err)
//!    │                       └──────────────────▶ Error(message)
//!    └────────────── reset() from any state ───────────┘
//! ```
//!
//! Every `begin()` hands out a [`Ticket`] carrying a fresh sequence number.
//! A completion is applied only when its ticket matches the submission
//! currently in `Processing`; anything else (the user reset or re-submitted
//! meanwhile) is reported as [`Completion::Stale`] and dropped, which also
//! releases any object reference the late result carried.

use crate::error::{ClientError, SubmissionError};
use crate::input::SelectedInput;
use crate::output::ResultPayload;
use tracing::{debug, warn};

/// Where a tool page currently stands.
#[derive(Debug, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Processing {
        seq: u64,
    },
    Success {
        seq: u64,
        payload: ResultPayload,
    },
    Error {
        seq: u64,
        error: SubmissionError,
    },
}

impl SubmissionState {
    /// Short lowercase name: `idle`, `processing`, `success` or `error`.
    pub fn name(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "idle",
            SubmissionState::Processing { .. } => "processing",
            SubmissionState::Success { .. } => "success",
            SubmissionState::Error { .. } => "error",
        }
    }
}

/// Proof that a submission was started; needed to complete it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    seq: u64,
}

impl Ticket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Whether a completion changed the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Stale,
}

/// Owns the single [`SubmissionState`] of a tool page.
#[derive(Debug, Default)]
pub struct SubmissionController {
    state: SubmissionState,
    last_seq: u64,
}

impl SubmissionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// A submission is in flight; the submit action must be disabled.
    pub fn is_busy(&self) -> bool {
        matches!(self.state, SubmissionState::Processing { .. })
    }

    /// Start a submission. Any previous result is discarded.
    pub fn begin(&mut self, input: &SelectedInput) -> Result<Ticket, ClientError> {
        if self.is_busy() {
            return Err(ClientError::Busy);
        }
        if input.is_empty() {
            return Err(ClientError::EmptyInput);
        }
        self.last_seq += 1;
        let seq = self.last_seq;
        self.state = SubmissionState::Processing { seq };
        debug!("Submission #{} started", seq);
        Ok(Ticket { seq })
    }

    /// Resolve the submission identified by `ticket`.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        outcome: Result<ResultPayload, SubmissionError>,
    ) -> Completion {
        match self.state {
            SubmissionState::Processing { seq } if seq == ticket.seq => {}
            _ => {
                warn!(
                    "Discarding stale response for submission #{} (state: {})",
                    ticket.seq,
                    self.state.name()
                );
                return Completion::Stale;
            }
        }
        self.state = match outcome {
            Ok(payload) => SubmissionState::Success {
                seq: ticket.seq,
                payload,
            },
            Err(error) => {
                debug!("Submission #{} failed: {}", ticket.seq, error);
                SubmissionState::Error {
                    seq: ticket.seq,
                    error,
                }
            }
        };
        Completion::Applied
    }

    /// Back to `Idle`, dropping any result. Does not abort an in-flight
    /// request; its completion will come back stale.
    pub fn reset(&mut self) {
        self.state = SubmissionState::Idle;
    }

    pub fn payload(&self) -> Option<&ResultPayload> {
        match &self.state {
            SubmissionState::Success { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// Message shown in the `Error` state.
    pub fn error_message(&self) -> Option<String> {
        match &self.state {
            SubmissionState::Error { error, .. } => Some(error.to_string()),
            _ => None,
        }
    }

    /// Consume the controller, yielding the final outcome if there is one.
    pub fn into_outcome(self) -> Option<Result<ResultPayload, SubmissionError>> {
        match self.state {
            SubmissionState::Success { payload, .. } => Some(Ok(payload)),
            SubmissionState::Error { error, .. } => Some(Err(error)),
            _ => None,
        }
    }
}
