//! Per-tool page: registry lookup, input, submission and result in one place.
//!
//! ```text
//! ToolPage::open(id) ──▶ NotFound { requested }
//!        │
//!        └──▶ ToolSession
//!               ├─ InputCollector      (files or text)
//!               ├─ LanguagePicker      (translator tools only)
//!               ├─ SubmissionController
//!               └─ ObjectStore         (download results)
//! ```
//!
//! [`ToolSession::submit`] runs one full round trip. Embedders that need to
//! reset while a request is outstanding use [`ToolSession::start`] and
//! [`ToolSession::finish`] instead; a finish for a superseded submission is
//! reported as [`Completion::Stale`] and changes nothing.

use crate::client::{ConversionRequest, Converter};
use crate::config::ClientConfig;
use crate::error::{ClientError, SubmissionError};
use crate::input::files::SelectedFile;
use crate::input::language::{self, LanguagePicker};
use crate::input::InputCollector;
use crate::output::{ConversionResponse, ObjectStore, ResultPayload};
use crate::registry::{self, ToolConfig};
use crate::render::{Clipboard, CopyFeedback, ResultView};
use crate::submission::{Completion, SubmissionController, SubmissionState, Ticket};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

pub const NOT_FOUND_TITLE: &str = "Tool Not Found";
pub const BACK_LINK: &str = "/";
pub const BACK_LABEL: &str = "Back to Dashboard";

/// Result of navigating to a tool identifier.
#[derive(Debug)]
pub enum ToolPage {
    Found(Box<ToolSession>),
    NotFound { requested: String },
}

impl ToolPage {
    /// Unknown identifiers give `NotFound`; only local setup failures error.
    pub fn open(id: &str, config: &ClientConfig) -> Result<Self, ClientError> {
        match registry::lookup(id) {
            Some(tool) => Ok(ToolPage::Found(Box::new(ToolSession::new(tool, config)?))),
            None => {
                debug!("No tool registered for '{}'", id);
                Ok(ToolPage::NotFound {
                    requested: id.trim_start_matches('/').to_string(),
                })
            }
        }
    }

    /// Body text of the not-found view.
    pub fn not_found_message(requested: &str) -> String {
        format!("The tool you requested ({requested}) is not available yet.")
    }
}

fn wrong_mode(tool: &ToolConfig, reason: &str) -> ClientError {
    ClientError::InvalidInput {
        tool: tool.id.to_string(),
        reason: format!("{} {}", tool.title, reason),
    }
}

/// A submission handed out by [`ToolSession::start`].
#[derive(Debug)]
pub struct PendingSubmission {
    pub ticket: Ticket,
    pub request: ConversionRequest,
}

/// State of one open tool page.
#[derive(Debug)]
pub struct ToolSession {
    tool: &'static ToolConfig,
    input: InputCollector,
    language: Option<LanguagePicker>,
    controller: SubmissionController,
    store: ObjectStore,
    copy: CopyFeedback,
}

impl ToolSession {
    pub fn new(tool: &'static ToolConfig, config: &ClientConfig) -> Result<Self, ClientError> {
        let store = ObjectStore::new()
            .map_err(|e| ClientError::Internal(format!("result store: {e}")))?;
        let language = tool
            .needs_target_language
            .then(|| LanguagePicker::new(config.default_target_language.clone()));
        Ok(Self {
            tool,
            input: InputCollector::for_tool(tool, config.max_file_size_bytes),
            language,
            controller: SubmissionController::new(),
            store,
            copy: CopyFeedback::new(config.copy_feedback),
        })
    }

    pub fn tool(&self) -> &'static ToolConfig {
        self.tool
    }

    pub fn input(&self) -> &InputCollector {
        &self.input
    }

    /// `None` unless the tool takes a target language.
    pub fn language(&self) -> Option<&LanguagePicker> {
        self.language.as_ref()
    }

    pub fn language_mut(&mut self) -> Option<&mut LanguagePicker> {
        self.language.as_mut()
    }

    pub fn state(&self) -> &SubmissionState {
        self.controller.state()
    }

    // ── Input ────────────────────────────────────────────────────────────

    /// Offer a batch of files to the collector.
    pub fn offer_files(&mut self, batch: Vec<SelectedFile>) -> Result<(), ClientError> {
        match &mut self.input {
            InputCollector::Files(c) => Ok(c.offer(batch)?),
            InputCollector::Text(_) => Err(wrong_mode(self.tool, "takes text, not files")),
        }
    }

    pub fn remove_file(&mut self, index: usize) -> Option<SelectedFile> {
        match &mut self.input {
            InputCollector::Files(c) => c.remove(index),
            InputCollector::Text(_) => None,
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> Result<(), ClientError> {
        match &mut self.input {
            InputCollector::Text(t) => {
                t.set(text);
                Ok(())
            }
            InputCollector::Files(_) => Err(wrong_mode(self.tool, "takes files, not text")),
        }
    }

    /// Pick the target language by name or code.
    pub fn select_language(&mut self, name_or_code: &str) -> Result<(), ClientError> {
        let found = language::find(name_or_code)
            .ok_or_else(|| ClientError::UnknownLanguage(name_or_code.to_string()))?;
        match self.language.as_mut() {
            Some(picker) => {
                picker.select(found);
                Ok(())
            }
            None => Err(wrong_mode(self.tool, "does not take a target language")),
        }
    }

    /// Submit is enabled: there is input and nothing is in flight.
    pub fn can_submit(&self) -> bool {
        !self.controller.is_busy() && self.input.selected().is_some()
    }

    // ── Submission ───────────────────────────────────────────────────────

    /// Enter `Processing` and build the request to send.
    pub fn start(&mut self) -> Result<PendingSubmission, ClientError> {
        let input = self.input.selected().ok_or_else(|| ClientError::InvalidInput {
            tool: self.tool.id.to_string(),
            reason: "nothing to submit".into(),
        })?;
        let ticket = self.controller.begin(&input)?;
        self.copy.reset();
        info!("{}: submission #{} started", self.tool.id, ticket.seq());
        Ok(PendingSubmission {
            ticket,
            request: ConversionRequest {
                tool: self.tool,
                input,
                target_language: self.language.as_ref().map(|p| p.value().to_string()),
            },
        })
    }

    /// Apply the backend answer for `ticket`.
    pub async fn finish(
        &mut self,
        ticket: Ticket,
        response: Result<ConversionResponse, SubmissionError>,
    ) -> Completion {
        let outcome = match response {
            Ok(r) => ResultPayload::from_response(r, self.tool, &self.store).await,
            Err(e) => Err(e),
        };
        self.controller.complete(ticket, outcome)
    }

    /// One full round trip through `converter`.
    pub async fn submit(&mut self, converter: &dyn Converter) -> Result<Completion, ClientError> {
        let pending = self.start()?;
        let response = converter.convert(&pending.request).await;
        Ok(self.finish(pending.ticket, response).await)
    }

    /// Back to a blank page: state `Idle`, input cleared, result released.
    /// The language choice is kept.
    pub fn reset(&mut self) {
        self.controller.reset();
        self.input.clear();
        self.copy.reset();
    }

    // ── Result ───────────────────────────────────────────────────────────

    pub fn payload(&self) -> Option<&ResultPayload> {
        self.controller.payload()
    }

    pub fn error_message(&self) -> Option<String> {
        self.controller.error_message()
    }

    /// Current result view, if the last submission succeeded.
    pub fn view(&self, now: Instant) -> Option<ResultView> {
        self.controller
            .payload()
            .map(|p| ResultView::build(self.tool, p, &self.copy, now))
    }

    /// Copy the textual result. `Ok(false)` when there is nothing to copy.
    pub fn copy_result(
        &mut self,
        clipboard: &mut dyn Clipboard,
        now: Instant,
    ) -> std::io::Result<bool> {
        let Some(text) = self.controller.payload().and_then(|p| p.copyable_text()) else {
            return Ok(false);
        };
        self.copy.copy(clipboard, text, now)?;
        Ok(true)
    }

    /// Directory holding this page's result files. Removed with the session.
    pub fn result_dir(&self) -> &Path {
        self.store.root()
    }

    pub fn into_outcome(self) -> Option<Result<ResultPayload, SubmissionError>> {
        self.controller.into_outcome()
    }
}
