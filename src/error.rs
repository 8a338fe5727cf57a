//! Error types for the docintel-client library.
//!
//! Three distinct error types reflect three distinct failure modes:
//!
//! * [`ClientError`]: **Fatal** for the call that produced it: the client
//!   cannot even start (bad configuration, unreadable input file, unknown
//!   tool, output file not writable). Returned as `Err(ClientError)` from the
//!   top-level `convert*` functions.
//!
//! * [`SubmissionError`]: the backend refused the request or could not be
//!   reached. It never escapes a [`crate::session::ToolSession`]: the
//!   submission state machine turns it into the `Error` state, and the user
//!   recovers by resetting or retrying.
//!
//! * [`Rejection`]: **Non-fatal**: a file offered to the input collector
//!   failed client-side validation. Reported inline and never sent over the
//!   network; previously accepted files are untouched.

use std::path::PathBuf;
use thiserror::Error;

/// Message shown when a failed response carries no parseable body.
pub const UNKNOWN_ERROR: &str = "Unknown Error";

/// Message shown when a failed response parses but carries no `detail` string.
pub const PROCESSING_FAILED: &str = "Processing failed";

/// All fatal errors returned by the docintel-client library.
#[derive(Debug, Error)]
pub enum ClientError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Input file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// Reading an input file failed for another reason.
    #[error("Failed to read input file '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input collector refused the file.
    #[error("{0}")]
    Rejected(#[from] Rejection),

    /// The selected input is empty or does not match the tool's input mode.
    #[error("Invalid input for tool '{tool}': {reason}")]
    InvalidInput { tool: String, reason: String },

    /// Submit was triggered with no file selected and no text entered.
    #[error("Nothing to submit: select a file or enter some text")]
    EmptyInput,

    /// No tool is registered under the requested identifier.
    #[error("Tool not found: '{id}'\nRun `docintel list` to see the available tools.")]
    UnknownTool { id: String },

    /// A target language was given that is not in the language table.
    #[error("Unknown language '{0}'\nRun `docintel languages` to see the supported languages.")]
    UnknownLanguage(String),

    // ── Submission errors ─────────────────────────────────────────────────
    /// The backend returned a failure or could not be reached.
    #[error(transparent)]
    Submission(#[from] SubmissionError),

    /// A submission is already in flight for this session.
    #[error("A submission is already in progress")]
    Busy,

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A failed submission, as surfaced to the user in the `Error` state.
///
/// `Display` is exactly the message the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// Non-success HTTP status. `message` is the backend `detail` string,
    /// [`PROCESSING_FAILED`] when the body had none, or [`UNKNOWN_ERROR`]
    /// when the body was not JSON at all.
    #[error("{message}")]
    Backend { status: u16, message: String },

    /// The request never produced a response (connection refused, DNS, …).
    #[error("Failed to reach the conversion service: {0}")]
    Network(String),

    /// An input file could not be read while building the request.
    #[error("Failed to read input: {0}")]
    Input(String),

    /// A success status arrived but the body did not have the declared shape.
    #[error("Unexpected response from the conversion service: {0}")]
    MalformedResponse(String),

    /// The response was fine but the result could not be stored locally.
    #[error("Failed to store the conversion result: {0}")]
    Storage(String),
}

impl SubmissionError {
    /// HTTP status of a backend failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            SubmissionError::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Why the input collector refused a file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// File exceeds the size ceiling.
    #[error("File is too large. Max size is {}MB.", megabytes(*max_size))]
    TooLarge {
        file_name: String,
        size: u64,
        max_size: u64,
    },

    /// Neither the MIME type nor the extension is accepted by the tool.
    #[error("File type must be one of {accepted}")]
    InvalidType { file_name: String, accepted: String },

    /// More than one file offered to a single-file tool.
    #[error("Too many files")]
    TooManyFiles { offered: usize },
}

/// Byte count as megabytes, rounded up to two decimals so a ceiling is
/// never understated: `50`, `1.5`, `0.01`.
pub fn megabytes(bytes: u64) -> String {
    const MB: u64 = 1024 * 1024;
    let hundredths = bytes.saturating_mul(100).div_ceil(MB);
    let (whole, frac) = (hundredths / 100, hundredths % 100);
    match frac {
        0 => format!("{whole}"),
        f if f % 10 == 0 => format!("{whole}.{}", f / 10),
        f => format!("{whole}.{f:02}"),
    }
}
