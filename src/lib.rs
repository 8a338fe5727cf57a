//! # docintel-client
//!
//! Client for the DocIntel document-conversion service: a catalog of tools
//! (PDF↔Word, image↔text, QR and barcode scanning, translation, …) whose
//! actual processing happens on a remote backend.
//!
//! ## Why this crate?
//!
//! Every tool is a `multipart/form-data` POST, but they differ in what they
//! accept (one file, many files, typed text, plus an optional target
//! language) and in what they return (a file, an image, a JSON string or an
//! original/translated pair). This crate keeps those differences in one
//! static registry and gives each tool page the same lifecycle:
//! validated input, a single in-flight submission, and a typed result.
//!
//! ## Overview
//!
//! ```text
//! catalog ──▶ registry::lookup(id) ──▶ ToolPage::{Found, NotFound}
//!                                           │
//!   input::{files, text, language} ─────────┤  validate, collect
//!                                           ▼
//!                       SubmissionController: Idle → Processing
//!                                           │
//!                     client::HttpConverter ─┤  POST /api/convert/<endpoint>
//!                                           ▼
//!                      Success(ResultPayload) | Error(message)
//!                                           │
//!                          render::ResultView ── download / text / pair
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docintel_client::{convert_to_file, ClientConfig, SelectedFile, SelectedInput};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Backend from DOCINTEL_API_URL, else http://localhost:8000
//!     let config = ClientConfig::from_env()?;
//!     let input = SelectedInput::Files(vec![SelectedFile::from_path("report.pdf")?]);
//!     convert_to_file("pdf-to-word", input, None, "report.docx", &config).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `docintel` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! docintel-client = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod catalog;
pub mod client;
pub mod config;
pub mod convert;
pub mod error;
pub mod input;
pub mod output;
pub mod progress;
pub mod registry;
pub mod render;
pub mod session;
pub mod submission;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use client::{ConversionRequest, Converter, HealthStatus, HttpConverter};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use convert::{convert, convert_sync, convert_to_file, convert_with, write_payload};
pub use error::{ClientError, Rejection, SubmissionError};
pub use input::files::{FileCollector, SelectedFile};
pub use input::language::{Language, LanguagePicker};
pub use input::text::TextInput;
pub use input::{InputCollector, SelectedInput};
pub use output::{ConversionResponse, ObjectRef, ObjectStore, PayloadSummary, ResultPayload};
pub use progress::{NoopProgressCallback, ProgressCallback, SubmissionProgressCallback};
pub use registry::{InputMode, ResultShape, ToolConfig};
pub use render::{Clipboard, CopyFeedback, ImagePreview, Osc52Clipboard, ResultView};
pub use session::{PendingSubmission, ToolPage, ToolSession};
pub use submission::{Completion, SubmissionController, SubmissionState, Ticket};
