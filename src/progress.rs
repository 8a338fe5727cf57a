//! Progress-callback trait for submission events.
//!
//! Inject an [`Arc<dyn SubmissionProgressCallback>`] via
//! [`crate::config::ClientConfigBuilder::progress_callback`] to be told when a
//! request leaves, when the backend answers and how the submission ended.
//!
//! # Example
//!
//! ```rust
//! use docintel_client::{ClientConfig, SubmissionProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     finished: AtomicUsize,
//! }
//!
//! impl SubmissionProgressCallback for CountingCallback {
//!     fn on_submission_complete(&self, tool_id: &str, success: bool) {
//!         self.finished.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{tool_id}: {}", if success { "ok" } else { "failed" });
//!     }
//! }
//!
//! let config = ClientConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { finished: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by [`crate::client::HttpConverter`] as a submission progresses.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Implementations must be `Send + Sync`.
pub trait SubmissionProgressCallback: Send + Sync {
    /// Called once the multipart body is assembled, before it is sent.
    ///
    /// # Arguments
    /// * `tool_id`:      identifier of the tool being invoked
    /// * `upload_bytes`: total payload bytes (file contents or text length)
    fn on_submission_start(&self, tool_id: &str, upload_bytes: u64) {
        let _ = (tool_id, upload_bytes);
    }

    /// Called when response headers arrive, before the body is consumed.
    fn on_response(&self, tool_id: &str, status: u16) {
        let _ = (tool_id, status);
    }

    /// Called once the response has been interpreted (or the request failed).
    fn on_submission_complete(&self, tool_id: &str, success: bool) {
        let _ = (tool_id, success);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl SubmissionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ClientConfig`].
pub type ProgressCallback = Arc<dyn SubmissionProgressCallback>;
