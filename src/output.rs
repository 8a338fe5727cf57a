//! Submission results and the local object references behind downloads.
//!
//! A binary result is written once into an [`ObjectStore`] and handed out as
//! an [`ObjectRef`]. The reference owns its file: dropping it (when the
//! result is superseded or the session resets) deletes the file, so repeated
//! conversions in one session never accumulate temp data.

use crate::error::SubmissionError;
use crate::registry::ToolConfig;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tracing::{debug, warn};

/// Extension used when neither the tool nor the response names one.
pub const FALLBACK_EXTENSION: &str = "file";

/// A decoded backend response, before it is turned into a [`ResultPayload`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionResponse {
    Blob {
        bytes: Vec<u8>,
        content_type: Option<String>,
    },
    Text(String),
    Translation {
        original: String,
        translated: String,
    },
}

/// The result of one successful submission.
#[derive(Debug)]
pub enum ResultPayload {
    /// File or image result, stored locally.
    Download(ObjectRef),
    /// Plain text result.
    Text(String),
    /// Original text and its translation.
    Translation { original: String, translated: String },
}

impl ResultPayload {
    /// Store a blob response and wrap the rest as-is.
    pub async fn from_response(
        response: ConversionResponse,
        tool: &ToolConfig,
        store: &ObjectStore,
    ) -> Result<Self, SubmissionError> {
        match response {
            ConversionResponse::Blob {
                bytes,
                content_type,
            } => {
                let ext = output_extension(tool, content_type.as_deref());
                let obj = store
                    .create(&bytes, &format!("converted.{ext}"), content_type)
                    .await
                    .map_err(|e| SubmissionError::Storage(e.to_string()))?;
                Ok(ResultPayload::Download(obj))
            }
            ConversionResponse::Text(text) => Ok(ResultPayload::Text(text)),
            ConversionResponse::Translation {
                original,
                translated,
            } => Ok(ResultPayload::Translation {
                original,
                translated,
            }),
        }
    }

    /// Text a copy action would put on the clipboard.
    pub fn copyable_text(&self) -> Option<&str> {
        match self {
            ResultPayload::Text(t) => Some(t),
            ResultPayload::Translation { translated, .. } => Some(translated),
            ResultPayload::Download(_) => None,
        }
    }
}

/// Extension for a downloaded result: the tool's declared one, else the one
/// implied by the response content type, else [`FALLBACK_EXTENSION`].
pub fn output_extension(tool: &ToolConfig, content_type: Option<&str>) -> String {
    if let Some(ext) = tool.output_extension {
        return ext.to_string();
    }
    content_type
        .and_then(|ct| {
            let essence = ct.split(';').next()?.trim();
            let subtype = essence.split('/').nth(1)?;
            let exts = mime_guess::get_mime_extensions_str(essence)?;
            exts.iter()
                .find(|e| **e == subtype)
                .or_else(|| exts.first())
                .map(|e| e.to_string())
        })
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string())
}

/// Temp-directory backed store for result blobs.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    inner: Arc<StoreInner>,
}

#[derive(Debug)]
struct StoreInner {
    dir: TempDir,
    next_id: AtomicU64,
}

impl ObjectStore {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            inner: Arc::new(StoreInner {
                dir: tempfile::Builder::new().prefix("docintel-").tempdir()?,
                next_id: AtomicU64::new(0),
            }),
        })
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        self.inner.dir.path()
    }

    /// Write `bytes` as `<root>/<id>/<file_name>` and return its reference.
    pub async fn create(
        &self,
        bytes: &[u8],
        file_name: &str,
        content_type: Option<String>,
    ) -> std::io::Result<ObjectRef> {
        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst);
        let slot = self.inner.dir.path().join(id.to_string());
        tokio::fs::create_dir_all(&slot).await?;
        let path = slot.join(file_name);
        tokio::fs::write(&path, bytes).await?;
        debug!("Created object {} ({} bytes)", path.display(), bytes.len());

        Ok(ObjectRef {
            path,
            slot,
            file_name: file_name.to_string(),
            content_type,
            size: bytes.len() as u64,
            _store: Arc::clone(&self.inner),
        })
    }
}

/// A locally stored result blob. Released (file deleted) on drop.
#[derive(Debug)]
pub struct ObjectRef {
    path: PathBuf,
    slot: PathBuf,
    file_name: String,
    content_type: Option<String>,
    size: u64,
    _store: Arc<StoreInner>,
}

impl ObjectRef {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Download name, e.g. `converted.pdf`.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub async fn bytes(&self) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }

    /// Copy the blob to `dest` atomically (temp file + rename).
    pub async fn save_to(&self, dest: impl AsRef<Path>) -> std::io::Result<()> {
        let dest = dest.as_ref();
        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let mut tmp_name = dest.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp = PathBuf::from(tmp_name);
        tokio::fs::copy(&self.path, &tmp).await?;
        tokio::fs::rename(&tmp, dest).await
    }
}

impl Drop for ObjectRef {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.slot) {
            warn!("Failed to release object {}: {}", self.path.display(), e);
        } else {
            debug!("Released object {}", self.path.display());
        }
    }
}

/// Serializable summary of a payload, for `--json` output.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PayloadSummary {
    Download {
        file_name: String,
        path: PathBuf,
        content_type: Option<String>,
        size: u64,
    },
    Text {
        text: String,
    },
    Translation {
        original_text: String,
        translated_text: String,
    },
}

impl From<&ResultPayload> for PayloadSummary {
    fn from(p: &ResultPayload) -> Self {
        match p {
            ResultPayload::Download(obj) => PayloadSummary::Download {
                file_name: obj.file_name().to_string(),
                path: obj.path().to_path_buf(),
                content_type: obj.content_type().map(str::to_string),
                size: obj.size(),
            },
            ResultPayload::Text(text) => PayloadSummary::Text { text: text.clone() },
            ResultPayload::Translation {
                original,
                translated,
            } => PayloadSummary::Translation {
                original_text: original.clone(),
                translated_text: translated.clone(),
            },
        }
    }
}
