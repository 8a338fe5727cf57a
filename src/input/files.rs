//! File-mode input collector.
//!
//! Validates each offered file against the tool's accept map and the size
//! ceiling before anything touches the network. Rejections are reported as
//! [`Rejection`] values and leave the existing selection intact.

use crate::error::{ClientError, Rejection};
use crate::registry::{AcceptRule, ToolConfig};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where a selected file's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    /// Read lazily at submission time.
    Path(PathBuf),
    /// Already in memory.
    Memory(Vec<u8>),
}

/// A file chosen by the user, not yet uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub mime: String,
    pub size: u64,
    pub source: FileSource,
}

impl SelectedFile {
    /// Describe a file on disk. Only metadata is read here.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let meta = std::fs::metadata(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ClientError::FileNotFound {
                path: path.to_path_buf(),
            },
            std::io::ErrorKind::PermissionDenied => ClientError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => ClientError::ReadFailed {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
        if !meta.is_file() {
            return Err(ClientError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        let mime = mime_guess::from_path(path).first_or_octet_stream().to_string();

        Ok(Self {
            name,
            mime,
            size: meta.len(),
            source: FileSource::Path(path.to_path_buf()),
        })
    }

    /// Wrap in-memory bytes; the MIME type is guessed from `name`.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime = mime_guess::from_path(&name).first_or_octet_stream().to_string();
        Self {
            size: bytes.len() as u64,
            name,
            mime,
            source: FileSource::Memory(bytes),
        }
    }

    /// Size in megabytes with two decimals, as shown in the file list.
    pub fn size_label(&self) -> String {
        format!("{:.2} MB", self.size as f64 / 1024.0 / 1024.0)
    }

    /// Load the file contents for upload.
    pub async fn read(&self) -> Result<Vec<u8>, ClientError> {
        match &self.source {
            FileSource::Memory(bytes) => Ok(bytes.clone()),
            FileSource::Path(path) => {
                tokio::fs::read(path)
                    .await
                    .map_err(|e| ClientError::ReadFailed {
                        path: path.clone(),
                        source: e,
                    })
            }
        }
    }
}

/// Whether a file satisfies one accept rule, by MIME type or by extension.
fn matches_rule(file: &SelectedFile, rule: &AcceptRule) -> bool {
    let mime = file.mime.to_lowercase();
    let mime_hit = match rule.mime.strip_suffix("/*") {
        Some(base) => mime.split('/').next() == Some(base),
        None => mime == rule.mime,
    };
    let name = file.name.to_lowercase();
    mime_hit || rule.extensions.iter().any(|ext| name.ends_with(ext))
}

/// Human-readable list of accepted patterns and extensions.
pub fn describe_accept(rules: &[AcceptRule]) -> String {
    rules
        .iter()
        .flat_map(|r| std::iter::once(r.mime).chain(r.extensions.iter().copied()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Drag-or-click file selection for one tool.
#[derive(Debug, Clone)]
pub struct FileCollector {
    accept: Option<&'static [AcceptRule]>,
    multiple: bool,
    max_size: u64,
    files: Vec<SelectedFile>,
    error: Option<Rejection>,
}

impl FileCollector {
    pub fn new(accept: Option<&'static [AcceptRule]>, multiple: bool, max_size: u64) -> Self {
        Self {
            accept,
            multiple,
            max_size,
            files: Vec::new(),
            error: None,
        }
    }

    /// Collector configured from a tool's accept map and multi-file flag.
    pub fn for_tool(tool: &ToolConfig, max_size: u64) -> Self {
        Self::new(tool.accept, tool.multiple, max_size)
    }

    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    /// The last rejection, cleared by the next accepted batch.
    pub fn error(&self) -> Option<&Rejection> {
        self.error.as_ref()
    }

    /// Check one file without changing any state.
    pub fn validate(&self, file: &SelectedFile) -> Result<(), Rejection> {
        if file.size > self.max_size {
            return Err(Rejection::TooLarge {
                file_name: file.name.clone(),
                size: file.size,
                max_size: self.max_size,
            });
        }
        if let Some(rules) = self.accept {
            if !rules.iter().any(|r| matches_rule(file, r)) {
                return Err(Rejection::InvalidType {
                    file_name: file.name.clone(),
                    accepted: describe_accept(rules),
                });
            }
        }
        Ok(())
    }

    /// Offer one drop/click batch.
    ///
    /// The batch is all-or-nothing: if any file is rejected, the first
    /// rejection is recorded and returned, and nothing from the batch is
    /// added. Multi-file collectors append accepted files in order;
    /// single-file collectors replace their file.
    pub fn offer(&mut self, batch: Vec<SelectedFile>) -> Result<(), Rejection> {
        if batch.is_empty() {
            return Ok(());
        }
        let checked = if !self.multiple && batch.len() > 1 {
            Err(Rejection::TooManyFiles {
                offered: batch.len(),
            })
        } else {
            batch.iter().try_for_each(|f| self.validate(f))
        };
        if let Err(rejection) = checked {
            debug!("Rejected file batch: {}", rejection);
            self.error = Some(rejection.clone());
            return Err(rejection);
        }

        self.error = None;
        if self.multiple {
            self.files.extend(batch);
        } else {
            self.files = batch;
        }
        debug!("Selection now holds {} file(s)", self.files.len());
        Ok(())
    }

    /// Remove the file at `index`; out-of-range indices are ignored.
    pub fn remove(&mut self, index: usize) -> Option<SelectedFile> {
        (index < self.files.len()).then(|| self.files.remove(index))
    }

    pub fn clear(&mut self) {
        self.files.clear();
        self.error = None;
    }
}
