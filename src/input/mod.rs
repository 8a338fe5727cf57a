//! Input collection for a tool page.
//!
//! ```text
//! ToolConfig.input_mode ──▶ File ──▶ files::FileCollector ─┐
//!                       └─▶ Text ──▶ text::TextInput ──────┴─▶ SelectedInput
//! needs_target_language ──▶ language::LanguagePicker ──────────▶ target_language
//! ```
//!
//! 1. [`files`]   : drag-or-click selection with size/type validation
//! 2. [`text`]    : bounded text area with blank-input gating
//! 3. [`language`]: searchable `{name, code}` dropdown

pub mod files;
pub mod language;
pub mod text;

use crate::registry::{InputMode, ToolConfig};
use files::{FileCollector, SelectedFile};
use text::TextInput;

/// A complete input ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectedInput {
    Text(String),
    Files(Vec<SelectedFile>),
}

impl SelectedInput {
    /// No files, or only whitespace.
    pub fn is_empty(&self) -> bool {
        match self {
            SelectedInput::Text(t) => t.trim().is_empty(),
            SelectedInput::Files(f) => f.is_empty(),
        }
    }

    pub fn mode(&self) -> InputMode {
        match self {
            SelectedInput::Text(_) => InputMode::Text,
            SelectedInput::Files(_) => InputMode::File,
        }
    }

    /// Bytes that will be uploaded.
    pub fn upload_size(&self) -> u64 {
        match self {
            SelectedInput::Text(t) => t.len() as u64,
            SelectedInput::Files(f) => f.iter().map(|f| f.size).sum(),
        }
    }
}

/// The collector matching a tool's input mode.
#[derive(Debug, Clone)]
pub enum InputCollector {
    Files(FileCollector),
    Text(TextInput),
}

impl InputCollector {
    pub fn for_tool(tool: &ToolConfig, max_file_size: u64) -> Self {
        match tool.input_mode {
            InputMode::File => InputCollector::Files(FileCollector::for_tool(tool, max_file_size)),
            InputMode::Text => InputCollector::Text(TextInput::new(tool.placeholder)),
        }
    }

    /// Snapshot of the current input, or `None` when there is nothing to send.
    pub fn selected(&self) -> Option<SelectedInput> {
        match self {
            InputCollector::Files(c) if !c.is_empty() => {
                Some(SelectedInput::Files(c.files().to_vec()))
            }
            InputCollector::Text(t) if !t.is_blank() => {
                Some(SelectedInput::Text(t.value().to_string()))
            }
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        match self {
            InputCollector::Files(c) => c.clear(),
            InputCollector::Text(t) => t.clear(),
        }
    }
}
