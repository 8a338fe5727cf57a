//! One-shot conversion entry points.
//!
//! These wrap a [`ToolSession`] for callers that just want "run this tool on
//! this input": open the page, feed the input through the same validation
//! the interactive path uses, submit once, and hand back the payload.
//! [`convert_to_file`] additionally writes the result to disk.

use crate::client::{Converter, HttpConverter};
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::input::SelectedInput;
use crate::output::ResultPayload;
use crate::session::{ToolPage, ToolSession};
use std::path::Path;
use tracing::info;

/// Run `tool_id` once against the configured backend.
///
/// # Errors
/// - [`ClientError::UnknownTool`] when `tool_id` is not registered
/// - [`ClientError::Rejected`] when a file fails size/type validation
/// - [`ClientError::UnknownLanguage`] for an unrecognised `target_language`
/// - [`ClientError::Submission`] when the backend fails or is unreachable
///
/// # Example
/// ```rust,no_run
/// use docintel_client::{convert, ClientConfig, SelectedInput};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ClientConfig::from_env()?;
/// let input = SelectedInput::Text("https://example.com".into());
/// let payload = convert("qr-generator", input, None, &config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn convert(
    tool_id: &str,
    input: SelectedInput,
    target_language: Option<&str>,
    config: &ClientConfig,
) -> Result<ResultPayload, ClientError> {
    let converter = HttpConverter::new(config.clone())?;
    convert_with(&converter, tool_id, input, target_language, config).await
}

/// [`convert`] through any [`Converter`].
pub async fn convert_with(
    converter: &dyn Converter,
    tool_id: &str,
    input: SelectedInput,
    target_language: Option<&str>,
    config: &ClientConfig,
) -> Result<ResultPayload, ClientError> {
    let mut session = open_session(tool_id, config)?;
    match input {
        SelectedInput::Files(files) => session.offer_files(files)?,
        SelectedInput::Text(text) => session.set_text(text)?,
    }
    if let Some(lang) = target_language {
        session.select_language(lang)?;
    }

    session.submit(converter).await?;
    match session.into_outcome() {
        Some(Ok(payload)) => Ok(payload),
        Some(Err(e)) => Err(e.into()),
        None => Err(ClientError::Internal(
            "submission finished without an outcome".into(),
        )),
    }
}

/// Run `tool_id` and write the result to `output_path`.
///
/// Downloads are copied byte-for-byte; text is written as UTF-8; a
/// translation pair is written as two Markdown sections. The write is
/// atomic (temp file + rename). The payload is returned for further use.
pub async fn convert_to_file(
    tool_id: &str,
    input: SelectedInput,
    target_language: Option<&str>,
    output_path: impl AsRef<Path>,
    config: &ClientConfig,
) -> Result<ResultPayload, ClientError> {
    let payload = convert(tool_id, input, target_language, config).await?;
    write_payload(&payload, output_path.as_ref()).await?;
    Ok(payload)
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    tool_id: &str,
    input: SelectedInput,
    target_language: Option<&str>,
    config: &ClientConfig,
) -> Result<ResultPayload, ClientError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ClientError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert(tool_id, input, target_language, config))
}

/// Write a payload to `path` the way [`convert_to_file`] does.
pub async fn write_payload(payload: &ResultPayload, path: &Path) -> Result<(), ClientError> {
    let write_err = |source| ClientError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };
    match payload {
        ResultPayload::Download(obj) => obj.save_to(path).await.map_err(write_err)?,
        ResultPayload::Text(text) => write_atomic(path, text.as_bytes())
            .await
            .map_err(write_err)?,
        ResultPayload::Translation {
            original,
            translated,
        } => {
            let doc = format!("## Original\n\n{original}\n\n## Translated\n\n{translated}\n");
            write_atomic(path, doc.as_bytes()).await.map_err(write_err)?
        }
    }
    info!("Wrote result to {}", path.display());
    Ok(())
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn open_session(tool_id: &str, config: &ClientConfig) -> Result<ToolSession, ClientError> {
    match ToolPage::open(tool_id, config)? {
        ToolPage::Found(session) => Ok(*session),
        ToolPage::NotFound { requested } => Err(ClientError::UnknownTool { id: requested }),
    }
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = std::path::PathBuf::from(tmp_name);
    tokio::fs::write(&tmp_path, bytes).await?;
    tokio::fs::rename(&tmp_path, path).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ConversionRequest;
    use crate::error::SubmissionError;
    use crate::input::files::SelectedFile;
    use crate::output::ConversionResponse;
    use async_trait::async_trait;

    struct Echo;

    #[async_trait]
    impl Converter for Echo {
        async fn convert(
            &self,
            request: &ConversionRequest,
        ) -> Result<ConversionResponse, SubmissionError> {
            match &request.input {
                SelectedInput::Text(t) => Ok(ConversionResponse::Text(t.to_uppercase())),
                SelectedInput::Files(f) => Ok(ConversionResponse::Translation {
                    original: f[0].name.clone(),
                    translated: request.target_language.clone().unwrap_or_default(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn unknown_tool_is_an_error() {
        let err = convert_with(
            &Echo,
            "foo-bar",
            SelectedInput::Text("x".into()),
            None,
            &ClientConfig::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ClientError::UnknownTool { ref id } if id == "foo-bar"));
    }

    #[tokio::test]
    async fn text_tool_round_trip() {
        let payload = convert_with(
            &Echo,
            "text-to-pdf",
            SelectedInput::Text("hi".into()),
            None,
            &ClientConfig::default(),
        )
        .await
        .unwrap();
        assert!(matches!(payload, ResultPayload::Text(ref s) if s == "HI"));
    }

    #[tokio::test]
    async fn language_argument_reaches_backend() {
        let input = SelectedInput::Files(vec![SelectedFile::from_bytes("a.png", vec![1])]);
        let payload = convert_with(
            &Echo,
            "image-translator",
            input,
            Some("de"),
            &ClientConfig::default(),
        )
        .await
        .unwrap();
        match payload {
            ResultPayload::Translation { translated, .. } => assert_eq!(translated, "German"),
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[tokio::test]
    async fn oversized_file_never_reaches_backend() {
        let config = ClientConfig::builder()
            .max_file_size_bytes(4)
            .build()
            .unwrap();
        let input = SelectedInput::Files(vec![SelectedFile::from_bytes("a.pdf", vec![0; 8])]);
        let err = convert_with(&Echo, "pdf-to-text", input, None, &config)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Rejected(_)));
    }

    #[tokio::test]
    async fn translation_written_as_two_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/result.md");
        let payload = ResultPayload::Translation {
            original: "Hola".into(),
            translated: "Hello".into(),
        };
        write_payload(&payload, &path).await.unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "## Original\n\nHola\n\n## Translated\n\nHello\n");
        assert!(!dir.path().join("out/result.md.tmp").exists());
    }
}
