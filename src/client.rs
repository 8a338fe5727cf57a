//! HTTP submission to the conversion backend.
//!
//! The only module with network I/O. [`HttpConverter`] turns a
//! [`ConversionRequest`] into a `multipart/form-data` POST against
//! `<base>/api/convert/<endpoint>` and decodes the answer according to the
//! tool's declared [`ResultShape`].
//!
//! ## Wire format
//!
//! | Input | Multipart fields |
//! |-------|------------------|
//! | text tool | `text` |
//! | single-file tool | `file` |
//! | multi-file tool | `files` (repeated, in selection order) |
//! | language tool | + `target_language` (language *name*) |
//!
//! Failures are read as JSON `{ "detail": "..." }`.

use crate::config::ClientConfig;
use crate::error::{ClientError, SubmissionError, PROCESSING_FAILED, UNKNOWN_ERROR};
use crate::input::SelectedInput;
use crate::output::ConversionResponse;
use crate::registry::{ResultShape, ToolConfig};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Everything needed to invoke one tool once.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub tool: &'static ToolConfig,
    pub input: SelectedInput,
    /// Sent as `target_language` when the tool needs one.
    pub target_language: Option<String>,
}

/// Something that can run a conversion. Implemented by [`HttpConverter`];
/// tests and embedders can supply their own.
#[async_trait]
pub trait Converter: Send + Sync {
    async fn convert(&self, request: &ConversionRequest)
        -> Result<ConversionResponse, SubmissionError>;
}

/// Backend `/health` answer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, serde::Serialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub model: Option<String>,
}

/// reqwest-backed [`Converter`].
#[derive(Debug, Clone)]
pub struct HttpConverter {
    http: reqwest::Client,
    config: ClientConfig,
}

impl HttpConverter {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::Internal(format!("HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `GET <base>/health`.
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let url = self.config.endpoint_url("/health")?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.network_error(e))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.network_error(e))?;
        if !status.is_success() {
            return Err(interpret_failure(status.as_u16(), &body).into());
        }
        serde_json::from_slice(&body)
            .map_err(|e| SubmissionError::MalformedResponse(e.to_string()).into())
    }

    fn network_error(&self, e: reqwest::Error) -> SubmissionError {
        match (e.is_timeout(), self.config.request_timeout_secs) {
            (true, Some(secs)) => {
                SubmissionError::Network(format!("request timed out after {secs}s"))
            }
            _ => SubmissionError::Network(e.to_string()),
        }
    }

    fn notify_complete(&self, tool_id: &str, success: bool) {
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_submission_complete(tool_id, success);
        }
    }

    async fn send(
        &self,
        request: &ConversionRequest,
    ) -> Result<ConversionResponse, SubmissionError> {
        let tool = request.tool;
        let url = self
            .config
            .endpoint_url(&tool.endpoint_path())
            .map_err(|e| SubmissionError::Network(e.to_string()))?;
        let form = build_form(request).await?;

        info!("Submitting to {} ({})", url, tool.id);
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_submission_start(tool.id, request.input.upload_size());
        }

        let response = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.network_error(e))?;

        let status = response.status();
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_response(tool.id, status.as_u16());
        }
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(|e| self.network_error(e))?;
        debug!("{} answered {} with {} bytes", tool.id, status, body.len());

        if !status.is_success() {
            return Err(interpret_failure(status.as_u16(), &body));
        }
        interpret_success(tool, content_type.as_deref(), body.to_vec())
    }
}

#[async_trait]
impl Converter for HttpConverter {
    async fn convert(
        &self,
        request: &ConversionRequest,
    ) -> Result<ConversionResponse, SubmissionError> {
        let result = self.send(request).await;
        if let Err(ref e) = result {
            warn!("{} failed: {}", request.tool.id, e);
        }
        self.notify_complete(request.tool.id, result.is_ok());
        result
    }
}

/// Assemble the multipart body for a request, reading file contents.
pub async fn build_form(request: &ConversionRequest) -> Result<Form, SubmissionError> {
    let tool = request.tool;
    let mut form = Form::new();

    match &request.input {
        SelectedInput::Text(text) => {
            form = form.text("text", text.clone());
        }
        SelectedInput::Files(files) => {
            let field = tool.file_field();
            for file in files {
                let bytes = file
                    .read()
                    .await
                    .map_err(|e| SubmissionError::Input(e.to_string()))?;
                let part = Part::bytes(bytes)
                    .file_name(file.name.clone())
                    .mime_str(&file.mime)
                    .map_err(|e| SubmissionError::Input(format!("{}: {e}", file.name)))?;
                form = form.part(field, part);
            }
            debug!("Attached {} file(s) as '{}'", files.len(), field);
        }
    }

    if tool.needs_target_language {
        if let Some(ref lang) = request.target_language {
            form = form.text("target_language", lang.clone());
        }
    }

    Ok(form)
}

/// Decode a success body according to the tool's declared shape.
///
/// A JSON body carrying both `original_text` and `translated_text` is read as
/// a translation pair whatever the declared shape.
pub fn interpret_success(
    tool: &ToolConfig,
    content_type: Option<&str>,
    body: Vec<u8>,
) -> Result<ConversionResponse, SubmissionError> {
    let is_json = content_type.is_some_and(|ct| ct.contains("json"));

    if tool.result.is_binary() && !is_json {
        return Ok(ConversionResponse::Blob {
            bytes: body,
            content_type: content_type.map(str::to_string),
        });
    }

    let value: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(_) if tool.result.is_binary() => {
            return Ok(ConversionResponse::Blob {
                bytes: body,
                content_type: content_type.map(str::to_string),
            })
        }
        Err(e) => return Err(SubmissionError::MalformedResponse(e.to_string())),
    };

    if let Some((original, translated)) = translation_pair(&value) {
        return Ok(ConversionResponse::Translation {
            original,
            translated,
        });
    }

    match tool.result {
        ResultShape::Text => match value.get("text") {
            Some(Value::String(s)) => Ok(ConversionResponse::Text(s.clone())),
            Some(Value::Null) => Ok(ConversionResponse::Text(String::new())),
            _ => Err(SubmissionError::MalformedResponse(
                "missing 'text' field".into(),
            )),
        },
        ResultShape::TranslationPair => Err(SubmissionError::MalformedResponse(
            "missing 'original_text' / 'translated_text' fields".into(),
        )),
        ResultShape::File | ResultShape::Image => Ok(ConversionResponse::Blob {
            bytes: body,
            content_type: content_type.map(str::to_string),
        }),
    }
}

fn translation_pair(value: &Value) -> Option<(String, String)> {
    let text_of = |key: &str| match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => Some(String::new()),
        _ => None,
    };
    Some((text_of("original_text")?, text_of("translated_text")?))
}

/// Decode a failure body into the message the user sees.
pub fn interpret_failure(status: u16, body: &[u8]) -> SubmissionError {
    let message = match serde_json::from_slice::<Value>(body) {
        Ok(v) => match v.get("detail") {
            Some(Value::String(d)) if !d.is_empty() => d.clone(),
            _ => PROCESSING_FAILED.to_string(),
        },
        Err(_) => UNKNOWN_ERROR.to_string(),
    };
    SubmissionError::Backend { status, message }
}
