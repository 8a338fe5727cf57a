//! Client configuration.
//!
//! Every knob lives in [`ClientConfig`], built via [`ClientConfigBuilder`].
//! The defaults match the DocIntel development setup: a backend on
//! `http://localhost:8000`, a 50 MB upload ceiling, no request timeout.

use crate::error::ClientError;
use crate::progress::ProgressCallback;
use reqwest::Url;
use std::fmt;
use std::time::Duration;

/// Environment variable holding the backend base URL.
pub const API_URL_ENV: &str = "DOCINTEL_API_URL";

/// Backend used when [`API_URL_ENV`] is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Upload ceiling applied by the input collector (and by the backend).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Configuration for a docintel client.
///
/// # Example
/// ```rust
/// use docintel_client::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .api_base_url("http://docintel.internal:8000")
///     .request_timeout_secs(300)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_file_size_bytes, 50 * 1024 * 1024);
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    /// Backend base URL, without the `/api/convert` prefix.
    pub api_base_url: String,

    /// Largest file the input collector accepts. Default: 50 MB.
    pub max_file_size_bytes: u64,

    /// Whole-request timeout in seconds. Default: `None` (wait until the
    /// backend answers or the connection drops).
    pub request_timeout_secs: Option<u64>,

    /// How long the "Copied!" indicator stays up after a copy. Default: 2 s.
    pub copy_feedback: Duration,

    /// Viewport width below which the sidebar collapses. Default: 1024 px.
    pub sidebar_breakpoint_px: u32,

    /// Initial value of the language picker. Default: `Spanish`.
    pub default_target_language: String,

    /// `User-Agent` header sent with every request.
    pub user_agent: String,

    /// Optional progress observer.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE,
            request_timeout_secs: None,
            copy_feedback: Duration::from_secs(2),
            sidebar_breakpoint_px: 1024,
            default_target_language: "Spanish".to_string(),
            user_agent: concat!("docintel-client/", env!("CARGO_PKG_VERSION")).to_string(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_base_url", &self.api_base_url)
            .field("max_file_size_bytes", &self.max_file_size_bytes)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("copy_feedback", &self.copy_feedback)
            .field("sidebar_breakpoint_px", &self.sidebar_breakpoint_px)
            .field("default_target_language", &self.default_target_language)
            .field("user_agent", &self.user_agent)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn SubmissionProgressCallback>"),
            )
            .finish()
    }
}

impl ClientConfig {
    /// Create a new builder for `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
        }
    }

    /// Defaults, with the base URL taken from `DOCINTEL_API_URL` when set.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::with_api_url(std::env::var(API_URL_ENV).ok().as_deref())
    }

    /// Defaults with `url` as the base URL; blank or missing keeps
    /// [`DEFAULT_API_URL`].
    fn with_api_url(url: Option<&str>) -> Result<Self, ClientError> {
        let mut builder = Self::builder();
        if let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) {
            builder = builder.api_base_url(url);
        }
        builder.build()
    }

    /// Full URL of a backend path such as `/api/convert/merge-pdf`.
    pub fn endpoint_url(&self, path: &str) -> Result<Url, ClientError> {
        let base = self.api_base_url.trim_end_matches('/');
        Url::parse(&format!("{base}{path}")).map_err(|e| {
            ClientError::InvalidConfig(format!("bad endpoint URL '{base}{path}': {e}"))
        })
    }
}

/// Builder for [`ClientConfig`].
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl fmt::Debug for ClientConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl ClientConfigBuilder {
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_base_url = url.into();
        self
    }

    pub fn max_file_size_bytes(mut self, bytes: u64) -> Self {
        self.config.max_file_size_bytes = bytes;
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = Some(secs);
        self
    }

    pub fn copy_feedback(mut self, d: Duration) -> Self {
        self.config.copy_feedback = d;
        self
    }

    pub fn sidebar_breakpoint_px(mut self, px: u32) -> Self {
        self.config.sidebar_breakpoint_px = px;
        self
    }

    pub fn default_target_language(mut self, name: impl Into<String>) -> Self {
        self.config.default_target_language = name.into();
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ClientConfig, ClientError> {
        let c = &self.config;
        let url = Url::parse(&c.api_base_url).map_err(|e| {
            ClientError::InvalidConfig(format!("API base URL '{}' is invalid: {e}", c.api_base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidConfig(format!(
                "API base URL must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if c.max_file_size_bytes == 0 {
            return Err(ClientError::InvalidConfig(
                "Maximum file size must be > 0".into(),
            ));
        }
        if c.request_timeout_secs == Some(0) {
            return Err(ClientError::InvalidConfig(
                "Request timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}
