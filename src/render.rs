//! Result renderer: turn a [`ResultPayload`] into something to show.
//!
//! Dispatch is on the payload variant, which the client already derived from
//! the tool's declared shape (and from the translation-pair override):
//!
//! | Payload | View |
//! |---------|------|
//! | `Download` | `converted.<ext>` download; inline preview for image tools |
//! | `Text` | monospace block + "Copy Text" action |
//! | `Translation` | two panels, "Original" and "Translated" |

use crate::output::ResultPayload;
use crate::registry::{ResultShape, ToolConfig};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::debug;

pub const COPY_LABEL: &str = "Copy Text";
pub const COPIED_LABEL: &str = "Copied!";
pub const ORIGINAL_LABEL: &str = "Original";
pub const TRANSLATED_LABEL: &str = "Translated";

/// Header facts about an image result, decoded without loading pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImagePreview {
    pub format: String,
    pub width: u32,
    pub height: u32,
}

impl ImagePreview {
    /// `None` when the file is not an image the decoder understands.
    pub fn probe(path: &Path) -> Option<Self> {
        let reader = image::ImageReader::open(path).ok()?.with_guessed_format().ok()?;
        let format = reader.format()?;
        let (width, height) = reader.into_dimensions().ok()?;
        Some(Self {
            format: format!("{format:?}").to_lowercase(),
            width,
            height,
        })
    }
}

/// One labeled text panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Panel {
    pub label: &'static str,
    pub text: String,
}

/// What the result area shows after a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ResultView {
    Download {
        file_name: String,
        /// e.g. `Download PDF`
        label: String,
        path: PathBuf,
        preview: Option<ImagePreview>,
    },
    Text {
        content: String,
        copy_label: &'static str,
    },
    TranslationPair {
        original: Panel,
        translated: Panel,
    },
}

impl ResultView {
    /// View with the copy indicator at rest.
    pub fn from_payload(tool: &ToolConfig, payload: &ResultPayload) -> Self {
        Self::build(tool, payload, &CopyFeedback::default(), Instant::now())
    }

    pub fn build(
        tool: &ToolConfig,
        payload: &ResultPayload,
        copy: &CopyFeedback,
        now: Instant,
    ) -> Self {
        match payload {
            ResultPayload::Download(obj) => {
                let file_name = obj.file_name().to_string();
                let ext = file_name.rsplit_once('.').map(|(_, e)| e).unwrap_or("");
                let preview = match tool.result {
                    ResultShape::Image => ImagePreview::probe(obj.path()),
                    _ => None,
                };
                ResultView::Download {
                    label: format!("Download {}", ext.to_uppercase()),
                    file_name,
                    path: obj.path().to_path_buf(),
                    preview,
                }
            }
            ResultPayload::Text(content) => ResultView::Text {
                content: content.clone(),
                copy_label: copy.label(now),
            },
            ResultPayload::Translation {
                original,
                translated,
            } => ResultView::TranslationPair {
                original: Panel {
                    label: ORIGINAL_LABEL,
                    text: original.clone(),
                },
                translated: Panel {
                    label: TRANSLATED_LABEL,
                    text: translated.clone(),
                },
            },
        }
    }
}

/// Destination for copy-to-clipboard.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> std::io::Result<()>;
}

/// Clipboard over the OSC 52 terminal escape; works through SSH and tmux
/// where the terminal supports it.
pub struct Osc52Clipboard<W: Write> {
    out: W,
}

impl<W: Write> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Clipboard for Osc52Clipboard<W> {
    fn write_text(&mut self, text: &str) -> std::io::Result<()> {
        write!(self.out, "\x1b]52;c;{}\x07", BASE64.encode(text))?;
        self.out.flush()
    }
}

/// Transient "Copied!" indicator.
#[derive(Debug, Clone)]
pub struct CopyFeedback {
    copied_at: Option<Instant>,
    hold: Duration,
}

impl CopyFeedback {
    pub fn new(hold: Duration) -> Self {
        Self {
            copied_at: None,
            hold,
        }
    }

    /// Copy `text`; on success the indicator turns on at `now`. A failed
    /// copy leaves the indicator as it was.
    pub fn copy(
        &mut self,
        clipboard: &mut dyn Clipboard,
        text: &str,
        now: Instant,
    ) -> std::io::Result<()> {
        clipboard.write_text(text)?;
        debug!("Copied {} bytes to clipboard", text.len());
        self.copied_at = Some(now);
        Ok(())
    }

    pub fn is_copied(&self, now: Instant) -> bool {
        self.copied_at
            .is_some_and(|t| now.saturating_duration_since(t) < self.hold)
    }

    pub fn label(&self, now: Instant) -> &'static str {
        if self.is_copied(now) {
            COPIED_LABEL
        } else {
            COPY_LABEL
        }
    }

    pub fn reset(&mut self) {
        self.copied_at = None;
    }
}

impl Default for CopyFeedback {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::ObjectStore;
    use crate::registry;

    #[derive(Default)]
    struct MemoryClipboard {
        contents: Option<String>,
    }

    impl Clipboard for MemoryClipboard {
        fn write_text(&mut self, text: &str) -> std::io::Result<()> {
            self.contents = Some(text.to_string());
            Ok(())
        }
    }

    struct BrokenClipboard;

    impl Clipboard for BrokenClipboard {
        fn write_text(&mut self, _text: &str) -> std::io::Result<()> {
            Err(std::io::Error::other("no clipboard"))
        }
    }

    #[test]
    fn text_result_renders_with_copy_action() {
        let tool = registry::lookup("pdf-to-text").unwrap();
        let payload = ResultPayload::Text("hello".into());
        let view = ResultView::from_payload(tool, &payload);
        assert_eq!(
            view,
            ResultView::Text {
                content: "hello".into(),
                copy_label: "Copy Text"
            }
        );
    }

    #[test]
    fn copy_indicator_reverts_after_two_seconds() {
        let mut feedback = CopyFeedback::default();
        let mut clipboard = MemoryClipboard::default();
        let t0 = Instant::now();

        feedback.copy(&mut clipboard, "hello", t0).unwrap();
        assert_eq!(clipboard.contents.as_deref(), Some("hello"));
        assert_eq!(feedback.label(t0), "Copied!");
        assert_eq!(feedback.label(t0 + Duration::from_millis(1999)), "Copied!");
        assert_eq!(feedback.label(t0 + Duration::from_secs(2)), "Copy Text");
    }

    #[test]
    fn failed_copy_shows_no_indicator() {
        let mut feedback = CopyFeedback::default();
        let now = Instant::now();
        assert!(feedback.copy(&mut BrokenClipboard, "x", now).is_err());
        assert!(!feedback.is_copied(now));
    }

    #[test]
    fn translation_renders_two_labeled_panels() {
        let tool = registry::lookup("image-translator").unwrap();
        let payload = ResultPayload::Translation {
            original: "Hola".into(),
            translated: "Hello".into(),
        };
        let view = ResultView::build(tool, &payload, &CopyFeedback::default(), Instant::now());
        let ResultView::TranslationPair {
            original,
            translated,
        } = view
        else {
            panic!("expected translation pair");
        };
        assert_eq!((original.label, original.text.as_str()), ("Original", "Hola"));
        assert_eq!((translated.label, translated.text.as_str()), ("Translated", "Hello"));
    }

    #[test]
    fn translation_pair_wins_over_declared_text_shape() {
        let tool = registry::lookup("qr-scanner").unwrap();
        let payload = ResultPayload::Translation {
            original: "a".into(),
            translated: "b".into(),
        };
        let view = ResultView::build(tool, &payload, &CopyFeedback::default(), Instant::now());
        assert!(matches!(view, ResultView::TranslationPair { .. }));
    }

    #[tokio::test]
    async fn file_result_offers_named_download_without_preview() {
        let store = ObjectStore::new().unwrap();
        let obj = store.create(b"%PDF", "converted.pdf", None).await.unwrap();
        let tool = registry::lookup("word-to-pdf").unwrap();
        let payload = ResultPayload::Download(obj);
        match ResultView::build(tool, &payload, &CopyFeedback::default(), Instant::now()) {
            ResultView::Download {
                file_name,
                label,
                preview,
                ..
            } => {
                assert_eq!(file_name, "converted.pdf");
                assert_eq!(label, "Download PDF");
                assert!(preview.is_none());
            }
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[tokio::test]
    async fn image_result_gets_inline_preview() {
        let img = image::RgbImage::from_pixel(3, 2, image::Rgb([255, 0, 0]));
        let mut png = std::io::Cursor::new(Vec::new());
        img.write_to(&mut png, image::ImageFormat::Png).unwrap();

        let store = ObjectStore::new().unwrap();
        let obj = store
            .create(png.get_ref(), "converted.png", Some("image/png".into()))
            .await
            .unwrap();
        let tool = registry::lookup("qr-generator").unwrap();
        let payload = ResultPayload::Download(obj);
        match ResultView::build(tool, &payload, &CopyFeedback::default(), Instant::now()) {
            ResultView::Download { preview, label, .. } => {
                assert_eq!(label, "Download PNG");
                assert_eq!(
                    preview,
                    Some(ImagePreview {
                        format: "png".into(),
                        width: 3,
                        height: 2
                    })
                );
            }
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[test]
    fn osc52_payload_is_base64() {
        let mut cb = Osc52Clipboard::new(Vec::new());
        cb.write_text("hi").unwrap();
        assert_eq!(cb.into_inner(), b"\x1b]52;c;aGk=\x07");
    }
}
