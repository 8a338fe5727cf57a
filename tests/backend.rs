//! Integration tests against an in-process mock of the conversion backend.
//!
//! Each test starts an axum server on `127.0.0.1:0` that records every
//! multipart field it receives and answers per endpoint, then drives the
//! library through the public API exactly as the CLI does.

use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use docintel_client::{
    convert, convert_to_file, ClientConfig, ClientError, HttpConverter, ResultPayload,
    ResultView, SelectedFile, SelectedInput, SubmissionProgressCallback, ToolPage, ToolSession,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

// ── Mock backend ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Field {
    name: String,
    file_name: Option<String>,
    data: Vec<u8>,
}

#[derive(Debug, Clone)]
struct Received {
    endpoint: String,
    fields: Vec<Field>,
}

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<Received>>>);

impl Recorder {
    fn last(&self) -> Received {
        self.0.lock().unwrap().last().cloned().expect("no request received")
    }

    fn count(&self) -> usize {
        self.0.lock().unwrap().len()
    }
}

impl Received {
    fn text(&self, name: &str) -> Option<String> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| String::from_utf8_lossy(&f.data).into_owned())
    }

    fn named(&self, name: &str) -> Vec<&Field> {
        self.fields.iter().filter(|f| f.name == name).collect()
    }
}

const PDF_BYTES: &[u8] = b"%PDF-1.7 mock";

fn tiny_png() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(4, 4, image::Rgb([0, 0, 0]));
    let mut buf = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
    buf.into_inner()
}

async fn convert_handler(
    State(recorder): State<Recorder>,
    Path(endpoint): Path<String>,
    mut multipart: Multipart,
) -> Response {
    let mut fields = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let data = field.bytes().await.unwrap().to_vec();
        fields.push(Field {
            name,
            file_name,
            data,
        });
    }
    recorder.0.lock().unwrap().push(Received {
        endpoint: endpoint.clone(),
        fields,
    });

    match endpoint.as_str() {
        "text-to-pdf" | "merge-pdf" | "images-to-pdf" => {
            ([(header::CONTENT_TYPE, "application/pdf")], PDF_BYTES).into_response()
        }
        "invert-image" => ([(header::CONTENT_TYPE, "image/png")], tiny_png()).into_response(),
        "pdf-to-text" => Json(json!({ "text": "hello" })).into_response(),
        "barcode-scanner" => Json(json!({ "text": null })).into_response(),
        "image-translator" | "qr-scanner" => Json(json!({
            "original_text": "Hola",
            "translated_text": "Hello",
        }))
        .into_response(),
        "word-to-pdf" => (
            StatusCode::PAYLOAD_TOO_LARGE,
            Json(json!({ "detail": "File too large. Maximum size is 50MB" })),
        )
            .into_response(),
        "pdf-to-word" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        "pdf-to-excel" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "no detail here" })),
        )
            .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy", "model": "mock-1" }))
}

async fn spawn_backend() -> (ClientConfig, Recorder) {
    let recorder = Recorder::default();
    let app = Router::new()
        .route("/api/convert/{endpoint}", post(convert_handler))
        .route("/health", get(health_handler))
        .with_state(recorder.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = ClientConfig::builder()
        .api_base_url(format!("http://{addr}"))
        .request_timeout_secs(10)
        .build()
        .unwrap();
    (config, recorder)
}

fn open(id: &str, config: &ClientConfig) -> ToolSession {
    match ToolPage::open(id, config).unwrap() {
        ToolPage::Found(s) => *s,
        ToolPage::NotFound { requested } => panic!("{requested} not registered"),
    }
}

fn pdf(name: &str) -> SelectedFile {
    SelectedFile::from_bytes(name, PDF_BYTES.to_vec())
}

// ── Wire format ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn text_tool_sends_text_field_and_gets_pdf() {
    let (config, backend) = spawn_backend().await;
    let payload = convert(
        "text-to-pdf",
        SelectedInput::Text("Hello".into()),
        None,
        &config,
    )
    .await
    .unwrap();

    let req = backend.last();
    assert_eq!(req.endpoint, "text-to-pdf");
    assert_eq!(req.text("text").as_deref(), Some("Hello"));
    assert!(req.named("file").is_empty());

    match payload {
        ResultPayload::Download(obj) => {
            assert_eq!(obj.file_name(), "converted.pdf");
            assert_eq!(obj.bytes().await.unwrap(), PDF_BYTES);
        }
        other => panic!("expected download, got {other:?}"),
    }
}

#[tokio::test]
async fn multi_file_tool_repeats_files_field_in_order() {
    let (config, backend) = spawn_backend().await;
    let input = SelectedInput::Files(vec![pdf("a.pdf"), pdf("b.pdf"), pdf("c.pdf")]);
    convert("merge-pdf", input, None, &config).await.unwrap();

    let req = backend.last();
    let names: Vec<_> = req
        .named("files")
        .iter()
        .map(|f| f.file_name.clone().unwrap_or_default())
        .collect();
    assert_eq!(names, ["a.pdf", "b.pdf", "c.pdf"]);
    assert!(req.named("file").is_empty());
}

#[tokio::test]
async fn image_to_pdf_uses_images_to_pdf_endpoint() {
    let (config, backend) = spawn_backend().await;
    let input = SelectedInput::Files(vec![SelectedFile::from_bytes("p.png", tiny_png())]);
    convert("image-to-pdf", input, None, &config).await.unwrap();
    assert_eq!(backend.last().endpoint, "images-to-pdf");
}

#[tokio::test]
async fn translator_sends_spanish_by_default() {
    let (config, backend) = spawn_backend().await;
    let mut session = open("image-translator", &config);
    session
        .offer_files(vec![SelectedFile::from_bytes("menu.png", tiny_png())])
        .unwrap();
    let converter = HttpConverter::new(config.clone()).unwrap();
    session.submit(&converter).await.unwrap();

    let req = backend.last();
    assert_eq!(req.text("target_language").as_deref(), Some("Spanish"));
    assert_eq!(req.named("file").len(), 1);

    match session.view(Instant::now()) {
        Some(ResultView::TranslationPair {
            original,
            translated,
        }) => {
            assert_eq!(original.text, "Hola");
            assert_eq!(translated.text, "Hello");
        }
        other => panic!("expected translation pair, got {other:?}"),
    }
}

#[tokio::test]
async fn chosen_language_is_sent_by_name() {
    let (config, backend) = spawn_backend().await;
    let input = SelectedInput::Files(vec![SelectedFile::from_bytes("m.jpg", vec![0xff, 0xd8])]);
    convert("image-translator", input, Some("ja"), &config)
        .await
        .unwrap();
    assert_eq!(backend.last().text("target_language").as_deref(), Some("Japanese"));
}

#[tokio::test]
async fn non_translator_never_sends_language() {
    let (config, backend) = spawn_backend().await;
    convert("merge-pdf", SelectedInput::Files(vec![pdf("a.pdf")]), None, &config)
        .await
        .unwrap();
    assert_eq!(backend.last().text("target_language"), None);
}

// ── Result shapes ────────────────────────────────────────────────────────────

#[tokio::test]
async fn text_result_renders_with_copy_action() {
    let (config, _backend) = spawn_backend().await;
    let mut session = open("pdf-to-text", &config);
    session.offer_files(vec![pdf("doc.pdf")]).unwrap();
    let converter = HttpConverter::new(config.clone()).unwrap();
    session.submit(&converter).await.unwrap();

    assert_eq!(
        session.view(Instant::now()),
        Some(ResultView::Text {
            content: "hello".into(),
            copy_label: "Copy Text",
        })
    );
}

#[tokio::test]
async fn null_text_is_empty_string() {
    let (config, _backend) = spawn_backend().await;
    let input = SelectedInput::Files(vec![SelectedFile::from_bytes("code.png", tiny_png())]);
    let payload = convert("barcode-scanner", input, None, &config).await.unwrap();
    assert!(matches!(payload, ResultPayload::Text(ref s) if s.is_empty()));
}

#[tokio::test]
async fn both_translation_fields_override_declared_text_shape() {
    let (config, _backend) = spawn_backend().await;
    let input = SelectedInput::Files(vec![SelectedFile::from_bytes("qr.png", tiny_png())]);
    let payload = convert("qr-scanner", input, None, &config).await.unwrap();
    assert!(matches!(payload, ResultPayload::Translation { .. }));
}

#[tokio::test]
async fn image_without_declared_extension_uses_content_type() {
    let (config, _backend) = spawn_backend().await;
    let mut session = open("invert-image", &config);
    session
        .offer_files(vec![SelectedFile::from_bytes("cat.png", tiny_png())])
        .unwrap();
    let converter = HttpConverter::new(config.clone()).unwrap();
    session.submit(&converter).await.unwrap();

    match session.view(Instant::now()) {
        Some(ResultView::Download {
            file_name, preview, ..
        }) => {
            assert_eq!(file_name, "converted.png");
            let preview = preview.expect("image results carry a preview");
            assert_eq!((preview.width, preview.height), (4, 4));
        }
        other => panic!("expected download, got {other:?}"),
    }
}

// ── Failures ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn backend_detail_is_shown() {
    let (config, _backend) = spawn_backend().await;
    let mut session = open("word-to-pdf", &config);
    session
        .offer_files(vec![SelectedFile::from_bytes("big.docx", vec![0; 16])])
        .unwrap();
    let converter = HttpConverter::new(config.clone()).unwrap();
    session.submit(&converter).await.unwrap();

    assert_eq!(session.state().name(), "error");
    assert_eq!(
        session.error_message().as_deref(),
        Some("File too large. Maximum size is 50MB")
    );
}

#[tokio::test]
async fn unparseable_failure_is_unknown_error() {
    let (config, _backend) = spawn_backend().await;
    let err = convert("pdf-to-word", SelectedInput::Files(vec![pdf("x.pdf")]), None, &config)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Unknown Error");
}

#[tokio::test]
async fn failure_without_detail_is_processing_failed() {
    let (config, _backend) = spawn_backend().await;
    let err = convert("pdf-to-excel", SelectedInput::Files(vec![pdf("x.pdf")]), None, &config)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Processing failed");
}

#[tokio::test]
async fn rejected_files_never_reach_the_backend() {
    let (config, backend) = spawn_backend().await;
    let input = SelectedInput::Files(vec![SelectedFile::from_bytes("notes.txt", vec![1])]);
    let err = convert("pdf-to-word", input, None, &config).await.unwrap_err();
    assert!(matches!(err, ClientError::Rejected(_)));

    let two = SelectedInput::Files(vec![pdf("a.pdf"), pdf("b.pdf")]);
    let err = convert("pdf-to-word", two, None, &config).await.unwrap_err();
    assert_eq!(err.to_string(), "Too many files");

    assert_eq!(backend.count(), 0);
}

#[tokio::test]
async fn unreachable_backend_is_an_error_state() {
    let config = ClientConfig::builder()
        .api_base_url("http://127.0.0.1:9")
        .build()
        .unwrap();
    let mut session = open("text-to-pdf", &config);
    session.set_text("hi").unwrap();
    let converter = HttpConverter::new(config.clone()).unwrap();
    session.submit(&converter).await.unwrap();
    assert_eq!(session.state().name(), "error");
    assert!(session.can_submit());
}

// ── Session lifecycle ────────────────────────────────────────────────────────

#[tokio::test]
async fn reset_then_resubmit() {
    let (config, backend) = spawn_backend().await;
    let converter = HttpConverter::new(config.clone()).unwrap();
    let mut session = open("text-to-pdf", &config);

    session.set_text("first").unwrap();
    session.submit(&converter).await.unwrap();
    let first = match session.view(Instant::now()) {
        Some(ResultView::Download { path, .. }) => path,
        other => panic!("expected download, got {other:?}"),
    };

    session.reset();
    assert!(!first.exists());
    assert!(!session.can_submit());

    session.set_text("second").unwrap();
    session.submit(&converter).await.unwrap();
    assert_eq!(backend.count(), 2);
    assert_eq!(backend.last().text("text").as_deref(), Some("second"));
}

#[tokio::test]
async fn convert_to_file_writes_result() {
    let (config, _backend) = spawn_backend().await;
    let out = tempfile::tempdir().unwrap();
    let dest = out.path().join("merged.pdf");
    convert_to_file(
        "merge-pdf",
        SelectedInput::Files(vec![pdf("a.pdf"), pdf("b.pdf")]),
        None,
        &dest,
        &config,
    )
    .await
    .unwrap();
    assert_eq!(std::fs::read(&dest).unwrap(), PDF_BYTES);
}

#[tokio::test]
async fn files_from_disk_are_uploaded() {
    let (config, backend) = spawn_backend().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scan.pdf");
    std::fs::write(&path, PDF_BYTES).unwrap();

    let input = SelectedInput::Files(vec![SelectedFile::from_path(&path).unwrap()]);
    convert("pdf-to-text", input, None, &config).await.unwrap();

    let req = backend.last();
    let file = req.named("file")[0];
    assert_eq!(file.file_name.as_deref(), Some("scan.pdf"));
    assert_eq!(file.data, PDF_BYTES);
}

// ── Health and progress ──────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_status_and_model() {
    let (config, _backend) = spawn_backend().await;
    let status = HttpConverter::new(config).unwrap().health().await.unwrap();
    assert_eq!(status.status, "healthy");
    assert_eq!(status.model.as_deref(), Some("mock-1"));
}

#[derive(Default)]
struct Counting {
    started: AtomicUsize,
    responses: Mutex<Vec<u16>>,
    completed: Mutex<Vec<bool>>,
}

impl SubmissionProgressCallback for Counting {
    fn on_submission_start(&self, _tool_id: &str, _upload_bytes: u64) {
        self.started.fetch_add(1, Ordering::SeqCst);
    }

    fn on_response(&self, _tool_id: &str, status: u16) {
        self.responses.lock().unwrap().push(status);
    }

    fn on_submission_complete(&self, _tool_id: &str, success: bool) {
        self.completed.lock().unwrap().push(success);
    }
}

#[tokio::test]
async fn progress_callback_sees_each_submission() {
    let (base, _backend) = spawn_backend().await;
    let counting = Arc::new(Counting::default());
    let config = ClientConfig::builder()
        .api_base_url(base.api_base_url.clone())
        .progress_callback(counting.clone())
        .build()
        .unwrap();

    convert("pdf-to-text", SelectedInput::Files(vec![pdf("a.pdf")]), None, &config)
        .await
        .unwrap();
    convert("pdf-to-word", SelectedInput::Files(vec![pdf("a.pdf")]), None, &config)
        .await
        .unwrap_err();

    assert_eq!(counting.started.load(Ordering::SeqCst), 2);
    assert_eq!(*counting.responses.lock().unwrap(), [200, 500]);
    assert_eq!(*counting.completed.lock().unwrap(), [true, false]);
}
