//! Tool registry: the static table of every conversion the backend offers.
//!
//! Each [`ToolConfig`] tells the rest of the crate how to drive one tool:
//! which input to collect, which endpoint to post to, and how to read the
//! answer. The table is immutable; [`lookup`] is the only way in.

use serde::Serialize;
use std::fmt;

/// Common backend route prefix for every conversion endpoint.
pub const CONVERT_PREFIX: &str = "/api/convert";

/// What a tool consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputMode {
    /// One or more uploaded files.
    File,
    /// A free-text string.
    Text,
}

/// What a successful response looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResultShape {
    /// Opaque binary offered for download.
    File,
    /// Opaque binary offered for download and shown inline.
    Image,
    /// JSON `{ "text": ... }`.
    Text,
    /// JSON `{ "original_text": ..., "translated_text": ... }`.
    TranslationPair,
}

impl ResultShape {
    /// Whether the response body is a blob rather than JSON.
    pub fn is_binary(self) -> bool {
        matches!(self, ResultShape::File | ResultShape::Image)
    }
}

impl fmt::Display for ResultShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResultShape::File => "file",
            ResultShape::Image => "image",
            ResultShape::Text => "text",
            ResultShape::TranslationPair => "translation-pair",
        })
    }
}

/// One accepted MIME pattern (`image/*` or an exact type) with the file
/// extensions that count as that type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AcceptRule {
    pub mime: &'static str,
    pub extensions: &'static [&'static str],
}

/// Static description of one tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolConfig {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    /// Path segment under [`CONVERT_PREFIX`].
    pub endpoint: &'static str,
    /// `None` for text-input tools.
    pub accept: Option<&'static [AcceptRule]>,
    pub result: ResultShape,
    pub output_extension: Option<&'static str>,
    pub multiple: bool,
    pub input_mode: InputMode,
    pub placeholder: Option<&'static str>,
    pub needs_target_language: bool,
}

impl ToolConfig {
    /// Backend path, e.g. `/api/convert/images-to-pdf`.
    pub fn endpoint_path(&self) -> String {
        format!("{CONVERT_PREFIX}/{}", self.endpoint)
    }

    /// Catalog link for this tool, e.g. `/merge-pdf`.
    pub fn href(&self) -> String {
        format!("/{}", self.id)
    }

    /// Multipart field carrying the file(s).
    pub fn file_field(&self) -> &'static str {
        if self.multiple {
            "files"
        } else {
            "file"
        }
    }
}

const IMAGES: &[AcceptRule] = &[AcceptRule {
    mime: "image/*",
    extensions: &[".jpg", ".jpeg", ".png"],
}];

const PDF: &[AcceptRule] = &[AcceptRule {
    mime: "application/pdf",
    extensions: &[".pdf"],
}];

const DOCX: &[AcceptRule] = &[AcceptRule {
    mime: "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    extensions: &[".docx"],
}];

const XLSX: &[AcceptRule] = &[AcceptRule {
    mime: "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    extensions: &[".xlsx"],
}];

const HTML: &[AcceptRule] = &[AcceptRule {
    mime: "text/html",
    extensions: &[".html", ".htm"],
}];

const fn file_tool(
    id: &'static str,
    title: &'static str,
    description: &'static str,
    accept: &'static [AcceptRule],
    result: ResultShape,
    output_extension: Option<&'static str>,
) -> ToolConfig {
    ToolConfig {
        id,
        title,
        description,
        endpoint: id,
        accept: Some(accept),
        result,
        output_extension,
        multiple: false,
        input_mode: InputMode::File,
        placeholder: None,
        needs_target_language: false,
    }
}

const fn text_tool(
    id: &'static str,
    title: &'static str,
    description: &'static str,
    result: ResultShape,
    output_extension: &'static str,
    placeholder: &'static str,
) -> ToolConfig {
    ToolConfig {
        id,
        title,
        description,
        endpoint: id,
        accept: None,
        result,
        output_extension: Some(output_extension),
        multiple: false,
        input_mode: InputMode::Text,
        placeholder: Some(placeholder),
        needs_target_language: false,
    }
}

static TOOLS: &[ToolConfig] = &[
    // ── Document conversion ───────────────────────────────────────────────
    file_tool(
        "jpg-to-word",
        "JPG to Word",
        "Convert your images into editable Word documents.",
        IMAGES,
        ResultShape::File,
        Some("docx"),
    ),
    file_tool(
        "pdf-to-text",
        "PDF to Text",
        "Extract plain text from your PDF documents.",
        PDF,
        ResultShape::Text,
        None,
    ),
    file_tool(
        "pdf-to-word",
        "PDF to Word",
        "Convert PDF documents to editable Word files.",
        PDF,
        ResultShape::File,
        Some("docx"),
    ),
    text_tool(
        "text-to-pdf",
        "Text to PDF",
        "Create secure PDF documents from plain text.",
        ResultShape::File,
        "pdf",
        "Enter the text you want to convert to PDF...",
    ),
    text_tool(
        "text-to-word",
        "Text to Word",
        "Convert plain text content into Word documents.",
        ResultShape::File,
        "docx",
        "Type your text here to convert to Word...",
    ),
    file_tool(
        "word-to-pdf",
        "Word to PDF",
        "Convert Word documents to PDF format.",
        DOCX,
        ResultShape::File,
        Some("pdf"),
    ),
    file_tool(
        "html-to-pdf",
        "HTML to PDF",
        "Convert HTML files to PDF.",
        HTML,
        ResultShape::File,
        Some("pdf"),
    ),
    file_tool(
        "pdf-to-html",
        "PDF to HTML",
        "Convert PDF documents into HTML web pages.",
        PDF,
        ResultShape::File,
        Some("html"),
    ),
    ToolConfig {
        needs_target_language: true,
        ..file_tool(
            "pdf-translator",
            "PDF Translator",
            "Translate PDF documents to another language while preserving the original layout.",
            PDF,
            ResultShape::File,
            Some("pdf"),
        )
    },
    // ── Spreadsheet tools ─────────────────────────────────────────────────
    file_tool(
        "jpg-to-excel",
        "JPG to Excel",
        "Extract tabular data from JPG images to Excel.",
        IMAGES,
        ResultShape::File,
        Some("xlsx"),
    ),
    file_tool(
        "pdf-to-excel",
        "PDF to Excel",
        "Convert PDF tables into Excel spreadsheets.",
        PDF,
        ResultShape::File,
        Some("xlsx"),
    ),
    file_tool(
        "pdf-to-csv",
        "PDF to CSV",
        "Extract PDF data into comma-separated values.",
        PDF,
        ResultShape::File,
        Some("csv"),
    ),
    file_tool(
        "excel-to-jpg",
        "Excel to JPG",
        "Convert Excel spreadsheets to image format.",
        XLSX,
        ResultShape::Image,
        Some("jpg"),
    ),
    // ── Image tools ───────────────────────────────────────────────────────
    file_tool(
        "invert-image",
        "Invert Image",
        "Invert the colors of your image.",
        IMAGES,
        ResultShape::Image,
        None,
    ),
    text_tool(
        "text-to-image",
        "Text to Image",
        "Generate images from text descriptions.",
        ResultShape::Image,
        "png",
        "Describe the image you want to generate...",
    ),
    ToolConfig {
        needs_target_language: true,
        ..file_tool(
            "image-translator",
            "Image Translator",
            "Translate text within images instantly.",
            IMAGES,
            ResultShape::TranslationPair,
            None,
        )
    },
    ToolConfig {
        endpoint: "images-to-pdf",
        multiple: true,
        ..file_tool(
            "image-to-pdf",
            "Image to PDF",
            "Combine images into a single PDF.",
            IMAGES,
            ResultShape::File,
            Some("pdf"),
        )
    },
    file_tool(
        "pdf-to-jpg",
        "PDF to JPG",
        "Convert PDF pages into high-quality JPG images.",
        PDF,
        ResultShape::Image,
        Some("jpg"),
    ),
    file_tool(
        "word-to-jpg",
        "Word to JPG",
        "Convert Word document pages to JPG images.",
        DOCX,
        ResultShape::Image,
        Some("jpg"),
    ),
    ToolConfig {
        multiple: true,
        ..file_tool(
            "merge-pdf",
            "Merge PDF",
            "Combine multiple PDF files into one document.",
            PDF,
            ResultShape::File,
            Some("pdf"),
        )
    },
    // ── Scan & code ───────────────────────────────────────────────────────
    file_tool(
        "qr-scanner",
        "QR Code Scanner",
        "Scan and decode QR codes instantly.",
        IMAGES,
        ResultShape::Text,
        None,
    ),
    text_tool(
        "qr-generator",
        "QR Code Generator",
        "Create custom QR codes for URLs and text.",
        ResultShape::Image,
        "png",
        "Enter URL or text to generate QR code...",
    ),
    file_tool(
        "barcode-scanner",
        "Barcode Scanner",
        "Scan standard barcodes from images.",
        IMAGES,
        ResultShape::Text,
        None,
    ),
];

/// Find a tool by identifier. A leading `/` (as in catalog links) is ignored.
pub fn lookup(id: &str) -> Option<&'static ToolConfig> {
    let id = id.trim().trim_start_matches('/');
    TOOLS.iter().find(|t| t.id == id)
}

/// Every registered tool, in declaration order.
pub fn all() -> &'static [ToolConfig] {
    TOOLS
}
