//! Catalog and navigation shell.
//!
//! The home listing groups tools into four categories and narrows them with a
//! live search; the sidebar mirrors the same groups with per-group
//! expand/collapse and collapses itself on narrow viewports.

use crate::config::ClientConfig;
use serde::Serialize;
use std::collections::BTreeMap;

/// A catalog entry pointing at a tool page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogTool {
    pub name: &'static str,
    pub href: &'static str,
}

/// A group of tools on the home listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub title: &'static str,
    pub description: &'static str,
    pub tools: Vec<CatalogTool>,
}

/// Text shown when a search matches nothing.
pub const NO_TOOLS_FOUND: &str = "No tools found";

const fn tool(name: &'static str, href: &'static str) -> CatalogTool {
    CatalogTool { name, href }
}

static HOME: &[(&str, &str, &[CatalogTool])] = &[
    (
        "Document Conversion",
        "Transform documents between formats with high fidelity.",
        &[
            tool("JPG to Word", "/jpg-to-word"),
            tool("PDF to Text", "/pdf-to-text"),
            tool("PDF to Word", "/pdf-to-word"),
            tool("Text to PDF", "/text-to-pdf"),
            tool("Text to Word", "/text-to-word"),
            tool("Word to PDF", "/word-to-pdf"),
            tool("HTML to PDF", "/html-to-pdf"),
            tool("PDF to HTML", "/pdf-to-html"),
        ],
    ),
    (
        "Spreadsheet Tools",
        "Extract data from tables and convert spreadsheet formats.",
        &[
            tool("JPG to Excel", "/jpg-to-excel"),
            tool("PDF to Excel", "/pdf-to-excel"),
            tool("PDF to CSV", "/pdf-to-csv"),
            tool("Excel to JPG", "/excel-to-jpg"),
        ],
    ),
    (
        "Image Tools",
        "Enhance, translate, and manipulate images and PDFs.",
        &[
            tool("Invert Image", "/invert-image"),
            tool("Text to Image", "/text-to-image"),
            tool("Image Translator", "/image-translator"),
            tool("Image to PDF", "/image-to-pdf"),
            tool("PDF to JPG", "/pdf-to-jpg"),
            tool("Word to JPG", "/word-to-jpg"),
            tool("Merge PDF", "/merge-pdf"),
        ],
    ),
    (
        "Scan & Code",
        "Generate and scan QR codes and barcodes instantly.",
        &[
            tool("QR Scanner", "/qr-scanner"),
            tool("QR Generator", "/qr-generator"),
            tool("Barcode Scanner", "/barcode-scanner"),
        ],
    ),
];

static SIDEBAR: &[(&str, &[CatalogTool])] = &[
    (
        "Conversion",
        &[
            tool("JPG to Word", "/jpg-to-word"),
            tool("PDF Translator", "/pdf-translator"),
            tool("PDF to Text", "/pdf-to-text"),
            tool("PDF to Word", "/pdf-to-word"),
            tool("Text to PDF", "/text-to-pdf"),
            tool("Text to Word", "/text-to-word"),
            tool("Word to PDF", "/word-to-pdf"),
            tool("HTML to PDF", "/html-to-pdf"),
            tool("PDF to HTML", "/pdf-to-html"),
        ],
    ),
    (
        "Spreadsheet",
        &[
            tool("JPG to Excel", "/jpg-to-excel"),
            tool("PDF to Excel", "/pdf-to-excel"),
            tool("PDF to CSV", "/pdf-to-csv"),
            tool("Excel to JPG", "/excel-to-jpg"),
        ],
    ),
    (
        "Image Tools",
        &[
            tool("Invert Image", "/invert-image"),
            tool("Text to Image", "/text-to-image"),
            tool("Image Translator", "/image-translator"),
            tool("Image to PDF", "/image-to-pdf"),
            tool("PDF to JPG", "/pdf-to-jpg"),
            tool("Word to JPG", "/word-to-jpg"),
            tool("Merge PDF", "/merge-pdf"),
        ],
    ),
    (
        "Scan & Code",
        &[
            tool("QR Scanner", "/qr-scanner"),
            tool("QR Generator", "/qr-generator"),
            tool("Barcode Scanner", "/barcode-scanner"),
        ],
    ),
];

/// The full, unfiltered home listing.
pub fn home_categories() -> Vec<Category> {
    HOME.iter()
        .map(|&(title, description, tools)| Category {
            title,
            description,
            tools: tools.to_vec(),
        })
        .collect()
}

/// Home listing narrowed by a case-insensitive substring search.
///
/// A tool stays when its own name or its category title contains `query`;
/// categories left without tools are dropped. An empty query keeps everything.
pub fn filter_catalog(query: &str) -> Vec<Category> {
    let q = query.to_lowercase();
    home_categories()
        .into_iter()
        .filter_map(|mut category| {
            let title_hit = category.title.to_lowercase().contains(&q);
            category
                .tools
                .retain(|t| title_hit || t.name.to_lowercase().contains(&q));
            (!category.tools.is_empty()).then_some(category)
        })
        .collect()
}

/// Every href referenced by the home listing and the sidebar.
pub fn all_hrefs() -> Vec<&'static str> {
    let home = HOME.iter().flat_map(|(_, _, tools)| tools.iter());
    let side = SIDEBAR.iter().flat_map(|(_, tools)| tools.iter());
    let mut hrefs: Vec<&'static str> = home.chain(side).map(|t| t.href).collect();
    hrefs.sort_unstable();
    hrefs.dedup();
    hrefs
}

/// One sidebar group as rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavGroup {
    pub title: &'static str,
    pub expanded: bool,
    pub items: Vec<NavItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub name: &'static str,
    pub href: &'static str,
    pub active: bool,
}

/// Collapsible sidebar state.
#[derive(Debug, Clone)]
pub struct Sidebar {
    open: bool,
    breakpoint_px: u32,
    expanded: BTreeMap<&'static str, bool>,
}

impl Sidebar {
    /// All groups expanded, sidebar open.
    pub fn new(breakpoint_px: u32) -> Self {
        Self {
            open: true,
            breakpoint_px,
            expanded: SIDEBAR.iter().map(|(title, _)| (*title, true)).collect(),
        }
    }

    /// Sidebar collapsing below `config.sidebar_breakpoint_px`.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.sidebar_breakpoint_px)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Recompute visibility for a viewport width. Runs on every resize, so a
    /// manual close is overridden by the next resize above the breakpoint.
    pub fn on_resize(&mut self, width_px: u32) {
        self.open = width_px >= self.breakpoint_px;
    }

    /// Flip one group. Unknown titles are ignored.
    pub fn toggle_group(&mut self, title: &str) {
        if let Some(v) = self.expanded.get_mut(title) {
            *v = !*v;
        }
    }

    pub fn is_expanded(&self, title: &str) -> bool {
        self.expanded.get(title).copied().unwrap_or(false)
    }

    /// Groups in display order, with the entry matching `current_path` marked.
    pub fn groups(&self, current_path: &str) -> Vec<NavGroup> {
        SIDEBAR
            .iter()
            .map(|&(title, items)| NavGroup {
                title,
                expanded: self.is_expanded(title),
                items: items
                    .iter()
                    .map(|t| NavItem {
                        name: t.name,
                        href: t.href,
                        active: t.href == current_path,
                    })
                    .collect(),
            })
            .collect()
    }
}

impl Default for Sidebar {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}
