//! # PDF Receipt Renderer
//!
//! Draws a paginated [`Receipt`] into a printable PDF.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     ReceiptRenderer::render_pdf(&Sale)                  │
//! │                                                                         │
//! │  Sale ──► Receipt::from_sale_wrapped ──► paginate ──► PageLayout[]      │
//! │                                             ▲              │            │
//! │  logo file ──► decode ──► height in mm ─────┘              ▼            │
//! │      │ (failure: warn! and render without it)    printpdf pages         │
//! │      │                                           Courier / Courier-Bold │
//! │      └──────────────────► drawn top-left on page 1         │            │
//! │                                                            ▼            │
//! │                                                     Vec<u8> (%PDF-...)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rendering is CPU-bound and synchronous; async callers run it on a
//! blocking thread.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use printpdf::{BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use duka_core::{CurrencyFormat, Sale};

use crate::error::{pdf_error, RenderError, RenderResult};
use crate::layout::{paginate, FontWeight, PageGeometry, PT_TO_MM};
use crate::receipt::{Issuer, Receipt, DEFAULT_FOOTER};
use crate::summary::render_summary;
use crate::wrap::DEFAULT_WRAP_WIDTH;

/// Resolution the logo is embedded at before scaling.
const LOGO_DPI: f32 = 300.0;

/// Space between the logo and the header text.
const LOGO_GAP_MM: f32 = 4.0;

/// Receipt appearance, as read from the `[receipt]` config section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptSettings {
    /// PNG or JPEG drawn top-left on the first page.
    #[serde(default)]
    pub logo_path: Option<PathBuf>,

    #[serde(default = "default_logo_width")]
    pub logo_width_mm: f32,

    /// Product names longer than this many characters wrap.
    #[serde(default = "default_wrap_width")]
    pub wrap_width: usize,

    #[serde(default = "default_footer")]
    pub footer: String,

    #[serde(default)]
    pub page: PageGeometry,
}

fn default_logo_width() -> f32 {
    30.0
}

fn default_wrap_width() -> usize {
    DEFAULT_WRAP_WIDTH
}

fn default_footer() -> String {
    DEFAULT_FOOTER.to_string()
}

impl Default for ReceiptSettings {
    fn default() -> Self {
        ReceiptSettings {
            logo_path: None,
            logo_width_mm: default_logo_width(),
            wrap_width: default_wrap_width(),
            footer: default_footer(),
            page: PageGeometry::default(),
        }
    }
}

/// Builds receipts for one issuer and currency.
#[derive(Debug, Clone)]
pub struct ReceiptRenderer {
    issuer: Issuer,
    currency: CurrencyFormat,
    settings: ReceiptSettings,
}

impl ReceiptRenderer {
    pub fn new(issuer: Issuer, currency: CurrencyFormat, settings: ReceiptSettings) -> Self {
        ReceiptRenderer {
            issuer,
            currency,
            settings,
        }
    }

    pub fn settings(&self) -> &ReceiptSettings {
        &self.settings
    }

    /// The data contract both outputs print from.
    pub fn receipt(&self, sale: &Sale) -> Receipt {
        Receipt::from_sale_wrapped(sale, &self.issuer, &self.currency, self.settings.wrap_width)
            .with_footer(self.settings.footer.clone())
    }

    /// Plain-text rendering for the confirmation screen.
    pub fn summary(&self, sale: &Sale) -> String {
        render_summary(&self.receipt(sale))
    }

    /// Renders `sale` as a PDF document.
    ///
    /// ## Errors
    /// Only `RenderError::Pdf`. A logo that cannot be loaded is logged
    /// and left out.
    pub fn render_pdf(&self, sale: &Sale) -> RenderResult<Vec<u8>> {
        let receipt = self.receipt(sale);
        let logo = self.settings.logo_path.as_deref().and_then(|path| {
            load_logo(path)
                .map_err(|e| warn!(path = ?path, error = %e, "Skipping receipt logo"))
                .ok()
        });

        let mut geometry = self.settings.page;
        let logo_height_mm = logo
            .as_ref()
            .map(|img| self.settings.logo_width_mm * img.height() as f32 / img.width().max(1) as f32);
        if let Some(height) = logo_height_mm {
            geometry.reserved_top_mm = height + LOGO_GAP_MM;
        }

        let pages = paginate(&receipt, &geometry);
        let width = Mm(geometry.page_width_mm);
        let height = Mm(geometry.page_height_mm);

        let (doc, first_page, first_layer) =
            PdfDocument::new(format!("Receipt {}", receipt.receipt_id), width, height, "Layer 1");
        let regular = doc.add_builtin_font(BuiltinFont::Courier).map_err(pdf_error)?;
        let bold = doc.add_builtin_font(BuiltinFont::CourierBold).map_err(pdf_error)?;

        for page in &pages {
            let (page_index, layer_index) = if page.number == 1 {
                (first_page, first_layer)
            } else {
                doc.add_page(width, height, format!("Page {}", page.number))
            };
            let layer = doc.get_page(page_index).get_layer(layer_index);

            if page.number == 1 {
                if let (Some(img), Some(logo_height)) = (&logo, logo_height_mm) {
                    self.draw_logo(&layer, img, &geometry, logo_height);
                }
            }

            for element in &page.elements {
                let font: &IndirectFontRef = match element.weight {
                    FontWeight::Regular => &regular,
                    FontWeight::Bold => &bold,
                };
                let baseline_mm = geometry.page_height_mm - element.y_mm - element.size_pt * PT_TO_MM;
                layer.use_text(
                    element.text.clone(),
                    element.size_pt,
                    Mm(element.x_mm),
                    Mm(baseline_mm),
                    font,
                );
            }
        }

        let bytes = doc.save_to_bytes().map_err(pdf_error)?;
        debug!(
            sale_id = %sale.id(),
            pages = pages.len(),
            bytes = bytes.len(),
            logo = logo.is_some(),
            "Rendered receipt PDF"
        );
        Ok(bytes)
    }

    fn draw_logo(&self, layer: &PdfLayerReference, img: &DynamicImage, geometry: &PageGeometry, logo_height_mm: f32) {
        let natural_width_mm = img.width() as f32 / LOGO_DPI * 25.4;
        let scale = self.settings.logo_width_mm / natural_width_mm;

        Image::from_dynamic_image(img).add_to_layer(
            layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(geometry.left_margin_mm)),
                translate_y: Some(Mm(geometry.page_height_mm - geometry.top_margin_mm - logo_height_mm)),
                scale_x: Some(scale),
                scale_y: Some(scale),
                dpi: Some(LOGO_DPI),
                ..Default::default()
            },
        );
    }
}

/// Reads and decodes a logo, flattening any alpha channel.
pub fn load_logo(path: &Path) -> RenderResult<DynamicImage> {
    let bytes = std::fs::read(path)?;
    let img = image::load_from_memory(&bytes).map_err(|e| RenderError::Logo {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(DynamicImage::ImageRgb8(img.to_rgb8()))
}
