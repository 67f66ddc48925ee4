//! PDF pages → text + image, via pdfium.
//!
//! pdfium keeps thread-local state and is CPU-bound, so the whole document
//! is processed inside `tokio::task::spawn_blocking`.

use crate::error::RfcHtmlError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::PathBuf;
use tracing::{debug, info};

/// Environment variable pointing at a pdfium shared library.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// One rasterised page.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// 1-based page number.
    pub number: usize,
    /// Extracted page text, used as the image's alt text.
    pub text: String,
    pub image: DynamicImage,
}

/// Render every page of the PDF in `bytes` at `width_px`.
pub async fn render_pdf(
    bytes: Vec<u8>,
    number: u32,
    width_px: u32,
) -> Result<Vec<RenderedPage>, RfcHtmlError> {
    tokio::task::spawn_blocking(move || render_pdf_blocking(&bytes, number, width_px))
        .await
        .map_err(|e| RfcHtmlError::Internal(format!("Render task panicked: {}", e)))?
}

/// Bind pdfium from `PDFIUM_LIB_PATH`, else from the system library path.
fn bind_pdfium() -> Result<Pdfium, RfcHtmlError> {
    let bindings = match std::env::var_os(PDFIUM_LIB_PATH_ENV).map(PathBuf::from) {
        Some(path) if path.exists() => Pdfium::bind_to_library(&path),
        _ => Pdfium::bind_to_system_library(),
    };
    bindings
        .map(Pdfium::new)
        .map_err(|e| RfcHtmlError::Internal(format!("pdfium library not available: {e}")))
}

fn render_pdf_blocking(
    bytes: &[u8],
    number: u32,
    width_px: u32,
) -> Result<Vec<RenderedPage>, RfcHtmlError> {
    let pdfium = bind_pdfium()?;

    let document = pdfium
        .load_pdf_from_byte_slice(bytes, None)
        .map_err(|e| RfcHtmlError::CorruptPdf {
            number,
            detail: format!("{:?}", e),
        })?;

    let pages = document.pages();
    info!("RFC {} PDF loaded: {} pages", number, pages.len());

    let render_config = PdfRenderConfig::new().set_target_width(width_px as i32);

    let mut results = Vec::with_capacity(pages.len() as usize);
    for (idx, page) in pages.iter().enumerate() {
        let page_number = idx + 1;
        let failed = |e: PdfiumError| RfcHtmlError::RasterisationFailed {
            page: page_number,
            detail: format!("{:?}", e),
        };

        let text = page.text().map_err(failed)?.all();
        let bitmap = page.render_with_config(&render_config).map_err(failed)?;
        let image = bitmap.as_image();
        debug!(
            "Rendered page {} → {}x{} px, {} chars of text",
            page_number,
            image.width(),
            image.height(),
            text.len()
        );

        results.push(RenderedPage {
            number: page_number,
            text,
            image,
        });
    }

    Ok(results)
}
