//! Page image encoding: greyscale detection and PNG compression.
//!
//! Most RFC PDFs are black text on white. Those pages are stored as a
//! single luma channel reduced to 64 grey levels, which compresses several
//! times better than RGB at no visible cost.

use crate::error::RfcHtmlError;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, GenericImageView};
use tracing::debug;

/// Largest channel difference still treated as grey (rasteriser noise).
const GREYSCALE_TOLERANCE: u8 = 1;

/// Grey levels kept in greyscale output.
const GREY_LEVELS: u16 = 64;

/// Whether every pixel's R, G and B are within one step of each other.
pub fn is_greyscale(img: &DynamicImage) -> bool {
    if img.color().channel_count() <= 2 {
        return true;
    }
    img.pixels().all(|(_, _, px)| {
        let [r, g, b, _] = px.0;
        r.abs_diff(g) <= GREYSCALE_TOLERANCE
            && g.abs_diff(b) <= GREYSCALE_TOLERANCE
            && b.abs_diff(r) <= GREYSCALE_TOLERANCE
    })
}

fn quantize(value: u8) -> u8 {
    let step = 256 / GREY_LEVELS;
    let level = u16::from(value) / step;
    (level * 255 / (GREY_LEVELS - 1)) as u8
}

/// Encode `img` as a best-compression PNG; greyscale pages as 64-level luma.
pub fn compress_png(img: &DynamicImage, greyscale: bool, page: usize) -> Result<Vec<u8>, RfcHtmlError> {
    let mut buf = Vec::new();
    let encoder = PngEncoder::new_with_quality(&mut buf, CompressionType::Best, FilterType::Adaptive);
    let result = if greyscale {
        let mut luma = img.to_luma8();
        for px in luma.pixels_mut() {
            px.0[0] = quantize(px.0[0]);
        }
        luma.write_with_encoder(encoder)
    } else {
        img.to_rgb8().write_with_encoder(encoder)
    };
    result.map_err(|e| RfcHtmlError::ImageEncodingFailed {
        page,
        detail: e.to_string(),
    })?;

    debug!(
        "Encoded page {} ({}) → {} bytes",
        page,
        if greyscale { "greyscale" } else { "colour" },
        buf.len()
    );
    Ok(buf)
}
