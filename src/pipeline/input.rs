//! Source download: the HTML and PDF renditions of one RFC.
//!
//! Both renditions come from the configured public site. Failures map to
//! [`RfcHtmlError::FetchFailed`] / [`RfcHtmlError::FetchTimeout`], which the
//! batch driver treats as recoverable.

use crate::config::ExtractorConfig;
use crate::error::RfcHtmlError;
use std::time::Duration;
use tracing::{debug, info};

/// Where the HTML rendition of `number` is served.
pub fn source_html_url(number: u32, config: &ExtractorConfig) -> String {
    format!("{}/rfc-neue/rfc{number}.html", config.public_site)
}

/// Where the PDF rendition of `number` is served.
pub fn source_pdf_url(number: u32, config: &ExtractorConfig) -> String {
    format!("{}/rfc/rfc{number}.pdf", config.public_site)
}

/// Download the HTML rendition.
pub async fn fetch_source_html(number: u32, config: &ExtractorConfig) -> Result<String, RfcHtmlError> {
    let url = source_html_url(number, config);
    let bytes = fetch_bytes(&url, config.fetch_timeout_secs).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Download the PDF rendition and check its magic bytes.
pub async fn fetch_source_pdf(number: u32, config: &ExtractorConfig) -> Result<Vec<u8>, RfcHtmlError> {
    let url = source_pdf_url(number, config);
    let bytes = fetch_bytes(&url, config.fetch_timeout_secs).await?;
    if !is_pdf(&bytes) {
        return Err(RfcHtmlError::CorruptPdf {
            number,
            detail: format!(
                "'{url}' is not a PDF (starts with {:?})",
                &bytes[..bytes.len().min(4)]
            ),
        });
    }
    Ok(bytes)
}

pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(b"%PDF")
}

async fn fetch_bytes(url: &str, timeout_secs: u64) -> Result<Vec<u8>, RfcHtmlError> {
    info!("Fetching {}", url);

    let failed = |reason: String| RfcHtmlError::FetchFailed {
        url: url.to_string(),
        reason,
    };
    let map_send = |e: reqwest::Error| {
        if e.is_timeout() {
            RfcHtmlError::FetchTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            failed(e.to_string())
        }
    };

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| failed(e.to_string()))?;

    let response = client.get(url).send().await.map_err(map_send)?;

    if !response.status().is_success() {
        return Err(failed(format!("HTTP {}", response.status())));
    }

    let bytes = response.bytes().await.map_err(map_send)?;
    debug!("Fetched {} bytes from {}", bytes.len(), url);
    Ok(bytes.to_vec())
}
