//! Conversion entry points.
//!
//! [`convert_html`] and [`convert_pdf`] turn one rendition into an
//! [`RfcBucketHtmlDocument`]. [`process_rfc`] fetches, converts and stores a
//! single RFC, falling back to the PDF rendition when the HTML one cannot be
//! fetched. [`convert_range`] drives `process_rfc` over a range of numbers
//! and collects failures instead of stopping at the first.

use crate::config::ExtractorConfig;
use crate::dom::{parse_html, to_portable, Element, Node, COMPONENT_ATTR};
use crate::error::{DocumentFailure, RfcHtmlError};
use crate::model::{BibliographicRecord, RecordAndToc, RfcFormat};
use crate::output::{
    BatchReport, DocumentHtmlType, MaxPreformattedLineLength, RfcBucketHtmlDocument, StoredDocument,
};
use crate::pipeline::sniff::HtmlDialect;
use crate::pipeline::{
    encode, input, layout, linelength, links, metadata, render, sanitize, select, sniff, validate,
    wordbreak,
};
use crate::store::{page_image_file_name, page_image_key, DocumentStore};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Component name of the per-page container in PDF-derived documents.
pub const PDF_PAGE_COMPONENT: &str = "PdfPage";

/// Line length reported for PDF-derived documents.
const PDF_LINE_LENGTH: usize = 80;

/// Convert the HTML rendition of an RFC.
///
/// `number` is only used when neither `<head>` nor `<body>` carries one.
///
/// # Errors
/// Fails on an unknown dialect, malformed ToC markup, or a document that
/// does not survive validation.
pub fn convert_html(
    html: &str,
    number: u32,
    config: &ExtractorConfig,
) -> Result<RfcBucketHtmlDocument, RfcHtmlError> {
    let mut doc = parse_html(html);
    if config.sanitize {
        doc = sanitize::sanitize_document(doc, &config.allow_list);
    }

    let dialect = sniff::sniff(&doc)?;
    debug!("RFC {} sniffed as {}", number, dialect);

    let mut acc = RecordAndToc::default();
    if let Some(head) = doc.head() {
        metadata::parse_head(head, &mut acc);
    }
    let mut body = doc.take_body();
    metadata::parse_body(&mut body, dialect, &mut acc)?;
    if acc.record.set_number_once(number) {
        debug!("RFC number not found in document, using {}", number);
    }

    // Measured before selection so removed boilerplate still counts.
    let line_length = linelength::max_line_length(&body, dialect);

    let mut nodes = select::select_body(body, dialect);
    if dialect == HtmlDialect::Xml2rfc {
        nodes = layout::rewrite_for_layout(nodes, config);
    }
    nodes = links::rewrite_links(nodes, acc.record.number, config)?;
    nodes = wordbreak::insert_word_breaks(nodes, config.word_break_threshold);

    let document = RfcBucketHtmlDocument {
        rfc: acc.record,
        table_of_contents: acc.table_of_contents,
        document_html_type: dialect.into(),
        document_html_obj: to_portable(&nodes)?,
        max_preformatted_line_length: line_length,
    };
    validate::validate_document(&document)?;
    Ok(document)
}

/// Convert the PDF rendition of an RFC.
///
/// Every page is rasterised, PNG encoded and uploaded to `store` as
/// `rfc/{number}-page-{page}.png`. The document body holds one
/// `PdfPage` container per page whose image `src` is `image_src(file_name)`
/// and whose alt text is the page's extracted text.
pub async fn convert_pdf<S, F>(
    bytes: Vec<u8>,
    number: u32,
    config: &ExtractorConfig,
    store: &S,
    image_src: F,
) -> Result<RfcBucketHtmlDocument, RfcHtmlError>
where
    S: DocumentStore,
    F: Fn(&str) -> String,
{
    let pages = render::render_pdf(bytes, number, config.pdf_render_width_px).await?;

    let mut uploads = Vec::with_capacity(pages.len());
    let mut nodes = Vec::with_capacity(pages.len());
    for page in &pages {
        let greyscale = encode::is_greyscale(&page.image);
        let png = encode::compress_png(&page.image, greyscale, page.number)?;
        let file_name = page_image_file_name(number, page.number);

        nodes.push(Node::from(page_container(
            page.number,
            &image_src(&file_name),
            &page.text,
            page.image.width(),
            page.image.height(),
        )));
        uploads.push((page_image_key(&file_name), png));
    }

    stream::iter(uploads)
        .map(|(key, png)| async move { store.put(&key, png).await })
        .buffer_unordered(config.upload_concurrency)
        .try_collect::<Vec<()>>()
        .await?;
    info!("RFC {}: uploaded {} page images", number, pages.len());

    let mut record = BibliographicRecord::blank(number);
    record.formats.insert(RfcFormat::Pdf);

    let document = RfcBucketHtmlDocument {
        rfc: record,
        table_of_contents: None,
        document_html_type: DocumentHtmlType::PdfOrPs,
        document_html_obj: to_portable(&nodes)?,
        max_preformatted_line_length: MaxPreformattedLineLength::floor(PDF_LINE_LENGTH),
    };
    validate::validate_document(&document)?;
    Ok(document)
}

fn page_container(page: usize, src: &str, alt: &str, width: u32, height: u32) -> Element {
    let img = Element::new("img")
        .with_attr("src", src)
        .with_attr("alt", alt)
        .with_attr("width", width.to_string())
        .with_attr("height", height.to_string());
    Element::new("div")
        .with_attr(COMPONENT_ATTR, PDF_PAGE_COMPONENT)
        .with_attr("data-page-number", page.to_string())
        .with_child(img)
}

/// Site-relative path a stored page image is served from.
pub fn default_image_src(file_name: &str) -> String {
    format!("/{}", page_image_key(file_name))
}

/// Fetch, convert and store one RFC.
///
/// The HTML rendition is preferred. When it cannot be fetched (see
/// [`RfcHtmlError::is_recoverable`]) the PDF rendition is used instead.
pub async fn process_rfc<S: DocumentStore>(
    number: u32,
    config: &ExtractorConfig,
    store: &S,
) -> Result<StoredDocument, RfcHtmlError> {
    let start = Instant::now();

    let document = match input::fetch_source_html(number, config).await {
        Ok(html) => convert_html(&html, number, config)?,
        Err(e) if e.is_recoverable() => {
            info!("RFC {}: HTML unavailable ({}), trying PDF", number, e);
            let bytes = input::fetch_source_pdf(number, config).await?;
            convert_pdf(bytes, number, config, store, default_image_src).await?
        }
        Err(e) => return Err(e),
    };

    let key = config.key_layout.document_key(number);
    let json = serde_json::to_vec(&document)?;
    store.put(&key, json).await?;

    info!(
        "RFC {} ({}) stored at {} in {}ms",
        number,
        document.document_html_type,
        key,
        start.elapsed().as_millis()
    );
    Ok(StoredDocument {
        number,
        kind: document.document_html_type,
        key,
    })
}

/// Process every RFC in `min..=max`, in order.
///
/// A failing document is logged, reported through the progress callback and
/// recorded in the returned [`BatchReport`]; the run continues.
pub async fn convert_range<S: DocumentStore>(
    min: u32,
    max: u32,
    config: &ExtractorConfig,
    store: &S,
) -> BatchReport {
    let total = if max >= min { (max - min) as usize + 1 } else { 0 };
    let delay = Duration::from_millis(config.request_delay_ms);
    let cb = config.progress_callback.as_ref();

    if let Some(cb) = cb {
        cb.on_batch_start(total);
    }

    let mut report = BatchReport::default();
    for number in min..=max {
        if let Some(cb) = cb {
            cb.on_document_start(number);
        }
        match process_rfc(number, config, store).await {
            Ok(stored) => {
                if let Some(cb) = cb {
                    cb.on_document_complete(number, stored.kind);
                }
                report.stored.push(stored);
            }
            Err(e) => {
                warn!("Failed to process RFC {}: {}", number, e);
                if let Some(cb) = cb {
                    cb.on_document_error(number, &e.to_string());
                }
                report.failures.push(DocumentFailure::new(number, &e));
            }
        }
        if number < max && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    info!(
        "Batch complete: {}/{} documents stored",
        report.success_count(),
        report.total()
    );
    if let Some(cb) = cb {
        cb.on_batch_complete(report.total(), report.success_count());
    }
    report
}
