//! Pipeline stages for RFC normalisation.
//!
//! Each submodule implements one transformation step. Stages after body
//! selection take the retained `Vec<Node>` by value and return the
//! rewritten list, so each can be tested on its own.
//!
//! ## Data Flow
//!
//! ```text
//!            HTML path                                   PDF path
//!
//! input ──▶ sanitize ──▶ sniff ──▶ metadata/toc      input ──▶ render ──▶ encode
//!                                      │                         (pdfium)   (PNG)
//!          linelength ◀── select ◀─────┘                                     │
//!               │            │                                              │
//!               │     layout ──▶ links ──▶ wordbreak                        │
//!               │                              │                            │
//!               └──────────────▶ validate ◀────┴────────────────────────────┘
//! ```
//!
//! 1. [`input`] download the HTML or PDF rendition
//! 2. [`sanitize`] allowlist tags, attributes and URL schemes
//! 3. [`sniff`] plaintext or xml2rfc dialect
//! 4. [`metadata`] bibliographic record from `<head>` and `<body>`
//! 5. [`toc`] table of contents from headings or the `#toc` list
//! 6. [`linelength`] longest preformatted line, over the whole body
//! 7. [`select`] drop boilerplate body children
//! 8. [`layout`] scrollable wrappers and SVG sizing (xml2rfc only)
//! 9. [`links`] origin-relative and canonical links
//! 10. [`wordbreak`] `<wbr>` in long words
//! 11. [`validate`] JSON round-trip check of the assembled document
//!
//! The PDF path uses [`render`] and [`encode`] instead of steps 2–10.

pub mod encode;
pub mod input;
pub mod layout;
pub mod linelength;
pub mod links;
pub mod metadata;
pub mod render;
pub mod sanitize;
pub mod select;
pub mod sniff;
pub mod toc;
pub mod validate;
pub mod wordbreak;
