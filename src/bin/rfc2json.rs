//! CLI binary for rfc-html-extractor.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ExtractorConfig`, runs the batch driver over a range of RFC numbers and
//! prints a summary.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rfc_html_extractor::{
    convert_range, BatchProgressCallback, BatchReport, CrossDocumentLinks, DirectoryStore,
    DocumentHtmlType, DocumentStore, ExtractorConfig, KeyLayout, MemoryStore, PUBLIC_SITE,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Renders a progress bar over the RFC range and one log line per document.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  \
                 [{bar:42.green/238}] {pos:>5}/{len} RFCs  \
                 ⏱ {elapsed_precise}  ETA {eta_precise}  {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix("Extracting");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_documents: usize) {
        self.bar.set_length(total_documents as u64);
        self.bar.reset_eta();
    }

    fn on_document_start(&self, number: u32) {
        self.bar.set_message(format!("RFC {number}"));
    }

    fn on_document_complete(&self, number: u32, kind: DocumentHtmlType) {
        self.bar.println(format!(
            "  {} RFC {:<5}  {}",
            green("✓"),
            number,
            dim(kind.as_str())
        ));
        self.bar.inc(1);
    }

    fn on_document_error(&self, number: u32, error: &str) {
        // Keep one line per document.
        let first_line = error.lines().next().unwrap_or_default();
        let msg = if first_line.chars().count() > 100 {
            let head: String = first_line.chars().take(99).collect();
            format!("{head}\u{2026}")
        } else {
            first_line.to_string()
        };

        self.bar
            .println(format!("  {} RFC {:<5}  {}", red("✗"), number, red(&msg)));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, _total_documents: usize, _success_count: usize) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # One RFC into ./out/rfc/9000.json
  rfc2json 9000

  # A range, written to a custom directory
  rfc2json 8000 8100 --out-dir bucket/

  # Convert without writing anything
  rfc2json 1 50 --dry-run

  # Keep links to /rfc/rfcN.html instead of migrating them to /info/rfcN/
  rfc2json 9000 --preserve-rfc-links

  # Older flat file names (rfc9000-html.json)
  rfc2json 9000 --legacy-names

ENVIRONMENT VARIABLES:
  RFC2JSON_PUBLIC_SITE    Origin to fetch from (default https://www.rfc-editor.org)
  RFC2JSON_OUT_DIR        Output directory (default ./out)
  PDFIUM_LIB_PATH         Path to libpdfium, used for RFCs without an HTML rendition
  RUST_LOG                Override the log filter (e.g. rfc_html_extractor=debug)
"#;

/// Normalise RFC HTML/PDF renditions into JSON documents.
#[derive(Parser, Debug)]
#[command(
    name = "rfc2json",
    version,
    about = "Normalise RFC HTML/PDF renditions into JSON documents",
    long_about = "Fetch the HTML rendition of each RFC in a range (falling back to the PDF \
rendition), normalise it into a schema-checked document and store it as JSON.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// First RFC number to process.
    min: u32,

    /// Last RFC number to process (inclusive). Defaults to `min`.
    max: Option<u32>,

    /// Directory documents and page images are written to.
    #[arg(short, long, env = "RFC2JSON_OUT_DIR", default_value = "out")]
    out_dir: PathBuf,

    /// Convert and validate, but keep results in memory only.
    #[arg(long, env = "RFC2JSON_DRY_RUN")]
    dry_run: bool,

    /// Leave links into the legacy /rfc/ route as they are.
    #[arg(long, env = "RFC2JSON_PRESERVE_RFC_LINKS")]
    preserve_rfc_links: bool,

    /// Skip the HTML allowlist sanitizer.
    #[arg(long, env = "RFC2JSON_NO_SANITIZE")]
    no_sanitize: bool,

    /// Origin documents are fetched from.
    #[arg(long, env = "RFC2JSON_PUBLIC_SITE", default_value = PUBLIC_SITE)]
    public_site: String,

    /// Store documents as rfc{N}-html.json instead of rfc/{N}.json.
    #[arg(long, env = "RFC2JSON_LEGACY_NAMES")]
    legacy_names: bool,

    /// Pause between documents in milliseconds.
    #[arg(long, env = "RFC2JSON_DELAY_MS", default_value_t = 80)]
    delay_ms: u64,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "RFC2JSON_FETCH_TIMEOUT", default_value_t = 120)]
    fetch_timeout: u64,

    /// Disable progress bar.
    #[arg(long, env = "RFC2JSON_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "RFC2JSON_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "RFC2JSON_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let max = cli.max.unwrap_or(cli.min);
    if max < cli.min {
        anyhow::bail!("Invalid range {}-{}: min must be <= max", cli.min, max);
    }

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO-level logs unless --verbose is given.
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let progress = show_progress.then(CliProgressCallback::new);
    let config = build_config(&cli, progress)?;

    let start = Instant::now();
    let report = if cli.dry_run {
        run(cli.min, max, &config, &MemoryStore::new()).await
    } else {
        run(cli.min, max, &config, &DirectoryStore::new(&cli.out_dir)).await
    };

    if !cli.quiet {
        print_summary(&cli, &report, start.elapsed());
    }

    if !report.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

async fn run<S: DocumentStore>(min: u32, max: u32, config: &ExtractorConfig, store: &S) -> BatchReport {
    convert_range(min, max, config, store).await
}

/// Map CLI args to `ExtractorConfig`.
fn build_config(cli: &Cli, progress: Option<Arc<CliProgressCallback>>) -> Result<ExtractorConfig> {
    let mut builder = ExtractorConfig::builder()
        .public_site(&cli.public_site)
        .sanitize(!cli.no_sanitize)
        .request_delay_ms(cli.delay_ms)
        .fetch_timeout_secs(cli.fetch_timeout);

    if cli.preserve_rfc_links {
        builder = builder.cross_document_links(CrossDocumentLinks::Preserve);
    }
    if cli.legacy_names {
        builder = builder.key_layout(KeyLayout::Legacy);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

fn print_summary(cli: &Cli, report: &BatchReport, elapsed: Duration) {
    let failed = report.failures.len();
    let icon = if failed == 0 {
        green("✔")
    } else if report.success_count() == 0 {
        red("✘")
    } else {
        cyan("⚠")
    };
    let destination = if cli.dry_run {
        "memory (dry run)".to_string()
    } else {
        cli.out_dir.display().to_string()
    };

    eprintln!(
        "{}  {}/{} RFCs  {:.1}s  →  {}",
        icon,
        bold(&report.success_count().to_string()),
        report.total(),
        elapsed.as_secs_f64(),
        bold(&destination),
    );
    eprintln!(
        "   {} xml2rfc  /  {} plaintext  /  {} pdf",
        dim(&report.count_of(DocumentHtmlType::Xml2rfc).to_string()),
        dim(&report.count_of(DocumentHtmlType::Plaintext).to_string()),
        dim(&report.count_of(DocumentHtmlType::PdfOrPs).to_string()),
    );
    for failure in &report.failures {
        eprintln!("   {} {}", red("✗"), failure);
    }
}
