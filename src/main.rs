//! PDF redaction CLI.
//!
//! Hosts a redaction session on the command line: searches and drawn
//! rectangles become marks, and the marks are committed to a new file.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use redmark::domain::reconstruct_lines;
use redmark::{
    DocumentProvider, MuPdfBackend, MuPdfDocument, Point, RedactionSession, RedactionSettings,
    SearchMode,
};

/// PDF Redaction Tool
///
/// Mark text matches and drawn rectangles for redaction, then save a copy
/// with the content under them permanently removed.
#[derive(Parser)]
#[command(name = "redmark")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Input PDF file path
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output PDF file path
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Text to find and redact (can be specified multiple times)
    #[arg(short, long, value_name = "QUERY")]
    find: Vec<String>,

    /// Treat every --find query as a regular expression
    #[arg(long)]
    regex: bool,

    /// Vertical padding in pixels for search hits; negative shrinks
    #[arg(long, value_name = "PX", allow_hyphen_values = true)]
    pad_y: Option<f64>,

    /// Drawn rectangle as PAGE:X0,Y0,X1,Y1 in rendered page pixels (page is 1-based)
    #[arg(long = "rect", value_name = "PAGE:X0,Y0,X1,Y1", value_parser = parse_draw)]
    rects: Vec<DrawArg>,

    /// Render zoom (pixels per PDF unit) used to interpret --rect and --pad-y
    #[arg(long, value_name = "ZOOM")]
    zoom: Option<f64>,

    /// Settings file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Save even when no redaction marks were produced
    #[arg(long)]
    allow_empty: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print reconstructed text lines with word offsets (for debugging searches)
    Lines {
        /// Input PDF file path
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Only this page (1-based)
        #[arg(short, long, value_name = "PAGE")]
        page: Option<usize>,
    },
}

/// A `--rect` argument: zero-based page and two page-local pixel corners.
#[derive(Debug, Clone, PartialEq)]
struct DrawArg {
    page: usize,
    p0: Point,
    p1: Point,
}

fn draw_pattern() -> &'static Regex {
    static PATTERN: Lazy<Regex> = Lazy::new(|| {
        let num = r"\s*(-?\d+(?:\.\d+)?)\s*";
        Regex::new(&format!(r"^\s*(\d+)\s*:{num},{num},{num},{num}$"))
            .expect("Valid rectangle argument regex")
    });
    &PATTERN
}

fn parse_draw(arg: &str) -> Result<DrawArg, String> {
    let caps = draw_pattern()
        .captures(arg)
        .ok_or_else(|| format!("expected PAGE:X0,Y0,X1,Y1, got '{}'", arg))?;
    let number = |i: usize| -> Result<f64, String> {
        caps[i]
            .parse::<f64>()
            .map_err(|e| format!("invalid coordinate '{}': {}", &caps[i], e))
    };
    let page: usize = caps[1]
        .parse()
        .map_err(|e| format!("invalid page '{}': {}", &caps[1], e))?;
    if page == 0 {
        return Err("page numbers start at 1".to_string());
    }
    Ok(DrawArg {
        page: page - 1,
        p0: Point::new(number(2)?, number(3)?),
        p1: Point::new(number(4)?, number(5)?),
    })
}

/// Command handler holding settings shared by all operations.
struct RedactionHandler {
    settings: RedactionSettings,
    verbose: bool,
}

impl RedactionHandler {
    fn new(settings: RedactionSettings, verbose: bool) -> Self {
        Self { settings, verbose }
    }

    fn open_document(&self, input: &Path) -> Result<MuPdfDocument> {
        if !input.exists() {
            anyhow::bail!("Input file does not exist: {}", input.display());
        }
        MuPdfDocument::open(input, self.settings.zoom)
            .with_context(|| format!("Failed to open {}", input.display()))
    }

    /// Collects marks from queries and rectangles, then commits them.
    fn redact(&self, input: &Path, output: &Path, job: &RedactionJob) -> Result<()> {
        if job.queries.is_empty() && job.rects.is_empty() && !job.allow_empty {
            anyhow::bail!("No redaction targets specified. Use --find or --rect.");
        }

        let document = self.open_document(input)?;
        let mut session = RedactionSession::open(document, input, self.settings.clone())?;

        if self.verbose {
            println!("Input:  {}", input.display());
            println!("Output: {}", output.display());
            println!("Pages:  {}", session.page_count());
        }

        let mode = if job.regex {
            SearchMode::Pattern
        } else {
            SearchMode::Literal
        };
        let pad = job.pad_y.unwrap_or(self.settings.search_pad_y);
        for query in &job.queries {
            let added = session
                .adjusted_find_and_store(query, mode, pad)
                .with_context(|| format!("Search for '{}' failed", query))?;
            if added == 0 {
                println!("⚠ No matches found for '{}'", query);
            } else if self.verbose {
                println!("  '{}': {} rectangle(s)", query, added);
            }
        }

        for draw in &job.rects {
            let origin = match session.geometry(draw.page) {
                Ok(g) => g.origin,
                Err(e) => {
                    println!("⚠ Skipped rectangle: {}", e);
                    continue;
                }
            };
            let p0 = Point::new(origin.x + draw.p0.x, origin.y + draw.p0.y);
            let p1 = Point::new(origin.x + draw.p1.x, origin.y + draw.p1.y);
            match session.try_add_manual_draw(draw.page, p0, p1) {
                Ok(rect) if self.verbose => {
                    println!("  page {}: rectangle {:?}", draw.page + 1, rect);
                }
                Ok(_) => {}
                Err(e) => println!("⚠ Skipped rectangle on page {}: {}", draw.page + 1, e),
            }
        }

        if session.store().is_empty() && !job.allow_empty {
            anyhow::bail!("No redaction marks to apply. Use --allow-empty to save anyway.");
        }

        let summary = session
            .commit(&MuPdfBackend::new(), output)
            .with_context(|| "Redaction failed")?;

        if self.verbose {
            println!("\nRedaction Summary:");
            println!("  Pages modified: {}", summary.pages_modified);
            println!("  Marks applied:  {}", summary.marks_applied);
            if summary.pages_skipped > 0 {
                println!("  Pages skipped:  {}", summary.pages_skipped);
            }
        }

        if summary.has_redactions() {
            println!(
                "✓ Redacted {} region(s) → {}",
                summary.marks_applied,
                output.display()
            );
        } else {
            println!("⚠ Saved without redactions → {}", output.display());
        }

        Ok(())
    }

    /// Prints each page's reconstructed lines.
    fn lines(&self, input: &Path, page: Option<usize>) -> Result<()> {
        let document = self.open_document(input)?;
        let pages: Vec<usize> = match page {
            Some(0) => anyhow::bail!("Page numbers start at 1"),
            Some(p) => vec![p - 1],
            None => (0..document.page_count()).collect(),
        };

        for index in pages {
            let words = document
                .page_words(index)
                .with_context(|| format!("Failed to read page {}", index + 1))?;
            println!("--- page {} ---", index + 1);
            for (key, line) in reconstruct_lines(&words) {
                println!("({}, {}) {}", key.0, key.1, line.text);
                if self.verbose {
                    for entry in line.offsets.iter() {
                        println!(
                            "    [{:>4}, {:>4}) {:<20} {:?}",
                            entry.start, entry.end, entry.word.token, entry.word.rect
                        );
                    }
                }
            }
        }
        Ok(())
    }
}

/// Everything the default redaction mode needs besides the paths.
struct RedactionJob {
    queries: Vec<String>,
    regex: bool,
    pad_y: Option<f64>,
    rects: Vec<DrawArg>,
    allow_empty: bool,
}

fn load_settings(config: Option<&Path>, zoom: Option<f64>) -> Result<RedactionSettings> {
    let mut settings = match config {
        Some(path) => RedactionSettings::from_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => RedactionSettings::default(),
    };
    if let Some(zoom) = zoom {
        settings.zoom = zoom;
    }
    settings.validate()?;
    Ok(settings)
}

fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = load_settings(cli.config.as_deref(), cli.zoom)?;
    let handler = RedactionHandler::new(settings, cli.verbose);

    match &cli.command {
        Some(Commands::Lines { input, page }) => {
            handler.lines(input, *page)?;
        }
        None => {
            let input = cli
                .input
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("--input is required"))?;
            let output = cli
                .output
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("--output is required"))?;

            let job = RedactionJob {
                queries: cli.find.clone(),
                regex: cli.regex,
                pad_y: cli.pad_y,
                rects: cli.rects.clone(),
                allow_empty: cli.allow_empty,
            };
            handler.redact(input, output, &job)?;
        }
    }

    Ok(())
}
