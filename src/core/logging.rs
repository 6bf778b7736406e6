//! Terminal Logging Module
//!
//! Provides:
//! - `tracing` subscriber setup: human-readable stdout layer plus an
//!   optional JSON file layer
//! - miette error reporting hook
//! - Progress bar styles for batch resolution (indicatif)
//! - Styled console output for the run summary (console)

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use console::{style, Term};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

// ============================================================================
// Terminal Capability Detection
// ============================================================================

static TERMINAL_CAPS: OnceLock<TerminalCapabilities> = OnceLock::new();

fn get_terminal_caps() -> &'static TerminalCapabilities {
    TERMINAL_CAPS.get_or_init(TerminalCapabilities::detect)
}

/// Detected terminal capabilities
#[derive(Debug, Clone)]
pub struct TerminalCapabilities {
    pub colors: bool,
    pub supports_unicode: bool,
    pub is_interactive: bool,
    pub width: u16,
}

impl TerminalCapabilities {
    pub fn detect() -> Self {
        let term = Term::stdout();
        let supports_unicode = std::env::var("TERM")
            .map(|t| !t.contains("dumb"))
            .unwrap_or(true)
            && std::env::var("LANG")
                .map(|l| l.contains("UTF-8") || l.contains("utf8"))
                .unwrap_or(true);

        Self {
            colors: console::colors_enabled(),
            supports_unicode,
            is_interactive: term.is_term(),
            width: term.size().1,
        }
    }

    pub fn should_colorize(&self) -> bool {
        self.is_interactive && self.colors
    }
}

// ============================================================================
// Logging Initialization
// ============================================================================

/// Default filter for `-v` count: info, then debug, then trace.
pub fn default_directive(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    format!("{}={level},warn", env!("CARGO_CRATE_NAME"))
}

/// Initialize the logging system.
///
/// This sets up:
/// 1. A stdout logger (compact, human-readable) that clears the active
///    progress bar around each line.
/// 2. If `log_file` is given, a JSON file logger through a non-blocking writer.
/// 3. Redirects standard `log` crate events to `tracing`.
/// 4. Configures miette for error reporting.
///
/// `RUST_LOG` overrides the verbosity-derived filter. The returned guard
/// must be held until exit so buffered file logs are flushed.
pub fn init(verbosity: u8, log_file: Option<&Path>) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let (file_layer, guard) = match log_file.and_then(file_writer) {
        Some((writer, guard)) => {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .json()
                .with_file(true)
                .with_line_number(true)
                .with_target(true)
                .with_filter(env_filter.clone());
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(|| BarAwareStdout)
        .with_target(false)
        .with_filter(env_filter);

    // A global subscriber may already be set (tests, embedding); keep it.
    let _ = tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .try_init();

    if let Err(e) = tracing_log::LogTracer::init() {
        tracing::debug!("LogTracer already installed: {e}");
    }

    init_miette();

    guard
}

fn file_writer(
    path: &Path,
) -> Option<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path.file_name()?;

    if let Err(e) = fs::create_dir_all(dir) {
        eprintln!("Failed to create log directory {}: {e}", dir.display());
        return None;
    }

    let appender = tracing_appender::rolling::never(dir, file_name);
    Some(tracing_appender::non_blocking(appender))
}

/// Initialize miette for error reporting
fn init_miette() {
    let caps = get_terminal_caps();

    miette::set_hook(Box::new(move |_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .unicode(caps.supports_unicode)
                .context_lines(3)
                .break_words(true)
                .color(caps.should_colorize())
                .build(),
        )
    }))
    .ok(); // Ignore if already set
}

// ============================================================================
// Progress Bars (Indicatif Integration)
// ============================================================================

/// Progress bar styles
pub struct ProgressStyles;

impl ProgressStyles {
    /// Progress bar with position, percentage and ETA
    pub fn default_bar() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{msg}: {percent:>3}% [{bar:40.cyan/blue}] {pos}/{len} [{elapsed}<{eta}]")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }
}

/// Bar that stdout log lines are printed around, if one is running.
static ACTIVE_BAR: Mutex<Option<ProgressBar>> = Mutex::new(None);

fn active_bar() -> Option<ProgressBar> {
    ACTIVE_BAR.lock().ok().and_then(|bar| bar.clone())
}

fn set_active_bar(bar: Option<ProgressBar>) {
    if let Ok(mut slot) = ACTIVE_BAR.lock() {
        *slot = bar;
    }
}

/// Stdout writer for the log layer. While a bar is active each write runs
/// inside [`ProgressBar::suspend`], so log lines never land mid-bar.
struct BarAwareStdout;

impl Write for BarAwareStdout {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match active_bar() {
            Some(bar) => bar.suspend(|| io::stdout().write(buf)),
            None => io::stdout().write(buf),
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match active_bar() {
            Some(bar) => bar.suspend(|| io::stdout().write_all(buf)),
            None => io::stdout().write_all(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}

/// Bar for `total` cards; hidden when stdout is not a terminal.
///
/// The bar becomes the active one for log output until
/// [`finish_progress`] is called.
pub fn resolution_progress(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if !get_terminal_caps().is_interactive {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }
    pb.set_style(ProgressStyles::default_bar());
    pb.set_message("Processing cards");
    set_active_bar(Some(pb.clone()));
    pb
}

/// Clear `pb` from the terminal and stop routing log output around it.
pub fn finish_progress(pb: &ProgressBar) {
    pb.finish_and_clear();
    set_active_bar(None);
}

// ============================================================================
// Console Output Utilities
// ============================================================================

/// Print a styled panel with title and content
pub fn print_panel(title: &str, content: &str) {
    let caps = get_terminal_caps();
    let width = (caps.width as usize).clamp(20, 80);

    let (h, tl, tr, bl, br, side) = if caps.supports_unicode {
        ("─", "╭", "╮", "╰", "╯", "│")
    } else {
        ("-", "+", "+", "+", "+", "|")
    };

    let title_display = format!(" {title} ");
    let border_len = width
        .saturating_sub(title_display.chars().count())
        .saturating_sub(2)
        .max(1);
    println!(
        "{}{}{}{}",
        style(tl).cyan(),
        style(&title_display).cyan().bold(),
        style(h.repeat(border_len)).cyan(),
        style(tr).cyan()
    );

    let content_width = width.saturating_sub(4).max(1);
    for line in content.lines() {
        println!("{} {:content_width$} {}", style(side).cyan(), line, style(side).cyan());
    }

    println!(
        "{}{}{}",
        style(bl).cyan(),
        style(h.repeat(width.saturating_sub(2).max(1))).cyan(),
        style(br).cyan()
    );
}

pub fn print_success(message: &str) {
    let prefix = if get_terminal_caps().supports_unicode { "✔" } else { "[OK]" };
    println!("{} {}", style(prefix).green(), style(message).green());
}

pub fn print_warning(message: &str) {
    let prefix = if get_terminal_caps().supports_unicode { "⚠" } else { "[!]" };
    println!("{} {}", style(prefix).yellow(), style(message).yellow().bold());
}

// ============================================================================
// Tests
// ============================================================================
