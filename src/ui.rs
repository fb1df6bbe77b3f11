// UI module for consistent terminal output with progress bars and styling
//
// Human-readable output goes through here so commands share one look.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use console::{Term, style};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use serde::Serialize;
use std::time::Duration;

/// Spinner style similar to uv/pnpm
const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Check if stderr is a TTY (for interactive output)
fn is_tty() -> bool {
    Term::stderr().is_term()
}

/// Create a styled spinner for async operations
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if !is_tty() {
        // Messages are printed directly when finished instead
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }

    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars(SPINNER_CHARS)
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());

    if is_tty() {
        pb.enable_steady_tick(Duration::from_millis(80));
    }

    pb
}

/// Create a progress bar for downloads; size may be unknown
pub fn download_bar(total_size: Option<u64>, name: &str) -> ProgressBar {
    let pb = match total_size {
        Some(size) => {
            let pb = ProgressBar::new(size);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template(
                        "{spinner:.cyan} {msg} [{bar:25.cyan/dim}] {bytes}/{total_bytes} ({bytes_per_sec})",
                    )
                    .unwrap()
                    .tick_chars(SPINNER_CHARS)
                    .progress_chars("━━╺"),
            );
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .tick_chars(SPINNER_CHARS)
                    .template("{spinner:.cyan} {msg} {bytes} ({bytes_per_sec})")
                    .unwrap(),
            );
            pb
        }
    };

    if !is_tty() {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }
    pb.set_message(name.to_string());
    pb
}

/// Print a success message with checkmark
pub fn success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Print an info/action message with arrow
pub fn action(message: &str) {
    println!("{} {}", style("→").cyan(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    eprintln!("{} {}", style("⚠").yellow(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red(), message);
}

/// Print a dimmed/secondary message
pub fn dim(message: &str) {
    println!("{}", style(message).dim());
}

/// Print a labelled value, e.g. "  install  https://..."
pub fn status(prefix: &str, message: &str) {
    println!("  {} {}", style(format!("{:<10}", prefix)).cyan().bold(), message);
}

/// Print a bare line, for output meant to be piped
pub fn plain(message: &str) {
    println!("{}", message);
}

/// Print a value as pretty JSON on stdout
pub fn json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn finish_with(pb: &ProgressBar, msg: String, to_stderr: bool) {
    if is_tty() {
        pb.set_style(ProgressStyle::default_spinner().template("{msg}").unwrap());
        pb.finish_with_message(msg);
    } else {
        pb.finish_and_clear();
        if to_stderr {
            eprintln!("{}", msg);
        } else {
            println!("{}", msg);
        }
    }
}

/// Finish a spinner with the loaded add-on and version
pub fn finish_spinner_loaded(pb: &ProgressBar, name: &str, version: &str) {
    let msg = format!("{} {} {}", style("✓").green(), name, style(version).dim());
    finish_with(pb, msg, false);
}

/// Finish a spinner with error
pub fn finish_spinner_error(pb: &ProgressBar, message: &str) {
    let msg = format!("{} {}", style("✗").red(), message);
    finish_with(pb, msg, true);
}

/// Finish a download bar with success
pub fn finish_download_success(pb: &ProgressBar, name: &str, verified: bool) {
    let note = if verified { "verified" } else { "unverified" };
    let msg = format!("{} {} {}", style("✓").green(), name, style(note).dim());
    finish_with(pb, msg, false);
}
