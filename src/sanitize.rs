//! Markdown sanitizer
//!
//! The model is instructed to answer in plain prose, but replies still
//! arrive with stray markdown. This strips lightweight markup so responses
//! read as natural speech. Pure and idempotent: sanitizing already-clean
//! text is a no-op.

use once_cell::sync::Lazy;
use regex::Regex;

static LIST_MARKERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*[-*]\s+").expect("valid regex"));
static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid regex"));
static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.*?)\*").expect("valid regex"));
static CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`(.*?)`").expect("valid regex"));
static HEADINGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#+\s+").expect("valid regex"));
static BLANK_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n\s*\n+").expect("valid regex"));

/// Strip lightweight markdown from model output
///
/// Removes list markers, bold/italic/code delimiters and heading markers,
/// collapses runs of blank lines to a single blank line, and trims the ends.
pub fn sanitize(text: &str) -> String {
    let text = LIST_MARKERS.replace_all(text, "");
    let text = BOLD.replace_all(&text, "$1");
    let text = ITALIC.replace_all(&text, "$1");
    let text = CODE.replace_all(&text, "$1");
    let text = HEADINGS.replace_all(&text, "");
    let text = BLANK_RUNS.replace_all(&text, "\n\n");
    text.trim().to_string()
}
