//! Tag stripping for HTML-bearing payload fields and rendered page markup
//!
//! Paragraph, line-break and block boundaries are rewritten to newlines with
//! regexes first; the HTML parser then drops the remaining tags and decodes
//! named and numeric entities.

use regex::Regex;
use scraper::Html;
use std::sync::LazyLock;

static SCRIPT_OR_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script[^>]*>.*?</script\s*>|<style[^>]*>.*?</style\s*>").unwrap()
});
static PARAGRAPH_JOIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</p\s*>\s*<p(?:\s[^>]*)?>").unwrap());
static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static PARAGRAPH_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<p(?:\s[^>]*)?>").unwrap());
static PARAGRAPH_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</p\s*>").unwrap());
static BLOCK_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</?(?:div|li|ul|ol|h[1-6]|tr|table|section|header|footer|article)(?:\s[^>]*)?>")
        .unwrap()
});
static HORIZONTAL_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());
static SPACE_AROUND_NEWLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" ?\n ?").unwrap());
static BLANK_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Text content of a fragment with entities decoded
fn fragment_text(markup: &str) -> String {
    Html::parse_fragment(markup)
        .root_element()
        .text()
        .collect()
}

/// Strip tags while keeping paragraph and line-break structure as newlines
#[must_use]
pub fn clean_html(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }

    let text = SCRIPT_OR_STYLE.replace_all(html, "");
    let text = PARAGRAPH_JOIN.replace_all(&text, "\n\n");
    let text = LINE_BREAK.replace_all(&text, "\n");
    let text = PARAGRAPH_OPEN.replace_all(&text, "");
    let text = PARAGRAPH_CLOSE.replace_all(&text, "\n\n");
    let text = BLOCK_TAG.replace_all(&text, "\n");

    let text = fragment_text(&text)
        .replace('\r', "")
        .replace('\u{a0}', " ");

    let text = HORIZONTAL_SPACE.replace_all(&text, " ");
    let text = SPACE_AROUND_NEWLINE.replace_all(&text, "\n");
    let text = BLANK_RUNS.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// Clean a full page of markup and split it into lines for the scanner
#[must_use]
pub fn html_to_lines(html: &str) -> Vec<String> {
    clean_html(html).lines().map(str::to_string).collect()
}
