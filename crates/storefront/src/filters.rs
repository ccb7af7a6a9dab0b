//! Custom Askama template filters.

use std::fmt::Display;
use std::sync::LazyLock;

use askama::filters::Html;
use regex::Regex;

/// `*bold*` within one line.
static BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*\n]+)\*").expect("Invalid regex"));

/// `_italic_` within one line.
static ITALIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_([^_\n]+)_").expect("Invalid regex"));

/// `~strikethrough~` within one line.
static STRIKE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"~([^~\n]+)~").expect("Invalid regex"));

/// Render WhatsApp markup as HTML.
///
/// Supports `*bold*`, `_italic_` and `~strikethrough~` within a line, and
/// turns newlines into `<br>`. The input is HTML-escaped first, so the
/// output can be marked `|safe`.
///
/// Usage in templates: `{{ body|whatsapp|safe }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn whatsapp(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(render_whatsapp(&value.to_string()))
}

/// Convert WhatsApp markup to HTML.
#[must_use]
pub fn render_whatsapp(text: &str) -> String {
    let Ok(escaped) = askama::filters::escape(text, Html);
    let escaped = escaped.to_string();

    let html = BOLD_RE.replace_all(&escaped, "<strong>$1</strong>");
    let html = ITALIC_RE.replace_all(&html, "<em>$1</em>");
    let html = STRIKE_RE.replace_all(&html, "<del>$1</del>");

    html.lines().collect::<Vec<_>>().join("<br>\n")
}
