//! Scanner for the order completion marker.
//!
//! The waiter model is instructed to end a reply with
//! `[ORDER_COMPLETE: <summary>]` once the guest confirms an order. The scanner
//! is exact-substring based: it finds the first opening token and the first
//! `]` after it. Nested brackets are not balanced; the first `]` closes the
//! marker. Only the first marker in a reply is considered.

/// Literal opening token of the completion marker.
pub const ORDER_MARKER_OPEN: &str = "[ORDER_COMPLETE:";

/// Closing character of the completion marker.
pub const ORDER_MARKER_CLOSE: char = ']';

/// Maximum number of characters forwarded from a marker.
pub const MAX_ORDER_TEXT_CHARS: usize = 1000;

/// Result of scanning a reply for the completion marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerScan<'a> {
    /// A well-formed marker; holds the text between the colon and `]`.
    Found(&'a str),
    /// No opening token in the reply.
    Absent,
    /// The opening token has no closing `]` after it.
    Unterminated,
}

impl<'a> MarkerScan<'a> {
    /// Scan `text` for the first completion marker.
    #[must_use]
    pub fn scan(text: &'a str) -> Self {
        let Some(open) = text.find(ORDER_MARKER_OPEN) else {
            return Self::Absent;
        };
        let body_start = open + ORDER_MARKER_OPEN.len();
        let rest = text.get(body_start..).unwrap_or_default();

        rest.find(ORDER_MARKER_CLOSE)
            .and_then(|close| rest.get(..close))
            .map_or(Self::Unterminated, Self::Found)
    }

    /// The enclosed text when the marker is well-formed.
    #[must_use]
    pub const fn found(self) -> Option<&'a str> {
        match self {
            Self::Found(body) => Some(body),
            Self::Absent | Self::Unterminated => None,
        }
    }
}

/// Extract the text enclosed by the first well-formed completion marker.
///
/// Returns `None` when there is no marker or when it is unterminated; a
/// truncated summary is never returned.
///
/// ```
/// use fusion_core::find_order_marker;
///
/// assert_eq!(
///     find_order_marker("Sure! [ORDER_COMPLETE: Pizza ($10), Total: $10]"),
///     Some(" Pizza ($10), Total: $10")
/// );
/// assert_eq!(find_order_marker("What would you like?"), None);
/// assert_eq!(find_order_marker("[ORDER_COMPLETE: Pizza"), None);
/// ```
#[must_use]
pub fn find_order_marker(text: &str) -> Option<&str> {
    MarkerScan::scan(text).found()
}

/// Reply text with the first well-formed marker removed, for display.
///
/// Replies without a well-formed marker are returned trimmed but otherwise
/// unchanged.
#[must_use]
pub fn strip_order_marker(text: &str) -> String {
    let Some(body) = find_order_marker(text) else {
        return text.trim().to_string();
    };
    let marker = format!("{ORDER_MARKER_OPEN}{body}{ORDER_MARKER_CLOSE}");
    text.replacen(&marker, "", 1).trim().to_string()
}

/// Clean extracted marker text before it is forwarded to the restaurant.
///
/// Removes control characters other than newlines, trims surrounding
/// whitespace and caps the length at [`MAX_ORDER_TEXT_CHARS`] characters.
/// Returns `None` when nothing is left.
#[must_use]
pub fn sanitize_marker_text(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c == '\n' || !c.is_control())
        .collect();
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(MAX_ORDER_TEXT_CHARS).collect())
}
