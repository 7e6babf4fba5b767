//! Small string helpers used when building prompt text.

use std::borrow::Cow;

/// Ellipsis inserted by [`trim_middle`].
pub const ELLIPSIS: char = '…';

/// Shorten `text` to at most `max_chars` characters by cutting out its middle.
///
/// The last `max_chars / 2` characters are kept, the ellipsis takes one
/// character and the rest of the budget goes to the beginning. Text that
/// already fits is returned unchanged.
///
/// # Examples
///
/// ```
/// use credential_prompt_core::text::trim_middle;
///
/// assert_eq!(trim_middle("short", 50), "short");
/// assert_eq!(trim_middle("abcdefghij", 7), "abc…hij");
/// ```
pub fn trim_middle(text: &str, max_chars: usize) -> Cow<'_, str> {
    let len = text.chars().count();
    if len <= max_chars {
        return Cow::Borrowed(text);
    }

    let suffix_len = max_chars / 2;
    let prefix_len = max_chars.saturating_sub(suffix_len + 1);

    let mut trimmed: String = text.chars().take(prefix_len).collect();
    trimmed.push(ELLIPSIS);
    trimmed.extend(text.chars().skip(len - suffix_len));
    Cow::Owned(trimmed)
}

/// Return the last component of a `/` or `\` separated path.
///
/// Trailing separators are ignored, so `/home/u/.ssh/` yields `.ssh`.
pub fn file_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches(['/', '\\']);
    match trimmed.rfind(['/', '\\']) {
        Some(index) => &trimmed[index + 1..],
        None => trimmed,
    }
}

/// Treat an all-whitespace value as absent.
///
/// Non-blank values are kept as typed, surrounding whitespace included.
pub fn nullize_blank(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
