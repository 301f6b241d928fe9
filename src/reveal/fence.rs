//! Code-fence balancing for partially revealed markdown.

use std::borrow::Cow;

/// Markdown fenced code block delimiter.
pub const FENCE: &str = "```";

/// Close a dangling code fence so half-streamed markdown parses cleanly.
///
/// An odd number of fence delimiters means a block was opened but its
/// closing fence has not arrived yet; a closing fence is appended on its
/// own line. Balanced text is returned borrowed.
pub fn balance_code_fences(text: &str) -> Cow<'_, str> {
    if text.matches(FENCE).count() % 2 == 0 {
        return Cow::Borrowed(text);
    }

    let mut balanced = String::with_capacity(text.len() + FENCE.len() + 1);
    balanced.push_str(text);
    balanced.push('\n');
    balanced.push_str(FENCE);
    Cow::Owned(balanced)
}
