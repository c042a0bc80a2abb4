/// Characters Telegram's MarkdownV2 treats as markup.
const SPECIAL_CHARS: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!', '\\',
];

/// Escapes text so MarkdownV2 shows it literally.
///
/// ```
/// use housekeeping_bot::utils::markdown::escape_markdown;
///
/// assert_eq!(escape_markdown("№101 (полная)"), "№101 \\(полная\\)");
/// ```
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if SPECIAL_CHARS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
