use unicode_width::UnicodeWidthStr;

/// Terminal column width of `text`, counting wide glyphs as two cells.
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Right-pad `text` with spaces until it occupies `width` terminal columns.
pub fn pad_display(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(display_width(text));
    let mut padded = String::with_capacity(text.len() + pad);
    padded.push_str(text);
    padded.extend(std::iter::repeat(' ').take(pad));
    padded
}
