//! Byte-offset line arithmetic

/// Offset of the first byte of the line containing `pos`
pub fn line_start(content: &[u8], pos: usize) -> usize {
    let pos = pos.min(content.len());
    content[..pos]
        .iter()
        .rposition(|&b| b == b'\n')
        .map(|i| i + 1)
        .unwrap_or(0)
}

/// The line before the one starting at `line_start`, newline included
///
/// `None` when `line_start` is the first line of the file.
pub fn previous_line(content: &[u8], line_start: usize) -> Option<&[u8]> {
    if line_start == 0 || line_start > content.len() {
        return None;
    }
    let prev_start = self::line_start(content, line_start - 1);
    Some(&content[prev_start..line_start])
}

/// 1-based line number of `pos`
pub fn line_number(content: &[u8], pos: usize) -> usize {
    let pos = pos.min(content.len());
    content[..pos].iter().filter(|&&b| b == b'\n').count() + 1
}
