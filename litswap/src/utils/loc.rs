use miette::SourceSpan;

/// Byte index of the `char_offset`-th character of `src`.
///
/// Returns `src.len()` for an offset equal to the character count and
/// `None` past it.
pub fn char_to_byte(src: &str, char_offset: usize) -> Option<usize> {
    src.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(src.len()))
        .nth(char_offset)
}

/// Span covering the single character at `char_offset`, or an empty span at
/// the end of `src`.
pub fn char_span(src: &str, char_offset: usize) -> Option<SourceSpan> {
    let start = char_to_byte(src, char_offset)?;
    let width = src[start..].chars().next().map_or(0, char::len_utf8);
    Some(SourceSpan::from((start, width)))
}

/// Convert 1-based (line, column, width) into an absolute `SourceSpan`.
///
/// line / col are 1-based to match typical compiler diagnostics.
/// width is the number of bytes to underline.
///
/// A line past the end clamps to the end of `src`; column 0 is read as 1.
pub fn span_from_linecol(src: &str, line: usize, col: usize, width: usize) -> SourceSpan {
    let mut offset = 0usize;
    for (i, l) in src.split_inclusive('\n').enumerate() {
        if i + 1 == line {
            let body = l.trim_end_matches('\n').len();
            offset += (col.saturating_sub(1)).min(body);
            break;
        }
        offset += l.len();
    }
    let width = width.min(src.len() - offset);
    SourceSpan::from((offset, width))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_to_byte_counts_scalars() {
        let src = "aé\nb";
        assert_eq!(char_to_byte(src, 0), Some(0));
        assert_eq!(char_to_byte(src, 1), Some(1));
        assert_eq!(char_to_byte(src, 2), Some(3));
        assert_eq!(char_to_byte(src, 4), Some(5));
        assert_eq!(char_to_byte(src, 5), None);
    }

    #[test]
    fn char_span_covers_multibyte_char() {
        let span = char_span("aé", 1).unwrap();
        assert_eq!(span.offset(), 1);
        assert_eq!(span.len(), 2);

        let end = char_span("aé", 2).unwrap();
        assert_eq!(end.offset(), 3);
        assert_eq!(end.len(), 0);
    }

    #[test]
    fn span_from_linecol_walks_lines() {
        let src = "{\n  \"offsets\": x\n}";
        let span = span_from_linecol(src, 2, 14, 1);
        assert_eq!(span.offset(), 15);
        assert_eq!(span.len(), 1);
    }

    #[test]
    fn span_from_linecol_clamps() {
        let src = "ab";
        let span = span_from_linecol(src, 9, 9, 4);
        assert_eq!(span.offset(), 2);
        assert_eq!(span.len(), 0);

        let span = span_from_linecol(src, 1, 0, 1);
        assert_eq!(span.offset(), 0);
    }
}
