//! Character offset to 1-based line/column translation.

use std::borrow::Cow;
use std::fmt;
use std::io::Write;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::locator::error::{OutOfRange, ReportError};
use crate::utils::{core::Loc, loc::char_span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,   // 1-based
    pub column: usize, // 1-based, in characters
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} col {}", self.line, self.column)
    }
}

/// An offset together with the position it resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Located {
    pub offset: usize,
    pub position: Position,
}

impl Located {
    pub fn at<'a>(&self, path: &'a str) -> Loc<'a> {
        Loc {
            path,
            line: self.position.line,
            column: self.position.column,
        }
    }
}

impl fmt::Display for Located {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.offset, self.position)
    }
}

/// Convert `\r\n` and lone `\r` to `\n`, the text offsets are counted in.
pub fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}

/// Character index of the first character of every line.
///
/// Offsets address the text after [`normalize_newlines`], so a CRLF pair is
/// a single character.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len_chars: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        let mut len_chars = 0;
        for (i, c) in normalize_newlines(text).chars().enumerate() {
            if c == '\n' {
                line_starts.push(i + 1);
            }
            len_chars = i + 1;
        }
        Self {
            line_starts,
            len_chars,
        }
    }

    pub fn len_chars(&self) -> usize {
        self.len_chars
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Offsets in `[0, len_chars]` are valid; `len_chars` addresses the
    /// position just past the final character.
    pub fn locate(&self, offset: usize) -> Result<Position, OutOfRange> {
        if offset > self.len_chars {
            return Err(OutOfRange {
                offset,
                len: self.len_chars,
            });
        }
        // line_starts[0] == 0, so at least one start is <= offset.
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let column = offset - self.line_starts[line - 1] + 1;
        Ok(Position { line, column })
    }
}

pub fn locate(text: &str, offset: usize) -> Result<Position, OutOfRange> {
    LineIndex::new(text).locate(offset)
}

/// Resolve every offset against one index, preserving input order.
pub fn locate_all(text: &str, offsets: &[usize]) -> Result<Vec<Located>, OutOfRange> {
    let index = LineIndex::new(text);
    offsets
        .iter()
        .map(|&offset| {
            index
                .locate(offset)
                .map(|position| Located { offset, position })
        })
        .collect()
}

/// Write one `<offset> -> line <L> col <C>` line per offset.
///
/// Every offset is resolved before anything is written, so an out-of-range
/// offset produces no partial report.
pub fn report<W: Write>(text: &str, offsets: &[usize], mut out: W) -> Result<(), ReportError> {
    let located = locate_all(text, offsets)?;
    for l in &located {
        writeln!(out, "{l}")?;
    }
    out.flush()?;
    Ok(())
}

/// A source excerpt pointing at a located offset.
#[derive(Error, Debug, Diagnostic)]
#[error("offset {offset} is at {position}")]
#[diagnostic(code(litswap::locator::offset), severity(Advice))]
pub struct Snippet {
    #[source_code]
    pub source_code: NamedSource<String>,
    #[label("offset {offset}")]
    pub span: SourceSpan,
    pub offset: usize,
    pub position: Position,
}

pub fn snippet(name: &str, text: &str, located: &Located) -> Result<Snippet, OutOfRange> {
    let text = normalize_newlines(text);
    let span = char_span(&text, located.offset).ok_or(OutOfRange {
        offset: located.offset,
        len: text.chars().count(),
    })?;
    Ok(Snippet {
        source_code: NamedSource::new(name, text.into_owned()),
        span,
        offset: located.offset,
        position: located.position,
    })
}
