use std::io;

use miette::Diagnostic;
use thiserror::Error;

/// An offset past the end of the text it was meant to index.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
#[error("offset {offset} is out of range for a text of {len} characters")]
#[diagnostic(
    code(litswap::locator::out_of_range),
    help("offsets are zero-based character indices and may not exceed the text length")
)]
pub struct OutOfRange {
    pub offset: usize,
    pub len: usize,
}

#[derive(Error, Debug, Diagnostic)]
pub enum ReportError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    OutOfRange(#[from] OutOfRange),

    #[error("failed to write locator report")]
    #[diagnostic(code(litswap::locator::io))]
    Io(#[from] io::Error),
}
