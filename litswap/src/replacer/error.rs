use std::io;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// What can go wrong while rewriting one target file.
#[derive(Error, Debug, Diagnostic)]
pub enum ReplaceError {
    #[error("cannot read {}", path.display())]
    #[diagnostic(
        code(litswap::replacer::read),
        help("check that the target exists and is readable")
    )]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not valid UTF-8 (byte {byte_offset}: 0x{bytes_hex})", path.display())]
    #[diagnostic(
        code(litswap::replacer::encoding),
        help("only UTF-8 text files can be rewritten")
    )]
    Encoding {
        path: PathBuf,
        byte_offset: usize,
        bytes_hex: String,
    },

    #[error("cannot write {}", path.display())]
    #[diagnostic(
        code(litswap::replacer::write),
        help("check that the target and its directory are writable")
    )]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ReplaceError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            ReplaceError::Read { path, .. }
            | ReplaceError::Encoding { path, .. }
            | ReplaceError::Write { path, .. } => path,
        }
    }
}
