use std::io;
use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("cannot read config {}", path.display())]
    #[diagnostic(code(litswap::config::read))]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config: {message}")]
    #[diagnostic(
        code(litswap::config::parse),
        help("expected an object with source_path, offsets, replacement_rules, target_paths, jobs and atomic")
    )]
    Parse {
        #[source_code]
        source_code: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
        message: String,
    },

    #[error("{group} has a rule with an empty pattern")]
    #[diagnostic(
        code(litswap::config::empty_pattern),
        help("an empty pattern matches between every character; remove the rule")
    )]
    EmptyPattern { group: String },

    #[error("{group} has replacement rules but no target paths")]
    #[diagnostic(code(litswap::config::no_targets))]
    NoTargets { group: String },

    #[error("offsets were given without a source_path")]
    #[diagnostic(code(litswap::config::no_source))]
    OffsetsWithoutSource,
}
