//! Run configuration: what to locate and what to rewrite.
//!
//! ```json
//! {
//!   "source_path": "src/App.tsx",
//!   "offsets": [27893, 64351],
//!   "replacement_rules": { "#121212": "#000" },
//!   "target_paths": ["src/App.tsx"],
//!   "jobs": [
//!     { "replacement_rules": { "#0d0d0d": "#000" }, "target_paths": "src/a.tsx" }
//!   ],
//!   "atomic": false
//! }
//! ```
//!
//! Key order inside `replacement_rules` is the order rules are applied in.

use std::fs;
use std::path::{Path, PathBuf};

use miette::NamedSource;
use serde::{Deserialize, Serialize};
use serde_with::{Map, OneOrMany, serde_as};

use crate::config::error::ConfigError;
use crate::replacer::core::{ReplaceJob, RuleSet, WriteMode};
use crate::utils::loc::span_from_linecol;

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
    #[serde_as(as = "Map<_, _>")]
    #[serde(default)]
    pub replacement_rules: Vec<(String, String)>,
    #[serde_as(as = "OneOrMany<_>")]
    #[serde(default)]
    pub target_paths: Vec<PathBuf>,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_path: Option<PathBuf>,
    #[serde_as(as = "OneOrMany<_>")]
    #[serde(default)]
    pub offsets: Vec<usize>,
    #[serde_as(as = "Map<_, _>")]
    #[serde(default)]
    pub replacement_rules: Vec<(String, String)>,
    #[serde_as(as = "OneOrMany<_>")]
    #[serde(default)]
    pub target_paths: Vec<PathBuf>,
    #[serde(default)]
    pub jobs: Vec<JobConfig>,
    #[serde(default)]
    pub atomic: bool,
}

impl Config {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let src = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&path.display().to_string(), &src)
    }

    pub fn from_json(src: &str) -> Result<Self, ConfigError> {
        Self::parse("<config>", src)
    }

    fn parse(name: &str, src: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(src).map_err(|e| ConfigError::Parse {
            source_code: NamedSource::new(name, src.to_owned()),
            span: span_from_linecol(src, e.line(), e.column(), 1),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Fails for paths that are not valid UTF-8.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.offsets.is_empty() && self.source_path.is_none() {
            return Err(ConfigError::OffsetsWithoutSource);
        }
        for (group, job) in self.groups() {
            if job.replacement_rules.iter().any(|(old, _)| old.is_empty()) {
                return Err(ConfigError::EmptyPattern { group });
            }
            if !job.replacement_rules.is_empty() && job.target_paths.is_empty() {
                return Err(ConfigError::NoTargets { group });
            }
        }
        Ok(())
    }

    /// Every rule group with a label for diagnostics; the top-level group
    /// comes first.
    fn groups(&self) -> impl Iterator<Item = (String, JobConfig)> + '_ {
        let top = JobConfig {
            replacement_rules: self.replacement_rules.clone(),
            target_paths: self.target_paths.clone(),
        };
        std::iter::once(("replacement_rules".to_owned(), top)).chain(
            self.jobs
                .iter()
                .enumerate()
                .map(|(i, j)| (format!("jobs[{i}]"), j.clone())),
        )
    }

    /// Replacement jobs in application order. Groups with neither rules
    /// nor targets are dropped.
    pub fn jobs(&self) -> Vec<ReplaceJob> {
        self.groups()
            .filter(|(_, j)| !(j.replacement_rules.is_empty() && j.target_paths.is_empty()))
            .map(|(_, j)| ReplaceJob {
                rules: RuleSet::from_pairs(j.replacement_rules),
                targets: j.target_paths,
            })
            .collect()
    }

    pub fn write_mode(&self) -> WriteMode {
        if self.atomic {
            WriteMode::Atomic
        } else {
            WriteMode::Sequential
        }
    }

    /// Resolve relative paths against `root`. Absolute paths are kept.
    pub fn rooted(mut self, root: &Path) -> Self {
        let join = |p: &mut PathBuf| *p = root.join(&*p);
        if let Some(p) = self.source_path.as_mut() {
            join(p);
        }
        self.target_paths.iter_mut().for_each(join);
        for job in &mut self.jobs {
            job.target_paths.iter_mut().for_each(join);
        }
        self
    }
}
