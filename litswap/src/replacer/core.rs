//! Ordered literal substitution over text and files.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, trace, warn};

use crate::replacer::error::ReplaceError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub old: String,
    pub new: String,
}

impl Rule {
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            old: old.into(),
            new: new.into(),
        }
    }
}

/// Rules applied one after another. A rule never re-scans its own output,
/// but later rules see everything earlier rules produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::new(pairs.into_iter().map(|(o, n)| Rule::new(o, n)).collect())
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn apply(&self, text: &str) -> String {
        self.apply_counted(text).0
    }

    /// Like [`RuleSet::apply`], also returning how many substitutions were
    /// made across all rules. Rules with an empty `old` are skipped.
    pub fn apply_counted(&self, text: &str) -> (String, usize) {
        let mut out = text.to_owned();
        let mut total = 0;
        for rule in &self.rules {
            if rule.old.is_empty() {
                trace!("skipping rule with empty pattern");
                continue;
            }
            let hits = out.matches(rule.old.as_str()).count();
            debug!(old = %rule.old, new = %rule.new, hits, "rule");
            if hits > 0 {
                out = out.replace(rule.old.as_str(), &rule.new);
                total += hits;
            }
        }
        (out, total)
    }

    /// True when some rule's replacement contains a pattern of this set.
    ///
    /// When this is false, re-running the set on its own output is a no-op
    /// unless a replacement forms a pattern across its boundary with the
    /// surrounding text.
    pub fn reintroduces_patterns(&self) -> bool {
        self.rules.iter().any(|produced| {
            self.rules
                .iter()
                .any(|r| !r.old.is_empty() && produced.new.contains(r.old.as_str()))
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Each file is read, transformed and written before the next is
    /// opened. A failure leaves earlier files rewritten.
    #[default]
    Sequential,
    /// Every file is read and transformed first; nothing is written unless
    /// all of them succeed. Writes go through a temp file renamed into
    /// place.
    Atomic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub replacements: usize,
    pub changed: bool,
}

/// A rule set and the files it applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaceJob {
    pub rules: RuleSet,
    pub targets: Vec<PathBuf>,
}

impl ReplaceJob {
    pub fn run(&self, mode: WriteMode) -> Result<Vec<FileOutcome>, ReplaceError> {
        if self.rules.reintroduces_patterns() {
            warn!("a replacement contains a pattern of the same rule set; re-running may change files again");
        }
        rewrite_files(&self.targets, &self.rules, mode)
    }
}

pub fn read_text(path: &Path) -> Result<String, ReplaceError> {
    let bytes = fs::read(path).map_err(|source| ReplaceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|e| {
        let utf8 = e.utf8_error();
        let start = utf8.valid_up_to();
        let bad = utf8.error_len().unwrap_or(e.as_bytes().len() - start);
        ReplaceError::Encoding {
            path: path.to_path_buf(),
            byte_offset: start,
            bytes_hex: hex::encode(&e.as_bytes()[start..start + bad]),
        }
    })
}

/// Read, transform and overwrite a single file. The file is written even
/// when no rule matched.
pub fn rewrite_file(path: &Path, rules: &RuleSet) -> Result<FileOutcome, ReplaceError> {
    let staged = stage(path, rules)?;
    fs::write(path, &staged.text).map_err(|source| ReplaceError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), replacements = staged.outcome.replacements, "rewrote");
    Ok(staged.outcome)
}

pub fn rewrite_files<P: AsRef<Path>>(
    paths: &[P],
    rules: &RuleSet,
    mode: WriteMode,
) -> Result<Vec<FileOutcome>, ReplaceError> {
    match mode {
        WriteMode::Sequential => paths
            .iter()
            .map(|p| rewrite_file(p.as_ref(), rules))
            .collect(),
        WriteMode::Atomic => {
            // Phase 1: every temp file exists and holds its new content.
            let prepared = paths
                .iter()
                .map(|p| prepare(stage(p.as_ref(), rules)?))
                .collect::<Result<Vec<_>, ReplaceError>>()?;
            debug!(files = prepared.len(), "all targets staged");

            // Phase 2: renames only.
            prepared
                .into_iter()
                .map(|p| {
                    p.tmp.persist(&p.target).map_err(|e| ReplaceError::Write {
                        path: p.outcome.path.clone(),
                        source: e.error,
                    })?;
                    info!(path = %p.outcome.path.display(), replacements = p.outcome.replacements, "rewrote");
                    Ok(p.outcome)
                })
                .collect()
        }
    }
}

struct Staged {
    text: String,
    outcome: FileOutcome,
}

fn stage(path: &Path, rules: &RuleSet) -> Result<Staged, ReplaceError> {
    let before = read_text(path)?;
    let (text, replacements) = rules.apply_counted(&before);
    let changed = text != before;
    Ok(Staged {
        text,
        outcome: FileOutcome {
            path: path.to_path_buf(),
            replacements,
            changed,
        },
    })
}

/// A fully written temp file waiting to be renamed over `target`.
struct Prepared {
    tmp: NamedTempFile,
    target: PathBuf,
    outcome: FileOutcome,
}

fn write_error(path: &Path) -> impl FnOnce(std::io::Error) -> ReplaceError + '_ {
    move |source| ReplaceError::Write {
        path: path.to_path_buf(),
        source,
    }
}

/// Write the staged text into a temp file next to the real target.
///
/// Symlinks are followed so the rename replaces the file they point to,
/// as `fs::write` does in sequential mode.
fn prepare(staged: Staged) -> Result<Prepared, ReplaceError> {
    use std::io::Write;

    let path = staged.outcome.path.as_path();
    let target = fs::canonicalize(path).map_err(write_error(path))?;
    let perms = fs::metadata(&target).map_err(write_error(path))?.permissions();
    if perms.readonly() {
        return Err(ReplaceError::Write {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "file is read-only"),
        });
    }

    // canonicalize yields an absolute path, so a parent always exists.
    let dir = target.parent().unwrap_or(Path::new("/"));
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_error(path))?;
    tmp.write_all(staged.text.as_bytes()).map_err(write_error(path))?;
    tmp.as_file().set_permissions(perms).map_err(write_error(path))?;

    Ok(Prepared {
        tmp,
        target,
        outcome: staged.outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dark() -> RuleSet {
        RuleSet::from_pairs([
            ("#121212", "#000"),
            ("#0b0b0b", "#000"),
            ("linear-gradient(to right, #111111, #222222)", "#000"),
        ])
    }

    #[test]
    fn replaces_every_occurrence_in_one_pass() {
        let rules = RuleSet::from_pairs([("a", "b")]);
        assert_eq!(rules.apply("aaa"), "bbb");
    }

    #[test]
    fn no_match_is_identity() {
        let text = "const bg = '#ffffff';\n";
        assert_eq!(dark().apply(text), text);
        assert_eq!(dark().apply_counted(text).1, 0);
    }

    #[test]
    fn non_overlapping_left_to_right() {
        let rules = RuleSet::from_pairs([("aa", "x")]);
        assert_eq!(rules.apply("aaaaa"), "xxa");
    }

    #[test]
    fn own_output_is_not_rescanned() {
        let rules = RuleSet::from_pairs([("a", "aa")]);
        assert_eq!(rules.apply("a-a"), "aa-aa");
    }

    #[test]
    fn later_rules_see_earlier_output() {
        let rules = RuleSet::from_pairs([("a", "b"), ("b", "c")]);
        assert_eq!(rules.apply("ab"), "cc");

        let reversed = RuleSet::from_pairs([("b", "c"), ("a", "b")]);
        assert_eq!(reversed.apply("ab"), "bc");
    }

    #[test]
    fn counts_substitutions() {
        let text = "background: #121212; border: #0b0b0b; color: #121212;";
        let (out, n) = dark().apply_counted(text);
        assert_eq!(n, 3);
        assert_eq!(out, "background: #000; border: #000; color: #000;");
    }

    #[test]
    fn second_application_is_a_noop_without_reintroduction() {
        let rules = dark();
        assert!(!rules.reintroduces_patterns());
        let text = "a #121212 b linear-gradient(to right, #111111, #222222) #0b0b0b";
        let once = rules.apply(text);
        assert_eq!(rules.apply(&once), once);
    }

    #[test]
    fn reintroduction_is_detected() {
        let rules = RuleSet::from_pairs([("#0d0d0d", "#000"), ("#000", "black")]);
        assert!(rules.reintroduces_patterns());

        let rules = RuleSet::from_pairs([("a", "ab")]);
        assert!(rules.reintroduces_patterns());
        let once = rules.apply("a");
        assert_ne!(rules.apply(&once), once);
    }

    #[test]
    fn boundary_match_escapes_reintroduction_check() {
        let rules = RuleSet::from_pairs([("xy", "y")]);
        assert!(!rules.reintroduces_patterns());
        let once = rules.apply("xxy");
        assert_eq!(once, "xy");
        assert_eq!(rules.apply(&once), "y");
    }

    #[test]
    fn empty_pattern_is_skipped() {
        let rules = RuleSet::new(vec![Rule::new("", "x"), Rule::new("a", "b")]);
        assert_eq!(rules.apply_counted("aa"), ("bb".to_owned(), 2));
    }

    #[test]
    fn multibyte_patterns() {
        let rules = RuleSet::from_pairs([("é", "e"), ("→", "->")]);
        assert_eq!(rules.apply("café → bar"), "cafe -> bar");
    }
}
