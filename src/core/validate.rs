// File: src/core/validate.rs
//! Data-integrity checks over a scanned corpus.
//!
//! Problems found here are reported, not raised: a corpus with malformed
//! names is still a corpus, and the caller decides what counts as failure.
use crate::core::abbreviations::AbbreviationTable;
use crate::core::corpus::{CorpusIndex, SnippetFile};
use crate::core::naming::{NameError, NamingConvention};
use crate::core::types::Role;
use crate::fuzzy::symspell::SymSpell;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Note,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

/// Where in a file name an abbreviation was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CodePosition {
    TextId,
    Commentary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    MalformedName { error: NameError },
    UnknownAbbreviation {
        code: String,
        position: CodePosition,
        files: usize,
        suggestion: Option<String>,
    },
    RootWithoutCommentary { passage: String },
    OrphanCommentary { passage: String },
    NonCanonicalName { expected: String },
    DuplicatePassage { name: String, copies: Vec<PathBuf> },
    EmptySnippet,
    MissingAuthor { code: String },
    AbbreviationConflict { code: String },
    AbbreviationCheckSkipped,
}

impl IssueKind {
    pub fn severity(&self) -> Severity {
        match self {
            IssueKind::MalformedName { .. }
            | IssueKind::UnknownAbbreviation { .. }
            | IssueKind::DuplicatePassage { .. } => Severity::Error,
            IssueKind::RootWithoutCommentary { .. }
            | IssueKind::OrphanCommentary { .. }
            | IssueKind::NonCanonicalName { .. }
            | IssueKind::EmptySnippet
            | IssueKind::AbbreviationConflict { .. } => Severity::Warning,
            IssueKind::MissingAuthor { .. } | IssueKind::AbbreviationCheckSkipped => Severity::Note,
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::MalformedName { error } => write!(f, "malformed name: {}", error),
            IssueKind::UnknownAbbreviation {
                code,
                position,
                files,
                suggestion,
            } => {
                let what = match position {
                    CodePosition::TextId => "text id",
                    CodePosition::Commentary => "commentary id",
                };
                write!(f, "{} `{}` is not in the abbreviation table ({} file(s))", what, code, files)?;
                if let Some(s) = suggestion {
                    write!(f, "; did you mean `{}`?", s)?;
                }
                Ok(())
            }
            IssueKind::RootWithoutCommentary { passage } => {
                write!(f, "root of {} has no commentary", passage)
            }
            IssueKind::OrphanCommentary { passage } => {
                write!(f, "commentary on {} has no root file", passage)
            }
            IssueKind::NonCanonicalName { expected } => write!(f, "should be named `{}`", expected),
            IssueKind::DuplicatePassage { name, copies } => {
                write!(f, "`{}` exists {} times", name, copies.len())
            }
            IssueKind::EmptySnippet => f.write_str("snippet is empty"),
            IssueKind::MissingAuthor { code } => write!(f, "abbreviation `{}` has no author", code),
            IssueKind::AbbreviationConflict { code } => {
                write!(f, "abbreviation `{}` is defined more than once", code)
            }
            IssueKind::AbbreviationCheckSkipped => {
                f.write_str("abbreviation table is empty; sigla were not checked")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(flatten)]
    pub kind: IssueKind,
}

impl Issue {
    fn new(path: Option<&Path>, kind: IssueKind) -> Self {
        Self {
            severity: kind.severity(),
            path: path.map(Path::to_path_buf),
            kind,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub files_checked: usize,
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    /// No errors; with `strict`, no warnings either.
    pub fn passes(&self, strict: bool) -> bool {
        let threshold = if strict { Severity::Warning } else { Severity::Error };
        self.issues.iter().all(|i| i.severity < threshold)
    }

    pub fn has(&self, predicate: impl Fn(&IssueKind) -> bool) -> bool {
        self.issues.iter().any(|i| predicate(&i.kind))
    }
}

pub struct Validator<'a> {
    pub naming: &'a NamingConvention,
    pub table: &'a AbbreviationTable,
    pub suggester: &'a SymSpell,
    /// Read snippet contents to find empty ones.
    pub check_contents: bool,
}

impl<'a> Validator<'a> {
    pub fn validate(&self, index: &CorpusIndex) -> ValidationReport {
        let mut issues = Vec::new();

        for malformed in &index.malformed {
            issues.push(Issue::new(
                Some(&malformed.path),
                IssueKind::MalformedName {
                    error: malformed.error.clone(),
                },
            ));
        }

        self.check_passages(index, &mut issues);
        self.check_snippets(index, &mut issues);
        self.check_abbreviations(index, &mut issues);

        issues.sort_by(|a, b| b.severity.cmp(&a.severity).then_with(|| a.path.cmp(&b.path)));

        ValidationReport {
            files_checked: index.snippet_count() + index.malformed.len(),
            issues,
        }
    }

    fn check_passages(&self, index: &CorpusIndex, issues: &mut Vec<Issue>) {
        for (key, entry) in &index.passages {
            let passage = key.to_string();
            if entry.has_root() && entry.commentary_count() == 0 {
                for root in &entry.roots {
                    issues.push(Issue::new(
                        Some(&root.path),
                        IssueKind::RootWithoutCommentary {
                            passage: passage.clone(),
                        },
                    ));
                }
            }
            if !entry.has_root() {
                for commentary in entry.commentary_files() {
                    issues.push(Issue::new(
                        Some(&commentary.path),
                        IssueKind::OrphanCommentary {
                            passage: passage.clone(),
                        },
                    ));
                }
            }

            let groups = std::iter::once(&entry.roots).chain(entry.commentaries.values());
            for files in groups.filter(|files| files.len() > 1) {
                issues.push(Issue::new(
                    Some(&files[0].path),
                    IssueKind::DuplicatePassage {
                        name: self.naming.render(&files[0].name),
                        copies: files.iter().map(|f| f.path.clone()).collect(),
                    },
                ));
            }
        }
    }

    fn check_snippets(&self, index: &CorpusIndex, issues: &mut Vec<Issue>) {
        for snippet in index.snippets() {
            if !snippet.canonical {
                issues.push(Issue::new(
                    Some(&snippet.path),
                    IssueKind::NonCanonicalName {
                        expected: self.naming.render(&snippet.name),
                    },
                ));
            }
            if self.check_contents && is_empty_snippet(&index.root, snippet) {
                issues.push(Issue::new(Some(&snippet.path), IssueKind::EmptySnippet));
            }
        }
    }

    fn check_abbreviations(&self, index: &CorpusIndex, issues: &mut Vec<Issue>) {
        for conflict in self.table.conflicts() {
            issues.push(Issue::new(
                None,
                IssueKind::AbbreviationConflict {
                    code: conflict.code.clone(),
                },
            ));
        }

        if self.table.is_empty() {
            issues.push(Issue::new(None, IssueKind::AbbreviationCheckSkipped));
            return;
        }

        for entry in self.table.missing_authors() {
            issues.push(Issue::new(
                None,
                IssueKind::MissingAuthor {
                    code: entry.code.clone(),
                },
            ));
        }

        // (code, position) -> (first file, number of files)
        let mut unknown: BTreeMap<(String, CodePosition), (PathBuf, usize)> = BTreeMap::new();
        for snippet in index.snippets() {
            let mut used = vec![(snippet.name.text_id.clone(), CodePosition::TextId)];
            if let Role::Commentary(id) = &snippet.name.role {
                used.push((id.clone(), CodePosition::Commentary));
            }
            for (code, position) in used {
                if self.table.contains(&code) {
                    continue;
                }
                let slot = unknown
                    .entry((code, position))
                    .or_insert_with(|| (snippet.path.clone(), 0));
                slot.1 += 1;
            }
        }

        for ((code, position), (first, files)) in unknown {
            let suggestion = self.suggester.suggest(&code);
            issues.push(Issue::new(
                Some(&first),
                IssueKind::UnknownAbbreviation {
                    code,
                    position,
                    files,
                    suggestion,
                },
            ));
        }
    }
}

fn is_empty_snippet(root: &Path, snippet: &SnippetFile) -> bool {
    if snippet.bytes == 0 {
        return true;
    }
    match std::fs::read(root.join(&snippet.path)) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).trim().is_empty(),
        Err(e) => {
            debug!(path = %snippet.path.display(), error = %e, "could not read snippet");
            false
        }
    }
}
