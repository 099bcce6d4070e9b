// File: src/core/corpus.rs
//! Walking a snippet directory and grouping files by passage.
use crate::core::naming::{NameError, NamingConvention};
use crate::core::types::{PassageKey, Role, SnippetName};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    pub recursive: bool,
    pub skip_hidden: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            skip_hidden: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetFile {
    /// Path relative to the corpus root.
    pub path: PathBuf,
    pub name: SnippetName,
    /// False when the on-disk name differs from the rendered canonical name.
    pub canonical: bool,
    pub bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MalformedFile {
    pub path: PathBuf,
    pub error: NameError,
}

/// Root and commentary files sharing one passage key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassageEntry {
    pub roots: Vec<SnippetFile>,
    pub commentaries: BTreeMap<String, Vec<SnippetFile>>,
}

impl PassageEntry {
    pub fn has_root(&self) -> bool {
        !self.roots.is_empty()
    }

    pub fn commentary_files(&self) -> impl Iterator<Item = &SnippetFile> {
        self.commentaries.values().flatten()
    }

    pub fn commentary_count(&self) -> usize {
        self.commentaries.values().map(Vec::len).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusIndex {
    pub root: PathBuf,
    pub passages: BTreeMap<PassageKey, PassageEntry>,
    pub malformed: Vec<MalformedFile>,
    /// Files that are not meant to be snippets (`README.md`), listed but
    /// not checked.
    pub ignored: Vec<PathBuf>,
}

impl CorpusIndex {
    pub fn snippet_count(&self) -> usize {
        self.passages
            .values()
            .map(|e| e.roots.len() + e.commentary_count())
            .sum()
    }

    pub fn snippets(&self) -> impl Iterator<Item = &SnippetFile> {
        self.passages
            .values()
            .flat_map(|e| e.roots.iter().chain(e.commentary_files()))
    }

    /// Every file the scan saw, sorted by path.
    pub fn all_files(&self) -> Vec<&Path> {
        let mut files: Vec<&Path> = self
            .snippets()
            .map(|s| s.path.as_path())
            .chain(self.malformed.iter().map(|m| m.path.as_path()))
            .chain(self.ignored.iter().map(PathBuf::as_path))
            .collect();
        files.sort();
        files
    }

    pub fn insert(&mut self, file: SnippetFile) {
        let entry = self.passages.entry(file.name.key()).or_default();
        match &file.name.role {
            Role::Root => entry.roots.push(file),
            Role::Commentary(id) => entry
                .commentaries
                .entry(id.clone())
                .or_default()
                .push(file),
        }
    }
}

pub fn scan(dir: &Path, naming: &NamingConvention, options: &ScanOptions) -> Result<CorpusIndex> {
    let mut index = CorpusIndex {
        root: dir.to_path_buf(),
        ..CorpusIndex::default()
    };

    let mut walker = WalkDir::new(dir).sort_by_file_name();
    if !options.recursive {
        walker = walker.max_depth(1);
    }
    let skip_hidden = options.skip_hidden;
    let entries = walker
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !(skip_hidden && is_hidden(e.file_name())));

    for entry in entries {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(dir)
            .unwrap_or(entry.path())
            .to_path_buf();
        let file_name = entry.file_name().to_string_lossy().into_owned();

        if !naming.is_candidate(&file_name) {
            debug!(path = %relative.display(), "ignoring non-snippet file");
            index.ignored.push(relative);
            continue;
        }

        match naming.parse(&file_name) {
            Ok(name) => {
                let bytes = entry.metadata().map(|m| m.len()).unwrap_or(0);
                index.insert(SnippetFile {
                    canonical: naming.is_canonical(&file_name),
                    path: relative,
                    name,
                    bytes,
                });
            }
            Err(error) => {
                debug!(path = %relative.display(), %error, "malformed snippet name");
                index.malformed.push(MalformedFile {
                    path: relative,
                    error,
                });
            }
        }
    }

    info!(
        root = %dir.display(),
        snippets = index.snippet_count(),
        passages = index.passages.len(),
        malformed = index.malformed.len(),
        "scanned corpus"
    );
    Ok(index)
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn groups_files_by_passage() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "ht_1.5.1_root.txt", "evaṃ mayā śrutam");
        touch(tmp.path(), "ht_1.5.1_raa.txt", "...");
        touch(tmp.path(), "ht_1.5.1_mua.txt", "...");
        touch(tmp.path(), "ht/ht_1.5.2_root.txt", "...");
        touch(tmp.path(), "bca_5.12.txt", "...");
        touch(tmp.path(), "README.md", "# corpus");
        touch(tmp.path(), ".hidden/ht_9.9_root.txt", "...");

        let index = scan(tmp.path(), &NamingConvention::default(), &ScanOptions::default()).unwrap();

        assert_eq!(index.passages.len(), 2);
        assert_eq!(index.snippet_count(), 4);
        let first = index
            .passages
            .get(&PassageKey {
                text_id: "ht".into(),
                verse: "1.5.1".parse().unwrap(),
            })
            .unwrap();
        assert_eq!(first.roots.len(), 1);
        assert_eq!(first.commentary_count(), 2);
        assert!(first.commentaries.contains_key("mua"));

        assert_eq!(index.malformed.len(), 1);
        assert_eq!(index.malformed[0].path, PathBuf::from("bca_5.12.txt"));
        assert_eq!(index.ignored, vec![PathBuf::from("README.md")]);
        assert_eq!(index.all_files().len(), 6);
    }

    #[test]
    fn non_recursive_scan_stays_at_top_level() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "ht_1.5.1_root.txt", "...");
        touch(tmp.path(), "nested/ht_1.5.2_root.txt", "...");
        let options = ScanOptions {
            recursive: false,
            ..ScanOptions::default()
        };
        let index = scan(tmp.path(), &NamingConvention::default(), &options).unwrap();
        assert_eq!(index.snippet_count(), 1);
    }

    #[test]
    fn lenient_naming_accepts_extensionless_files() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "ht_1.5.3_mua", "...");
        touch(tmp.path(), "ht_1.5.3_mula", "...");
        touch(tmp.path(), "notes.md", "...");
        let naming = NamingConvention {
            require_extension: false,
            ..NamingConvention::default()
        };
        let index = scan(tmp.path(), &naming, &ScanOptions::default()).unwrap();
        assert_eq!(index.snippet_count(), 2);
        assert!(index.snippets().all(|s| !s.canonical));
        assert_eq!(index.ignored, vec![PathBuf::from("notes.md")]);
    }

    #[test]
    fn misnamed_snippets_are_malformed_not_ignored() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "ht_1.5.1_root", "...");
        touch(tmp.path(), "ht_1.5.1_raa.md", "...");
        touch(tmp.path(), "ht_1.5.2_root.TXT", "...");
        touch(tmp.path(), "README.md", "# corpus");
        touch(tmp.path(), "tika.toml", "");

        let index = scan(tmp.path(), &NamingConvention::default(), &ScanOptions::default()).unwrap();

        assert_eq!(index.snippet_count(), 0);
        assert_eq!(index.ignored, vec![PathBuf::from("README.md"), PathBuf::from("tika.toml")]);
        assert_eq!(index.malformed.len(), 3);
        let error_for = |name: &str| {
            index
                .malformed
                .iter()
                .find(|m| m.path == Path::new(name))
                .map(|m| m.error.clone())
                .unwrap()
        };
        assert!(matches!(error_for("ht_1.5.1_root"), NameError::MissingExtension(..)));
        assert!(matches!(
            error_for("ht_1.5.1_raa.md"),
            NameError::WrongExtension { found, .. } if found == "md"
        ));
        assert!(matches!(
            error_for("ht_1.5.2_root.TXT"),
            NameError::WrongExtension { found, .. } if found == "TXT"
        ));
    }
}
