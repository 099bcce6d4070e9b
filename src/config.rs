// File: src/config.rs
//! `tika.toml`: naming rules, scan options, abbreviation sources and
//! extraction jobs. Every section is optional.
use crate::core::abbreviations::{Abbreviation, AbbreviationTable};
use crate::core::corpus::ScanOptions;
use crate::core::naming::NamingConvention;
use crate::error::{CorpusError, Result};
use crate::extract::job::ExtractionJob;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const CONFIG_FILE_NAME: &str = "tika.toml";
const DEFAULT_README: &str = "README.md";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub naming: NamingConvention,
    pub scan: ScanOptions,
    pub abbreviations: AbbreviationConfig,
    pub jobs: Vec<ExtractionJob>,
    /// Directory relative paths resolve against.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbbreviationConfig {
    /// Markdown files holding the abbreviation table. When empty, a
    /// `README.md` next to the config is used if present.
    pub sources: Vec<PathBuf>,
    /// Entries that override or extend the Markdown table.
    pub entries: BTreeMap<String, EntryConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryConfig {
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
}

impl Config {
    pub fn from_toml(text: &str, path: &Path) -> Result<Self> {
        let mut config: Config = toml::from_str(text).map_err(|source| CorpusError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| CorpusError::io(path, e))?;
        let config = Self::from_toml(&text, path)?;
        info!(path = %path.display(), jobs = config.jobs.len(), "loaded config");
        Ok(config)
    }

    /// Loads `path` when it exists, otherwise the defaults rooted at `path`'s
    /// directory.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.is_file() {
            Self::load(path)
        } else {
            debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self {
                base_dir: path
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from(".")),
                ..Self::default()
            })
        }
    }

    /// `tika.toml` inside `dir`, or defaults rooted at `dir`.
    pub fn discover(dir: &Path) -> Result<Self> {
        Self::load_or_default(&dir.join(CONFIG_FILE_NAME))
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.base_dir.join(path)
    }

    pub fn job(&self, name: &str) -> Result<&ExtractionJob> {
        self.jobs
            .iter()
            .find(|j| j.name == name)
            .ok_or_else(|| CorpusError::UnknownJob(name.to_string()))
    }

    /// Markdown sources merged in order, then the config entries on top.
    pub fn abbreviation_table(&self) -> Result<AbbreviationTable> {
        let sources: Vec<PathBuf> = if self.abbreviations.sources.is_empty() {
            let readme = self.resolve(Path::new(DEFAULT_README));
            if readme.is_file() {
                vec![readme]
            } else {
                Vec::new()
            }
        } else {
            self.abbreviations.sources.iter().map(|p| self.resolve(p)).collect()
        };

        let mut table = AbbreviationTable::new();
        for source in sources {
            let text = std::fs::read_to_string(&source).map_err(|e| CorpusError::io(&source, e))?;
            let parsed = AbbreviationTable::from_markdown(&text);
            debug!(source = %source.display(), entries = parsed.len(), "read abbreviation table");
            for entry in parsed.entries() {
                table.insert(entry.clone());
            }
            for conflict in parsed.conflicts() {
                table.insert(conflict.ignored.clone());
            }
        }

        let mut overrides = AbbreviationTable::new();
        for (code, entry) in &self.abbreviations.entries {
            overrides.insert(Abbreviation {
                code: code.clone(),
                title: entry.title.clone(),
                author: entry.author.clone(),
            });
        }
        table.merge(overrides);
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Layout;
    use std::fs;
    use tempfile::TempDir;

    const CONFIG: &str = r#"
[naming]
require_extension = false

[abbreviations]
sources = ["README.md"]

[abbreviations.entries.heta]
title = "Hevajraṭīkā"

[[jobs]]
name = "ht-1.5-root"
input = "originals/ht_1.5"
output = "snippets"
text_id = "ht"
locator_prefix = "1.5."
layout = { kind = "verse-marker" }

[[jobs]]
name = "seni-comm"
input = "originals/seni"
output = "snippets"
text_id = "seni"
role = "p"
layout = { kind = "section-header", strip_quoted = true }
"#;

    #[test]
    fn parses_jobs_and_naming() {
        let config = Config::from_toml(CONFIG, Path::new("/corpus/tika.toml")).unwrap();
        assert_eq!(config.base_dir, PathBuf::from("/corpus"));
        assert!(!config.naming.require_extension);
        assert_eq!(config.naming.extension, "txt");
        assert!(config.scan.recursive);

        let job = config.job("ht-1.5-root").unwrap();
        assert_eq!(job.role, "root");
        assert_eq!(job.layout, Layout::VerseMarker { keep_marker: true });
        assert_eq!(config.resolve(&job.input), PathBuf::from("/corpus/originals/ht_1.5"));

        let seni = config.job("seni-comm").unwrap();
        assert_eq!(seni.layout, Layout::SectionHeader { strip_quoted: true });
        assert!(matches!(config.job("missing"), Err(CorpusError::UnknownJob(_))));
    }

    #[test]
    fn bad_toml_reports_the_path() {
        let err = Config::from_toml("jobs = 3", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, CorpusError::Config { ref path, .. } if path == Path::new("bad.toml")));
    }

    #[test]
    fn abbreviation_table_merges_readme_and_entries() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("README.md"), "- ht: Hevajratantra\n- heta: placeholder\n").unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), CONFIG).unwrap();

        let config = Config::discover(tmp.path()).unwrap();
        let table = config.abbreviation_table().unwrap();
        assert_eq!(table.lookup("ht").unwrap().title, "Hevajratantra");
        assert_eq!(table.lookup("heta").unwrap().title, "Hevajraṭīkā");
    }

    #[test]
    fn missing_config_uses_defaults_and_readme() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("README.md"), "| Code | Title | Author |\n|---|---|---|\n| ht | Hevajratantra | |\n").unwrap();
        let config = Config::discover(tmp.path()).unwrap();
        assert!(config.jobs.is_empty());
        assert_eq!(config.base_dir, tmp.path());
        assert!(config.abbreviation_table().unwrap().contains("ht"));
    }
}
