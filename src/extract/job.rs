// File: src/extract/job.rs
use super::source::{read_source, SourceEncoding};
use super::{extract, Layout, Passage, PassageKind};
use crate::core::naming::{is_siglum, NamingConvention};
use crate::core::types::{SnippetName, ROOT_TAG};
use crate::error::{CorpusError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// One source file cut into snippets under one naming scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionJob {
    pub name: String,
    pub input: PathBuf,
    pub output: PathBuf,
    pub text_id: String,
    /// Role of the main passages: `root` or a commentary id.
    #[serde(default = "default_role")]
    pub role: String,
    /// Role of the commentary passages in mixed sources.
    #[serde(default)]
    pub gloss_role: Option<String>,
    /// Prepended to every local verse number, e.g. `1.5.`.
    #[serde(default)]
    pub locator_prefix: Option<String>,
    pub layout: Layout,
}

fn default_role() -> String {
    ROOT_TAG.to_string()
}

impl ExtractionJob {
    fn check(&self) -> Result<()> {
        let invalid = |reason: String| CorpusError::InvalidJob {
            job: self.name.clone(),
            reason,
        };
        if !is_siglum(&self.text_id) {
            return Err(invalid(format!("text id `{}` is not a valid siglum", self.text_id)));
        }
        for role in std::iter::once(&self.role).chain(self.gloss_role.as_ref()) {
            if !is_siglum(role) {
                return Err(invalid(format!("role `{}` is not a valid siglum", role)));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    pub overwrite: bool,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WriteOutcome {
    Written,
    SkippedExisting,
    Planned,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedFile {
    pub path: PathBuf,
    pub name: SnippetName,
    pub outcome: WriteOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub job: String,
    pub input: PathBuf,
    pub encoding: SourceEncoding,
    pub layout: &'static str,
    pub files: Vec<PlannedFile>,
    pub warnings: Vec<String>,
    /// Passages held back for preview, in extraction order.
    #[serde(skip)]
    pub passages: Vec<Passage>,
}

impl JobReport {
    pub fn count(&self, outcome: WriteOutcome) -> usize {
        self.files.iter().filter(|f| f.outcome == outcome).count()
    }
}

/// Runs a job. Relative `input`/`output` paths resolve against `base_dir`
/// (the directory holding the config file).
pub fn run_job(
    job: &ExtractionJob,
    base_dir: &Path,
    naming: &NamingConvention,
    options: WriteOptions,
) -> Result<JobReport> {
    job.check()?;
    let input = base_dir.join(&job.input);
    let output = base_dir.join(&job.output);
    info!(job = %job.name, input = %input.display(), layout = job.layout.name(), "running extraction job");

    let source = read_source(&input)?;
    let extraction = extract(&job.layout, &source.text, job.locator_prefix.as_deref()).map_err(|e| {
        CorpusError::InvalidLocator {
            locator: e.0,
            input: input.clone(),
        }
    })?;
    debug!(
        job = %job.name,
        verses = extraction.count(PassageKind::Main),
        glosses = extraction.count(PassageKind::Gloss),
        "split source"
    );

    let mut warnings = extraction.warnings;
    let mut files = Vec::new();
    if !options.dry_run {
        fs::create_dir_all(&output).map_err(|e| CorpusError::io(&output, e))?;
    }

    let mut gloss_skipped = 0usize;
    for passage in &extraction.passages {
        let role = match passage.kind {
            PassageKind::Main => naming.role_for(&job.role),
            PassageKind::Gloss => match &job.gloss_role {
                Some(role) => naming.role_for(role),
                None => {
                    gloss_skipped += 1;
                    continue;
                }
            },
        };
        let name = SnippetName::new(job.text_id.clone(), passage.locator.clone(), role);
        let path = output.join(naming.render(&name));

        let outcome = if options.dry_run {
            WriteOutcome::Planned
        } else if path.exists() && !options.overwrite {
            WriteOutcome::SkippedExisting
        } else {
            write_atomic(&path, &passage.text)?;
            WriteOutcome::Written
        };
        files.push(PlannedFile { path, name, outcome });
    }
    if gloss_skipped > 0 {
        warnings.push(format!(
            "{} commentary passage(s) skipped: job has no gloss_role",
            gloss_skipped
        ));
    }

    for warning in &warnings {
        warn!(job = %job.name, "{}", warning);
    }
    let report = JobReport {
        job: job.name.clone(),
        input,
        encoding: source.encoding,
        layout: job.layout.name(),
        files,
        warnings,
        passages: extraction.passages,
    };
    info!(
        job = %job.name,
        written = report.count(WriteOutcome::Written),
        skipped = report.count(WriteOutcome::SkippedExisting),
        planned = report.count(WriteOutcome::Planned),
        "extraction job finished"
    );
    Ok(report)
}

/// Writes through a temporary file in the target directory, so a snippet is
/// either absent or complete.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent_dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent_dir).map_err(|e| CorpusError::io(parent_dir, e))?;

    let mut temp_file = NamedTempFile::new_in(parent_dir).map_err(|e| CorpusError::io(parent_dir, e))?;
    temp_file
        .write_all(contents.as_bytes())
        .map_err(|e| CorpusError::io(path, e))?;
    temp_file
        .persist(path)
        .map_err(|e| CorpusError::io(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn job(layout: Layout) -> ExtractionJob {
        ExtractionJob {
            name: "test".into(),
            input: "source.txt".into(),
            output: "out".into(),
            text_id: "ht".into(),
            role: "root".into(),
            gloss_role: None,
            locator_prefix: Some("1.5.".into()),
            layout,
        }
    }

    #[test]
    fn writes_one_file_per_verse() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("source.txt"), "prathama || 1 ||\ndvitīya || 2 ||\n").unwrap();

        let report = run_job(
            &job(Layout::VerseMarker { keep_marker: true }),
            tmp.path(),
            &NamingConvention::default(),
            WriteOptions::default(),
        )
        .unwrap();

        assert_eq!(report.count(WriteOutcome::Written), 2);
        let first = fs::read_to_string(tmp.path().join("out/ht_1.5.1_root.txt")).unwrap();
        assert_eq!(first, "prathama || 1 ||");
        assert!(tmp.path().join("out/ht_1.5.2_root.txt").exists());
    }

    #[test]
    fn existing_files_are_kept_unless_overwrite() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("source.txt"), "new text || 1 ||").unwrap();
        fs::create_dir_all(tmp.path().join("out")).unwrap();
        fs::write(tmp.path().join("out/ht_1.5.1_root.txt"), "old text").unwrap();
        let naming = NamingConvention::default();
        let j = job(Layout::VerseMarker { keep_marker: false });

        let report = run_job(&j, tmp.path(), &naming, WriteOptions::default()).unwrap();
        assert_eq!(report.count(WriteOutcome::SkippedExisting), 1);
        assert_eq!(fs::read_to_string(tmp.path().join("out/ht_1.5.1_root.txt")).unwrap(), "old text");

        let options = WriteOptions {
            overwrite: true,
            ..WriteOptions::default()
        };
        run_job(&j, tmp.path(), &naming, options).unwrap();
        assert_eq!(fs::read_to_string(tmp.path().join("out/ht_1.5.1_root.txt")).unwrap(), "new text");
    }

    #[test]
    fn dry_run_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("source.txt"), "1\ngloss\n").unwrap();
        let mut j = job(Layout::NumberedBlocks);
        j.role = "raa".into();
        let options = WriteOptions {
            dry_run: true,
            ..WriteOptions::default()
        };
        let report = run_job(&j, tmp.path(), &NamingConvention::default(), options).unwrap();
        assert_eq!(report.count(WriteOutcome::Planned), 1);
        assert_eq!(report.files[0].path, tmp.path().join("out/ht_1.5.1_raa.txt"));
        assert!(!tmp.path().join("out").exists());
    }

    #[test]
    fn gloss_passages_need_a_gloss_role() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("source.txt"), "> mūla\nṭīkā\n---\n> mūla 2\nṭīkā 2\n").unwrap();
        let mut j = job(Layout::DashSeparated { expected_root_lines: None });
        j.text_id = "medū".into();
        j.locator_prefix = None;

        let report = run_job(&j, tmp.path(), &NamingConvention::default(), WriteOptions::default()).unwrap();
        assert_eq!(report.files.len(), 2);
        assert!(report.warnings.iter().any(|w| w.contains("no gloss_role")));

        j.gloss_role = Some("vi".into());
        let options = WriteOptions {
            overwrite: true,
            ..WriteOptions::default()
        };
        let report = run_job(&j, tmp.path(), &NamingConvention::default(), options).unwrap();
        assert_eq!(report.files.len(), 4);
        assert_eq!(fs::read_to_string(tmp.path().join("out/medū_2_vi.txt")).unwrap(), "ṭīkā 2");
    }

    #[test]
    fn invalid_sigla_are_rejected_before_reading() {
        let tmp = TempDir::new().unwrap();
        let mut j = job(Layout::NumberedBlocks);
        j.role = "bad_role".into();
        let err = run_job(&j, tmp.path(), &NamingConvention::default(), WriteOptions::default()).unwrap_err();
        assert!(matches!(err, CorpusError::InvalidJob { .. }));
    }
}
