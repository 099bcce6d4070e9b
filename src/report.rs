// File: src/report.rs
//! Plain-text rendering of summaries for the terminal. Colour is applied
//! only when asked for, so the same output can be piped or tested.
use crate::core::abbreviations::{AbbreviationTable, TableDrift};
use crate::core::corpus::CorpusIndex;
use crate::core::pairs::{PairKind, PairRecord, PairSummary};
use crate::core::validate::{Severity, ValidationReport};
use crate::extract::job::{JobReport, WriteOutcome};
use crossterm::style::{style, Color, Stylize};
use std::io::{self, Write};
use std::path::Path;

const RULE_WIDTH: usize = 55;
const EXAMPLES_SHOWN: usize = 5;

#[derive(Debug, Clone, Copy, Default)]
pub struct Printer {
    pub color: bool,
}

impl Printer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            style(text).with(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        if self.color {
            style(text).bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn rule(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "{}", "=".repeat(RULE_WIDTH))
    }

    fn severity(&self, severity: Severity) -> String {
        let label = severity.to_string();
        match severity {
            Severity::Error => self.paint(&label, Color::Red),
            Severity::Warning => self.paint(&label, Color::Yellow),
            Severity::Note => self.paint(&label, Color::Cyan),
        }
    }

    pub fn pair_summary(&self, out: &mut impl Write, summary: &PairSummary, verbose: bool) -> io::Result<()> {
        writeln!(out, "{}", self.bold("Root-Commentary Pair Analysis (Root-First Approach)"))?;
        self.rule(out)?;
        writeln!(out, "Total root files found: {}", summary.total_root_files)?;
        writeln!(out, "Root files with no commentary: {}", summary.root_only_count)?;
        writeln!(out, "Root files with exactly one commentary: {}", summary.single_pair_count)?;
        writeln!(out, "Root files with multiple commentaries: {}", summary.multiple_pair_count)?;
        if !summary.orphan_commentaries.is_empty() {
            writeln!(out, "Commentary files with no root: {}", summary.orphan_commentaries.len())?;
        }
        writeln!(out)?;
        writeln!(
            out,
            "{}",
            self.paint(&format!("TOTAL ROOT-COMMENTARY PAIRS: {}", summary.total_pairs), Color::Green)
        )?;

        if !verbose {
            return Ok(());
        }

        writeln!(out)?;
        self.rule(out)?;
        writeln!(out, "EXAMPLES")?;
        self.rule(out)?;
        self.examples(out, summary, PairKind::RootOnly, "Root-only files")?;
        self.examples(out, summary, PairKind::SinglePair, "Single-pair examples")?;
        self.examples(out, summary, PairKind::MultiplePairs, "Multiple-pair examples")?;

        writeln!(out)?;
        self.rule(out)?;
        writeln!(out, "BREAKDOWN BY TEXT SIGLUM")?;
        self.rule(out)?;
        for (siglum, tally) in &summary.by_text {
            writeln!(out, "{:6}: {:3} root files, {:3} pairs", siglum, tally.roots, tally.pairs)?;
        }
        Ok(())
    }

    fn examples(&self, out: &mut impl Write, summary: &PairSummary, kind: PairKind, title: &str) -> io::Result<()> {
        let records: Vec<&PairRecord> = summary.of_kind(kind).collect();
        if records.is_empty() {
            return Ok(());
        }
        writeln!(out)?;
        writeln!(out, "{} ({} total):", title, records.len())?;
        for record in records.iter().take(EXAMPLES_SHOWN) {
            let root = file_name(&record.root);
            let commentaries: Vec<String> = record.commentaries.iter().map(|c| file_name(c)).collect();
            match kind {
                PairKind::RootOnly => writeln!(out, "  {}", root)?,
                PairKind::SinglePair => writeln!(out, "  {} -> {}", root, commentaries.join(", "))?,
                PairKind::MultiplePairs => writeln!(
                    out,
                    "  {} -> {} ({} pairs)",
                    root,
                    commentaries.join(", "),
                    record.pairs
                )?,
            }
        }
        if records.len() > EXAMPLES_SHOWN {
            writeln!(out, "  ... and {} more", records.len() - EXAMPLES_SHOWN)?;
        }
        Ok(())
    }

    pub fn file_list(&self, out: &mut impl Write, root: &Path, files: &[&Path]) -> io::Result<()> {
        writeln!(out, "All files in {}:", root.display())?;
        for (i, file) in files.iter().enumerate() {
            writeln!(out, "{:3}. {}", i + 1, file.display())?;
        }
        writeln!(out)?;
        writeln!(out, "Total files: {}", files.len())
    }

    pub fn validation(&self, out: &mut impl Write, report: &ValidationReport) -> io::Result<()> {
        for issue in &report.issues {
            let location = issue
                .path
                .as_ref()
                .map(|p| format!("{}: ", p.display()))
                .unwrap_or_default();
            writeln!(out, "{}: {}{}", self.severity(issue.severity), location, issue.kind)?;
        }
        if !report.issues.is_empty() {
            writeln!(out)?;
        }
        writeln!(
            out,
            "{} file(s) checked: {} error(s), {} warning(s), {} note(s)",
            report.files_checked,
            report.count(Severity::Error),
            report.count(Severity::Warning),
            report.count(Severity::Note)
        )
    }

    pub fn abbreviations(&self, out: &mut impl Write, table: &AbbreviationTable) -> io::Result<()> {
        let width = table.codes().map(|c| c.chars().count()).max().unwrap_or(0);
        for entry in table.entries() {
            let pad = width - entry.code.chars().count();
            let code = self.bold(&entry.code);
            match &entry.author {
                Some(author) => writeln!(out, "{}{}  {} ({})", code, " ".repeat(pad), entry.title, author)?,
                None => writeln!(out, "{}{}  {}", code, " ".repeat(pad), entry.title)?,
            }
        }
        writeln!(out, "{} abbreviation(s)", table.len())
    }

    pub fn drift(&self, out: &mut impl Write, drift: &[TableDrift], left: &str, right: &str) -> io::Result<()> {
        if drift.is_empty() {
            return writeln!(out, "{}", self.paint("tables agree", Color::Green));
        }
        for d in drift {
            match d {
                TableDrift::OnlyInLeft { code } => writeln!(out, "`{}` only in {}", code, left)?,
                TableDrift::OnlyInRight { code } => writeln!(out, "`{}` only in {}", code, right)?,
                TableDrift::TitleDiffers { code, left: l, right: r } => {
                    writeln!(out, "`{}` title differs: {:?} vs {:?}", code, l, r)?
                }
                TableDrift::AuthorDiffers { code, left: l, right: r } => writeln!(
                    out,
                    "`{}` author differs: {} vs {}",
                    code,
                    l.as_deref().unwrap_or("(none)"),
                    r.as_deref().unwrap_or("(none)")
                )?,
            }
        }
        writeln!(out, "{} difference(s)", drift.len())
    }

    pub fn job(&self, out: &mut impl Write, report: &JobReport, preview: usize) -> io::Result<()> {
        writeln!(
            out,
            "{} {} ({}, {:?})",
            self.bold(&report.job),
            report.input.display(),
            report.layout,
            report.encoding
        )?;
        for warning in &report.warnings {
            writeln!(out, "  {}: {}", self.paint("warning", Color::Yellow), warning)?;
        }
        for (i, passage) in report.passages.iter().take(preview).enumerate() {
            writeln!(out)?;
            writeln!(out, "Verse {} ({}):", passage.locator, i + 1)?;
            writeln!(out, "{}", "-".repeat(50))?;
            writeln!(out, "{}", passage.text)?;
        }
        if preview > 0 {
            writeln!(out)?;
        }
        writeln!(
            out,
            "  {} written, {} kept (already present), {} planned",
            report.count(WriteOutcome::Written),
            report.count(WriteOutcome::SkippedExisting),
            report.count(WriteOutcome::Planned)
        )
    }

    pub fn index(&self, out: &mut impl Write, index: &CorpusIndex) -> io::Result<()> {
        writeln!(out, "Corpus root: {}", index.root.display())?;
        writeln!(out, "Passages: {}", index.passages.len())?;
        writeln!(out, "Snippet files: {}", index.snippet_count())?;
        writeln!(out, "Malformed names: {}", index.malformed.len())?;
        writeln!(out, "Other files: {}", index.ignored.len())
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pairs::TextTally;
    use std::path::PathBuf;

    fn render(f: impl FnOnce(&Printer, &mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&Printer::new(false), &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn summary() -> PairSummary {
        let mut summary = PairSummary {
            total_root_files: 2,
            root_only_count: 1,
            multiple_pair_count: 1,
            total_pairs: 2,
            ..PairSummary::default()
        };
        summary.results.push(PairRecord {
            root: PathBuf::from("ht/ht_1.5.1_root.txt"),
            commentaries: vec![PathBuf::from("ht_1.5.1_mua.txt"), PathBuf::from("ht_1.5.1_raa.txt")],
            pairs: 2,
            kind: PairKind::MultiplePairs,
        });
        summary.results.push(PairRecord {
            root: PathBuf::from("ht_1.5.2_root.txt"),
            commentaries: vec![],
            pairs: 0,
            kind: PairKind::RootOnly,
        });
        summary.by_text.insert("ht".into(), TextTally { roots: 2, pairs: 2 });
        summary
    }

    #[test]
    fn short_pair_summary() {
        let text = render(|p, out| p.pair_summary(out, &summary(), false));
        assert!(text.contains("Total root files found: 2"));
        assert!(text.contains("TOTAL ROOT-COMMENTARY PAIRS: 2"));
        assert!(!text.contains("EXAMPLES"));
    }

    #[test]
    fn verbose_pair_summary_lists_examples_and_breakdown() {
        let text = render(|p, out| p.pair_summary(out, &summary(), true));
        assert!(text.contains("Root-only files (1 total):\n  ht_1.5.2_root.txt"));
        assert!(text.contains("ht_1.5.1_root.txt -> ht_1.5.1_mua.txt, ht_1.5.1_raa.txt (2 pairs)"));
        assert!(text.contains("ht    :   2 root files,   2 pairs"));
    }

    #[test]
    fn file_list_is_numbered() {
        let files = [Path::new("a.txt"), Path::new("b.txt")];
        let text = render(|p, out| p.file_list(out, Path::new("corpus"), &files));
        assert!(text.contains("  1. a.txt\n  2. b.txt"));
        assert!(text.ends_with("Total files: 2\n"));
    }

    #[test]
    fn drift_output_names_the_sides() {
        let drift = vec![TableDrift::OnlyInRight { code: "mua".into() }];
        let text = render(|p, out| p.drift(out, &drift, "README.md", "data/README.md"));
        assert!(text.contains("`mua` only in data/README.md"));
        let text = render(|p, out| p.drift(out, &[], "a", "b"));
        assert_eq!(text, "tables agree\n");
    }
}
