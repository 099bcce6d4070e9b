// File: src/core/pairs.rs
use crate::core::corpus::CorpusIndex;
use crate::core::types::TextId;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PairKind {
    RootOnly,
    SinglePair,
    MultiplePairs,
}

impl PairKind {
    fn for_count(commentaries: usize) -> Self {
        match commentaries {
            0 => PairKind::RootOnly,
            1 => PairKind::SinglePair,
            _ => PairKind::MultiplePairs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairRecord {
    pub root: PathBuf,
    pub commentaries: Vec<PathBuf>,
    pub pairs: usize,
    pub kind: PairKind,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TextTally {
    pub roots: usize,
    pub pairs: usize,
}

/// Root-first tally: each root file is paired with every commentary file
/// that shares its text id and verse number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PairSummary {
    pub total_root_files: usize,
    pub root_only_count: usize,
    pub single_pair_count: usize,
    pub multiple_pair_count: usize,
    pub total_pairs: usize,
    pub results: Vec<PairRecord>,
    pub by_text: BTreeMap<TextId, TextTally>,
    /// Commentary files whose passage has no root file.
    pub orphan_commentaries: Vec<PathBuf>,
}

impl PairSummary {
    pub fn of_kind(&self, kind: PairKind) -> impl Iterator<Item = &PairRecord> {
        self.results.iter().filter(move |r| r.kind == kind)
    }
}

pub fn count_pairs(index: &CorpusIndex) -> PairSummary {
    let mut summary = PairSummary::default();

    for (key, entry) in &index.passages {
        if !entry.has_root() {
            summary
                .orphan_commentaries
                .extend(entry.commentary_files().map(|c| c.path.clone()));
            continue;
        }

        let commentaries: Vec<PathBuf> = entry.commentary_files().map(|c| c.path.clone()).collect();
        for root in &entry.roots {
            let pairs = commentaries.len();
            let kind = PairKind::for_count(pairs);
            match kind {
                PairKind::RootOnly => summary.root_only_count += 1,
                PairKind::SinglePair => summary.single_pair_count += 1,
                PairKind::MultiplePairs => summary.multiple_pair_count += 1,
            }
            summary.total_root_files += 1;
            summary.total_pairs += pairs;

            let tally = summary.by_text.entry(key.text_id.clone()).or_default();
            tally.roots += 1;
            tally.pairs += pairs;

            summary.results.push(PairRecord {
                root: root.path.clone(),
                commentaries: commentaries.clone(),
                pairs,
                kind,
            });
        }
    }

    summary
}
