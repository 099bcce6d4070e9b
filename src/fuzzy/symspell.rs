// File: src/fuzzy/symspell.rs
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Symmetric Delete (SymSpell) lookup over the known sigla. It pre-calculates
/// the "deletes" of every code so that an unknown code found in a file name
/// can be matched to its nearest known code without scanning the table.
#[derive(Clone, Serialize, Deserialize)]
pub struct SymSpell {
    /// Maps a delete variant (e.g. "bc") to the codes it could have come
    /// from (e.g. {"bca"}).
    deletes: HashMap<String, BTreeSet<String>>,
    max_edit_distance: usize,
}

impl SymSpell {
    pub fn new(max_edit_distance: usize) -> Self {
        Self {
            deletes: HashMap::new(),
            max_edit_distance,
        }
    }

    pub fn from_codes<'a>(codes: impl IntoIterator<Item = &'a str>, max_edit_distance: usize) -> Self {
        let mut symspell = Self::new(max_edit_distance);
        for code in codes {
            symspell.add_word(code);
        }
        symspell
    }

    /// Registers a code under all its delete variants up to the configured
    /// edit distance.
    pub fn add_word(&mut self, word: &str) {
        for edit in self.generate_edits(word) {
            self.deletes.entry(edit).or_default().insert(word.to_string());
        }
    }

    /// Candidate codes sharing a delete variant with `input`.
    pub fn lookup(&self, input: &str) -> BTreeSet<String> {
        let mut candidates = BTreeSet::new();
        for edit in self.generate_edits(input) {
            if let Some(words) = self.deletes.get(&edit) {
                candidates.extend(words.iter().cloned());
            }
        }
        candidates
    }

    /// The closest known code within the edit distance; ties go to the
    /// alphabetically first code.
    pub fn suggest(&self, input: &str) -> Option<String> {
        self.lookup(input)
            .into_iter()
            .filter(|candidate| candidate != input)
            .map(|candidate| (edit_distance(input, &candidate), candidate))
            .filter(|(distance, _)| *distance <= self.max_edit_distance)
            .min()
            .map(|(_, candidate)| candidate)
    }

    /// All variants of `word` with up to `max_edit_distance` characters
    /// removed, the word itself included. Works on chars, not bytes, so
    /// sigla like `medū` are safe.
    fn generate_edits(&self, word: &str) -> HashSet<String> {
        let mut edits = HashSet::new();
        edits.insert(word.to_string());

        let mut current_edits = edits.clone();

        for _ in 0..self.max_edit_distance {
            let mut next_edits = HashSet::new();
            for edit in current_edits {
                let chars: Vec<char> = edit.chars().collect();
                for i in 0..chars.len() {
                    let deleted_variant: String = chars
                        .iter()
                        .enumerate()
                        .filter(|&(j, _)| j != i)
                        .map(|(_, c)| c)
                        .collect();
                    next_edits.insert(deleted_variant);
                }
            }
            edits.extend(next_edits.iter().cloned());
            current_edits = next_edits;
        }

        edits
    }
}

/// Levenshtein distance over chars.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut row = vec![i + 1; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == *cb { 0 } else { 1 };
            row[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(row[j] + 1);
        }
        prev = row;
    }
    prev[b.len()]
}
