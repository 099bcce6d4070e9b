// File: src/core/abbreviations.rs
//! The abbreviation table that maps sigla to work titles and authors.
//!
//! The table lives in the corpus README as Markdown, either as a pipe table
//! or as a bullet list. Both forms are read; anything else in the document,
//! code blocks included, is ignored.
use crate::core::naming::is_siglum;
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Abbreviation {
    pub code: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// A code defined twice with different content in the same source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub code: String,
    pub kept: Abbreviation,
    pub ignored: Abbreviation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableDrift {
    OnlyInLeft { code: String },
    OnlyInRight { code: String },
    TitleDiffers { code: String, left: String, right: String },
    AuthorDiffers {
        code: String,
        left: Option<String>,
        right: Option<String>,
    },
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AbbreviationTable {
    entries: BTreeMap<String, Abbreviation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    conflicts: Vec<Conflict>,
}

fn bullet_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(?:[-*+]\s+)?(\S+?)\s*(?::|=|–|—|\s-\s)\s*(.+?)\s*$")
            .expect("bullet pattern is valid")
    })
}

impl AbbreviationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the body rows of every table and the first line of every list
    /// item in a Markdown document.
    pub fn from_markdown(text: &str) -> Self {
        let mut table = Self::new();
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);

        let mut in_head = false;
        let mut row: Vec<String> = Vec::new();
        let mut cell: Option<String> = None;

        for (event, range) in Parser::new_ext(text, options).into_offset_iter() {
            match event {
                Event::Start(Tag::TableHead) => in_head = true,
                Event::End(TagEnd::TableHead) => in_head = false,
                Event::Start(Tag::TableRow) => row.clear(),
                Event::Start(Tag::TableCell) if !in_head => cell = Some(String::new()),
                Event::Text(t) | Event::Code(t) => {
                    if let Some(cell) = cell.as_mut() {
                        cell.push_str(&t);
                    }
                }
                Event::End(TagEnd::TableCell) => {
                    if let Some(cell) = cell.take() {
                        row.push(cell);
                    }
                }
                Event::End(TagEnd::TableRow) => {
                    if let Some(entry) = table_entry(&row) {
                        table.insert(entry);
                    }
                }
                Event::Start(Tag::Item) => {
                    let first_line = text[range].lines().next().unwrap_or_default();
                    if let Some(entry) = parse_bullet(first_line) {
                        table.insert(entry);
                    }
                }
                _ => {}
            }
        }
        table
    }

    /// Adds an entry. A second definition of a code is recorded as a
    /// conflict (when it differs) and does not replace the first.
    pub fn insert(&mut self, entry: Abbreviation) {
        match self.entries.get(&entry.code) {
            Some(existing) if existing != &entry => {
                tracing::warn!(code = %entry.code, "abbreviation defined twice, keeping the first definition");
                self.conflicts.push(Conflict {
                    code: entry.code.clone(),
                    kept: existing.clone(),
                    ignored: entry,
                });
            }
            Some(_) => {}
            None => {
                self.entries.insert(entry.code.clone(), entry);
            }
        }
    }

    /// Entries of `other` replace entries with the same code.
    pub fn merge(&mut self, other: AbbreviationTable) {
        for (code, entry) in other.entries {
            self.entries.insert(code, entry);
        }
        self.conflicts.extend(other.conflicts);
    }

    pub fn lookup(&self, code: &str) -> Option<&Abbreviation> {
        self.entries.get(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = &Abbreviation> {
        self.entries.values()
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn missing_authors(&self) -> Vec<&Abbreviation> {
        self.entries.values().filter(|e| e.author.is_none()).collect()
    }

    /// Differences between two copies of the table, in code order.
    pub fn drift(&self, other: &AbbreviationTable) -> Vec<TableDrift> {
        let mut drift = Vec::new();
        for (code, left) in &self.entries {
            match other.entries.get(code) {
                None => drift.push(TableDrift::OnlyInLeft { code: code.clone() }),
                Some(right) => {
                    if left.title != right.title {
                        drift.push(TableDrift::TitleDiffers {
                            code: code.clone(),
                            left: left.title.clone(),
                            right: right.title.clone(),
                        });
                    }
                    if left.author != right.author {
                        drift.push(TableDrift::AuthorDiffers {
                            code: code.clone(),
                            left: left.author.clone(),
                            right: right.author.clone(),
                        });
                    }
                }
            }
        }
        for code in other.entries.keys() {
            if !self.entries.contains_key(code) {
                drift.push(TableDrift::OnlyInRight { code: code.clone() });
            }
        }
        drift
    }
}

fn clean_code(raw: &str) -> Option<String> {
    let code = raw.trim().trim_matches(|c: char| c == '`' || c == '*' || c == '_').trim();
    if code.is_empty() || code.contains(char::is_whitespace) {
        None
    } else {
        Some(code.to_string())
    }
}

fn clean_cell(raw: &str) -> Option<String> {
    let cell = raw.trim().trim_matches('*').trim();
    if cell.is_empty() || cell == "-" || cell == "—" {
        None
    } else {
        Some(cell.to_string())
    }
}

fn table_entry(cells: &[String]) -> Option<Abbreviation> {
    let code = clean_code(cells.first()?)?;
    let title = clean_cell(cells.get(1)?)?;
    let author = cells.get(2).and_then(|c| clean_cell(c));
    Some(Abbreviation { code, title, author })
}

/// `- code: Title`. A plain capitalised word (`- Note: ...`) is prose, not
/// a siglum, unless it is marked up as code or emphasis.
fn parse_bullet(line: &str) -> Option<Abbreviation> {
    let caps = bullet_regex().captures(line)?;
    let raw = &caps[1];
    let marked = raw.starts_with(|c: char| matches!(c, '`' | '*' | '_'));
    let code = clean_code(raw)?;
    if !is_siglum(&code) || (!marked && is_capitalised_word(&code)) {
        return None;
    }
    let (title, author) = split_attribution(&caps[2]);
    Some(Abbreviation {
        code,
        title: clean_cell(&title)?,
        author: author.and_then(|a| clean_cell(&a)),
    })
}

fn is_capitalised_word(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => !chars.any(char::is_uppercase),
        _ => false,
    }
}

/// `Title (Author)` or `Title by Author`.
fn split_attribution(text: &str) -> (String, Option<String>) {
    let text = text.trim();
    if text.ends_with(')') {
        if let Some(open) = text.rfind('(') {
            let title = text[..open].trim().trim_end_matches(',').trim();
            if !title.is_empty() {
                let author = &text[open + 1..text.len() - 1];
                return (title.to_string(), Some(author.trim().to_string()));
            }
        }
    }
    if let Some((title, author)) = text.rsplit_once(" by ") {
        return (title.trim().to_string(), Some(author.trim().to_string()));
    }
    (text.to_string(), None)
}
