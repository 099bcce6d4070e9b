// File: src/extract/mod.rs
//! Cutting source texts into one passage per verse.
//!
//! Each layout is a pure function from source text to raw passages. This
//! module applies the locator prefix, checks locators and resolves
//! duplicates; `job` reads sources and writes the snippet files.
pub mod dashed;
pub mod job;
pub mod numbered;
pub mod quoted;
pub mod sections;
pub mod source;
pub mod verse_marker;

use crate::core::types::{ParseVerseError, VerseNumber};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How verses are delimited in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Layout {
    /// Verses end with `|| N ||`.
    VerseMarker {
        #[serde(default = "default_true")]
        keep_marker: bool,
    },
    /// Sections start at a line holding only a number.
    NumberedBlocks,
    /// Sections start at `--- N` lines.
    SectionHeader {
        #[serde(default)]
        strip_quoted: bool,
    },
    /// `>`-quoted lines closed by `|| SIGLUM N ||`.
    QuotedVerse {
        #[serde(default)]
        siglum: Option<String>,
    },
    /// `---`-separated sections mixing `>` root lines and commentary.
    DashSeparated {
        #[serde(default)]
        expected_root_lines: Option<usize>,
    },
}

fn default_true() -> bool {
    true
}

impl Layout {
    pub fn name(&self) -> &'static str {
        match self {
            Layout::VerseMarker { .. } => "verse-marker",
            Layout::NumberedBlocks => "numbered-blocks",
            Layout::SectionHeader { .. } => "section-header",
            Layout::QuotedVerse { .. } => "quoted-verse",
            Layout::DashSeparated { .. } => "dash-separated",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PassageKind {
    /// Written under the job's role.
    Main,
    /// Commentary part of a mixed source, written under the gloss role.
    Gloss,
}

/// What a layout yields before the locator prefix is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPassage {
    pub locator: String,
    pub kind: PassageKind,
    pub text: String,
}

impl RawPassage {
    pub fn main(locator: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            locator: locator.into(),
            kind: PassageKind::Main,
            text: text.into(),
        }
    }

    pub fn gloss(locator: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            locator: locator.into(),
            kind: PassageKind::Gloss,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Passage {
    pub locator: VerseNumber,
    pub kind: PassageKind,
    pub text: String,
}

/// Layout output plus the non-fatal problems met on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawExtraction {
    pub passages: Vec<RawPassage>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub passages: Vec<Passage>,
    pub warnings: Vec<String>,
}

impl Extraction {
    pub fn count(&self, kind: PassageKind) -> usize {
        self.passages.iter().filter(|p| p.kind == kind).count()
    }
}

pub fn extract_raw(layout: &Layout, content: &str) -> RawExtraction {
    match layout {
        Layout::VerseMarker { keep_marker } => verse_marker::extract(content, *keep_marker),
        Layout::NumberedBlocks => numbered::extract(content),
        Layout::SectionHeader { strip_quoted } => sections::extract(content, *strip_quoted),
        Layout::QuotedVerse { siglum } => quoted::extract(content, siglum.as_deref()),
        Layout::DashSeparated { expected_root_lines } => dashed::extract(content, *expected_root_lines),
    }
}

/// Runs a layout and turns local locators into verse numbers.
///
/// A locator repeated for the same kind keeps the later passage.
pub fn extract(layout: &Layout, content: &str, prefix: Option<&str>) -> Result<Extraction, ParseVerseError> {
    let raw = extract_raw(layout, content);
    let mut warnings = raw.warnings;
    let mut passages: Vec<Passage> = Vec::with_capacity(raw.passages.len());
    let mut seen: HashMap<(PassageKind, VerseNumber), usize> = HashMap::new();

    for passage in raw.passages {
        let locator = format!("{}{}", prefix.unwrap_or(""), passage.locator);
        let locator: VerseNumber = locator.parse()?;
        let slot = (passage.kind, locator.clone());
        let next = Passage {
            locator,
            kind: passage.kind,
            text: passage.text,
        };
        match seen.get(&slot) {
            Some(&at) => {
                warnings.push(format!(
                    "verse {} appears more than once; keeping the later text",
                    next.locator
                ));
                passages[at] = next;
            }
            None => {
                seen.insert(slot, passages.len());
                passages.push(next);
            }
        }
    }

    Ok(Extraction { passages, warnings })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_prepended_to_local_locators() {
        let content = "first verse || 1 ||\nsecond verse || 2 ||";
        let extraction = extract(&Layout::VerseMarker { keep_marker: false }, content, Some("1.5.")).unwrap();
        let locators: Vec<String> = extraction.passages.iter().map(|p| p.locator.to_string()).collect();
        assert_eq!(locators, ["1.5.1", "1.5.2"]);
    }

    #[test]
    fn bad_prefix_is_an_error() {
        let content = "first verse || 1 ||";
        assert!(extract(&Layout::VerseMarker { keep_marker: true }, content, Some("ch")).is_err());
    }

    #[test]
    fn repeated_locator_keeps_the_later_passage() {
        let content = "3\nfirst gloss\n3\nsecond gloss\n";
        let extraction = extract(&Layout::NumberedBlocks, content, None).unwrap();
        assert_eq!(extraction.passages.len(), 1);
        assert_eq!(extraction.passages[0].text, "second gloss");
        assert_eq!(extraction.warnings.len(), 1);
    }

    #[test]
    fn layouts_deserialize_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            layout: Layout,
        }
        let w: Wrapper = toml::from_str("[layout]\nkind = \"quoted-verse\"\nsiglum = \"SeNi\"\n").unwrap();
        assert_eq!(
            w.layout,
            Layout::QuotedVerse {
                siglum: Some("SeNi".into())
            }
        );
        let w: Wrapper = toml::from_str("[layout]\nkind = \"verse-marker\"\n").unwrap();
        assert_eq!(w.layout, Layout::VerseMarker { keep_marker: true });
        assert_eq!(w.layout.name(), "verse-marker");
    }

    #[test]
    fn mixed_sections_count_by_kind() {
        let content = "> mūla one\ngloss one\n---\n> mūla two\n";
        let extraction = extract(&Layout::DashSeparated { expected_root_lines: None }, content, Some("9.")).unwrap();
        assert_eq!(extraction.count(PassageKind::Main), 2);
        assert_eq!(extraction.count(PassageKind::Gloss), 1);
        assert!(extraction
            .passages
            .iter()
            .all(|p| p.kind == PassageKind::Main || p.locator.to_string() == "9.1"));
    }
}
