// src/core/types.rs
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Short code of a work, e.g. `ht` or `bca`.
pub type TextId = String;

/// Tag used in file names for root-text snippets.
pub const ROOT_TAG: &str = "root";

/// A dotted verse/sūtra locator such as `1.5.1`.
///
/// Components compare numerically, so `1.5.9` sorts before `1.5.10`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerseNumber(Vec<u32>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseVerseError(pub String);

impl fmt::Display for ParseVerseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` is not a dotted verse number", self.0)
    }
}

impl std::error::Error for ParseVerseError {}

impl FromStr for VerseNumber {
    type Err = ParseVerseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseVerseError(s.to_string()));
        }
        let mut components = Vec::new();
        for part in s.split('.') {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ParseVerseError(s.to_string()));
            }
            let n = part.parse::<u32>().map_err(|_| ParseVerseError(s.to_string()))?;
            components.push(n);
        }
        Ok(VerseNumber(components))
    }
}

impl fmt::Display for VerseNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl PartialOrd for VerseNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VerseNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

/// What a snippet file holds: the root text, or a named commentary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Root,
    Commentary(String),
}

impl Role {
    pub fn tag(&self) -> &str {
        match self {
            Role::Root => ROOT_TAG,
            Role::Commentary(id) => id,
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self, Role::Root)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// (text id, verse) pair shared by a root snippet and its commentaries.
///
/// Serialized as `ht_1.5.1` so it can key JSON objects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PassageKey {
    pub text_id: TextId,
    pub verse: VerseNumber,
}

impl fmt::Display for PassageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.text_id, self.verse)
    }
}

impl FromStr for PassageKey {
    type Err = ParseVerseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (text_id, verse) = s.split_once('_').ok_or_else(|| ParseVerseError(s.to_string()))?;
        if text_id.is_empty() {
            return Err(ParseVerseError(s.to_string()));
        }
        Ok(PassageKey {
            text_id: text_id.to_string(),
            verse: verse.parse()?,
        })
    }
}

impl Serialize for PassageKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PassageKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The parsed form of `<TEXT-ID>_<VERSE-NUMBER>_<ROLE>.txt`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SnippetName {
    pub text_id: TextId,
    pub verse: VerseNumber,
    pub role: Role,
}

impl SnippetName {
    pub fn new(text_id: impl Into<TextId>, verse: VerseNumber, role: Role) -> Self {
        Self {
            text_id: text_id.into(),
            verse,
            role,
        }
    }

    pub fn key(&self) -> PassageKey {
        PassageKey {
            text_id: self.text_id.clone(),
            verse: self.verse.clone(),
        }
    }

    /// File stem without extension: `ht_1.5.1_root`.
    pub fn stem(&self) -> String {
        format!("{}_{}_{}", self.text_id, self.verse, self.role)
    }
}
