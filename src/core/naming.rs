// File: src/core/naming.rs
use crate::core::types::{Role, SnippetName, VerseNumber, ROOT_TAG};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NameError {
    #[error("`{0}` has no `.{1}` extension")]
    MissingExtension(String, String),
    #[error("`{name}` has extension `.{found}`, expected `.{expected}`")]
    WrongExtension {
        name: String,
        found: String,
        expected: String,
    },
    #[error("`{name}` has {found} underscore-separated parts, expected 3")]
    SegmentCount { name: String, found: usize },
    #[error("`{0}` has an empty text id")]
    EmptyTextId(String),
    #[error("`{name}`: `{verse}` is not a dotted verse number")]
    InvalidVerse { name: String, verse: String },
    #[error("`{0}` has an empty role")]
    EmptyRole(String),
    #[error("`{name}`: segment `{segment}` contains characters other than letters and digits")]
    InvalidCharacters { name: String, segment: String },
}

/// The `<TEXT-ID>_<VERSE-NUMBER>_<root|COMMENTARY-ID>.<ext>` convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConvention {
    pub extension: String,
    /// Older extraction runs wrote names without extension.
    pub require_extension: bool,
    /// Role tags that also denote the root text, e.g. `mula`.
    pub root_aliases: Vec<String>,
}

impl Default for NamingConvention {
    fn default() -> Self {
        Self {
            extension: "txt".to_string(),
            require_extension: true,
            root_aliases: vec!["mula".to_string()],
        }
    }
}

impl NamingConvention {
    pub fn parse(&self, file_name: &str) -> Result<SnippetName, NameError> {
        let (stem, extension) = split_extension(file_name);
        match extension {
            Some(ext) if ext != self.extension => {
                return Err(NameError::WrongExtension {
                    name: file_name.to_string(),
                    found: ext.to_string(),
                    expected: self.extension.clone(),
                });
            }
            None if self.require_extension => {
                return Err(NameError::MissingExtension(
                    file_name.to_string(),
                    self.extension.clone(),
                ));
            }
            _ => {}
        }

        let segments: Vec<&str> = stem.split('_').collect();
        if segments.len() != 3 {
            return Err(NameError::SegmentCount {
                name: file_name.to_string(),
                found: segments.len(),
            });
        }
        let (text_id, verse, role) = (segments[0], segments[1], segments[2]);

        if text_id.is_empty() {
            return Err(NameError::EmptyTextId(file_name.to_string()));
        }
        if !is_siglum(text_id) {
            return Err(NameError::InvalidCharacters {
                name: file_name.to_string(),
                segment: text_id.to_string(),
            });
        }
        let verse: VerseNumber = verse.parse().map_err(|_| NameError::InvalidVerse {
            name: file_name.to_string(),
            verse: verse.to_string(),
        })?;
        if role.is_empty() {
            return Err(NameError::EmptyRole(file_name.to_string()));
        }
        if !is_siglum(role) {
            return Err(NameError::InvalidCharacters {
                name: file_name.to_string(),
                segment: role.to_string(),
            });
        }

        Ok(SnippetName::new(text_id, verse, self.role_for(role)))
    }

    /// Maps a role tag to a `Role`, honouring root aliases.
    pub fn role_for(&self, tag: &str) -> Role {
        if tag == ROOT_TAG || self.root_aliases.iter().any(|alias| alias == tag) {
            Role::Root
        } else {
            Role::Commentary(tag.to_string())
        }
    }

    /// Canonical file name for a snippet.
    pub fn render(&self, name: &SnippetName) -> String {
        format!("{}.{}", name.stem(), self.extension)
    }

    /// True when the name is exactly what `render` would produce.
    pub fn is_canonical(&self, file_name: &str) -> bool {
        self.parse(file_name)
            .map(|name| self.render(&name) == file_name)
            .unwrap_or(false)
    }

    /// Whether a file is meant to be a snippet and should be held to the
    /// convention: it carries the extension in any letter case, or its stem
    /// has the `TEXT_VERSE_ROLE` shape whatever its extension. `README.md`
    /// and `tika.toml` are not snippets.
    pub fn is_candidate(&self, file_name: &str) -> bool {
        let (stem, extension) = split_extension(file_name);
        match extension {
            Some(ext) if ext.eq_ignore_ascii_case(&self.extension) => return true,
            None if !self.require_extension => return true,
            _ => {}
        }
        let segments: Vec<&str> = stem.split('_').collect();
        segments.len() == 3 && segments[1].parse::<VerseNumber>().is_ok()
    }
}

/// Splits off an extension. A dot followed by text containing `_` belongs to
/// the verse number, not to an extension (`ht_1.5.3_mua`).
fn split_extension(file_name: &str) -> (&str, Option<&str>) {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !ext.contains('_') => (stem, Some(ext)),
        _ => (file_name, None),
    }
}

/// Letters and digits only; combining diacritics are accepted so that
/// decomposed forms like `medu\u{304}` pass.
pub fn is_siglum(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_alphanumeric() || ('\u{0300}'..='\u{036f}').contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_root_and_commentary_examples() {
        let naming = NamingConvention::default();

        let root = naming.parse("ht_1.5.1_root.txt").unwrap();
        assert_eq!(root.text_id, "ht");
        assert_eq!(root.verse.to_string(), "1.5.1");
        assert_eq!(root.role, Role::Root);

        let comm = naming.parse("heta_1.5.1_raa.txt").unwrap();
        assert_eq!(comm.text_id, "heta");
        assert_eq!(comm.role, Role::Commentary("raa".into()));
    }

    #[test]
    fn accepts_diacritics_in_sigla() {
        let naming = NamingConvention::default();
        let name = naming.parse("medū_12_vi.txt").unwrap();
        assert_eq!(name.text_id, "medū");
        assert!(naming.parse("medu\u{304}_12_root.txt").is_ok());
    }

    #[test]
    fn root_alias_parses_as_root_but_is_not_canonical() {
        let naming = NamingConvention::default();
        let name = naming.parse("ht_1.5.4_mula.txt").unwrap();
        assert_eq!(name.role, Role::Root);
        assert_eq!(naming.render(&name), "ht_1.5.4_root.txt");
        assert!(!naming.is_canonical("ht_1.5.4_mula.txt"));
        assert!(naming.is_canonical("ht_1.5.4_root.txt"));
    }

    #[test]
    fn extension_rules() {
        let strict = NamingConvention::default();
        assert!(matches!(
            strict.parse("ht_1.5.3_mua"),
            Err(NameError::MissingExtension(..))
        ));
        assert!(matches!(
            strict.parse("ht_1.5.3_mua.md"),
            Err(NameError::WrongExtension { .. })
        ));

        let lenient = NamingConvention {
            require_extension: false,
            ..NamingConvention::default()
        };
        let name = lenient.parse("ht_1.5.3_mua").unwrap();
        assert_eq!(name.verse.to_string(), "1.5.3");
        assert_eq!(name.role, Role::Commentary("mua".into()));
    }

    #[test]
    fn rejects_malformed_names() {
        let naming = NamingConvention::default();
        assert!(matches!(
            naming.parse("bca_5.12.txt"),
            Err(NameError::SegmentCount { found: 2, .. })
        ));
        assert!(matches!(
            naming.parse("bca_p_5.12.txt"),
            Err(NameError::InvalidVerse { .. })
        ));
        assert!(matches!(
            naming.parse("_1.1_root.txt"),
            Err(NameError::EmptyTextId(_))
        ));
        assert!(matches!(naming.parse("ht_1.1_.txt"), Err(NameError::EmptyRole(_))));
        assert!(matches!(
            naming.parse("h-t_1.1_root.txt"),
            Err(NameError::InvalidCharacters { .. })
        ));
        assert!(matches!(
            naming.parse("ht_1_2_root.txt"),
            Err(NameError::SegmentCount { found: 4, .. })
        ));
    }

    #[test]
    fn candidates_include_misnamed_snippets_but_not_other_files() {
        let strict = NamingConvention::default();
        for name in ["ht_1.5.1_root.txt", "ht_1.5.1_root", "ht_1.5.1_raa.md", "ht_1.5.2_root.TXT", "bca_5.12.txt"] {
            assert!(strict.is_candidate(name), "{name} should be checked");
        }
        for name in ["README.md", "tika.toml", "some_notes.md", "ht_1.5"] {
            assert!(!strict.is_candidate(name), "{name} should be ignored");
        }

        let lenient = NamingConvention {
            require_extension: false,
            ..NamingConvention::default()
        };
        assert!(lenient.is_candidate("LICENSE"));
        assert!(!lenient.is_candidate("notes.md"));
    }
}
