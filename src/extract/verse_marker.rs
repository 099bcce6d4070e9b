// File: src/extract/verse_marker.rs
use super::{RawExtraction, RawPassage};
use regex_lite::Regex;
use std::sync::OnceLock;

fn marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\|\|[ \t]*(\d+(?:\.\d+)*)[ \t]*\|\|").expect("marker pattern is valid"))
}

/// Verses are closed by a double-daṇḍa marker carrying the verse number:
/// `... || 12 ||` or `... || 5.12 ||`. Text before the first marker belongs
/// to the first verse.
pub fn extract(content: &str, keep_marker: bool) -> RawExtraction {
    let mut out = RawExtraction::default();
    let mut last_end = 0;

    for caps in marker_regex().captures_iter(content) {
        let Some(whole) = caps.get(0) else { continue };
        let number = &caps[1];
        let text = content[last_end..whole.start()].trim();
        last_end = whole.end();

        if text.is_empty() {
            out.warnings.push(format!("verse {} is empty, skipping", number));
            continue;
        }
        let text = if keep_marker {
            format!("{} || {} ||", text, number)
        } else {
            text.to_string()
        };
        out.passages.push(RawPassage::main(number, text));
    }

    let trailing = content[last_end..].trim();
    if !trailing.is_empty() {
        out.warnings.push(format!(
            "{} characters after the last verse marker were not assigned to a verse",
            trailing.chars().count()
        ));
    }
    if out.passages.is_empty() {
        out.warnings.push("no verse markers found".to_string());
    }
    out
}
