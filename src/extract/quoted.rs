// File: src/extract/quoted.rs
use super::{RawExtraction, RawPassage};
use regex_lite::Regex;

fn end_marker(siglum: Option<&str>) -> Regex {
    let pattern = match siglum {
        Some(s) => format!(r"\|\|\s*{}\s+(\d+(?:\.\d+)*)\s*\|\|\s*$", regex_lite::escape(s)),
        None => r"\|\|\s*(\d+(?:\.\d+)*)\s*\|\|\s*$".to_string(),
    };
    // Built from an escaped siglum, so it always compiles.
    Regex::new(&pattern).expect("end marker pattern is valid")
}

/// Root verses quoted inside a commentary: every line starting with `>` is
/// part of a verse, and a quoted line ending in `|| SIGLUM N ||` closes
/// verse N. Unquoted lines are ignored.
pub fn extract(content: &str, siglum: Option<&str>) -> RawExtraction {
    let mut out = RawExtraction::default();
    let end = end_marker(siglum);
    let mut pending: Vec<&str> = Vec::new();

    for line in content.lines() {
        let Some(quoted) = line.trim().strip_prefix('>') else {
            continue;
        };
        let quoted = quoted.trim();
        pending.push(quoted);

        if let Some(caps) = end.captures(quoted) {
            let number = caps[1].to_string();
            out.passages.push(RawPassage::main(number, pending.join("\n")));
            pending.clear();
        }
    }

    if !pending.is_empty() {
        out.warnings.push(format!(
            "{} quoted line(s) after the last verse marker were not assigned to a verse",
            pending.len()
        ));
    }
    if out.passages.is_empty() {
        out.warnings.push("no quoted verses found".to_string());
    }
    out
}
