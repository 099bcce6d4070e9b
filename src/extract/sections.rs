// File: src/extract/sections.rs
use super::{RawExtraction, RawPassage};
use regex_lite::Regex;
use std::sync::OnceLock;

fn header_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^---[ \t]+(\d+(?:\.\d+)*)[ \t]*\r?$").expect("header pattern is valid")
    })
}

/// Sections open at `--- N` header lines. Content before the first header
/// is dropped. With `strip_quoted`, `>`-quoted root lines are removed from
/// the commentary body.
pub fn extract(content: &str, strip_quoted: bool) -> RawExtraction {
    let mut out = RawExtraction::default();

    let headers: Vec<(usize, usize, &str)> = header_regex()
        .captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let number = caps.get(1)?.as_str();
            Some((whole.start(), whole.end(), number))
        })
        .collect();

    for (i, &(_, body_start, number)) in headers.iter().enumerate() {
        let body_end = headers.get(i + 1).map(|h| h.0).unwrap_or(content.len());
        let body = &content[body_start..body_end];

        let body = if strip_quoted {
            body.split('\n')
                .filter(|line| !line.trim_start().starts_with('>'))
                .collect::<Vec<_>>()
                .join("\n")
        } else {
            body.to_string()
        };
        // Keep the first line's indentation; only blank lines go.
        let text = body.trim_start_matches(|c: char| c == '\n' || c == '\r').trim_end();

        if text.trim().is_empty() {
            out.warnings.push(format!("section {} is empty, skipping", number));
            continue;
        }
        out.passages.push(RawPassage::main(number, text));
    }

    if headers.is_empty() {
        out.warnings.push("no `--- N` section headers found".to_string());
    }
    out
}
