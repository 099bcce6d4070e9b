// File: src/extract/dashed.rs
use super::{RawExtraction, RawPassage};

/// Sections separated by `---`, each holding a root verse as `>` lines and
/// its commentary as the remaining lines. Non-empty sections are numbered
/// from 1, and the root and commentary of a section share the number.
pub fn extract(content: &str, expected_root_lines: Option<usize>) -> RawExtraction {
    let mut out = RawExtraction::default();
    let mut counter = 0usize;

    for section in content.split("---") {
        let section = section.trim();
        if section.is_empty() {
            continue;
        }
        counter += 1;
        let locator = counter.to_string();

        let root_lines: Vec<&str> = section
            .lines()
            .filter_map(|line| line.strip_prefix('>'))
            .filter(|rest| !rest.trim().is_empty())
            .collect();
        let gloss_lines: Vec<&str> = section
            .lines()
            .filter(|line| !line.is_empty() && !line.starts_with('>'))
            .collect();

        if let Some(expected) = expected_root_lines {
            if !root_lines.is_empty() && root_lines.len() != expected {
                out.warnings.push(format!(
                    "section {} has {} root line(s), expected {}",
                    counter,
                    root_lines.len(),
                    expected
                ));
            }
        }

        let root = root_lines.join("\n");
        let root = root.trim();
        if !root.is_empty() {
            out.passages.push(RawPassage::main(locator.clone(), root));
        }
        let gloss = gloss_lines.join("\n");
        let gloss = gloss.trim();
        if !gloss.is_empty() {
            out.passages.push(RawPassage::gloss(locator, gloss));
        }
    }

    if counter == 0 {
        out.warnings.push("no `---` separated sections found".to_string());
    }
    out
}
