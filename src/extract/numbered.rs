// File: src/extract/numbered.rs
use super::{RawExtraction, RawPassage};

/// A line holding nothing but a number opens the commentary on that verse.
fn header_number(line: &str) -> Option<&str> {
    let t = line.trim();
    (!t.is_empty() && t.bytes().all(|b| b.is_ascii_digit())).then_some(t)
}

pub fn extract(content: &str) -> RawExtraction {
    let mut out = RawExtraction::default();
    let mut current: Option<(&str, Vec<&str>)> = None;

    for line in content.lines() {
        if let Some(number) = header_number(line) {
            if let Some((n, body)) = current.take() {
                push_block(&mut out, n, &body);
            }
            current = Some((number, Vec::new()));
        } else if let Some((_, body)) = current.as_mut() {
            body.push(line);
        }
    }
    if let Some((n, body)) = current {
        push_block(&mut out, n, &body);
    }

    if out.passages.is_empty() {
        out.warnings.push("no numbered blocks found".to_string());
    }
    out
}

fn push_block(out: &mut RawExtraction, number: &str, body: &[&str]) {
    let text = body.join("\n");
    let text = text.trim();
    if text.is_empty() {
        out.warnings.push(format!("commentary block {} is empty, skipping", number));
    } else {
        out.passages.push(RawPassage::main(number, text));
    }
}
