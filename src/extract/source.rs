// File: src/extract/source.rs
use crate::error::{CorpusError, Result};
use serde::Serialize;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceEncoding {
    Utf8,
    Latin1,
}

#[derive(Debug, Clone)]
pub struct SourceText {
    pub text: String,
    pub encoding: SourceEncoding,
}

/// Reads a source text as UTF-8, falling back to Latin-1 for files that are
/// not valid UTF-8. Line endings are normalised to `\n` and a leading BOM is
/// dropped.
pub fn read_source(path: &Path) -> Result<SourceText> {
    let bytes = std::fs::read(path).map_err(|e| CorpusError::io(path, e))?;
    Ok(decode(bytes, path))
}

pub fn decode(bytes: Vec<u8>, path: &Path) -> SourceText {
    let (text, encoding) = match String::from_utf8(bytes) {
        Ok(text) => (text, SourceEncoding::Utf8),
        Err(e) => {
            warn!(path = %path.display(), "source is not valid UTF-8, reading it as Latin-1");
            let text = e.into_bytes().into_iter().map(char::from).collect();
            (text, SourceEncoding::Latin1)
        }
    };
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text).replace("\r\n", "\n");
    SourceText { text, encoding }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_is_read_as_is() {
        let src = decode("\u{feff}śrī\r\nline".as_bytes().to_vec(), Path::new("x"));
        assert_eq!(src.encoding, SourceEncoding::Utf8);
        assert_eq!(src.text, "śrī\nline");
    }

    #[test]
    fn invalid_utf8_falls_back_to_latin1() {
        let src = decode(vec![b'c', 0xe9, b'l', b'a'], Path::new("x"));
        assert_eq!(src.encoding, SourceEncoding::Latin1);
        assert_eq!(src.text, "céla");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = read_source(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, CorpusError::Io { .. }));
    }
}
