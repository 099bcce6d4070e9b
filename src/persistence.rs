// File: src/persistence.rs
use crate::core::corpus::CorpusIndex;
use crate::error::{CorpusError, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// Bumped whenever `CorpusIndex` changes shape.
pub const SNAPSHOT_VERSION: u32 = 1;

/// The state written to disk: the format version, then the index.
#[derive(serde::Serialize)]
struct Snapshot<'a> {
    version: u32,
    index: &'a CorpusIndex,
}

fn persist_with<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&NamedTempFile>) -> Result<()>,
{
    let parent_dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir).map_err(|e| CorpusError::io(parent_dir, e))?;

    let temp_file = NamedTempFile::new_in(parent_dir).map_err(|e| CorpusError::io(parent_dir, e))?;
    {
        let mut writer = BufWriter::new(&temp_file);
        write(&mut writer)?;
        writer.flush().map_err(|e| CorpusError::io(path, e))?;
    }
    temp_file
        .persist(path)
        .map_err(|e| CorpusError::io(path, e.error))?;
    Ok(())
}

pub fn save_snapshot(index: &CorpusIndex, path: &Path) -> Result<()> {
    let snapshot = Snapshot {
        version: SNAPSHOT_VERSION,
        index,
    };
    persist_with(path, |writer| {
        bincode::serialize_into(writer, &snapshot)?;
        Ok(())
    })?;
    info!(path = %path.display(), snippets = index.snippet_count(), "saved corpus snapshot");
    Ok(())
}

pub fn load_snapshot(path: &Path) -> Result<CorpusIndex> {
    let file = File::open(path).map_err(|e| CorpusError::io(path, e))?;
    let mut reader = BufReader::new(file);
    // Version first; the layout of the rest depends on it.
    let version: u32 = bincode::deserialize_from(&mut reader)?;
    if version != SNAPSHOT_VERSION {
        return Err(CorpusError::SnapshotVersion {
            path: path.to_path_buf(),
            found: version,
            expected: SNAPSHOT_VERSION,
        });
    }
    Ok(bincode::deserialize_from(&mut reader)?)
}

/// Pretty JSON, written atomically like the snapshot.
pub fn export_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    persist_with(path, |writer| {
        serde_json::to_writer_pretty(&mut *writer, value)?;
        writer.write_all(b"\n").map_err(|e| CorpusError::io(path, e))?;
        Ok(())
    })
}
