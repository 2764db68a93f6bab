//! JSON record and JSONL log helpers shared by every store.
//!
//! Records are replaced atomically: the payload goes to a sibling temp file
//! which is then renamed over the target, so a crash mid-write never leaves
//! a truncated profile or journal behind.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::ffi::OsString;
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Result returned after writing a record.
#[derive(Debug, Clone)]
pub struct RecordWriteOutcome {
    pub path: PathBuf,
    pub hash: String,
}

/// Loads a JSON record if it exists.
pub fn read_record<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<Option<T>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }
    let data = fs::read(path).with_context(|| format!("Failed reading record {:?}", path))?;
    let value = serde_json::from_slice(&data)
        .with_context(|| format!("Failed parsing record {:?}", path))?;
    Ok(Some(value))
}

/// Replaces a record with pretty-printed JSON and returns the payload hash.
pub fn write_record<T: Serialize, P: AsRef<Path>>(
    path: P,
    value: &T,
) -> Result<RecordWriteOutcome> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let payload = serde_json::to_vec_pretty(value)
        .with_context(|| format!("Failed serializing record {:?}", path))?;
    let hash = compute_hash(&payload);

    let staging = staging_path(path);
    {
        let mut file = fs::File::create(&staging)
            .with_context(|| format!("Failed opening staging file {:?}", staging))?;
        file.write_all(&payload)?;
        file.sync_all()?;
    }
    if let Err(err) = fs::rename(&staging, path) {
        let _ = fs::remove_file(&staging);
        return Err(err).with_context(|| format!("Failed replacing record {:?}", path));
    }
    Ok(RecordWriteOutcome {
        path: path.to_path_buf(),
        hash,
    })
}

/// Appends one JSON value as a line of a JSONL log.
pub fn append_json_line<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent(path)?;
    let mut line = serde_json::to_string(value)?;
    line.push('\n');
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log {:?}", path))?;
    file.write_all(line.as_bytes())?;
    Ok(())
}

/// Reads every non-blank line of a JSONL log. A missing log is empty.
pub fn read_json_lines<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let file = fs::File::open(path).with_context(|| format!("Failed to open log {:?}", path))?;
    let mut values = Vec::new();
    for (line_no, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let value = serde_json::from_str(&line)
            .with_context(|| format!("Corrupt record at {:?}:{}", path, line_no + 1))?;
        values.push(value);
    }
    Ok(values)
}

/// Computes a lowercase hex SHA-256 hash of the provided bytes.
pub fn compute_hash(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!("{:x}", digest)
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed creating directory {:?}", parent))?;
    }
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("record"));
    name.push(".tmp");
    path.with_file_name(name)
}
