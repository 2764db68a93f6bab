//! Shared filesystem layout helpers.
//!
//! Every store resolves its files through this module so directory names
//! are not repeated across the crate.

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

use crate::storage::compute_hash;

/// Directory holding one JSON record per user.
pub const USERS_SUBDIR: &str = "users";
/// Directory holding the community feed log.
pub const COMMUNITY_SUBDIR: &str = "community";
/// Directory holding per-user wellbeing journals.
pub const WELLBEING_SUBDIR: &str = "wellbeing";
/// Append-only log of domain events.
pub const EVENTS_FILE: &str = "events.jsonl";

const POSTS_FILE: &str = "posts.jsonl";
const CHECK_INS_FILE: &str = "check_ins.json";

/// Convenience wrapper for locating all data files under a workspace root.
#[derive(Debug, Clone)]
pub struct DataLayout {
    pub root: PathBuf,
    pub users_dir: PathBuf,
    pub community_dir: PathBuf,
    pub wellbeing_dir: PathBuf,
}

impl DataLayout {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            users_dir: root.join(USERS_SUBDIR),
            community_dir: root.join(COMMUNITY_SUBDIR),
            wellbeing_dir: root.join(WELLBEING_SUBDIR),
        }
    }

    /// Path to the stored record for a user.
    pub fn user_json(&self, user_id: &str) -> Result<PathBuf> {
        Ok(self
            .users_dir
            .join(format!("{}.json", user_file_stem(user_id)?)))
    }

    pub fn posts_log(&self) -> PathBuf {
        self.community_dir.join(POSTS_FILE)
    }

    pub fn check_ins_json(&self, user_id: &str) -> Result<PathBuf> {
        Ok(self
            .wellbeing_dir
            .join(user_file_stem(user_id)?)
            .join(CHECK_INS_FILE))
    }

    pub fn events_log(&self) -> PathBuf {
        self.root.join(EVENTS_FILE)
    }
}

/// Maps a user identity onto a safe file stem.
///
/// Identity providers hand out ids with characters that are not portable in
/// file names. The stem is the hex SHA-256 of the trimmed id, so distinct ids
/// never share a file.
pub fn user_file_stem(user_id: &str) -> Result<String> {
    let trimmed = user_id.trim();
    if trimmed.is_empty() {
        bail!("User id must not be empty.");
    }
    Ok(compute_hash(trimmed.as_bytes()))
}
