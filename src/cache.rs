//! Per-discussion read state cache.
//!
//! Files are stored under `.cache/` using a hash of the discussion source as
//! the directory name to avoid filesystem issues. The format is a tiny TOML
//! file holding the read watermark and the last position's start number.

use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CACHE_DIR: &str = ".cache";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct ReadState {
    #[serde(default)]
    pub last_read_post_number: u64,
    /// Start number of the last reported position, used to resume.
    #[serde(default)]
    pub near: u64,
}

/// Load the cached read state for a discussion source, if present.
pub fn load_read_state(source: &Path) -> Option<ReadState> {
    load_read_state_in(Path::new(CACHE_DIR), source)
}

/// Persist the read state for a discussion source. Errors are ignored to
/// keep the UI responsive.
pub fn save_read_state(source: &Path, state: &ReadState) {
    save_read_state_in(Path::new(CACHE_DIR), source, state);
}

fn load_read_state_in(root: &Path, source: &Path) -> Option<ReadState> {
    let path = read_state_path(root, source);
    let data = fs::read_to_string(path).ok()?;
    toml::from_str(&data).ok()
}

fn save_read_state_in(root: &Path, source: &Path, state: &ReadState) {
    let path = read_state_path(root, source);
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    if let Ok(contents) = toml::to_string(state) {
        if let Ok(mut file) = fs::File::create(&path) {
            let _ = file.write_all(contents.as_bytes());
            debug!(
                path = %path.display(),
                near = state.near,
                last_read = state.last_read_post_number,
                "Saved read state"
            );
        }
    }
}

pub fn hash_dir(root: &Path, source: &Path) -> PathBuf {
    let mut hasher = Sha256::new();
    hasher.update(source.as_os_str().to_string_lossy().as_bytes());
    let hash = format!("{:x}", hasher.finalize());
    root.join(hash)
}

fn read_state_path(root: &Path, source: &Path) -> PathBuf {
    hash_dir(root, source).join("read_state.toml")
}
