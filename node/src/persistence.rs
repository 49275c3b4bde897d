// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub struct SnapshotManager;

impl SnapshotManager {
    /// Writes `bytes` to `path` atomically, keeping the previous file as `*.prev`.
    pub fn save(path: &Path, bytes: &[u8]) -> Result<(), std::io::Error> {
        let tmp_path = path.with_extension("tmp");

        {
            let mut file = File::create(&tmp_path)?;
            file.write_all(bytes)?;
            file.sync_all()?;
        }

        // Keep one previous version
        if path.exists() {
            let prev_path = path.with_extension("prev");
            if let Err(e) = std::fs::rename(path, &prev_path) {
                tracing::warn!("Could not rotate previous snapshot to {:?}: {}", prev_path, e);
            }
        }

        std::fs::rename(&tmp_path, path)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Vec<u8>, std::io::Error> {
        std::fs::read(path)
    }
}
