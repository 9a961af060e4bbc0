use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::graph::{GraphRecord, RecordLoader};

const DEFAULT_ROOT: &str = "datasets";

/// Locates and loads JSON graph records relative to a dataset root.
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    root: PathBuf,
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT)
    }
}

impl DatasetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn load(&self, relative: impl AsRef<Path>) -> Result<GraphRecord> {
        let path = self.root.join(relative);
        RecordLoader::from_path(&path).with_context(|| format!("load record from {:?}", path))
    }

    /// Load every `*.json` record in a directory, sorted by filename so
    /// batch order is deterministic.
    pub fn load_dir(&self, relative: impl AsRef<Path>) -> Result<Vec<(String, GraphRecord)>> {
        let dir = self.root.join(relative);
        let entries =
            fs::read_dir(&dir).with_context(|| format!("list record directory {:?}", dir))?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .and_then(OsStr::to_str)
                        .map(|ext| ext.eq_ignore_ascii_case("json"))
                        .unwrap_or(false)
            })
            .collect();
        paths.sort();

        let mut records = Vec::with_capacity(paths.len());
        for path in paths {
            let record = RecordLoader::from_path(&path)?;
            let name = path
                .file_stem()
                .and_then(OsStr::to_str)
                .unwrap_or("<unknown>")
                .to_string();
            records.push((name, record));
        }
        Ok(records)
    }
}
