//! Key-value persistence for the catalog blobs.
//!
//! Each key holds one JSON document, rewritten in full on every change.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

pub trait KeyValueStore {
  /// `Ok(None)` when the key has never been written (first run).
  fn read(&self, key: &str) -> Result<Option<String>>;
  fn write(&mut self, key: &str, value: &str) -> Result<()>;
}

/// One `<key>.json` file per key inside a data directory.
pub struct FileStore {
  dir: PathBuf,
}

impl FileStore {
  pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
    let dir = dir.into();
    std::fs::create_dir_all(&dir).with_context(|| format!("Failed to create data directory {}", dir.display()))?;
    Ok(Self { dir })
  }

  pub fn dir(&self) -> &Path {
    &self.dir
  }

  fn path_for(&self, key: &str) -> PathBuf {
    self.dir.join(format!("{}.json", key))
  }
}

impl KeyValueStore for FileStore {
  fn read(&self, key: &str) -> Result<Option<String>> {
    let path = self.path_for(key);
    match std::fs::read_to_string(&path) {
      Ok(content) => Ok(Some(content)),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
  }

  fn write(&mut self, key: &str, value: &str) -> Result<()> {
    let path = self.path_for(key);
    // Write to a temp file, then rename (atomic)
    let tmp_path = path.with_extension("json.part");
    std::fs::write(&tmp_path, value).with_context(|| format!("Failed to write {}", tmp_path.display()))?;
    std::fs::rename(&tmp_path, &path).with_context(|| format!("Failed to finalize {}", path.display()))?;
    debug!(key, bytes = value.len(), "storage: wrote blob");
    Ok(())
  }
}

#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore {
  pub entries: std::collections::HashMap<String, String>,
  pub writes: usize,
  /// Writes to these keys fail as if the disk were full.
  pub failing_keys: std::collections::HashSet<String>,
}

#[cfg(test)]
impl MemoryStore {
  pub fn fail_writes_to(&mut self, keys: &[&String]) {
    self.failing_keys.extend(keys.iter().map(|k| k.to_string()));
  }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
  fn read(&self, key: &str) -> Result<Option<String>> {
    Ok(self.entries.get(key).cloned())
  }

  fn write(&mut self, key: &str, value: &str) -> Result<()> {
    if self.failing_keys.contains(key) {
      anyhow::bail!("disk full");
    }
    self.entries.insert(key.to_string(), value.to_string());
    self.writes += 1;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_key_reads_none() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    assert_eq!(store.read("ahbab_videos").unwrap(), None);
  }

  #[test]
  fn write_then_read() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::open(dir.path().join("nested")).unwrap();
    store.write("ahbab_saved", r#"["a","b"]"#).unwrap();
    store.write("ahbab_saved", r#"["b"]"#).unwrap();
    assert_eq!(store.read("ahbab_saved").unwrap().as_deref(), Some(r#"["b"]"#));
    assert!(store.dir().join("ahbab_saved.json").exists());
    assert!(!store.dir().join("ahbab_saved.json.part").exists());
  }

  #[test]
  fn memory_store_can_refuse_writes() {
    let mut store = MemoryStore::default();
    let key = "ahbab_videos".to_string();
    store.fail_writes_to(&[&key]);
    assert!(store.write(&key, "[]").is_err());
    assert_eq!(store.read(&key).unwrap(), None);
    store.write("ahbab_saved", "[]").unwrap();
    assert_eq!(store.writes, 1);
  }
}
