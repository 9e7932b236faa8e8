//! Opaque key-value persistence.

use crate::error::{ArcadeError, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::rc::Rc;

pub trait KeyValueStore
{
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore
{
    inner: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore
{
    pub fn new() -> Self
    {
        Self::default()
    }

    pub fn len(&self) -> usize
    {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.inner.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore
{
    fn get(&self, key: &str) -> Result<Option<String>>
    {
        Ok(self.inner.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()>
    {
        self.inner
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()>
    {
        self.inner.borrow_mut().remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore
{
    dir: PathBuf,
}

impl FileStore
{
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self>
    {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|err| {
            ArcadeError::Storage(format!("Failed to create {}: {err}", dir.display()))
        })?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf
    {
        let file: String = key
            .chars()
            .map(|ch| {
                if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == '.' {
                    ch
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{file}.json"))
    }
}

impl KeyValueStore for FileStore
{
    fn get(&self, key: &str) -> Result<Option<String>>
    {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()>
    {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()>
    {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn memory_store_clones_share_contents()
    {
        let mut store = MemoryStore::new();
        let view = store.clone();
        store.set("a", "1").unwrap();

        assert_eq!(view.get("a").unwrap(), Some("1".to_string()));
        assert_eq!(view.len(), 1);
    }

    #[test]
    fn file_store_round_trips_and_treats_missing_as_none()
    {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path().join("scores")).unwrap();

        assert_eq!(store.get("leaderboard.tapper").unwrap(), None);
        store.set("leaderboard.tapper", "[1,2]").unwrap();
        assert_eq!(store.get("leaderboard.tapper").unwrap(), Some("[1,2]".to_string()));

        store.remove("leaderboard.tapper").unwrap();
        store.remove("leaderboard.tapper").unwrap();
        assert_eq!(store.get("leaderboard.tapper").unwrap(), None);
    }

    #[test]
    fn file_store_keys_cannot_escape_the_directory()
    {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        let path = store.path_for("../../etc/passwd");
        assert_eq!(path.parent(), Some(dir.path()));
    }
}
