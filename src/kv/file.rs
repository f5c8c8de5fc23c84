use std::collections::HashMap;
use std::hash::Hash;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{de::DeserializeOwned, Serialize};

use super::KvRepo;

/// An in-memory map mirrored to a binary snapshot on disk.
///
/// Every `Set`/`Delete` rewrites the full snapshot, writing to a sibling
/// temp file and renaming over the target so a crash mid-write never
/// leaves a half-written snapshot on disk.
///
/// Serialisation is an opaque binary blob of the whole map (`bincode`) —
/// forward compatibility across format versions is not a goal.
pub struct FileRepo<K, V> {
    items: RwLock<HashMap<K, V>>,
    path: PathBuf,
}

impl<K, V> FileRepo<K, V>
where
    K: Eq + Hash + Clone + Serialize + DeserializeOwned,
    V: Clone + Serialize + DeserializeOwned,
{
    /// Open (or create) a file-mirrored store at `path`.
    ///
    /// If the snapshot exists it is decoded into memory; if its parent
    /// directory is missing it is created with mode `0755`. A failure to
    /// load an existing, present snapshot is fatal — a corrupt mirror is
    /// treated as unrecoverable at construction time.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .unwrap_or_else(|e| panic!("failed to create directory {parent:?}: {e}"));
                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    let perms = std::fs::Permissions::from_mode(0o755);
                    if let Err(e) = std::fs::set_permissions(parent, perms) {
                        tracing::warn!("failed to set permissions on {parent:?}: {e}");
                    }
                }
            }
        }

        let items = if path.exists() {
            let bytes = std::fs::read(&path)
                .unwrap_or_else(|e| panic!("failed to read snapshot {path:?}: {e}"));
            if bytes.is_empty() {
                HashMap::new()
            } else {
                bincode::deserialize(&bytes)
                    .unwrap_or_else(|e| panic!("failed to decode snapshot {path:?}: {e}"))
            }
        } else {
            HashMap::new()
        };

        Self {
            items: RwLock::new(items),
            path,
        }
    }

    fn write_back(&self) {
        let snapshot = {
            let guard = self.items.read().expect("file repo lock poisoned");
            match bincode::serialize(&*guard) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::error!("failed to encode snapshot for {:?}: {e}", self.path);
                    return;
                }
            }
        };

        let tmp_path = self.path.with_extension("tmp");
        let write_result = (|| -> std::io::Result<()> {
            let mut file = std::fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&tmp_path)?;
            file.write_all(&snapshot)?;
            file.sync_all()?;
            drop(file);
            std::fs::rename(&tmp_path, &self.path)
        })();

        if let Err(e) = write_result {
            tracing::error!("failed to persist snapshot to {:?}: {e}", self.path);
        }
    }
}

impl<K, V> KvRepo<K, V> for FileRepo<K, V>
where
    K: Eq + Hash + Clone + Serialize + DeserializeOwned,
    V: Clone + Serialize + DeserializeOwned,
{
    fn get(&self, key: &K) -> Option<V> {
        self.items
            .read()
            .expect("file repo lock poisoned")
            .get(key)
            .cloned()
    }

    fn set(&self, key: K, value: V) {
        {
            let mut guard = self.items.write().expect("file repo lock poisoned");
            guard.insert(key, value);
        }
        self.write_back();
    }

    fn delete(&self, key: &K) -> bool {
        let deleted = {
            let mut guard = self.items.write().expect("file repo lock poisoned");
            guard.remove(key).is_some()
        };
        if deleted {
            self.write_back();
        }
        deleted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn set_persists_and_reloads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("snapshot.bin");

        {
            let repo: FileRepo<String, i32> = FileRepo::open(&path);
            repo.set("a".to_string(), 1);
            repo.set("b".to_string(), 2);
        }

        let repo: FileRepo<String, i32> = FileRepo::open(&path);
        assert_eq!(repo.get(&"a".to_string()), Some(1));
        assert_eq!(repo.get(&"b".to_string()), Some(2));
    }

    #[test]
    fn delete_persists_full_snapshot_without_deleted_key() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snapshot.bin");

        let repo: FileRepo<String, i32> = FileRepo::open(&path);
        repo.set("a".to_string(), 1);
        repo.set("b".to_string(), 2);
        assert!(repo.delete(&"a".to_string()));

        let reopened: FileRepo<String, i32> = FileRepo::open(&path);
        assert_eq!(reopened.get(&"a".to_string()), None);
        assert_eq!(reopened.get(&"b".to_string()), Some(2));
    }

    #[test]
    fn missing_parent_directory_is_created() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deep").join("nested").join("dir").join("snap.bin");
        let repo: FileRepo<String, i32> = FileRepo::open(&path);
        repo.set("x".to_string(), 9);
        assert!(path.parent().unwrap().exists());
    }

    #[test]
    fn opening_nonexistent_snapshot_starts_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snap.bin");
        let repo: FileRepo<String, i32> = FileRepo::open(&path);
        assert_eq!(repo.get(&"anything".to_string()), None);
    }
}
