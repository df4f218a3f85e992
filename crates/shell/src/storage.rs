//! Durable storage backends for the session record.
//!
//! - `FileStore`: native builds; one JSON file per key in a data directory.
//! - `BrowserStore`: wasm builds; `window.localStorage`.
//!
//! `erpdesk_auth::MemoryStore` covers tests and ephemeral use.

pub use erpdesk_auth::{KeyValueStore, MemoryStore, StorageError};

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserStore;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use super::{KeyValueStore, StorageError};

    /// Directory-backed key-value store.
    ///
    /// Writes go to a temp file that is renamed over the target, so a reader
    /// sees either the old record or the new one.
    #[derive(Debug, Clone)]
    pub struct FileStore {
        dir: PathBuf,
    }

    impl FileStore {
        /// Open (and create if needed) the store directory.
        pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
            let dir = dir.into();
            std::fs::create_dir_all(&dir).map_err(|e| {
                StorageError::Unavailable(format!("cannot create {}: {e}", dir.display()))
            })?;
            Ok(Self { dir })
        }

        pub fn dir(&self) -> &Path {
            &self.dir
        }

        fn path_for(&self, key: &str) -> PathBuf {
            let name: String = key
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' { c } else { '_' })
                .collect();
            self.dir.join(format!("{name}.json"))
        }
    }

    impl KeyValueStore for FileStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            match std::fs::read_to_string(self.path_for(key)) {
                Ok(raw) => Ok(Some(raw)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                // Non-UTF-8 contents are still "a value"; let the caller decide
                // it is corrupt.
                Err(e) if e.kind() == ErrorKind::InvalidData => Ok(Some(String::new())),
                Err(e) => Err(StorageError::Io(e.to_string())),
            }
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            let target = self.path_for(key);
            // One temp file per write; concurrent processes must not share it.
            let tmp = target.with_extension(format!(
                "json.{}.{}.tmp",
                std::process::id(),
                uuid::Uuid::now_v7().simple()
            ));
            std::fs::write(&tmp, value).map_err(|e| StorageError::Io(e.to_string()))?;
            std::fs::rename(&tmp, &target).map_err(|e| {
                let _ = std::fs::remove_file(&tmp);
                StorageError::Io(e.to_string())
            })
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            match std::fs::remove_file(self.path_for(key)) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(StorageError::Io(e.to_string())),
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn set_get_remove() {
            let dir = tempfile::tempdir().unwrap();
            let store = FileStore::open(dir.path()).unwrap();
            assert_eq!(store.get("erpdesk.session").unwrap(), None);

            store.set("erpdesk.session", "{\"a\":1}").unwrap();
            assert_eq!(store.get("erpdesk.session").unwrap().as_deref(), Some("{\"a\":1}"));

            store.set("erpdesk.session", "{}").unwrap();
            assert_eq!(store.get("erpdesk.session").unwrap().as_deref(), Some("{}"));

            store.remove("erpdesk.session").unwrap();
            store.remove("erpdesk.session").unwrap();
            assert_eq!(store.get("erpdesk.session").unwrap(), None);
        }

        #[test]
        fn keys_are_sanitized_into_file_names() {
            let dir = tempfile::tempdir().unwrap();
            let store = FileStore::open(dir.path()).unwrap();
            store.set("../escape", "x").unwrap();
            assert!(dir.path().join(".._escape.json").exists());
        }

        #[test]
        fn concurrent_writers_leave_one_complete_record() {
            let dir = tempfile::tempdir().unwrap();
            let writers: Vec<_> = ["{\"writer\":1}", "{\"writer\":2}"]
                .into_iter()
                .map(|value| {
                    let store = FileStore::open(dir.path()).unwrap();
                    std::thread::spawn(move || {
                        for _ in 0..50 {
                            store.set("erpdesk.session", value).unwrap();
                        }
                    })
                })
                .collect();
            for writer in writers {
                writer.join().unwrap();
            }

            let store = FileStore::open(dir.path()).unwrap();
            let stored = store.get("erpdesk.session").unwrap().unwrap();
            assert!(stored == "{\"writer\":1}" || stored == "{\"writer\":2}", "{stored}");

            let files: Vec<_> = std::fs::read_dir(dir.path())
                .unwrap()
                .map(|e| e.unwrap().file_name().into_string().unwrap())
                .collect();
            assert_eq!(files, vec!["erpdesk.session.json".to_string()]);
        }

        #[test]
        fn open_creates_nested_directory() {
            let dir = tempfile::tempdir().unwrap();
            let nested = dir.path().join("a").join("b");
            let store = FileStore::open(&nested).unwrap();
            assert_eq!(store.dir(), nested.as_path());
            assert!(nested.is_dir());
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::{KeyValueStore, StorageError};

    /// `window.localStorage`.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct BrowserStore;

    impl BrowserStore {
        fn storage() -> Result<web_sys::Storage, StorageError> {
            let window = web_sys::window()
                .ok_or_else(|| StorageError::Unavailable("no window object".to_string()))?;
            window
                .local_storage()
                .map_err(|e| StorageError::Unavailable(format!("{e:?}")))?
                .ok_or_else(|| StorageError::Unavailable("localStorage disabled".to_string()))
        }
    }

    impl KeyValueStore for BrowserStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Self::storage()?
                .get_item(key)
                .map_err(|e| StorageError::Io(format!("{e:?}")))
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            Self::storage()?
                .set_item(key, value)
                .map_err(|e| StorageError::Io(format!("{e:?}")))
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            Self::storage()?
                .remove_item(key)
                .map_err(|e| StorageError::Io(format!("{e:?}")))
        }
    }
}
