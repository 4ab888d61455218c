use crate::config::ViewerConfig;
use crate::error::GismapError;

/// Key under which the selection document is stored.
pub const STORAGE_KEY: &str = "layerSelections";

/// Persistent storage of the serialized selection.
pub trait SelectionStorage {
    /// Reads the stored document. Returns `None` if nothing is stored.
    fn read(&self) -> Result<Option<String>, GismapError>;
    /// Replaces the stored document.
    fn write(&mut self, value: &str) -> Result<(), GismapError>;
    /// Removes the stored document.
    fn remove(&mut self) -> Result<(), GismapError>;
}

impl<T: SelectionStorage + ?Sized> SelectionStorage for Box<T> {
    fn read(&self) -> Result<Option<String>, GismapError> {
        (**self).read()
    }

    fn write(&mut self, value: &str) -> Result<(), GismapError> {
        (**self).write(value)
    }

    fn remove(&mut self) -> Result<(), GismapError> {
        (**self).remove()
    }
}

/// Storage that keeps the document in memory only.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    value: Option<String>,
}

impl MemoryStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage with the given document already stored.
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }

    /// Stored document.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl SelectionStorage for MemoryStorage {
    fn read(&self) -> Result<Option<String>, GismapError> {
        Ok(self.value.clone())
    }

    fn write(&mut self, value: &str) -> Result<(), GismapError> {
        self.value = Some(value.to_string());
        Ok(())
    }

    fn remove(&mut self) -> Result<(), GismapError> {
        self.value = None;
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use super::{SelectionStorage, STORAGE_KEY};
    use crate::error::GismapError;

    /// Stores the document as a JSON file in the given folder.
    #[derive(Debug, Clone)]
    pub struct FileStorage {
        path: PathBuf,
    }

    impl FileStorage {
        /// Creates a storage in the folder. The folder is created on the first write.
        pub fn new(folder: impl AsRef<Path>) -> Self {
            Self {
                path: folder.as_ref().join(format!("{STORAGE_KEY}.json")),
            }
        }

        /// Path of the storage file.
        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    impl SelectionStorage for FileStorage {
        fn read(&self) -> Result<Option<String>, GismapError> {
            match std::fs::read_to_string(&self.path) {
                Ok(value) => Ok(Some(value)),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
                Err(err) => Err(err.into()),
            }
        }

        fn write(&mut self, value: &str) -> Result<(), GismapError> {
            if let Some(folder) = self.path.parent() {
                std::fs::create_dir_all(folder)?;
            }

            std::fs::write(&self.path, value)?;
            Ok(())
        }

        fn remove(&mut self) -> Result<(), GismapError> {
            match std::fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
                Err(err) => Err(err.into()),
            }
        }
    }

}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

#[cfg(target_arch = "wasm32")]
mod local_storage {
    use super::{SelectionStorage, STORAGE_KEY};
    use crate::error::GismapError;

    /// Stores the document in the browser `localStorage`.
    #[derive(Debug, Clone)]
    pub struct LocalStorage {
        key: String,
    }

    impl LocalStorage {
        /// Creates a storage using the default key.
        pub fn new() -> Self {
            Self {
                key: STORAGE_KEY.to_string(),
            }
        }
    }

    impl Default for LocalStorage {
        fn default() -> Self {
            Self::new()
        }
    }

    impl SelectionStorage for LocalStorage {
        fn read(&self) -> Result<Option<String>, GismapError> {
            Ok(window_local_storage()?.get_item(&self.key)?)
        }

        fn write(&mut self, value: &str) -> Result<(), GismapError> {
            Ok(window_local_storage()?.set_item(&self.key, value)?)
        }

        fn remove(&mut self) -> Result<(), GismapError> {
            Ok(window_local_storage()?.remove_item(&self.key)?)
        }
    }

    fn window_local_storage() -> Result<web_sys::Storage, GismapError> {
        let window = web_sys::window()
            .ok_or_else(|| GismapError::Storage("browser window is not available".into()))?;
        window
            .local_storage()?
            .ok_or_else(|| GismapError::Storage("localStorage is not available".into()))
    }
}

#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorage;

/// Storage for the current platform: a file in [`ViewerConfig::storage_dir`] natively, the
/// browser `localStorage` on the web.
pub fn default_storage(config: &ViewerConfig) -> Box<dyn SelectionStorage> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        Box::new(FileStorage::new(&config.storage_dir))
    }

    #[cfg(target_arch = "wasm32")]
    {
        let _ = config;
        Box::new(LocalStorage::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.read().expect("read failed"), None);

        storage.write("{}").expect("write failed");
        assert_eq!(storage.value(), Some("{}"));

        storage.remove().expect("remove failed");
        assert_eq!(storage.value(), None);
    }

    #[test]
    fn boxed_storage_delegates() {
        let mut storage: Box<dyn SelectionStorage> = Box::new(MemoryStorage::with_value("a"));
        assert_eq!(storage.read().expect("read failed").as_deref(), Some("a"));
        storage.write("b").expect("write failed");
        assert_eq!(storage.read().expect("read failed").as_deref(), Some("b"));
    }
}
