use crate::errors::StorageError;
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Raw access to the persisted record. `read` yields `None` when nothing has
/// been stored yet.
pub trait RecordStorage {
    fn read(&self) -> impl Future<Output = Result<Option<Vec<u8>>, StorageError>> + Send;
    fn write(&mut self, bytes: &[u8]) -> impl Future<Output = Result<(), StorageError>> + Send;
}

#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStorage for FileStorage {
    async fn read(&self) -> Result<Option<Vec<u8>>, StorageError> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn write(&mut self, bytes: &[u8]) -> Result<(), StorageError> {
        fs::write(&self.path, bytes).await?;
        Ok(())
    }
}

/// In-process storage, used by tests and by hosts that persist elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    pub contents: Option<Vec<u8>>,
    pub writes: usize,
    pub fail_writes: bool,
}

impl MemoryStorage {
    pub fn with_contents(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            contents: Some(bytes.into()),
            ..Self::default()
        }
    }
}

impl RecordStorage for MemoryStorage {
    async fn read(&self) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.contents.clone())
    }

    async fn write(&mut self, bytes: &[u8]) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(std::io::Error::other("write rejected").into());
        }
        self.contents = Some(bytes.to_vec());
        self.writes += 1;
        Ok(())
    }
}
