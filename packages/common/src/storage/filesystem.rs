use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::io::{AsyncReadExt, BufReader};

use super::error::StorageError;
use super::hash::ContentHash;
use super::name::validate_flat_name;
use super::traits::{BoxReader, ImageStore};

/// Filesystem-backed content-addressed image store.
///
/// Images are stored flat as `{images_dir}/{sha256 hex}.jpg`. In-flight writes
/// go to `{images_dir}/.tmp` and are renamed into place once fully hashed.
pub struct FilesystemImageStore {
    images_dir: PathBuf,
    max_size: u64,
}

impl FilesystemImageStore {
    /// Create a new filesystem image store, creating the directory if needed.
    pub async fn new(images_dir: PathBuf, max_size: u64) -> Result<Self, StorageError> {
        fs::create_dir_all(&images_dir).await?;
        fs::create_dir_all(images_dir.join(".tmp")).await?;
        Ok(Self {
            images_dir,
            max_size,
        })
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    /// Resolve a file name to a path inside the image directory.
    fn image_path(&self, name: &str) -> Result<PathBuf, StorageError> {
        let name = validate_flat_name(name)?;
        Ok(self.images_dir.join(name))
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.images_dir
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }

    async fn commit(&self, temp_path: &Path, hash: &ContentHash) -> Result<(), StorageError> {
        let image_path = self.images_dir.join(hash.file_name());

        if fs::try_exists(&image_path).await? {
            let _ = fs::remove_file(temp_path).await;
            return Ok(());
        }

        if let Err(e) = fs::rename(temp_path, &image_path).await {
            let _ = fs::remove_file(temp_path).await;
            return Err(e.into());
        }

        Ok(())
    }
}

#[async_trait]
impl ImageStore for FilesystemImageStore {
    async fn put_stream(&self, mut reader: BoxReader) -> Result<ContentHash, StorageError> {
        let temp_path = self.temp_path();
        let mut hasher = Sha256::new();
        let mut total_bytes: u64 = 0;

        let mut buf = vec![0u8; 64 * 1024];
        let mut temp_file = fs::File::create(&temp_path).await?;

        loop {
            let n = reader.read(&mut buf).await?;
            if n == 0 {
                break;
            }

            total_bytes += n as u64;
            if total_bytes > self.max_size {
                drop(temp_file);
                let _ = fs::remove_file(&temp_path).await;
                return Err(StorageError::SizeLimitExceeded {
                    actual: total_bytes,
                    limit: self.max_size,
                });
            }

            hasher.update(&buf[..n]);
            tokio::io::AsyncWriteExt::write_all(&mut temp_file, &buf[..n]).await?;
        }

        tokio::io::AsyncWriteExt::flush(&mut temp_file).await?;
        drop(temp_file);

        let hash = ContentHash::from_bytes(hasher.finalize().into());
        self.commit(&temp_path, &hash).await?;
        Ok(hash)
    }

    async fn get_stream(&self, name: &str) -> Result<BoxReader, StorageError> {
        let image_path = self.image_path(name)?;
        match fs::File::open(&image_path).await {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn size(&self, name: &str) -> Result<u64, StorageError> {
        let image_path = self.image_path(name)?;
        match fs::metadata(&image_path).await {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
