use async_trait::async_trait;
use tokio::io::AsyncRead;

use super::error::StorageError;
use super::hash::ContentHash;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// File name of the placeholder served when a requested image is absent.
pub const DEFAULT_IMAGE: &str = "default.jpg";

/// Content-addressed image storage.
///
/// Images are written under their digest-derived name ([`ContentHash::file_name`])
/// and read back by file name, so fixed assets such as the placeholder image can
/// live next to uploaded ones.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store data from an async reader and return the content hash.
    async fn put_stream(&self, reader: BoxReader) -> Result<ContentHash, StorageError>;

    /// Retrieve an image as a streaming async reader.
    async fn get_stream(&self, name: &str) -> Result<BoxReader, StorageError>;

    /// Like [`get_stream`](Self::get_stream), but falls back to [`DEFAULT_IMAGE`]
    /// when `name` does not exist. Returns the name actually served.
    async fn get_stream_or_default(
        &self,
        name: &str,
    ) -> Result<(String, BoxReader), StorageError> {
        match self.get_stream(name).await {
            Ok(reader) => Ok((name.to_string(), reader)),
            Err(StorageError::NotFound(_)) => {
                tracing::debug!(name, "image not found, serving placeholder");
                let reader = self.get_stream(DEFAULT_IMAGE).await?;
                Ok((DEFAULT_IMAGE.to_string(), reader))
            }
            Err(e) => Err(e),
        }
    }

    /// Size of an image in bytes.
    async fn size(&self, name: &str) -> Result<u64, StorageError>;
}
