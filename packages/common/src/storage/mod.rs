mod error;
mod hash;
mod name;
mod traits;

pub mod filesystem;

pub use error::StorageError;
pub use filesystem::FilesystemImageStore;
pub use hash::{ContentHash, IMAGE_EXTENSION};
pub use name::validate_flat_name;
pub use traits::{BoxReader, DEFAULT_IMAGE, ImageStore};
