use std::path::Path;

use common::storage::DEFAULT_IMAGE;
use tracing::info;

/// Placeholder JPEG shipped with the server.
const DEFAULT_IMAGE_BYTES: &[u8] = include_bytes!("../assets/default.jpg");

/// Write the placeholder image into `images_dir` unless one is already there.
///
/// An operator-supplied `default.jpg` is left untouched.
pub async fn ensure_default_image(images_dir: &Path) -> std::io::Result<()> {
    let path = images_dir.join(DEFAULT_IMAGE);
    if tokio::fs::try_exists(&path).await? {
        return Ok(());
    }

    tokio::fs::write(&path, DEFAULT_IMAGE_BYTES).await?;
    info!(path = %path.display(), "Seeded placeholder image");
    Ok(())
}
