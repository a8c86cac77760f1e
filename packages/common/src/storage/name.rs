use super::error::StorageError;

/// Validates that `name` addresses a file directly inside the image directory.
///
/// The name is checked as given: surrounding whitespace, empty names, path
/// separators, `..`, hidden files and control characters are all rejected.
pub fn validate_flat_name(name: &str) -> Result<&str, StorageError> {
    if name.is_empty() {
        return Err(StorageError::InvalidName("name cannot be empty".into()));
    }

    if name.trim() != name {
        return Err(StorageError::InvalidName(
            "leading or trailing whitespace is not allowed".into(),
        ));
    }

    if name.chars().any(|c| c.is_control()) {
        return Err(StorageError::InvalidName(
            "control characters are not allowed".into(),
        ));
    }

    if name.contains('/') || name.contains('\\') {
        return Err(StorageError::InvalidName(
            "path separators are not allowed".into(),
        ));
    }

    if name == ".." {
        return Err(StorageError::InvalidName("'..' is not allowed".into()));
    }

    if name.starts_with('.') {
        return Err(StorageError::InvalidName(
            "hidden files are not allowed".into(),
        ));
    }

    Ok(name)
}
