//! Live filesystem adapter using `std::fs`.

use std::path::Path;

use crate::ports::filesystem::FileSystem;

/// Live filesystem adapter backed by real disk I/O.
pub struct LiveFileSystem;

impl FileSystem for LiveFileSystem {
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        Ok(std::fs::read_to_string(path)?)
    }

    fn write(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(std::fs::write(path, contents)?)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alice").join("2024-03-01.json");

        LiveFileSystem.write(&path, "[]").unwrap();

        assert!(LiveFileSystem.exists(&path));
        assert_eq!(LiveFileSystem.read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn reading_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(LiveFileSystem.read_to_string(&dir.path().join("nope")).is_err());
    }
}
