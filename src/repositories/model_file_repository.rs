use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

/// Keeps the on-disk copy of the active model in sync with accepted uploads.
pub struct ModelFileRepository {
    path: PathBuf,
}

impl ModelFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes to a uniquely named sibling temp file, then renames it over the model.
    pub fn store(&self, bytes: &[u8]) -> io::Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        info!("Stored model file: {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn entries(dir: &Path) -> Vec<PathBuf> {
        fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect()
    }

    #[test]
    fn store_creates_directories_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let models = dir.path().join("models");
        let repository = ModelFileRepository::new(models.join("model.onnx"));

        repository.store(b"first").unwrap();
        repository.store(b"second").unwrap();

        assert_eq!(fs::read(repository.path()).unwrap(), b"second");
        assert_eq!(entries(&models), vec![models.join("model.onnx")]);
    }

    #[test]
    fn concurrent_stores_leave_one_complete_file() {
        let dir = tempfile::tempdir().unwrap();
        let repository = ModelFileRepository::new(dir.path().join("model.onnx"));
        let a = vec![b'a'; 512 * 1024];
        let b = vec![b'b'; 512 * 1024];

        thread::scope(|scope| {
            for _ in 0..20 {
                scope.spawn(|| repository.store(&a).unwrap());
                scope.spawn(|| repository.store(&b).unwrap());
            }
        });

        let stored = fs::read(repository.path()).unwrap();
        assert!(stored == a || stored == b);
        assert_eq!(entries(dir.path()), vec![repository.path().to_path_buf()]);
    }
}
