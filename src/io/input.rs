use crate::core::{ErrorContext, Result};
use async_trait::async_trait;
use std::io::{self, BufRead};
use std::path::PathBuf;

/// Trait for reading runtime dependency paths
#[async_trait]
pub trait InputReader: Send + Sync {
    /// Read host-relative paths from the input source
    async fn read_paths(&self) -> Result<Vec<String>>;
}

/// Reader that reads from standard input
pub struct StdinReader;

impl StdinReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StdinReader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InputReader for StdinReader {
    async fn read_paths(&self) -> Result<Vec<String>> {
        let stdin = io::stdin();
        let mut paths = Vec::new();

        for line in stdin.lock().lines() {
            let line = line.context_io("Failed to read line from stdin")?;
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                paths.push(trimmed.to_string());
            }
        }

        Ok(paths)
    }
}

/// Reader that reads a runtime-deps manifest file
pub struct ManifestReader {
    manifest_path: PathBuf,
}

impl ManifestReader {
    pub fn new(manifest_path: impl Into<PathBuf>) -> Self {
        Self {
            manifest_path: manifest_path.into(),
        }
    }
}

#[async_trait]
impl InputReader for ManifestReader {
    async fn read_paths(&self) -> Result<Vec<String>> {
        let content = tokio::fs::read_to_string(&self.manifest_path)
            .await
            .context_io(format!(
                "Failed to read manifest: {}",
                self.manifest_path.display()
            ))?;

        let paths = content
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();

        Ok(paths)
    }
}

/// Reader that takes paths from a vector (useful for testing)
pub struct VecReader {
    paths: Vec<String>,
}

impl VecReader {
    pub fn new(paths: Vec<String>) -> Self {
        Self { paths }
    }
}

#[async_trait]
impl InputReader for VecReader {
    async fn read_paths(&self) -> Result<Vec<String>> {
        Ok(self.paths.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_manifest_reader() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "resources.pak").unwrap();
        writeln!(temp_file, "icu_fake_dir/icudtl.dat").unwrap();
        writeln!(temp_file, "").unwrap(); // Empty line should be filtered
        writeln!(temp_file, "  ../../chrome/test/data/foo.html  ").unwrap(); // Should be trimmed

        let reader = ManifestReader::new(temp_file.path());
        let paths = reader.read_paths().await.unwrap();

        assert_eq!(paths.len(), 3);
        assert_eq!(paths[0], "resources.pak");
        assert_eq!(paths[1], "icu_fake_dir/icudtl.dat");
        assert_eq!(paths[2], "../../chrome/test/data/foo.html");
    }

    #[tokio::test]
    async fn test_manifest_reader_missing_file() {
        let reader = ManifestReader::new("/path/that/does/not/exist.runtime_deps");
        let result = reader.read_paths().await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_vec_reader() {
        let input_paths = vec![
            "gen/foo/bar.json".to_string(),
            "locales/en-US.pak".to_string(),
        ];

        let reader = VecReader::new(input_paths.clone());
        let paths = reader.read_paths().await.unwrap();

        assert_eq!(paths, input_paths);
    }
}
