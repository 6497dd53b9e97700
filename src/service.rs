use crate::core::{Config, Result};
use crate::io::InputReader;
use crate::processing::device_path::{normalize, relative_to};
use crate::processing::exclusions::ExclusionSet;
use crate::processing::{DependencyEntry, filter_and_map};
use std::collections::HashSet;
use std::sync::OnceLock;
use walkdir::WalkDir;

/// Main staging service that turns a runtime-deps manifest into the list of
/// (host path, device path) pairs for the downstream push mechanism
pub struct StagingService {
    reader: Box<dyn InputReader>,
    config: Config,
    rules: ExclusionSet,
    /// Expand manifest entries that name directories into their files
    expand_dirs: bool,
    /// Cached result to avoid recomputation on reuse
    entries: OnceLock<Vec<DependencyEntry>>,
}

impl StagingService {
    pub fn new(reader: Box<dyn InputReader>, config: Config, rules: ExclusionSet) -> Self {
        Self {
            reader,
            config,
            rules,
            expand_dirs: false,
            entries: OnceLock::new(),
        }
    }

    pub fn expand_dirs(mut self, expand: bool) -> Self {
        self.expand_dirs = expand;
        self
    }

    /// Get the computed dependency entries (cached after the first call)
    pub async fn entries(&self) -> Result<Vec<DependencyEntry>> {
        if let Some(cached) = self.entries.get() {
            return Ok(cached.clone());
        }

        let rel_paths = self.reader.read_paths().await?;
        let entries = self.process_entries(rel_paths).await?;

        let _ = self.entries.set(entries.clone());
        Ok(entries)
    }

    async fn process_entries(&self, rel_paths: Vec<String>) -> Result<Vec<DependencyEntry>> {
        if rel_paths.is_empty() {
            return Ok(Vec::new());
        }

        if self.config.show_progress {
            println!("Processing {} manifest entries...", rel_paths.len());
        }

        let rel_paths = if self.expand_dirs {
            let before = rel_paths.len();
            let expanded = self.expand_directory_entries(rel_paths).await?;
            if self.config.show_progress && expanded.len() != before {
                println!(
                    "📁 Expanded {} entries to {} individual files.",
                    before,
                    expanded.len()
                );
            }
            expanded
        } else {
            rel_paths
        };

        let total = rel_paths.len();
        let entries = filter_and_map(
            &rel_paths,
            &self.config.output_directory,
            &self.config.source_root,
            &self.rules,
        );

        let excluded_count = total - entries.len();
        if excluded_count > 0 && self.config.show_progress {
            println!(
                "🚫 Excluded {} files matching exclusion rules.",
                excluded_count
            );
        }

        Ok(entries)
    }

    /// Replace manifest entries that resolve to directories with the files
    /// they contain, recursively, deduplicating while preserving order.
    async fn expand_directory_entries(&self, rel_paths: Vec<String>) -> Result<Vec<String>> {
        let mut expanded = Vec::new();
        let mut seen = HashSet::new();

        for rel in rel_paths {
            let host_path = normalize(&self.config.output_directory.join(&rel));

            let is_dir = tokio::fs::metadata(&host_path)
                .await
                .map(|m| m.is_dir())
                .unwrap_or(false);

            if !is_dir {
                if seen.insert(rel.clone()) {
                    expanded.push(rel);
                }
                continue;
            }

            for entry in WalkDir::new(&host_path).sort_by_file_name() {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        eprintln!("Warning: Failed to read directory entry: {}", e);
                        continue;
                    }
                };

                if !entry.file_type().is_file() {
                    continue;
                }

                let rel_file = relative_to(entry.path(), &self.config.output_directory)
                    .to_string_lossy()
                    .into_owned();
                if seen.insert(rel_file.clone()) {
                    expanded.push(rel_file);
                }
            }
        }

        Ok(expanded)
    }

    /// Run the complete staging computation and print the mapping
    pub async fn run(&self) -> Result<()> {
        if self.config.show_progress {
            println!("Reading runtime dependencies...");
        }

        let entries = self.entries().await?;

        if entries.is_empty() {
            eprintln!("No dependencies to stage.");
            return Ok(());
        }

        if self.config.show_progress {
            println!("Found {} dependencies to stage.", entries.len());
        }

        for entry in &entries {
            println!("{} -> {}", entry.host_path.display(), entry.device_path);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::VecReader;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn config(output_directory: &str, source_root: &str) -> Config {
        Config::builder()
            .output_directory(Some(output_directory), false)
            .source_root(Some(source_root), false)
            .show_progress(false)
            .build()
            .unwrap()
    }

    fn rules() -> ExclusionSet {
        ExclusionSet::device_defaults().unwrap()
    }

    #[tokio::test]
    async fn test_service_maps_and_filters() {
        let reader = Box::new(VecReader::new(vec![
            "resources.pak".to_string(),
            "foo/OWNERS".to_string(),
            "icu_fake_dir/icudtl.dat".to_string(),
        ]));
        let service = StagingService::new(reader, config("/src/out/Release", "/src"), rules());

        let entries = service.entries().await.unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0].device_path.device_string(),
            "$EXTERNAL_STORAGE/paks/resources.pak"
        );
        assert_eq!(
            entries[1].device_path.device_string(),
            "$EXTERNAL_STORAGE/icu_fake_dir/icudtl.dat"
        );
    }

    #[tokio::test]
    async fn test_service_with_empty_input() {
        let reader = Box::new(VecReader::new(vec![]));
        let service = StagingService::new(reader, config("/src/out/Release", "/src"), rules());

        let entries = service.entries().await.unwrap();
        assert!(entries.is_empty());

        // run() handles the empty case gracefully
        assert!(service.run().await.is_ok());
    }

    #[tokio::test]
    async fn test_service_caches_entries() {
        let reader = Box::new(VecReader::new(vec!["data.json".to_string()]));
        let service = StagingService::new(reader, config("/src/out/Release", "/src"), rules());

        let first = service.entries().await.unwrap();
        let second = service.entries().await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_expand_directory_entries() {
        // Build a fake output directory containing a data dir to expand
        let temp_dir = TempDir::new().unwrap();
        let out_dir = temp_dir.path().join("out");
        let data_dir = out_dir.join("test_data");
        fs::create_dir_all(data_dir.join("sub")).unwrap();
        fs::write(data_dir.join("a.txt"), "a").unwrap();
        fs::write(data_dir.join("sub/b.txt"), "b").unwrap();
        fs::write(out_dir.join("single.dat"), "s").unwrap();

        let reader = Box::new(VecReader::new(vec![
            "test_data".to_string(),
            "single.dat".to_string(),
        ]));
        let service = StagingService::new(
            reader,
            config(
                &out_dir.to_string_lossy(),
                &temp_dir.path().to_string_lossy(),
            ),
            rules(),
        )
        .expand_dirs(true);

        let entries = service.entries().await.unwrap();

        let host_paths: Vec<PathBuf> = entries.iter().map(|e| e.host_path.clone()).collect();
        assert_eq!(entries.len(), 3);
        assert!(host_paths.contains(&data_dir.join("a.txt")));
        assert!(host_paths.contains(&data_dir.join("sub/b.txt")));
        assert!(host_paths.contains(&out_dir.join("single.dat")));
        // Directory contents come before later manifest entries
        assert_eq!(host_paths[2], out_dir.join("single.dat"));
    }

    #[tokio::test]
    async fn test_expansion_leaves_missing_entries_alone() {
        let temp_dir = TempDir::new().unwrap();
        let out_dir = temp_dir.path().join("out");
        fs::create_dir_all(&out_dir).unwrap();

        let reader = Box::new(VecReader::new(vec!["missing/file.dat".to_string()]));
        let service = StagingService::new(
            reader,
            config(
                &out_dir.to_string_lossy(),
                &temp_dir.path().to_string_lossy(),
            ),
            rules(),
        )
        .expand_dirs(true);

        // Mapping is lexical; a nonexistent entry still maps
        let entries = service.entries().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].host_path, out_dir.join("missing/file.dat"));
    }
}
