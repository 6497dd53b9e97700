use crate::core::{Config, ErrorContext, Result};
use crate::processing::device_path::{DevicePath, device_path_components_for, normalize};
use crate::processing::exclusions::ExclusionSet;
use std::path::{Path, PathBuf};

/// One artifact that must be pushed to the device before a test runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEntry {
    /// Absolute path to the artifact on the build host
    pub host_path: PathBuf,
    /// Where the artifact lands on the device
    pub device_path: DevicePath,
}

/// Resolve manifest entries to absolute host paths, drop excluded ones and
/// map the survivors to device paths.
///
/// Pure: no filesystem access. Entries are joined against the output
/// directory and lexically normalized, so `../..`-style manifest lines
/// resolve into the source tree. Output order follows input order.
pub fn filter_and_map(
    rel_paths: &[String],
    output_directory: &Path,
    source_root: &Path,
    rules: &ExclusionSet,
) -> Vec<DependencyEntry> {
    rel_paths
        .iter()
        .map(|rel| normalize(&output_directory.join(rel)))
        .filter(|host_path| !rules.is_excluded(&host_path.to_string_lossy()))
        .map(|host_path| {
            let device_path = device_path_components_for(&host_path, output_directory, source_root);
            DependencyEntry {
                host_path,
                device_path,
            }
        })
        .collect()
}

/// Read a runtime-deps manifest and return the device data dependencies.
///
/// A missing manifest path is not an error and yields an empty list; an
/// unreadable manifest propagates as an I/O error.
pub async fn data_dependencies(
    manifest_path: Option<&Path>,
    config: &Config,
    rules: &ExclusionSet,
) -> Result<Vec<DependencyEntry>> {
    let Some(manifest_path) = manifest_path else {
        return Ok(Vec::new());
    };

    let content = tokio::fs::read_to_string(manifest_path)
        .await
        .context_io(format!(
            "Failed to read manifest: {}",
            manifest_path.display()
        ))?;

    let rel_paths: Vec<String> = content
        .lines()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();

    Ok(filter_and_map(
        &rel_paths,
        &config.output_directory,
        &config.source_root,
        rules,
    ))
}
