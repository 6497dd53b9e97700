use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Device-side mount point that staged paths are rooted at
pub const EXTERNAL_STORAGE: &str = "$EXTERNAL_STORAGE";

/// Resource-pack files are relocated to this flat top-level directory
const PAKS_DIR: &str = "paks";

const PAK_EXTENSION: &str = "pak";

/// One component of a device path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DevicePathComponent {
    /// Sentinel marking the path as rooted at the device's external storage
    ExternalStorageRoot,
    /// A directory or file name segment
    Segment(String),
}

/// An ordered, sentinel-rooted sequence of device path segments.
///
/// The first component is always [`DevicePathComponent::ExternalStorageRoot`];
/// no segment is empty and no segment equals the path separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevicePath {
    components: Vec<DevicePathComponent>,
}

impl DevicePath {
    /// Build a device path from file name segments, prefixing the root sentinel
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut components = vec![DevicePathComponent::ExternalStorageRoot];
        components.extend(
            segments
                .into_iter()
                .map(Into::into)
                .filter(|s| !s.is_empty() && s != "/")
                .map(DevicePathComponent::Segment),
        );
        Self { components }
    }

    pub fn components(&self) -> &[DevicePathComponent] {
        &self.components
    }

    /// Iterate over the segments following the root sentinel
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.components.iter().filter_map(|c| match c {
            DevicePathComponent::ExternalStorageRoot => None,
            DevicePathComponent::Segment(s) => Some(s.as_str()),
        })
    }

    /// Render the full on-device path, joined with the device separator
    pub fn device_string(&self) -> String {
        let mut out = String::from(EXTERNAL_STORAGE);
        for segment in self.segments() {
            out.push('/');
            out.push_str(segment);
        }
        out
    }
}

impl fmt::Display for DevicePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.device_string())
    }
}

/// Compute the device path components for a given host path.
///
/// Two classes of paths are handled specially:
/// - `.pak` files under the output directory map to the flat top-level
///   `paks/` directory regardless of their original nesting;
/// - anything else under the output directory is taken relative to the
///   output directory rather than the source root.
///
/// e.g. given `/src/out/Release/icu_fake_dir/icudtl.dat` this returns
/// `[ExternalStorageRoot, "icu_fake_dir", "icudtl.dat"]`.
///
/// Pure and deterministic; a host path outside both roots still yields a
/// best-effort relative path that may contain `..` segments.
pub fn device_path_components_for(
    host_path: &Path,
    output_directory: &Path,
    source_root: &Path,
) -> DevicePath {
    let rel_host_path = if host_path.starts_with(output_directory) {
        if host_path
            .extension()
            .is_some_and(|ext| ext == PAK_EXTENSION)
        {
            let base_name = host_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            return DevicePath::from_segments([PAKS_DIR.to_string(), base_name]);
        }
        relative_to(host_path, output_directory)
    } else {
        relative_to(host_path, source_root)
    };

    DevicePath::from_segments(rel_host_path.components().filter_map(|c| match c {
        Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
        Component::ParentDir => Some("..".to_string()),
        Component::CurDir | Component::RootDir | Component::Prefix(_) => None,
    }))
}

/// Lexically resolve `.` and `..` segments, like `os.path.abspath` minus the
/// cwd join. Never touches the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component> = Vec::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // ".." at the root stays at the root
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(Component::ParentDir),
            },
            c => out.push(c),
        }
    }
    out.into_iter().collect()
}

/// Compute `path` relative to `base` lexically, producing `..` traversal
/// segments when `base` is not a prefix of `path` (like `os.path.relpath`).
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let path_components: Vec<Component> = path.components().collect();
    let base_components: Vec<Component> = base.components().collect();

    let mut common = 0;
    while common < path_components.len()
        && common < base_components.len()
        && path_components[common] == base_components[common]
    {
        common += 1;
    }

    let mut rel = PathBuf::new();
    for _ in common..base_components.len() {
        rel.push("..");
    }
    for component in &path_components[common..] {
        rel.push(component.as_os_str());
    }
    if rel.as_os_str().is_empty() {
        rel.push(".");
    }
    rel
}
