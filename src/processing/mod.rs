pub mod deps;
pub mod device_path;
pub mod exclusions;

pub use deps::{DependencyEntry, data_dependencies, filter_and_map};
pub use device_path::{DevicePath, DevicePathComponent, device_path_components_for};
pub use exclusions::{ExclusionRule, ExclusionSet};
