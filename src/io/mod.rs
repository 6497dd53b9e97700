pub mod input;

pub use input::{InputReader, ManifestReader, StdinReader, VecReader};
