use crate::core::{Result, StageError};
use std::env;
use std::path::PathBuf;

/// Configuration for the staging tool
#[derive(Debug, Clone)]
pub struct Config {
    /// Absolute path to the build output directory
    pub output_directory: PathBuf,
    /// Absolute path to the source tree root
    pub source_root: PathBuf,
    /// Whether to show progress during operations
    pub show_progress: bool,
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

#[derive(Default)]
pub struct ConfigBuilder {
    output_directory: Option<String>,
    source_root: Option<String>,
    show_progress: bool,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output_directory(mut self, path: Option<&str>, try_env: bool) -> Self {
        if let Some(p) = path {
            if !p.trim().is_empty() {
                self.output_directory = Some(p.to_string());
                return self;
            }
        }
        if try_env {
            if let Ok(env_path) = env::var("DEVSTAGE_OUTPUT_DIR") {
                self.output_directory = Some(env_path.trim().to_string());
            }
        }
        self
    }

    pub fn source_root(mut self, path: Option<&str>, try_env: bool) -> Self {
        if let Some(p) = path {
            if !p.trim().is_empty() {
                self.source_root = Some(p.to_string());
                return self;
            }
        }
        if try_env {
            if let Ok(env_path) = env::var("DEVSTAGE_SOURCE_ROOT") {
                self.source_root = Some(env_path.trim().to_string());
            }
        }
        self
    }

    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn build(self) -> Result<Config> {
        let output_directory = self
            .output_directory
            .ok_or_else(|| StageError::config("Output directory must be set"))?
            .trim()
            .to_string();
        if output_directory.is_empty() {
            return Err(StageError::config("Output directory cannot be empty"));
        }

        let source_root = self
            .source_root
            .ok_or_else(|| StageError::config("Source root must be set"))?
            .trim()
            .to_string();
        if source_root.is_empty() {
            return Err(StageError::config("Source root cannot be empty"));
        }

        Ok(Config {
            output_directory: PathBuf::from(output_directory),
            source_root: PathBuf::from(source_root),
            show_progress: self.show_progress,
        })
    }
}
