//! Configuration template with embedded fallback
//!
//! - If CONFIG_FILE is NOT set: use the embedded template (no filesystem access)
//! - If CONFIG_FILE IS set and exists: read it from disk
//! - If CONFIG_FILE IS set but missing: fall back to the embedded template

use rust_embed::RustEmbed;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Embedded default config
#[derive(RustEmbed)]
#[folder = "."]
#[include = "config.yaml"]
struct EmbeddedConfig;

const CONFIG_NAME: &str = "config.yaml";

/// Where the active configuration comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Embedded,
}

/// Result of writing the template to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    Written(PathBuf),
    Skipped(PathBuf),
}

/// Loads config.yaml from an optional external path
pub struct AssetLoader {
    /// External config file path (from CONFIG_FILE env var)
    config_file: Option<PathBuf>,
}

impl AssetLoader {
    /// `config_file` should be `Some` only if CONFIG_FILE was set.
    pub fn new(config_file: Option<PathBuf>) -> Self {
        Self { config_file }
    }

    pub fn config_source(&self) -> ConfigSource {
        match &self.config_file {
            Some(path) if path.exists() => ConfigSource::File(path.clone()),
            _ => ConfigSource::Embedded,
        }
    }

    /// Read the configuration as a UTF-8 string
    pub fn read_config_string(&self) -> io::Result<String> {
        if let ConfigSource::File(path) = self.config_source() {
            tracing::trace!(path = %path.display(), "Loading config from filesystem");
            return fs::read_to_string(&path);
        }

        tracing::trace!("Loading config from embedded assets");
        let bytes = Self::embedded_template()?;
        String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Write the embedded template to the configured path, or `config.yaml`
    /// in the working directory.
    pub fn init(&self, force: bool) -> io::Result<InitOutcome> {
        let target = self
            .config_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(CONFIG_NAME));

        if target.exists() && !force {
            return Ok(InitOutcome::Skipped(target));
        }

        write_file(&target, &Self::embedded_template()?)?;
        tracing::info!(path = %target.display(), "Wrote config template");
        Ok(InitOutcome::Written(target))
    }

    fn embedded_template() -> io::Result<Vec<u8>> {
        EmbeddedConfig::get(CONFIG_NAME)
            .map(|f| f.data.into_owned())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Embedded config not found"))
    }
}

fn write_file(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, data)
}
