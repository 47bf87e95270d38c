//! Runtime directory layout created during bootstrap.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::debug;

pub const DATA_DIR: &str = "/var/lib/firecracker";
pub const MANIFEST_DIR: &str = "/etc/firecracker/manifests";

/// All directories ignited writes into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimePaths {
    pub data_dir: PathBuf,
    pub vm_dir: PathBuf,
    pub image_dir: PathBuf,
    pub kernel_dir: PathBuf,
    pub manifest_dir: PathBuf,
}

impl RuntimePaths {
    pub fn new(data_dir: impl Into<PathBuf>, manifest_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            vm_dir: data_dir.join("vm"),
            image_dir: data_dir.join("image"),
            kernel_dir: data_dir.join("kernel"),
            data_dir,
            manifest_dir: manifest_dir.into(),
        }
    }

    /// Directories in creation order (parents first).
    pub fn all(&self) -> [&Path; 5] {
        [
            &self.data_dir,
            &self.vm_dir,
            &self.image_dir,
            &self.kernel_dir,
            &self.manifest_dir,
        ]
    }
}

impl Default for RuntimePaths {
    fn default() -> Self {
        Self::new(DATA_DIR, MANIFEST_DIR)
    }
}

/// Create every runtime directory that does not exist yet.
///
/// Idempotent. Fails if a path exists but is not a directory.
pub fn ensure_directories(paths: &RuntimePaths) -> Result<()> {
    for dir in paths.all() {
        if dir.exists() && !dir.is_dir() {
            return Err(anyhow!("{} exists but is not a directory", dir.display()));
        }
        create_dir(dir)?;
        debug!(dir = %dir.display(), "runtime directory ready");
    }
    Ok(())
}

#[cfg(unix)]
fn create_dir(path: &Path) -> Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new()
        .recursive(true)
        .mode(0o755)
        .create(path)
        .with_context(|| format!("create directory {}", path.display()))
}

#[cfg(not(unix))]
fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).with_context(|| format!("create directory {}", path.display()))
}
