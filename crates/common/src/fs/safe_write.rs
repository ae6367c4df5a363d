use anyhow::{bail, Context, Result};
use path_clean::PathClean;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Replace the whole file via a sibling temp file and a rename.
    Replace,
    Append,
}

/// Writes files confined to a single base directory.
pub struct SafeFileWriter {
    base_dir: PathBuf,
}

impl SafeFileWriter {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf().clean(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn validate_path(&self, path: &Path) -> Result<()> {
        if path
            .components()
            .any(|component| matches!(component, Component::ParentDir))
        {
            bail!(
                "path '{}' contains parent directory traversal",
                path.display()
            );
        }

        if !path.clean().starts_with(&self.base_dir) {
            bail!(
                "path '{}' is outside of '{}'",
                path.display(),
                self.base_dir.display()
            );
        }

        Ok(())
    }

    pub fn write(&self, path: &Path, content: &[u8], mode: WriteMode) -> Result<()> {
        self.validate_path(path)?;

        let parent = path
            .parent()
            .with_context(|| format!("'{}' has no parent directory", path.display()))?;
        if !parent.exists() {
            fs::create_dir_all(parent).with_context(|| {
                format!(
                    "failed to create parent directories for '{}'",
                    parent.display()
                )
            })?;
        }

        match mode {
            WriteMode::Replace => {
                // Temp file must share the target's filesystem for the rename to be atomic.
                let mut tmp = NamedTempFile::new_in(parent).with_context(|| {
                    format!("failed to create temp file in '{}'", parent.display())
                })?;
                tmp.write_all(content)
                    .with_context(|| format!("failed to write temp file for '{}'", path.display()))?;
                tmp.as_file()
                    .sync_all()
                    .with_context(|| format!("failed to sync temp file for '{}'", path.display()))?;
                tmp.persist(path)
                    .map_err(|err| err.error)
                    .with_context(|| format!("failed to replace '{}'", path.display()))?;
            }
            WriteMode::Append => {
                let mut file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("failed to open '{}' for append", path.display()))?;

                file.write_all(content)
                    .with_context(|| format!("failed to append data into '{}'", path.display()))?;
            }
        }

        Ok(())
    }

    pub fn write_text(&self, path: &Path, content: &str, mode: WriteMode) -> Result<()> {
        self.write(path, content.as_bytes(), mode)
    }
}
