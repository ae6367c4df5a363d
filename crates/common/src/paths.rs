//! Project-local runtime data layout.
//!
//! Every skill keeps its mutable state under
//! `<project_root>/.skills-data/<skill>/`:
//!
//! ```text
//! .env            configuration (tokens, preferences, mail settings)
//! data/           persistent data (seen-tools.jsonl, search-results/, ...)
//! cache/          safe to delete
//! logs/           log files
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use path_clean::PathClean;

use crate::config::ENV_TEMPLATE;

pub const DEFAULT_SKILL_NAME: &str = "idea2mvp";
pub const SKILLS_DATA_DIR: &str = ".skills-data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimePaths {
    skill_name: String,
    project_root: PathBuf,
    skill_dir: PathBuf,
}

impl RuntimePaths {
    pub fn for_project(project_root: impl AsRef<Path>, skill_name: &str) -> Self {
        let project_root = project_root.as_ref().to_path_buf().clean();
        let skill_dir = project_root.join(SKILLS_DATA_DIR).join(skill_name);
        Self {
            skill_name: skill_name.to_string(),
            project_root,
            skill_dir,
        }
    }

    /// Layout rooted at the current working directory.
    pub fn from_current_dir(skill_name: &str) -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to resolve current directory")?;
        Ok(Self::for_project(cwd, skill_name))
    }

    pub fn skill_name(&self) -> &str {
        &self.skill_name
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn skill_dir(&self) -> &Path {
        &self.skill_dir
    }

    pub fn data_dir(&self) -> PathBuf {
        self.skill_dir.join("data")
    }

    pub fn search_results_dir(&self) -> PathBuf {
        self.data_dir().join("search-results")
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.skill_dir.join("cache")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.skill_dir.join("logs")
    }

    pub fn env_file(&self) -> PathBuf {
        self.skill_dir.join(".env")
    }

    /// Creates the whole directory tree. Safe to call repeatedly.
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [
            self.skill_dir.clone(),
            self.data_dir(),
            self.search_results_dir(),
            self.cache_dir(),
            self.logs_dir(),
        ] {
            fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create directory '{}'", dir.display()))?;
        }
        Ok(())
    }

    /// Writes the `.env` template when no config file exists yet.
    ///
    /// Returns `true` when the file was created by this call.
    pub fn ensure_env_file(&self) -> Result<bool> {
        self.ensure_dirs()?;
        let env_file = self.env_file();
        if env_file.exists() {
            return Ok(false);
        }
        fs::write(&env_file, ENV_TEMPLATE)
            .with_context(|| format!("failed to write config template '{}'", env_file.display()))?;
        tracing::info!(path = %env_file.display(), "created config template");
        Ok(true)
    }
}
