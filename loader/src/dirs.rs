//! Directory resolution abstraction for platform-specific paths.

use std::path::PathBuf;

use directories_next::ProjectDirs;

/// Application name used for platform directories.
const APPLICATION: &str = "battledata";

/// Platform directories the loader persists state under.
pub trait BaseDirs {
    /// Per-user configuration directory for battledata.
    fn config_dir(&self) -> Option<PathBuf>;
}

/// [`BaseDirs`] backed by `directories-next`.
#[derive(Debug, Clone)]
pub struct SystemBaseDirs {
    project: Option<ProjectDirs>,
}

impl SystemBaseDirs {
    /// Resolve the platform directories for the current user.
    #[must_use]
    pub fn new() -> Self {
        Self {
            project: ProjectDirs::from("", "", APPLICATION),
        }
    }
}

impl Default for SystemBaseDirs {
    fn default() -> Self {
        Self::new()
    }
}

impl BaseDirs for SystemBaseDirs {
    fn config_dir(&self) -> Option<PathBuf> {
        self.project
            .as_ref()
            .map(|project| project.config_dir().to_path_buf())
    }
}
