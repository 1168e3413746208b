//! Requirements file discovery and loading.
//!
//! When a caller does not hand over requirements directly, a
//! `wp-requirements.json` document is searched for in a fixed priority
//! order and the first readable match is used.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::RequirementSpec;
use crate::error::{RequirementsError, Result};
use crate::plugin::{HostLayout, PluginIdentity};

/// File name searched for in every candidate directory.
pub const REQUIREMENTS_FILE: &str = "wp-requirements.json";

/// Directories searched for the requirements file, in priority order.
///
/// Search order:
/// 1. The directory the requirements helper ships in (optional)
/// 2. The plugin root directory
/// 3. The shared content directory
/// 4. The installation root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPaths {
    /// Directory the helper itself lives in, when the host knows it.
    pub source_dir: Option<PathBuf>,

    /// Directory containing the plugin main file.
    pub plugin_dir: PathBuf,

    /// Shared content directory.
    pub content_dir: PathBuf,

    /// Installation root.
    pub install_root: PathBuf,
}

impl SearchPaths {
    /// Build search paths for a plugin in a host layout.
    pub fn discover(identity: &PluginIdentity, layout: &HostLayout) -> Self {
        Self {
            source_dir: None,
            plugin_dir: identity.root_dir().to_path_buf(),
            content_dir: layout.content_dir.clone(),
            install_root: layout.install_root.clone(),
        }
    }

    /// Set the helper's own directory (searched first).
    pub fn with_source_dir(mut self, source_dir: impl Into<PathBuf>) -> Self {
        self.source_dir = Some(source_dir.into());
        self
    }

    /// Candidate file paths in search order.
    pub fn candidates(&self) -> Vec<PathBuf> {
        let mut dirs = Vec::new();

        if let Some(dir) = &self.source_dir {
            dirs.push(dir);
        }
        dirs.push(&self.plugin_dir);
        dirs.push(&self.content_dir);
        dirs.push(&self.install_root);

        dirs.into_iter().map(|d| d.join(REQUIREMENTS_FILE)).collect()
    }

    /// First candidate that is a readable regular file.
    pub fn find(&self) -> Option<PathBuf> {
        for path in self.candidates() {
            if path.is_file() && fs::File::open(&path).is_ok() {
                tracing::debug!("Found requirements file at {}", path.display());
                return Some(path);
            }
            tracing::debug!("No requirements file at {}", path.display());
        }
        None
    }
}

/// Resolves the requirement spec for a check.
#[derive(Debug, Clone)]
pub struct RequirementLoader {
    paths: SearchPaths,
}

impl RequirementLoader {
    /// Create a loader over the given search paths.
    pub fn new(paths: SearchPaths) -> Self {
        Self { paths }
    }

    /// The search paths this loader uses.
    pub fn paths(&self) -> &SearchPaths {
        &self.paths
    }

    /// Resolve requirements.
    ///
    /// A non-empty explicit spec is returned unchanged. Otherwise the first
    /// requirements file found is parsed. A missing, unreadable or malformed
    /// file yields an empty spec: no requirements is a valid configuration.
    pub fn load(&self, explicit: Option<RequirementSpec>) -> RequirementSpec {
        if let Some(spec) = explicit.filter(|s| !s.is_empty()) {
            tracing::debug!("Using explicitly provided requirements");
            return spec;
        }

        let Some(path) = self.paths.find() else {
            tracing::debug!("No {} found; nothing to validate", REQUIREMENTS_FILE);
            return RequirementSpec::default();
        };

        match fs::read_to_string(&path) {
            Ok(content) => RequirementSpec::from_json(&content),
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", path.display(), e);
                RequirementSpec::default()
            }
        }
    }
}

/// Load a requirements file the user named explicitly.
///
/// Unlike discovery, an explicitly named file that cannot be read or parsed
/// is an error.
///
/// # Errors
///
/// Returns `RequirementsFileError` if the file is unreadable or not valid JSON.
pub fn load_requirements_file(path: &Path) -> Result<RequirementSpec> {
    let content = fs::read_to_string(path).map_err(|e| RequirementsError::RequirementsFileError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let value: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| RequirementsError::RequirementsFileError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    Ok(RequirementSpec::from_value(value))
}
