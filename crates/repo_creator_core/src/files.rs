//! Initial repository content.
//!
//! A [`FileSet`] maps relative paths to file contents. It is either loaded from a JSON
//! object (`{"README.md": "...", "src/main.py": "..."}`) or built from the default README
//! and `.gitignore`, then written into the local directory that gets pushed.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};
use walkdir::WalkDir;

use crate::{RepoCreatorResult, RepositoryName, SystemError, ValidationError};

#[cfg(test)]
#[path = "files_tests.rs"]
mod tests;

/// Description used in the default README when none is given.
const DEFAULT_README_DESCRIPTION: &str = "A new repository";

const DEFAULT_GITIGNORE: &str = "\
# Python
__pycache__/
*.py[cod]
*$py.class
*.so
.Python
build/
develop-eggs/
dist/
downloads/
eggs/
.eggs/
lib/
lib64/
parts/
sdist/
var/
wheels/
*.egg-info/
.installed.cfg
*.egg

# Virtual environments
.env
.venv
env/
venv/
ENV/
env.bak/
venv.bak/

# IDE
.vscode/
.idea/
*.swp
*.swo
*~

# OS
.DS_Store
Thumbs.db
";

/// Files to create in a new repository, keyed by relative path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileSet {
    files: BTreeMap<String, String>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the default content: a README titled with the repository name and a
    /// `.gitignore` for Python projects.
    pub fn default_for(name: &RepositoryName, description: &str) -> Self {
        let description = if description.trim().is_empty() {
            DEFAULT_README_DESCRIPTION
        } else {
            description
        };

        let mut files = Self::new();
        files.insert("README.md", format!("# {}\n\n{}\n", name, description));
        files.insert(".gitignore", DEFAULT_GITIGNORE);
        files
    }

    /// Reads a JSON object of `path -> content` pairs.
    ///
    /// # Errors
    ///
    /// Returns `SystemError::PathNotFound` if the file does not exist,
    /// `SystemError::Parse` if it is not a JSON object of strings, and a
    /// `ValidationError` if any path is absolute or escapes the target directory.
    pub fn load_json(path: &Path) -> RepoCreatorResult<Self> {
        if !path.exists() {
            return Err(SystemError::PathNotFound {
                path: path.display().to_string(),
            }
            .into());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            error!("Failed to read file map {:?}: {}", path, e);
            SystemError::io(path, &e)
        })?;

        let files: Self = serde_json::from_str(&content).map_err(|e| SystemError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        for relative in files.files.keys() {
            validate_relative_path(relative)?;
        }

        debug!(count = files.len(), "Loaded file map from {:?}", path);
        Ok(files)
    }

    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Writes every file below `dir`, creating `dir` and any parent directories.
    ///
    /// Existing files with the same path are overwritten. Returns the paths written.
    pub fn write_to(&self, dir: &Path) -> RepoCreatorResult<Vec<PathBuf>> {
        fs::create_dir_all(dir).map_err(|e| SystemError::io(dir, &e))?;

        let mut written = Vec::with_capacity(self.files.len());
        for (relative, content) in &self.files {
            let target = dir.join(validate_relative_path(relative)?);

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| SystemError::io(parent, &e))?;
            }

            fs::write(&target, content).map_err(|e| {
                error!("Failed to write {:?}: {}", target, e);
                SystemError::io(&target, &e)
            })?;

            info!("Created file: {}", relative);
            written.push(target);
        }

        Ok(written)
    }
}

/// Counts the regular files below `dir`, ignoring the `.git` directory.
pub fn count_files(dir: &Path) -> RepoCreatorResult<usize> {
    let mut count = 0;
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| e.file_name() != ".git")
    {
        let entry = entry.map_err(|e| SystemError::Io {
            path: dir.display().to_string(),
            reason: e.to_string(),
        })?;
        if entry.file_type().is_file() {
            count += 1;
        }
    }
    Ok(count)
}

fn validate_relative_path(relative: &str) -> Result<&Path, ValidationError> {
    if relative.trim().is_empty() {
        return Err(ValidationError::empty_field("file path"));
    }

    let path = Path::new(relative);
    for component in path.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => {
                return Err(ValidationError::invalid_format(
                    "file path",
                    format!("'{}' must not contain '..'", relative),
                ))
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(ValidationError::invalid_format(
                    "file path",
                    format!("'{}' must be relative", relative),
                ))
            }
        }
    }

    Ok(path)
}
