//! Path validation for the file proxy
//!
//! Every browse/save request resolves through the sandbox before any I/O
//! happens. Paths are confined to the configured workspace root; deny-listed
//! entry names are refused everywhere.

use std::path::{Component, Path, PathBuf};

use crate::config::FilesConfig;
use crate::error::{HubError, HubResult};

#[derive(Debug, Clone)]
pub struct Sandbox {
    /// Canonicalized workspace root
    root: PathBuf,
    /// Entry names never listed or served
    deny: Vec<String>,
    max_file_size: u64,
}

fn expand_home(path: &str) -> HubResult<PathBuf> {
    if path == "~" || path.starts_with("~/") {
        let home = dirs::home_dir()
            .ok_or_else(|| HubError::Config("could not determine home directory".to_string()))?;
        if path == "~" {
            return Ok(home);
        }
        return Ok(home.join(&path[2..]));
    }
    Ok(PathBuf::from(path))
}

impl Sandbox {
    pub fn new(config: &FilesConfig) -> HubResult<Self> {
        let expanded = expand_home(&config.root)?;
        let root = expanded.canonicalize().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                HubError::Config(format!("files root does not exist: {}", expanded.display()))
            } else {
                HubError::Config(format!("files root {}: {}", expanded.display(), e))
            }
        })?;

        Ok(Self {
            root,
            deny: config.deny.clone(),
            max_file_size: config.max_file_size,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    pub fn is_denied_name(&self, name: &str) -> bool {
        self.deny.iter().any(|d| d == name)
    }

    /// Resolve a request path to an absolute path inside the root.
    ///
    /// Lexical only: `..` is folded away without touching the filesystem, so
    /// this also works for paths about to be created. Relative paths are
    /// taken relative to the root; an empty path means the root itself.
    pub fn resolve(&self, path: &str) -> HubResult<PathBuf> {
        if path.contains('\0') {
            return Err(HubError::InvalidPath("path contains null byte".to_string()));
        }

        let raw = Path::new(path);
        let joined = if raw.is_absolute() {
            raw.to_path_buf()
        } else {
            self.root.join(raw)
        };

        let mut resolved = PathBuf::new();
        for component in joined.components() {
            match component {
                Component::ParentDir => {
                    resolved.pop();
                }
                Component::CurDir => {}
                other => resolved.push(other),
            }
        }

        if !resolved.starts_with(&self.root) {
            return Err(HubError::AccessDenied(format!(
                "{} is outside the workspace root",
                path
            )));
        }
        self.check_deny(&resolved)?;

        Ok(resolved)
    }

    /// Resolve a path that must already exist, following symlinks.
    ///
    /// Canonicalization catches symlinks pointing out of the root that the
    /// lexical pass cannot see.
    pub fn resolve_existing(&self, path: &str) -> HubResult<PathBuf> {
        let resolved = self.resolve(path)?;
        let canonical = resolved.canonicalize().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                HubError::PathNotFound(path.to_string())
            } else {
                HubError::InvalidPath(format!("{}: {}", path, e))
            }
        })?;

        if !canonical.starts_with(&self.root) {
            return Err(HubError::AccessDenied(format!(
                "{} resolves outside the workspace root",
                path
            )));
        }
        self.check_deny(&canonical)?;

        Ok(canonical)
    }

    /// Render a resolved path relative to the root, for response bodies
    pub fn relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| path.display().to_string())
    }

    fn check_deny(&self, path: &Path) -> HubResult<()> {
        let inside = path.strip_prefix(&self.root).unwrap_or(path);
        for component in inside.components() {
            if let Component::Normal(name) = component {
                if self.is_denied_name(&name.to_string_lossy()) {
                    return Err(HubError::AccessDenied(format!(
                        "{} is deny-listed",
                        name.to_string_lossy()
                    )));
                }
            }
        }
        Ok(())
    }
}
