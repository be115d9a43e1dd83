//! File proxy operations
//!
//! Backs the `/api/files/*` endpoints: a bounded-depth tree listing plus
//! sandboxed read and save. All filesystem access goes through [`Sandbox`].

pub mod sandbox;

pub use sandbox::Sandbox;

use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::{HubError, HubResult};

/// A node in the file tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileNode {
    pub name: String,
    /// Path relative to the workspace root
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
    /// Present for directories listed within the depth budget
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FileNode>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileContent {
    pub path: String,
    pub content: String,
    pub size: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveResult {
    pub path: String,
    pub bytes_written: u64,
}

async fn file_node(sandbox: &Sandbox, path: &Path) -> HubResult<FileNode> {
    let metadata = fs::metadata(path).await?;
    let modified: Option<DateTime<Utc>> = metadata.modified().ok().map(|t| t.into());

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| ".".to_string());

    Ok(FileNode {
        name,
        path: sandbox.relative(path),
        kind: if metadata.is_dir() {
            "directory".to_string()
        } else {
            "file".to_string()
        },
        size: if metadata.is_file() {
            Some(metadata.len())
        } else {
            None
        },
        modified,
        children: None,
    })
}

fn walk(sandbox: &Sandbox, dir: PathBuf, depth: usize) -> BoxFuture<'_, HubResult<Vec<FileNode>>> {
    Box::pin(async move {
        let mut nodes = Vec::new();
        let mut entries = fs::read_dir(&dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            if sandbox.is_denied_name(&name) {
                continue;
            }

            let path = entry.path();
            let mut node = file_node(sandbox, &path).await?;
            if node.kind == "directory" && depth > 1 {
                node.children = Some(walk(sandbox, path, depth - 1).await?);
            }
            nodes.push(node);
        }

        // Directories first, then by name
        nodes.sort_by(|a, b| {
            let a_dir = a.kind == "directory";
            let b_dir = b.kind == "directory";
            b_dir.cmp(&a_dir).then_with(|| a.name.cmp(&b.name))
        });

        Ok(nodes)
    })
}

/// Recursive listing rooted at `path` (the workspace root when absent),
/// descending at most `depth` levels
pub async fn tree(sandbox: &Sandbox, path: Option<&str>, depth: usize) -> HubResult<FileNode> {
    let target = sandbox.resolve_existing(path.unwrap_or(""))?;
    let mut node = file_node(sandbox, &target).await?;

    if node.kind == "directory" && depth > 0 {
        node.children = Some(walk(sandbox, target, depth).await?);
    }

    Ok(node)
}

/// Read a UTF-8 file
pub async fn content(sandbox: &Sandbox, path: &str) -> HubResult<FileContent> {
    let canonical = sandbox.resolve_existing(path)?;
    let metadata = fs::metadata(&canonical).await?;

    if metadata.is_dir() {
        return Err(HubError::InvalidRequest(format!(
            "{} is a directory",
            path
        )));
    }
    if metadata.len() > sandbox.max_file_size() {
        return Err(HubError::FileTooLarge {
            size: metadata.len(),
            max: sandbox.max_file_size(),
        });
    }

    let content = fs::read_to_string(&canonical).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::InvalidData {
            HubError::InvalidRequest(format!("{} is not valid UTF-8", path))
        } else {
            HubError::Io(e)
        }
    })?;

    Ok(FileContent {
        path: sandbox.relative(&canonical),
        content,
        size: metadata.len(),
    })
}

/// Write a file, creating parent directories inside the root
pub async fn save(sandbox: &Sandbox, path: &str, content: &str) -> HubResult<SaveResult> {
    if path.trim().is_empty() {
        return Err(HubError::InvalidRequest("path is required".to_string()));
    }

    let resolved = sandbox.resolve(path)?;
    if content.len() as u64 > sandbox.max_file_size() {
        return Err(HubError::FileTooLarge {
            size: content.len() as u64,
            max: sandbox.max_file_size(),
        });
    }

    if let Some(parent) = resolved.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(&resolved, content).await?;

    Ok(SaveResult {
        path: sandbox.relative(&resolved),
        bytes_written: content.len() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilesConfig;

    fn sandbox_in(root: &Path) -> Sandbox {
        Sandbox::new(&FilesConfig {
            root: root.display().to_string(),
            max_file_size: 64,
            ..FilesConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn save_then_read_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let sandbox = sandbox_in(dir.path());

        let saved = save(&sandbox, "notes/today.md", "# hello").await.unwrap();
        assert_eq!(saved.path, "notes/today.md");
        assert_eq!(saved.bytes_written, 7);

        let read = content(&sandbox, "notes/today.md").await.unwrap();
        assert_eq!(read.content, "# hello");
        assert_eq!(read.size, 7);
    }

    #[tokio::test]
    async fn save_rejects_oversized_content() {
        let dir = tempfile::tempdir().unwrap();
        let sandbox = sandbox_in(dir.path());

        let big = "x".repeat(65);
        let err = save(&sandbox, "big.txt", &big).await.unwrap_err();
        assert!(matches!(err, HubError::FileTooLarge { .. }));
    }

    #[tokio::test]
    async fn content_rejects_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let sandbox = sandbox_in(dir.path());

        let err = content(&sandbox, "sub").await.unwrap_err();
        assert!(matches!(err, HubError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn tree_lists_directories_first_and_skips_denied() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("src")).unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();
        std::fs::write(dir.path().join("src/lib.rs"), "pub fn f() {}").unwrap();
        let sandbox = sandbox_in(dir.path());

        let root = tree(&sandbox, None, 4).await.unwrap();
        assert_eq!(root.kind, "directory");

        let children = root.children.unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].name, "src");
        assert_eq!(children[1].name, "a.txt");
        assert!(children.iter().all(|c| c.name != ".git"));

        let src_children = children[0].children.as_ref().unwrap();
        assert_eq!(src_children[0].name, "lib.rs");
        assert_eq!(src_children[0].path, "src/lib.rs");
    }

    #[tokio::test]
    async fn tree_depth_is_bounded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("a/b/c")).unwrap();
        let sandbox = sandbox_in(dir.path());

        let root = tree(&sandbox, None, 1).await.unwrap();
        let children = root.children.unwrap();
        assert_eq!(children[0].name, "a");
        // Depth 1 stops before descending into `a`
        assert!(children[0].children.is_none());
    }

    #[tokio::test]
    async fn tree_of_single_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("one.txt"), "1").unwrap();
        let sandbox = sandbox_in(dir.path());

        let node = tree(&sandbox, Some("one.txt"), 4).await.unwrap();
        assert_eq!(node.kind, "file");
        assert_eq!(node.size, Some(1));
        assert!(node.children.is_none());
    }
}
