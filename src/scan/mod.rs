//! Variant presence scan.
//!
//! Reports which variant files actually exist under the resource root, per
//! group, either for one id (a stat per folder) or for the whole tree (a
//! walk per folder). Used by tooling to audit a package's variant
//! coverage; the resolver itself never calls this.

use std::path::Path;

use serde::Serialize;
use walkdir::WalkDir;

use resvar_descriptor::{ResourceType, VariantIndex};

/// Scan errors
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Presence of one id in one folder.
#[derive(Debug, Clone, Serialize)]
pub struct FolderPresence {
    /// Folder relative to the resource root
    pub folder: String,

    /// Whether `root/folder/id` exists
    pub present: bool,
}

/// Presence of one id across a group's folders.
#[derive(Debug, Clone, Serialize)]
pub struct GroupPresence {
    /// Resource class
    pub resource_type: ResourceType,

    /// Per-node folders in descriptor order
    pub variants: Vec<FolderPresence>,

    /// The group's fallback folder
    pub default_folder: String,

    /// Whether the fallback folder has the id
    pub default_present: bool,
}

/// Check which of a group's folders can serve `id`.
pub fn scan_for_id(
    index: &VariantIndex,
    root: &Path,
    id: &str,
) -> Result<Vec<GroupPresence>, ScanError> {
    let mut report = Vec::with_capacity(index.len());

    for group in index.groups() {
        let mut variants = Vec::with_capacity(group.nodes.len());
        for node in &group.nodes {
            variants.push(FolderPresence {
                folder: node.folder.clone(),
                present: file_present(&root.join(&node.folder).join(id))?,
            });
        }

        report.push(GroupPresence {
            resource_type: group.resource_type,
            variants,
            default_folder: group.default_folder.clone(),
            default_present: file_present(&root.join(&group.default_folder).join(id))?,
        });
    }

    Ok(report)
}

/// Files found under one variant folder.
#[derive(Debug, Clone, Serialize)]
pub struct FolderListing {
    /// Folder relative to the resource root
    pub folder: String,

    /// File paths relative to the folder, sorted
    pub files: Vec<String>,
}

/// Full listing for one group.
#[derive(Debug, Clone, Serialize)]
pub struct GroupListing {
    /// Resource class
    pub resource_type: ResourceType,

    /// Default folder first, then node folders in descriptor order
    pub folders: Vec<FolderListing>,
}

/// Walk every folder a group references and list the files it holds.
///
/// A folder missing on disk yields an empty listing rather than an error;
/// packages commonly declare nodes for assets they only ship on some
/// device classes.
pub fn scan_root(index: &VariantIndex, root: &Path) -> Result<Vec<GroupListing>, ScanError> {
    let mut report = Vec::with_capacity(index.len());

    for group in index.groups() {
        let mut folders = Vec::with_capacity(group.nodes.len() + 1);
        let mut seen = std::collections::HashSet::new();

        let mut folder_names = vec![group.default_folder.as_str()];
        folder_names.extend(group.nodes.iter().map(|n| n.folder.as_str()));

        for folder in folder_names {
            if !seen.insert(folder.to_string()) {
                continue;
            }
            folders.push(FolderListing {
                folder: folder.to_string(),
                files: list_files(&root.join(folder))?,
            });
        }

        report.push(GroupListing {
            resource_type: group.resource_type,
            folders,
        });
    }

    Ok(report)
}

fn file_present(path: &Path) -> Result<bool, std::io::Error> {
    match std::fs::metadata(path) {
        Ok(metadata) => Ok(metadata.is_file()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

fn list_files(folder: &Path) -> Result<Vec<String>, ScanError> {
    if !folder.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(folder).min_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(folder) {
            files.push(relative.to_string_lossy().replace('\\', "/"));
        }
    }
    files.sort();
    Ok(files)
}
