//! Bundle analysis
//!
//! Walks a build output directory and sums file sizes per category. Nothing
//! is cached; every call re-reads the tree. The tree is assumed to be
//! quiescent (evaluation runs after the build finishes).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::{BudgetError, ResourceType};

/// One file in the bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetFile {
    /// Path relative to the bundle root
    pub path: PathBuf,
    pub bytes: u64,
    pub category: ResourceType,
}

/// Per-category and total byte sizes of a bundle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleAnalysis {
    pub root: PathBuf,
    pub total_bytes: u64,
    pub by_category: BTreeMap<ResourceType, u64>,
    pub files: Vec<AssetFile>,
}

impl BundleAnalysis {
    /// Bytes for a category, or the whole bundle for `Total`
    pub fn bytes(&self, resource_type: ResourceType) -> u64 {
        match resource_type {
            ResourceType::Total => self.total_bytes,
            other => self.by_category.get(&other).copied().unwrap_or(0),
        }
    }

    /// The `n` largest files, biggest first (ties by path)
    pub fn largest(&self, n: usize) -> Vec<&AssetFile> {
        let mut files: Vec<&AssetFile> = self.files.iter().collect();
        files.sort_by(|a, b| b.bytes.cmp(&a.bytes).then_with(|| a.path.cmp(&b.path)));
        files.truncate(n);
        files
    }

    fn add(&mut self, file: AssetFile) {
        self.total_bytes += file.bytes;
        *self.by_category.entry(file.category).or_insert(0) += file.bytes;
        self.files.push(file);
    }
}

/// Walk `root` recursively and classify every regular file
///
/// Symlinks are not followed. Directory entries come back sorted by name so
/// repeated runs over the same tree produce identical output.
pub fn analyze_bundle(root: &Path) -> Result<BundleAnalysis, BudgetError> {
    if !root.exists() {
        return Err(BudgetError::MissingBundle(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(BudgetError::NotADirectory(root.to_path_buf()));
    }

    let mut analysis = BundleAnalysis {
        root: root.to_path_buf(),
        ..Default::default()
    };
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let bytes = entry.metadata()?.len();
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path()).to_path_buf();
        let category = ResourceType::from_path(&relative);
        tracing::trace!(path = %relative.display(), bytes, %category, "asset");
        analysis.add(AssetFile {
            path: relative,
            bytes,
            category,
        });
    }

    tracing::debug!(
        root = %root.display(),
        files = analysis.files.len(),
        total_bytes = analysis.total_bytes,
        "bundle analyzed"
    );
    Ok(analysis)
}
