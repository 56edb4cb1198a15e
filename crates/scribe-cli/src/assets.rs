//! Filesystem asset resolution over the export directory layout
//!
//! Avatars live at `avatars/{user}/{hash}.<ext>` and attachment payloads
//! at `attachments/{channel}/{attachment}/<filename>`. Returned paths are
//! relative to the export root, which is where the rendered page lives.

use std::fs;
use std::path::PathBuf;

use scribe_core::Snowflake;
use scribe_render::{AssetKind, AssetResolver};

/// Resolver over an export directory on disk.
#[derive(Debug, Clone)]
pub struct DirAssetResolver {
    data_dir: PathBuf,
}

impl DirAssetResolver {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// First directory entry under `rel`, by name, as a root-relative path.
    fn first_entry(&self, rel: PathBuf) -> Option<PathBuf> {
        let mut names: Vec<_> = fs::read_dir(self.data_dir.join(&rel))
            .ok()?
            .filter_map(|e| e.ok().map(|e| e.file_name()))
            .collect();
        names.sort();
        names.first().map(|name| rel.join(name))
    }

    /// Entry under `rel` whose file stem equals `stem`, as a root-relative path.
    fn entry_by_stem(&self, rel: PathBuf, stem: &str) -> Option<PathBuf> {
        let mut names: Vec<_> = fs::read_dir(self.data_dir.join(&rel))
            .ok()?
            .filter_map(|e| e.ok().map(|e| e.file_name()))
            .collect();
        names.sort();
        names
            .into_iter()
            .find(|name| {
                PathBuf::from(name)
                    .file_stem()
                    .is_some_and(|s| s == stem)
            })
            .map(|name| rel.join(name))
    }
}

impl AssetResolver for DirAssetResolver {
    fn resolve(&self, kind: AssetKind, owner: Snowflake, asset: &str) -> Option<PathBuf> {
        match kind {
            AssetKind::Avatar => {
                self.entry_by_stem(PathBuf::from(format!("avatars/{owner}")), asset)
            }
            AssetKind::Attachment => {
                self.first_entry(PathBuf::from(format!("attachments/{owner}/{asset}")))
            }
        }
    }
}
