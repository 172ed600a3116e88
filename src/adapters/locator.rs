//! Finds the soldb checkout the adapter process runs from
//!
//! Search order, first hit wins:
//! 1. `walnutPath` from settings, trusted as-is
//! 2. parent of the workspace root when the root is the editor extension
//!    project itself (`.../walnut-cli/vscode-extension`)
//! 3. the workspace root
//! 4. nothing found: warn, and fall back to the workspace root anyway

use crate::host::{FileSystem, UserInterface};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Last path segment of the editor extension project
pub const EXTENSION_MARKER: &str = "vscode-extension";

/// Files whose presence marks a directory as a soldb checkout
pub const SEARCH_INDICATORS: &[&str] = &[
    "src/soldb/main.py",
    "src/soldb/dap_server.py",
    "setup-soldb.sh",
];

pub const NOT_FOUND_WARNING: &str = concat!(
    "Could not locate the soldb runtime. ",
    "Set 'soldb.walnutPath' in your settings to the soldb checkout."
);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdapterLocation {
    pub working_directory: Option<PathBuf>,
    pub module_path: Option<PathBuf>,
}

impl AdapterLocation {
    /// Location rooted at a checkout; modules are imported from `<root>/src`
    pub fn rooted_at(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            module_path: Some(root.join("src")),
            working_directory: Some(root),
        }
    }

    pub fn unresolved() -> Self {
        Self::default()
    }

    pub fn is_resolved(&self) -> bool {
        self.working_directory.is_some()
    }
}

pub struct AdapterLocator<'a> {
    fs: &'a dyn FileSystem,
    ui: &'a dyn UserInterface,
}

impl<'a> AdapterLocator<'a> {
    pub fn new(fs: &'a dyn FileSystem, ui: &'a dyn UserInterface) -> Self {
        Self { fs, ui }
    }

    pub fn locate(
        &self,
        configured_path: Option<&str>,
        workspace_roots: &[PathBuf],
    ) -> AdapterLocation {
        if let Some(configured) = configured_path.filter(|p| !p.is_empty()) {
            info!("Using configured soldb path: {}", configured);
            return AdapterLocation::rooted_at(configured);
        }

        let anchor = workspace_roots.first();

        if let Some(anchor) = anchor {
            if let Some(found) = self.search_from(anchor) {
                info!("Found soldb runtime at {}", found.display());
                return AdapterLocation::rooted_at(found);
            }
        }

        warn!(
            "soldb runtime not found from workspace roots {:?}",
            workspace_roots
        );
        self.ui.show_warning(NOT_FOUND_WARNING);

        match anchor {
            Some(root) => AdapterLocation::rooted_at(root.clone()),
            None => AdapterLocation::unresolved(),
        }
    }

    fn search_from(&self, anchor: &Path) -> Option<PathBuf> {
        let is_extension_project = anchor
            .file_name()
            .is_some_and(|name| name == EXTENSION_MARKER);

        if is_extension_project {
            if let Some(parent) = anchor.parent() {
                if self.has_indicator(parent) {
                    return Some(parent.to_path_buf());
                }
            }
        }

        if self.has_indicator(anchor) {
            return Some(anchor.to_path_buf());
        }

        None
    }

    fn has_indicator(&self, candidate: &Path) -> bool {
        SEARCH_INDICATORS.iter().any(|indicator| {
            let path = candidate.join(indicator);
            let exists = self.fs.exists(&path);
            debug!("Checking {}: {}", path.display(), exists);
            exists
        })
    }
}
