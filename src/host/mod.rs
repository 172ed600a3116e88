//! Seams between the launcher and whatever editor or terminal hosts it
//!
//! Collaborators the launcher consumes (`FileSystem`, `UserInterface`,
//! `SessionHost`) and the hooks it exposes back to a host
//! (`DebugConfigurationProvider`, `DebugAdapterDescriptorFactory`,
//! `CommandHandler`, `AnnotationProvider`) are plain single-method traits.

pub mod dap_host;
pub mod terminal;

use crate::adapters::soldb::SpawnDescriptor;
use crate::launch::config::LaunchRequest;
use crate::scanner::Annotation;
use crate::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};

pub use dap_host::DapSessionHost;
pub use terminal::TerminalUi;

/// Existence checks used while searching for the adapter runtime
pub trait FileSystem: Send + Sync {
    fn exists(&self, path: &Path) -> bool;
}

/// The real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Prompts and message surfaces shown to the user
#[async_trait]
pub trait UserInterface: Send + Sync {
    /// Ask for a line of input; `None` when the user dismisses the prompt
    async fn prompt(&self, message: &str, placeholder: &str) -> Option<String>;

    fn show_info(&self, message: &str);

    fn show_warning(&self, message: &str);

    fn show_error(&self, message: &str);
}

/// Starts debug sessions on behalf of the launcher
#[async_trait]
pub trait SessionHost: Send + Sync {
    async fn start_debugging(&self, configuration: &LaunchRequest) -> Result<bool>;
}

pub trait DebugConfigurationProvider: Send + Sync {
    fn resolve_debug_configuration(&self, partial: LaunchRequest) -> LaunchRequest;
}

pub trait DebugAdapterDescriptorFactory: Send + Sync {
    fn create_descriptor(&self, workspace_roots: &[PathBuf]) -> SpawnDescriptor;
}

#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn execute(&self, arguments: &[Value], active_file: Option<PathBuf>) -> Result<()>;
}

pub trait AnnotationProvider: Send + Sync {
    fn provide_annotations(&self, text: &str) -> Vec<Annotation>;
}
