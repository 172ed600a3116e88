//! soldb debug adapter
//!
//! The adapter is the `soldb.dap_server` Python module, started with the
//! configured interpreter and speaking DAP over its stdio:
//!
//! ```text
//! cd <walnutPath>
//! PYTHONPATH=<walnutPath>/src python3 -m soldb.dap_server
//! ```

use super::locator::{AdapterLocation, AdapterLocator};
use super::logging::DebugAdapterLogger;
use crate::config::{ConfigStore, Settings};
use crate::host::{DebugAdapterDescriptorFactory, FileSystem, UserInterface};
use crate::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::{Child, Command};

pub struct SoldbAdapter;

impl SoldbAdapter {
    pub fn adapter_id() -> &'static str {
        "soldb"
    }

    pub fn module() -> &'static str {
        "soldb.dap_server"
    }

    pub fn args() -> Vec<String> {
        vec!["-m".to_string(), Self::module().to_string()]
    }
}

/// Everything needed to start the adapter process
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpawnDescriptor {
    pub command: String,
    pub args: Vec<String>,
    pub working_directory: Option<PathBuf>,
    /// Set on top of the inherited environment
    pub env: BTreeMap<String, String>,
}

impl SpawnDescriptor {
    pub fn new(settings: &Settings, location: &AdapterLocation) -> Self {
        let mut env = BTreeMap::new();
        if let Some(module_path) = location
            .module_path
            .as_ref()
            .filter(|p| !p.as_os_str().is_empty())
        {
            env.insert(
                "PYTHONPATH".to_string(),
                module_path.to_string_lossy().into_owned(),
            );
        }

        Self {
            command: settings.python_path.clone(),
            args: SoldbAdapter::args(),
            working_directory: location.working_directory.clone(),
            env,
        }
    }

    /// Start the adapter with piped stdio; the child dies with its handle
    pub fn spawn(&self) -> Result<Child> {
        self.log_location();
        self.log_spawn_attempt();

        let mut command = Command::new(&self.command);
        command
            .args(&self.args)
            .envs(&self.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        if let Some(dir) = &self.working_directory {
            command.current_dir(dir);
        }

        command.spawn().map_err(|e| {
            self.log_spawn_error(&e);
            Error::Process(format!("Failed to spawn {}: {}", self.command_line(), e))
        })
    }
}

impl DebugAdapterLogger for SpawnDescriptor {
    fn adapter_id(&self) -> &str {
        SoldbAdapter::adapter_id()
    }

    fn command_line(&self) -> String {
        std::iter::once(self.command.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn working_directory(&self) -> Option<String> {
        self.working_directory
            .as_ref()
            .map(|p| p.display().to_string())
    }

    fn module_path(&self) -> Option<String> {
        self.env.get("PYTHONPATH").cloned()
    }
}

/// Builds a fresh descriptor for every session; settings are re-read each time
pub struct SoldbDescriptorFactory {
    config: Arc<dyn ConfigStore>,
    fs: Arc<dyn FileSystem>,
    ui: Arc<dyn UserInterface>,
}

impl SoldbDescriptorFactory {
    pub fn new(
        config: Arc<dyn ConfigStore>,
        fs: Arc<dyn FileSystem>,
        ui: Arc<dyn UserInterface>,
    ) -> Self {
        Self { config, fs, ui }
    }
}

impl DebugAdapterDescriptorFactory for SoldbDescriptorFactory {
    fn create_descriptor(&self, workspace_roots: &[PathBuf]) -> SpawnDescriptor {
        let settings = Settings::read(self.config.as_ref());
        let location = AdapterLocator::new(self.fs.as_ref(), self.ui.as_ref())
            .locate(settings.walnut_path.as_deref(), workspace_roots);

        SpawnDescriptor::new(&settings, &location)
    }
}
