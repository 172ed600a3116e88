/// Adapter discovery against real directory layouts
use async_trait::async_trait;
use soldb_launcher::adapters::{AdapterLocation, AdapterLocator, SoldbDescriptorFactory};
use soldb_launcher::config::{JsonConfigStore, MapConfigStore};
use soldb_launcher::host::{DebugAdapterDescriptorFactory, RealFileSystem, UserInterface};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

#[derive(Default)]
struct WarningLog {
    warnings: Mutex<Vec<String>>,
}

#[async_trait]
impl UserInterface for WarningLog {
    async fn prompt(&self, _message: &str, _placeholder: &str) -> Option<String> {
        None
    }
    fn show_info(&self, _message: &str) {}
    fn show_warning(&self, message: &str) {
        self.warnings.lock().unwrap().push(message.to_string());
    }
    fn show_error(&self, _message: &str) {}
}

fn touch(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "").unwrap();
}

/// walnut-cli/
///   src/soldb/main.py
///   vscode-extension/
fn checkout_with_extension() -> TempDir {
    let dir = TempDir::new().unwrap();
    touch(&dir.path().join("walnut-cli/src/soldb/main.py"));
    fs::create_dir_all(dir.path().join("walnut-cli/vscode-extension")).unwrap();
    dir
}

#[test]
fn test_extension_workspace_resolves_to_checkout() {
    let dir = checkout_with_extension();
    let checkout = dir.path().join("walnut-cli");
    let ui = WarningLog::default();

    let location = AdapterLocator::new(&RealFileSystem, &ui)
        .locate(None, &[checkout.join("vscode-extension")]);

    assert_eq!(location.working_directory, Some(checkout.clone()));
    assert_eq!(location.module_path, Some(checkout.join("src")));
    assert!(ui.warnings.lock().unwrap().is_empty());
}

#[test]
fn test_checkout_opened_directly() {
    let dir = TempDir::new().unwrap();
    touch(&dir.path().join("setup-soldb.sh"));
    let ui = WarningLog::default();

    let location =
        AdapterLocator::new(&RealFileSystem, &ui).locate(None, &[dir.path().to_path_buf()]);

    assert_eq!(location, AdapterLocation::rooted_at(dir.path()));
    assert!(ui.warnings.lock().unwrap().is_empty());
}

#[test]
fn test_unrelated_workspace_warns_once() {
    let dir = TempDir::new().unwrap();
    touch(&dir.path().join("contracts/Token.sol"));
    let ui = WarningLog::default();

    let location =
        AdapterLocator::new(&RealFileSystem, &ui).locate(None, &[dir.path().to_path_buf()]);

    assert_eq!(location, AdapterLocation::rooted_at(dir.path()));
    assert_eq!(ui.warnings.lock().unwrap().len(), 1);
}

#[test]
fn test_factory_uses_settings_file() {
    let dir = checkout_with_extension();
    let settings = dir.path().join("settings.json");
    fs::write(
        &settings,
        r#"{ "soldb.pythonPath": "/opt/venv/bin/python" }"#,
    )
    .unwrap();

    let ui = Arc::new(WarningLog::default());
    let factory = SoldbDescriptorFactory::new(
        Arc::new(JsonConfigStore::from_file(&settings).unwrap()),
        Arc::new(RealFileSystem),
        ui.clone(),
    );
    let roots: Vec<PathBuf> = vec![dir.path().join("walnut-cli/vscode-extension")];
    let descriptor = factory.create_descriptor(&roots);

    assert_eq!(descriptor.command, "/opt/venv/bin/python");
    assert_eq!(descriptor.args, vec!["-m", "soldb.dap_server"]);
    assert_eq!(
        descriptor.working_directory,
        Some(dir.path().join("walnut-cli"))
    );
    assert_eq!(
        descriptor.env.get("PYTHONPATH").map(PathBuf::from),
        Some(dir.path().join("walnut-cli/src"))
    );
}

#[test]
fn test_factory_without_roots_or_settings() {
    let ui = Arc::new(WarningLog::default());
    let factory = SoldbDescriptorFactory::new(
        Arc::new(MapConfigStore::new()),
        Arc::new(RealFileSystem),
        ui.clone(),
    );

    let descriptor = factory.create_descriptor(&[]);

    assert_eq!(descriptor.command, "python3");
    assert!(descriptor.working_directory.is_none());
    assert!(descriptor.env.is_empty());
    assert_eq!(ui.warnings.lock().unwrap().len(), 1);
}
