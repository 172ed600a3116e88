/// Sessions against a spawned adapter
///
/// `tests/fixtures/soldb_checkout` holds a stand-in `soldb.dap_server` that
/// behaves like the real one: it stops on entry after `launch` and only exits
/// on `disconnect`. Skipped when python3 is not installed.
use assert_matches::assert_matches;
use soldb_launcher::adapters::SoldbDescriptorFactory;
use soldb_launcher::config::{MapConfigStore, WALNUT_PATH_KEY};
use soldb_launcher::host::{DapSessionHost, RealFileSystem, SessionHost, TerminalUi};
use soldb_launcher::{Error, LaunchCoordinator, LaunchRequest, SessionConfigResolver};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

const SESSION_DEADLINE: Duration = Duration::from_secs(20);

fn fake_checkout() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/soldb_checkout")
}

fn python_available() -> bool {
    std::process::Command::new("python3")
        .arg("--version")
        .output()
        .is_ok_and(|output| output.status.success())
}

fn session_host() -> DapSessionHost {
    let store = MapConfigStore::new().with(
        WALNUT_PATH_KEY,
        Some(fake_checkout().display().to_string()),
    );
    let factory = SoldbDescriptorFactory::new(
        Arc::new(store),
        Arc::new(RealFileSystem),
        Arc::new(TerminalUi::new()),
    );
    DapSessionHost::new(Arc::new(factory), vec![])
}

#[tokio::test]
async fn test_session_ends_after_entry_stop() {
    if !python_available() {
        println!("Skipping session test: python3 not installed");
        return;
    }

    let host = session_host();
    let request = SessionConfigResolver::new().resolve(LaunchRequest::for_function(
        "add",
        vec!["2".to_string(), "3".to_string()],
        Some(PathBuf::from("/ws/Counter.sol")),
    ));

    assert!(host.start_debugging(&request).await.unwrap());
    assert_eq!(host.session_ids().await.len(), 1);

    timeout(SESSION_DEADLINE, host.wait_for_sessions())
        .await
        .expect("session still running after the entry stop")
        .unwrap();
    assert!(host.session_ids().await.is_empty());
}

#[tokio::test]
async fn test_rejected_launch_is_not_tracked() {
    if !python_available() {
        println!("Skipping session test: python3 not installed");
        return;
    }

    let host = session_host();
    let request = SessionConfigResolver::new().resolve(LaunchRequest::for_function(
        "add",
        vec![],
        None,
    ));

    let result = host.start_debugging(&request).await;

    assert_matches!(result, Err(Error::Dap(message)) if message.contains("contractFile"));
    assert!(host.session_ids().await.is_empty());
}

#[tokio::test]
async fn test_coordinator_drives_spawned_adapter() {
    if !python_available() {
        println!("Skipping session test: python3 not installed");
        return;
    }

    let host = Arc::new(session_host());
    let ui = Arc::new(TerminalUi::with_answer(Some("2, 3".to_string())));
    let coordinator = LaunchCoordinator::new(ui, host.clone());

    let configuration = coordinator
        .launch("add", 2, Some(PathBuf::from("/ws/Counter.sol")))
        .await
        .unwrap();
    assert_eq!(configuration.function_args, vec!["2", "3"]);

    timeout(SESSION_DEADLINE, host.wait_for_sessions())
        .await
        .expect("session still running after the entry stop")
        .unwrap();
}
