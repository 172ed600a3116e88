/// End-to-end launch flow with in-memory host collaborators
///
/// Scans a contract, takes the command attached to an annotation and runs it
/// through the coordinator, the same way an editor would on a "Debug" click.
use assert_matches::assert_matches;
use async_trait::async_trait;
use soldb_launcher::host::{AnnotationProvider, CommandHandler, SessionHost, UserInterface};
use soldb_launcher::launch::{RequestKind, DEBUG_FUNCTION_COMMAND};
use soldb_launcher::scanner::DebugAnnotationProvider;
use soldb_launcher::{Error, LaunchCoordinator, LaunchRequest, Result};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

const TOKEN: &str = r#"contract Token {
    function transfer(address to, uint256 amount) external returns (bool) {
        return true;
    }

    function pause() external {}
}
"#;

/// Answers prompts from a script and records every message shown
#[derive(Default)]
struct ScriptedUi {
    answers: Mutex<Vec<Option<String>>>,
    prompts: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl ScriptedUi {
    fn answering(answers: Vec<Option<&str>>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().rev().map(|a| a.map(String::from)).collect()),
            ..Default::default()
        }
    }
}

#[async_trait]
impl UserInterface for ScriptedUi {
    async fn prompt(&self, message: &str, _placeholder: &str) -> Option<String> {
        self.prompts.lock().unwrap().push(message.to_string());
        self.answers.lock().unwrap().pop().flatten()
    }

    fn show_info(&self, _message: &str) {}

    fn show_warning(&self, _message: &str) {}

    fn show_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

/// Records session start requests; optionally fails them
#[derive(Default)]
struct RecordingHost {
    started: Mutex<Vec<LaunchRequest>>,
    failure: Option<String>,
}

#[async_trait]
impl SessionHost for RecordingHost {
    async fn start_debugging(&self, configuration: &LaunchRequest) -> Result<bool> {
        self.started.lock().unwrap().push(configuration.clone());
        match &self.failure {
            Some(message) => Err(Error::Dap(message.clone())),
            None => Ok(true),
        }
    }
}

fn annotation_args(name: &str) -> Vec<serde_json::Value> {
    DebugAnnotationProvider
        .provide_annotations(TOKEN)
        .into_iter()
        .find(|a| a.command.arguments[0] == name)
        .map(|a| {
            assert_eq!(a.command.command, DEBUG_FUNCTION_COMMAND);
            a.command.arguments
        })
        .unwrap()
}

#[tokio::test]
async fn test_debug_click_starts_resolved_session() {
    let ui = Arc::new(ScriptedUi::answering(vec![Some(
        "0x70997970C51812dc3A010C7d01b50e0d17dc79C8, 100",
    )]));
    let host = Arc::new(RecordingHost::default());
    let coordinator = LaunchCoordinator::new(ui.clone(), host.clone());

    coordinator
        .execute(&annotation_args("transfer"), Some(PathBuf::from("/ws/Token.sol")))
        .await
        .unwrap();

    let started = host.started.lock().unwrap();
    assert_eq!(started.len(), 1);
    assert_eq!(started[0].debug_type, "soldb");
    assert_eq!(started[0].request, Some(RequestKind::Launch));
    assert_eq!(started[0].port, Some(4711));
    assert_eq!(started[0].function.as_deref(), Some("transfer"));
    assert_eq!(
        started[0].function_args,
        vec!["0x70997970C51812dc3A010C7d01b50e0d17dc79C8", "100"]
    );
    assert_eq!(started[0].contract_file, Some(PathBuf::from("/ws/Token.sol")));
    assert!(ui.prompts.lock().unwrap()[0].contains("transfer"));
}

#[tokio::test]
async fn test_argument_mismatch_reports_and_skips_host() {
    let ui = Arc::new(ScriptedUi::answering(vec![Some("100")]));
    let host = Arc::new(RecordingHost::default());
    let coordinator = LaunchCoordinator::new(ui.clone(), host.clone());

    let result = coordinator.execute(&annotation_args("transfer"), None).await;

    assert_matches!(result, Err(Error::Validation(_)));
    assert!(host.started.lock().unwrap().is_empty());
    assert_eq!(ui.errors.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_host_failure_is_reported_once_and_not_retried() {
    let ui = Arc::new(ScriptedUi::default());
    let host = Arc::new(RecordingHost {
        failure: Some("Provide contractFile or contractAddress + ethdebugDir".to_string()),
        ..Default::default()
    });
    let coordinator = LaunchCoordinator::new(ui.clone(), host.clone());

    let result = coordinator.execute(&annotation_args("pause"), None).await;

    assert_matches!(result, Err(Error::Launch(message)) if message.contains("ethdebugDir"));
    assert_eq!(host.started.lock().unwrap().len(), 1);
    assert!(ui.prompts.lock().unwrap().is_empty());
    assert_eq!(ui.errors.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_concurrent_launches_are_independent() {
    let ui = Arc::new(ScriptedUi::answering(vec![Some("0x01, 1"), Some("0x02, 2")]));
    let host = Arc::new(RecordingHost::default());
    let coordinator = Arc::new(LaunchCoordinator::new(ui.clone(), host.clone()));

    let first = {
        let coordinator = coordinator.clone();
        tokio::spawn(async move { coordinator.launch("transfer", 2, None).await })
    };
    let second = {
        let coordinator = coordinator.clone();
        tokio::spawn(async move { coordinator.launch("transfer", 2, None).await })
    };

    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    let started = host.started.lock().unwrap();
    assert_eq!(started.len(), 2);
    let mut amounts: Vec<_> = started.iter().map(|r| r.function_args[1].clone()).collect();
    amounts.sort();
    assert_eq!(amounts, vec!["1", "2"]);
}
