use super::config::{LaunchRequest, SessionConfigResolver};
use crate::host::{CommandHandler, DebugConfigurationProvider, SessionHost, UserInterface};
use crate::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// Command the "Debug" annotations invoke with `(functionName, argumentCount)`
pub const DEBUG_FUNCTION_COMMAND: &str = "soldb.debugFunction";

/// Turns a "Debug" click into a started session
pub struct LaunchCoordinator {
    ui: Arc<dyn UserInterface>,
    host: Arc<dyn SessionHost>,
    resolver: Arc<dyn DebugConfigurationProvider>,
}

impl LaunchCoordinator {
    pub fn new(ui: Arc<dyn UserInterface>, host: Arc<dyn SessionHost>) -> Self {
        Self::with_resolver(ui, host, Arc::new(SessionConfigResolver::new()))
    }

    pub fn with_resolver(
        ui: Arc<dyn UserInterface>,
        host: Arc<dyn SessionHost>,
        resolver: Arc<dyn DebugConfigurationProvider>,
    ) -> Self {
        Self { ui, host, resolver }
    }

    /// Collect arguments, validate them and ask the host to start the session
    ///
    /// Returns the resolved configuration the session was started with. A
    /// dismissed argument prompt counts as an empty argument list.
    pub async fn launch(
        &self,
        function_name: &str,
        argument_count: usize,
        active_file: Option<PathBuf>,
    ) -> Result<LaunchRequest> {
        let function_args = self.collect_arguments(function_name, argument_count).await;

        if function_args.len() != argument_count {
            return Err(self.report(Error::Validation(format!(
                "Function {} expects {} argument(s), but {} were provided",
                function_name,
                argument_count,
                function_args.len()
            ))));
        }

        let configuration = self.resolver.resolve_debug_configuration(
            LaunchRequest::for_function(function_name, function_args, active_file),
        );

        info!(
            "Starting debug session for {}({})",
            function_name,
            configuration.function_args.join(", ")
        );

        match self.host.start_debugging(&configuration).await {
            Ok(true) => Ok(configuration),
            Ok(false) => Err(self.report(Error::Launch(
                "the debug host declined to start the session".to_string(),
            ))),
            Err(e) => Err(self.report(Error::Launch(e.to_string()))),
        }
    }

    async fn collect_arguments(&self, function_name: &str, argument_count: usize) -> Vec<String> {
        if argument_count == 0 {
            return Vec::new();
        }

        let placeholder = (1..=argument_count)
            .map(|i| format!("arg{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let answer = self
            .ui
            .prompt(
                &format!("Enter arguments for {} (comma-separated)", function_name),
                &placeholder,
            )
            .await;

        parse_arguments(answer.as_deref())
    }

    fn report(&self, err: Error) -> Error {
        error!("{}", err);
        self.ui.show_error(&err.to_string());
        err
    }
}

/// Split comma separated input into trimmed values
pub fn parse_arguments(raw: Option<&str>) -> Vec<String> {
    match raw {
        None | Some("") => Vec::new(),
        Some(raw) => raw.split(',').map(|part| part.trim().to_string()).collect(),
    }
}

#[async_trait]
impl CommandHandler for LaunchCoordinator {
    async fn execute(&self, arguments: &[Value], active_file: Option<PathBuf>) -> Result<()> {
        let function_name = arguments
            .first()
            .and_then(Value::as_str)
            .ok_or_else(|| Error::InvalidRequest("missing function name".to_string()))?;
        let argument_count = arguments
            .get(1)
            .and_then(Value::as_u64)
            .ok_or_else(|| Error::InvalidRequest("missing argument count".to_string()))?;

        self.launch(function_name, argument_count as usize, active_file)
            .await
            .map(|_| ())
    }
}
