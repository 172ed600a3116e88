use super::transport::MessageChannel;
use super::types::{Event, InitializeRequestArguments, Message, OutputEventBody, Request, Response};
use crate::launch::LaunchRequest;
use crate::{Error, Result};
use serde_json::{json, Value};
use tokio::process::Child;
use tracing::{debug, info, warn};

/// Sequential DAP client for one adapter process
///
/// Requests are answered in order; events that arrive while waiting for a
/// response are handled inline.
pub struct DapClient {
    transport: Box<dyn MessageChannel>,
    seq: i32,
    terminated: bool,
    stopped: Option<String>,
    _child: Option<Child>,
}

impl DapClient {
    pub fn new(transport: Box<dyn MessageChannel>, child: Option<Child>) -> Self {
        Self {
            transport,
            seq: 0,
            terminated: false,
            stopped: None,
            _child: child,
        }
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Send a request and wait for its response
    pub async fn request(&mut self, command: &str, arguments: Option<Value>) -> Result<Response> {
        self.seq += 1;
        let seq = self.seq;

        self.transport
            .send(&Message::Request(Request {
                seq,
                command: command.to_string(),
                arguments,
            }))
            .await?;

        loop {
            match self.transport.recv().await? {
                Message::Response(resp) if resp.request_seq == seq => return Ok(resp),
                Message::Response(resp) => {
                    debug!("Ignoring response to request {}", resp.request_seq);
                }
                Message::Event(event) => self.handle_event(&event),
                Message::Request(req) => {
                    debug!("Ignoring reverse request: {}", req.command);
                }
            }
        }
    }

    pub async fn initialize(&mut self, adapter_id: &str) -> Result<Value> {
        let args = InitializeRequestArguments {
            client_id: Some(env!("CARGO_PKG_NAME").to_string()),
            client_name: Some("soldb launcher".to_string()),
            adapter_id: adapter_id.to_string(),
            lines_start_at_1: Some(true),
            columns_start_at_1: Some(true),
            path_format: Some("path".to_string()),
        };

        let response = self
            .request("initialize", Some(serde_json::to_value(args)?))
            .await?;
        Self::check(response).map(|body| body.unwrap_or(Value::Null))
    }

    pub async fn launch(&mut self, configuration: &LaunchRequest) -> Result<()> {
        let response = self
            .request("launch", Some(serde_json::to_value(configuration)?))
            .await?;
        Self::check(response).map(|_| ())
    }

    pub async fn configuration_done(&mut self) -> Result<()> {
        let response = self.request("configurationDone", None).await?;
        Self::check(response).map(|_| ())
    }

    pub async fn disconnect(&mut self) -> Result<()> {
        let response = self
            .request("disconnect", Some(json!({ "terminateDebuggee": true })))
            .await;
        self.terminated = true;
        Self::check(response?).map(|_| ())
    }

    /// Pump events until the adapter stops or goes away
    ///
    /// Returns the stop reason, or `None` once the session has terminated.
    pub async fn run_until_stopped(&mut self) -> Result<Option<String>> {
        loop {
            if self.terminated {
                return Ok(None);
            }
            if let Some(reason) = self.stopped.take() {
                return Ok(Some(reason));
            }

            match self.transport.recv().await {
                Ok(Message::Event(event)) => self.handle_event(&event),
                Ok(other) => debug!("Ignoring message while running: {:?}", other),
                Err(Error::Disconnected) => {
                    self.terminated = true;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Run the session to its end
    ///
    /// Nothing drives a paused session from here, so the first stop
    /// (normally `entry`) ends it with `disconnect`.
    pub async fn run_to_completion(&mut self) -> Result<()> {
        if let Some(reason) = self.run_until_stopped().await? {
            info!("Adapter stopped ({}), disconnecting", reason);
            match self.disconnect().await {
                Ok(()) | Err(Error::Disconnected) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    fn check(response: Response) -> Result<Option<Value>> {
        if response.success {
            Ok(response.body)
        } else {
            Err(Error::Dap(response.message.unwrap_or_else(|| {
                format!("{} request failed", response.command)
            })))
        }
    }

    fn handle_event(&mut self, event: &Event) {
        match event.event.as_str() {
            "output" => {
                let Some(body) = event
                    .body
                    .clone()
                    .and_then(|b| serde_json::from_value::<OutputEventBody>(b).ok())
                else {
                    return;
                };
                let text = body.output.trim_end();
                match body.category.as_deref() {
                    Some("stderr") => warn!("[adapter] {}", text),
                    _ => info!("[adapter] {}", text),
                }
            }
            "stopped" => {
                let reason = event
                    .body
                    .as_ref()
                    .and_then(|b| b.get("reason"))
                    .and_then(Value::as_str)
                    .unwrap_or("unknown")
                    .to_string();
                info!("Adapter stopped: {}", reason);
                self.stopped = Some(reason);
            }
            "terminated" | "exited" => {
                info!("Adapter reported {}", event.event);
                self.terminated = true;
            }
            other => debug!("DAP event: {}", other),
        }
    }
}
