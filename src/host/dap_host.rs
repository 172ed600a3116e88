//! Session host that runs the adapter itself
//!
//! Used when no editor is around: spawns the adapter from the factory's
//! descriptor and drives the DAP handshake
//! (`initialize` → `launch` → `configurationDone`).

use super::{DebugAdapterDescriptorFactory, SessionHost};
use crate::adapters::logging::DebugAdapterLogger;
use crate::adapters::SoldbAdapter;
use crate::dap::MessageChannel;
use crate::dap::{DapClient, DapTransport};
use crate::launch::LaunchRequest;
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::process::Child;
use tokio::sync::Mutex;
use tracing::{error, info};
use uuid::Uuid;

pub struct DapSessionHost {
    factory: Arc<dyn DebugAdapterDescriptorFactory>,
    workspace_roots: Vec<PathBuf>,
    sessions: Mutex<HashMap<String, DapClient>>,
}

impl DapSessionHost {
    pub fn new(
        factory: Arc<dyn DebugAdapterDescriptorFactory>,
        workspace_roots: Vec<PathBuf>,
    ) -> Self {
        Self {
            factory,
            workspace_roots,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub async fn session_ids(&self) -> Vec<String> {
        self.sessions.lock().await.keys().cloned().collect()
    }

    /// Run every started session to its end
    ///
    /// A session ends when its adapter terminates, exits or closes its
    /// output, or when it stops and is disconnected.
    pub async fn wait_for_sessions(&self) -> Result<()> {
        let sessions: Vec<(String, DapClient)> = self.sessions.lock().await.drain().collect();

        for (id, mut client) in sessions {
            info!("Waiting for session {} to finish", id);
            client.run_to_completion().await?;
            info!("Session {} finished", id);
        }
        Ok(())
    }

    async fn establish(
        &self,
        transport: Box<dyn MessageChannel>,
        child: Option<Child>,
        logger: &(dyn DebugAdapterLogger + Sync),
        configuration: &LaunchRequest,
    ) -> Result<String> {
        let mut client = DapClient::new(transport, child);

        if let Err(e) = client.initialize(SoldbAdapter::adapter_id()).await {
            logger.log_init_error(&e);
            return Err(e);
        }
        logger.log_connection_success();

        client.launch(configuration).await?;
        client.configuration_done().await?;

        let id = Uuid::new_v4().to_string();
        info!("Debug session {} started", id);
        self.sessions.lock().await.insert(id.clone(), client);
        Ok(id)
    }
}

#[async_trait]
impl SessionHost for DapSessionHost {
    async fn start_debugging(&self, configuration: &LaunchRequest) -> Result<bool> {
        let descriptor = self.factory.create_descriptor(&self.workspace_roots);
        let mut child = descriptor.spawn()?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::Process("Failed to get adapter stdin".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::Process("Failed to get adapter stdout".to_string()))?;

        let transport = Box::new(DapTransport::from_child(stdin, stdout));
        match self
            .establish(transport, Some(child), &descriptor, configuration)
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => {
                error!("Adapter handshake failed: {}", e);
                descriptor.log_shutdown();
                Err(e)
            }
        }
    }
}
