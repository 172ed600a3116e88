use std::error::Error;
use tracing::{debug, error, info};

/// Logging contract for the adapter lifecycle
///
/// Gives every stage of bringing up the adapter process the same shape in
/// the log, so a failed session can be followed from location to shutdown.
///
/// # Lifecycle Events
///
/// 1. Location (`log_location`) - Where the runtime was found
/// 2. Spawn (`log_spawn_attempt`) - Process starting
/// 3. Connection (`log_connection_success`) - Initialize handshake done
/// 4. Shutdown (`log_shutdown`) - Adapter gone
///
/// Errors are logged via `log_spawn_error` and `log_init_error`.
pub trait DebugAdapterLogger {
    /// Adapter identifier used in the initialize request
    fn adapter_id(&self) -> &str;

    /// Full command line that will be executed
    fn command_line(&self) -> String;

    /// Directory the process is started in, if known
    fn working_directory(&self) -> Option<String>;

    /// Module search path handed to the interpreter, if any
    fn module_path(&self) -> Option<String>;

    /// Default format:
    /// ```text
    /// 📍 [SOLDB] Runtime root: /src/walnut-cli
    ///    PYTHONPATH: /src/walnut-cli/src
    /// ```
    fn log_location(&self) {
        match self.working_directory() {
            Some(dir) => info!(
                "📍 [{}] Runtime root: {}",
                self.adapter_id().to_uppercase(),
                dir
            ),
            None => info!(
                "📍 [{}] Runtime root unresolved, using inherited working directory",
                self.adapter_id().to_uppercase()
            ),
        }
        if let Some(path) = self.module_path() {
            debug!("   PYTHONPATH: {}", path);
        }
    }

    /// Default format:
    /// ```text
    /// 🚀 [SOLDB] Spawning adapter process
    ///    Command: python3 -m soldb.dap_server
    /// ```
    fn log_spawn_attempt(&self) {
        info!(
            "🚀 [{}] Spawning adapter process",
            self.adapter_id().to_uppercase()
        );
        debug!("   Command: {}", self.command_line());
    }

    fn log_connection_success(&self) {
        info!(
            "✅ [{}] Adapter initialized and ready",
            self.adapter_id().to_uppercase()
        );
    }

    fn log_shutdown(&self) {
        info!(
            "🛑 [{}] Adapter session ended",
            self.adapter_id().to_uppercase()
        );
    }

    /// Spawn failures get the command and the usual causes spelled out
    fn log_spawn_error(&self, err: &dyn Error) {
        error!(
            "❌ [{}] Failed to spawn adapter: {}",
            self.adapter_id().to_uppercase(),
            err
        );
        error!("   Command: {}", self.command_line());
        error!("   Possible causes:");
        error!("   1. Python interpreter not found → set soldb.pythonPath");
        error!("   2. soldb not importable → set soldb.walnutPath to the checkout");
        error!(
            "   3. Working directory missing → {}",
            self.working_directory().unwrap_or_else(|| "<unset>".to_string())
        );
    }

    fn log_init_error(&self, err: &dyn Error) {
        error!(
            "❌ [{}] Adapter spawned but initialize failed: {}",
            self.adapter_id().to_uppercase(),
            err
        );
    }
}
