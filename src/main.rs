use clap::{Args, Parser, Subcommand};
use serde_json::json;
use soldb_launcher::adapters::{AdapterLocator, SoldbDescriptorFactory, SpawnDescriptor};
use soldb_launcher::config::{
    ConfigStore, JsonConfigStore, LayeredConfigStore, MapConfigStore, Settings, PYTHON_PATH_KEY,
    WALNUT_PATH_KEY,
};
use soldb_launcher::host::{
    AnnotationProvider, DapSessionHost, RealFileSystem, TerminalUi, UserInterface,
};
use soldb_launcher::scanner::{self, DebugAnnotationProvider};
use soldb_launcher::{Error, LaunchCoordinator, LaunchRequest, Result, SessionConfigResolver};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "soldb_launcher")]
#[command(about = "Debug launcher for Solidity contract functions", version, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct AdapterOptions {
    /// settings.json to read soldb.pythonPath / soldb.walnutPath from
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Python interpreter that runs the adapter
    #[arg(long, env = "SOLDB_PYTHON_PATH")]
    python_path: Option<String>,

    /// soldb checkout the adapter runs from
    #[arg(long, env = "SOLDB_WALNUT_PATH")]
    walnut_path: Option<String>,

    /// Workspace root; the first one anchors the runtime search
    #[arg(long = "workspace")]
    workspaces: Vec<PathBuf>,
}

impl AdapterOptions {
    fn config_store(&self) -> Result<LayeredConfigStore> {
        let overrides = MapConfigStore::new()
            .with(PYTHON_PATH_KEY, self.python_path.clone())
            .with(WALNUT_PATH_KEY, self.walnut_path.clone());

        let store = LayeredConfigStore::new().push(overrides);
        match &self.settings {
            Some(path) => Ok(store.push(JsonConfigStore::from_file(path)?)),
            None => Ok(store),
        }
    }

    fn workspace_roots(&self) -> Result<Vec<PathBuf>> {
        if self.workspaces.is_empty() {
            Ok(vec![std::env::current_dir()?])
        } else {
            Ok(self.workspaces.clone())
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List the debuggable functions in a Solidity file
    Scan {
        file: PathBuf,

        /// Print annotations as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show where the adapter would be started from
    Locate {
        #[command(flatten)]
        adapter: AdapterOptions,
    },

    /// Fill in defaults for a launch configuration (reads `{}` when no file is given)
    Resolve { file: Option<PathBuf> },

    /// Debug one function of a contract
    Debug {
        file: PathBuf,

        function: String,

        /// Comma separated arguments; prompted for when omitted
        #[arg(long)]
        args: Option<String>,

        #[command(flatten)]
        adapter: AdapterOptions,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { cli.log_level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Validation and launch failures were already shown to the user
            if !matches!(e, Error::Validation(_) | Error::Launch(_)) {
                error!("{}", e);
                eprintln!("error: {}", e);
            }
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Scan { file, json } => scan(file, json).await,
        Commands::Locate { adapter } => locate(adapter),
        Commands::Resolve { file } => resolve(file).await,
        Commands::Debug {
            file,
            function,
            args,
            adapter,
        } => debug(file, function, args, adapter).await,
    }
}

async fn scan(file: PathBuf, as_json: bool) -> Result<()> {
    let source = tokio::fs::read_to_string(&file).await?;

    if as_json {
        let annotations = DebugAnnotationProvider.provide_annotations(&source);
        println!("{}", serde_json::to_string_pretty(&annotations)?);
        return Ok(());
    }

    for declaration in scanner::scan(&source) {
        println!(
            "{}:{}:{}\t{}\t{} argument(s)",
            file.display(),
            declaration.source_range.start_line + 1,
            declaration.source_range.start_column + 1,
            declaration.name,
            declaration.argument_count
        );
    }
    Ok(())
}

fn locate(adapter: AdapterOptions) -> Result<()> {
    let store = adapter.config_store()?;
    let settings = Settings::read(&store as &dyn ConfigStore);
    let ui = TerminalUi::new();

    let location = AdapterLocator::new(&RealFileSystem, &ui)
        .locate(settings.walnut_path.as_deref(), &adapter.workspace_roots()?);
    let descriptor = SpawnDescriptor::new(&settings, &location);

    let output = json!({
        "location": location,
        "descriptor": descriptor,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn resolve(file: Option<PathBuf>) -> Result<()> {
    let partial: LaunchRequest = match file {
        Some(path) => serde_json::from_str(&tokio::fs::read_to_string(&path).await?)?,
        None => LaunchRequest::default(),
    };

    let resolved = SessionConfigResolver::new().resolve(partial);
    println!("{}", serde_json::to_string_pretty(&resolved)?);
    Ok(())
}

async fn debug(
    file: PathBuf,
    function: String,
    args: Option<String>,
    adapter: AdapterOptions,
) -> Result<()> {
    let source = tokio::fs::read_to_string(&file).await?;
    let declaration = scanner::scan(&source)
        .find(|d| d.name == function)
        .ok_or_else(|| {
            let available: Vec<String> = scanner::scan(&source).map(|d| d.name).collect();
            Error::InvalidRequest(format!(
                "No function '{}' in {} (found: {})",
                function,
                file.display(),
                available.join(", ")
            ))
        })?;

    let ui = Arc::new(TerminalUi::with_answer(args));
    let factory = Arc::new(SoldbDescriptorFactory::new(
        Arc::new(adapter.config_store()?),
        Arc::new(RealFileSystem),
        ui.clone(),
    ));
    let host = Arc::new(DapSessionHost::new(factory, adapter.workspace_roots()?));
    let coordinator = LaunchCoordinator::new(ui.clone(), host.clone());

    coordinator
        .launch(
            &declaration.name,
            declaration.argument_count,
            Some(file.canonicalize()?),
        )
        .await?;

    ui.show_info(&format!("Debugging {} in {}", declaration.name, file.display()));
    host.wait_for_sessions().await
}
