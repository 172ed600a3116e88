pub mod adapters;
pub mod config;
pub mod dap;
pub mod error;
pub mod host;
pub mod launch;
pub mod scanner;

pub use error::Error;
pub use launch::{LaunchCoordinator, LaunchRequest, SessionConfigResolver};
pub use scanner::{scan, FunctionDeclaration};

pub type Result<T> = std::result::Result<T, Error>;
