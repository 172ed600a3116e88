pub mod config;
pub mod coordinator;

pub use config::{LaunchRequest, RequestKind, SessionConfigResolver, DEBUG_TYPE, DEFAULT_PORT};
pub use coordinator::{parse_arguments, LaunchCoordinator, DEBUG_FUNCTION_COMMAND};
