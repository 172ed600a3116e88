pub mod client;
pub mod transport;
pub mod types;

pub use client::DapClient;
pub use transport::{DapTransport, MessageChannel};
