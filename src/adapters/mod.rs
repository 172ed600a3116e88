pub mod locator;
pub mod logging;
pub mod soldb;

pub use locator::{AdapterLocation, AdapterLocator};
pub use soldb::{SoldbAdapter, SoldbDescriptorFactory, SpawnDescriptor};
