pub mod data;
pub mod endpoint;
pub mod io;
pub mod orchestrator;
pub mod printing;

pub use data::Config;
pub use endpoint::{EndpointConfig, EndpointStore, MemoryEndpointStore};
pub use io::ConfigError;
pub use orchestrator::ConfigOrchestrator;

#[cfg(test)]
mod tests;
