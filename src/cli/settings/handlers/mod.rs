mod endpoint;
mod pacing;

pub use endpoint::EndpointHandler;
pub use pacing::{ChunkSizeHandler, DelayMsHandler};
