//! DNS sidecar: synthetic DNS probes and cache statistics behind a scrape endpoint.

pub mod bootstrap;
pub mod cli;
pub mod di;
pub mod errors;
pub mod server;
pub mod signals;
pub mod supervisor;

pub use errors::SidecarError;
pub use supervisor::Supervisor;
