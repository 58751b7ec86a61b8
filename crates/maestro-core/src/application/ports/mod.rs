//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `maestro-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Storage`: File operations and document codec
//!   - `HostingProvider`: One hosting target's build step
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

#[cfg(test)]
pub use output::MockStorage;
pub use output::{
    BuildStepResult, Document, EntryFilter, HostingProvider, HostingProviderDescriptor, Storage,
};
