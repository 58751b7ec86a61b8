//! Application layer for Maestro.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (ProjectRegistry, BuildService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Layout**: Where things live relative to the project root
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! registry rules itself. Those live in `crate::domain`.

pub mod error;
pub mod layout;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    BuildReport, BuildService, HostingRegistry, ProjectRegistry, known_project_types,
    render_status,
};

// Re-export port traits (for adapter implementation)
pub use ports::{
    BuildStepResult, Document, EntryFilter, HostingProvider, HostingProviderDescriptor, Storage,
};

pub use error::ApplicationError;
pub use layout::ProjectLayout;
