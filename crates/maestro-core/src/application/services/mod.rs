//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "add a site" or "build the project".

pub mod build_service;
pub mod hosting_registry;
pub mod project_registry;

pub use build_service::{BuildReport, BuildService, render_status};
pub use hosting_registry::{HostingRegistry, known_project_types};
pub use project_registry::ProjectRegistry;
