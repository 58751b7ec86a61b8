// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Maestro.
//!
//! This module contains the project/site model and its rules. All I/O is
//! handled via ports (traits) defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Value semantics**: All domain objects are Clone + PartialEq
//! - **Rich domain model**: Invariants (unique ids, single default) live in
//!   `Project`, not in services
//!
// Public API - what the world sees
pub mod entities;
pub mod error;
pub mod schema;
pub mod value_objects;

mod validation;

// Re-exports for convenience
pub use entities::{
    project::Project,
    site::{DEFAULT_CRON_SPEC, Site, default_cron_cmd},
};

pub use error::{DomainError, ErrorCategory};

pub use schema::{FieldRule, FieldType, Schema, ValidationReport, Violation, ViolationKind};

pub use value_objects::{SiteId, SiteStatus};

pub use validation::DomainValidator;
