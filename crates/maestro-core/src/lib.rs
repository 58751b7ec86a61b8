//! Maestro Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Maestro
//! multi-site hosting shell, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           maestro-cli (CLI)             │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │    (ProjectRegistry, BuildService)      │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │     (Driven: Storage, HostingProvider)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     maestro-adapters (Infrastructure)   │
//! │  (LocalStorage, MemoryStorage, Lando)   │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │      (Project, Site, SiteId, Schema)    │
//! │           No I/O, no globals            │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use maestro_core::prelude::*;
//!
//! # fn run(storage: Arc<dyn Storage>) -> MaestroResult<()> {
//! let layout = ProjectLayout::default();
//! let schema = Schema::builtin().map_err(|e| MaestroError::Configuration {
//!     message: e.to_string(),
//! })?;
//!
//! // 1. Load the project document
//! let mut registry = ProjectRegistry::load(storage.clone(), layout.clone(), schema)?;
//!
//! // 2. Register a site
//! let (id, site) = Site::new("NI Direct", "www.nidirect.gov.uk");
//! registry.add_site(id, site)?;
//!
//! // 3. Build with whatever providers are registered
//! let mut build = BuildService::new(storage, layout, HostingRegistry::new());
//! let report = build.build(registry.project())?;
//! for line in &report.instructions {
//!     println!("{line}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        BuildReport, BuildService, HostingRegistry, ProjectLayout, ProjectRegistry,
        ports::{
            BuildStepResult, Document, EntryFilter, HostingProvider, HostingProviderDescriptor,
            Storage,
        },
    };
    pub use crate::domain::{Project, Schema, Site, SiteId, SiteStatus};
    pub use crate::error::{MaestroError, MaestroResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
