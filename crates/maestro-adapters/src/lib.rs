//! Infrastructure adapters for Maestro.
//!
//! This crate implements the ports defined in `maestro-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod codec;
pub mod hosting;
pub mod storage;

// Re-export commonly used adapters
pub use hosting::{Lando, PlatformSh, default_registry};
pub use storage::{LocalStorage, MemoryStorage, Operation};
