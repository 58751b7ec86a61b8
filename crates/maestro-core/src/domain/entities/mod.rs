pub mod project;
pub mod site;

pub use crate::domain::DomainError;
pub use project::Project;
pub use site::Site;
