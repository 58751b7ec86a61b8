use serde_yaml::Value;

use crate::domain::{
    entities::Project,
    error::DomainError,
    schema::{Schema, ValidationReport},
};

/// Centralized domain validation.
///
/// Every persisted or loaded project document passes through here.
pub struct DomainValidator;

impl DomainValidator {
    /// Validate a raw document tree.
    pub fn validate_document(document: &Value, schema: &Schema) -> ValidationReport {
        schema.validate(document)
    }

    /// Serialize `project` and validate the resulting document.
    ///
    /// Returns the document on success so callers write exactly what was
    /// validated.
    pub fn validate_project(project: &Project, schema: &Schema) -> Result<Value, DomainError> {
        project.check_integrity()?;
        let document = serde_yaml::to_value(project).map_err(|e| DomainError::Malformed {
            reason: e.to_string(),
        })?;
        Self::validate_document(&document, schema).into_result()?;
        Ok(document)
    }

    /// Validate a raw document and decode it into a [`Project`].
    pub fn parse_project(document: Value, schema: &Schema) -> Result<Project, DomainError> {
        Self::validate_document(&document, schema).into_result()?;
        let project: Project = serde_yaml::from_value(document).map_err(|e| DomainError::Malformed {
            reason: e.to_string(),
        })?;
        project.check_integrity()?;
        Ok(project)
    }

    /// Check `project_type` against the types the hosting package provides.
    pub fn validate_project_type(project_type: &str, known: &[String]) -> Result<(), DomainError> {
        if known.iter().any(|t| t == project_type) {
            Ok(())
        } else {
            Err(DomainError::UnknownProjectType {
                project_type: project_type.to_string(),
                known: known.to_vec(),
            })
        }
    }
}
