//! Declarative schema for the project document.
//!
//! A [`Schema`] is a tree of [`FieldRule`]s, itself loaded from YAML
//! (`resources/schemas/maestro_project.yml`). [`Schema::validate`] walks a
//! `serde_yaml::Value` against it and collects every violation instead of
//! stopping at the first one.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::domain::error::DomainError;

/// Schema bundled with the crate.
const BUILTIN_PROJECT_SCHEMA: &str = include_str!("../../resources/schemas/maestro_project.yml");

/// Value kinds a rule can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Boolean,
    /// A string restricted to `allowed`.
    Choice,
    /// A mapping with a fixed set of named `children`.
    Object,
    /// A mapping with arbitrary keys, every value matching `prototype`.
    Map,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Boolean => "boolean",
            Self::Choice => "choice",
            Self::Object => "object",
            Self::Map => "map",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRule {
    #[serde(rename = "type")]
    pub kind: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, FieldRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prototype: Option<Box<FieldRule>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub root: FieldRule,
}

/// What went wrong at one location of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    Missing,
    WrongType { expected: FieldType },
    NotAllowed { value: String, allowed: Vec<String> },
    UnknownField,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Dotted path from the document root, e.g. `sites.uregni.status`.
    pub path: String,
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "<root>" } else { &self.path };
        match &self.kind {
            ViolationKind::Missing => write!(f, "{path}: required field is missing"),
            ViolationKind::WrongType { expected } => write!(f, "{path}: expected {expected}"),
            ViolationKind::NotAllowed { value, allowed } => write!(
                f,
                "{path}: '{value}' is not one of [{}]",
                allowed.join(", ")
            ),
            ViolationKind::UnknownField => write!(f, "{path}: field is not allowed here"),
        }
    }
}

/// Outcome of [`Schema::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_result(self) -> Result<(), DomainError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(DomainError::Validation {
                violations: self.violations,
            })
        }
    }

    fn push(&mut self, path: &str, kind: ViolationKind) {
        self.violations.push(Violation {
            path: path.to_string(),
            kind,
        });
    }
}

impl Schema {
    /// The project schema shipped with this crate.
    pub fn builtin() -> Result<Self, serde_yaml::Error> {
        Self::from_yaml_str(BUILTIN_PROJECT_SCHEMA)
    }

    pub fn from_yaml_str(source: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(source)
    }

    pub fn from_value(value: Value) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_value(value)
    }

    /// Validate `document` against this schema. Pure, no side effects.
    pub fn validate(&self, document: &Value) -> ValidationReport {
        let mut report = ValidationReport::default();
        check(&self.root, document, "", &mut report);
        report
    }
}

fn check(rule: &FieldRule, value: &Value, path: &str, report: &mut ValidationReport) {
    match rule.kind {
        FieldType::Text => {
            if !value.is_string() {
                report.push(path, ViolationKind::WrongType { expected: rule.kind });
            }
        }
        FieldType::Boolean => {
            if !value.is_bool() {
                report.push(path, ViolationKind::WrongType { expected: rule.kind });
            }
        }
        FieldType::Choice => match value.as_str() {
            Some(s) if rule.allowed.iter().any(|a| a == s) => {}
            Some(s) => report.push(
                path,
                ViolationKind::NotAllowed {
                    value: s.to_string(),
                    allowed: rule.allowed.clone(),
                },
            ),
            None => report.push(path, ViolationKind::WrongType { expected: rule.kind }),
        },
        FieldType::Object => match value.as_mapping() {
            Some(mapping) => check_object(rule, mapping, path, report),
            None => report.push(path, ViolationKind::WrongType { expected: rule.kind }),
        },
        FieldType::Map => match value.as_mapping() {
            Some(mapping) => {
                let Some(prototype) = rule.prototype.as_deref() else {
                    return;
                };
                for (key, child) in mapping {
                    let child_path = join(path, &key_label(key));
                    check(prototype, child, &child_path, report);
                }
            }
            None => report.push(path, ViolationKind::WrongType { expected: rule.kind }),
        },
    }
}

fn check_object(rule: &FieldRule, mapping: &Mapping, path: &str, report: &mut ValidationReport) {
    for (name, child_rule) in &rule.children {
        let child_path = join(path, name);
        match mapping.get(name.as_str()) {
            Some(child) => check(child_rule, child, &child_path, report),
            None if child_rule.required => report.push(&child_path, ViolationKind::Missing),
            None => {}
        }
    }

    for key in mapping.keys() {
        let known = key
            .as_str()
            .is_some_and(|k| rule.children.contains_key(k));
        if !known {
            report.push(&join(path, &key_label(key)), ViolationKind::UnknownField);
        }
    }
}

fn key_label(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|_| "?".into()),
    }
}

fn join(path: &str, segment: &str) -> String {
    if path.is_empty() {
        segment.to_string()
    } else {
        format!("{path}.{segment}")
    }
}
