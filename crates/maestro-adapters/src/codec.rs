//! Conversion between file text and [`Document`]s.
//!
//! Decoding is chosen by file extension. Encoding follows the document
//! variant, so callers decide the on-disk format when they build a document.

use std::collections::BTreeMap;
use std::path::Path;

use maestro_core::application::{ApplicationError, Document};
use maestro_core::error::MaestroResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Env,
    Text,
}

impl Format {
    pub fn for_path(path: &Path) -> Self {
        let is_env = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n == ".env" || n.ends_with(".env"));
        if is_env {
            return Self::Env;
        }

        match path.extension().and_then(|e| e.to_str()) {
            Some("yml" | "yaml") => Self::Yaml,
            _ => Self::Text,
        }
    }
}

pub fn decode(path: &Path, text: &str) -> MaestroResult<Document> {
    match Format::for_path(path) {
        Format::Yaml => {
            let value = if text.trim().is_empty() {
                serde_yaml::Value::Mapping(Default::default())
            } else {
                serde_yaml::from_str(text).map_err(|e| decode_error(path, e))?
            };
            Ok(Document::Yaml(value))
        }
        Format::Env => {
            let mut vars = BTreeMap::new();
            for item in dotenvy::from_read_iter(text.as_bytes()) {
                let (key, value) = item.map_err(|e| decode_error(path, e))?;
                vars.insert(key, value);
            }
            Ok(Document::Env(vars))
        }
        Format::Text => Ok(Document::Text(text.to_string())),
    }
}

pub fn encode(path: &Path, document: &Document) -> MaestroResult<String> {
    match document {
        Document::Yaml(value) => serde_yaml::to_string(value).map_err(|e| {
            ApplicationError::Document {
                path: path.to_path_buf(),
                action: "encode",
                reason: e.to_string(),
            }
            .into()
        }),
        Document::Env(vars) => Ok(encode_env(vars)),
        Document::Text(text) => Ok(text.clone()),
    }
}

fn encode_env(vars: &BTreeMap<String, String>) -> String {
    vars.iter()
        .map(|(key, value)| {
            if !needs_quotes(value) {
                format!("{key}={value}\n")
            } else if !value.contains('\'') {
                format!("{key}='{value}'\n")
            } else {
                let escaped = value
                    .replace('\\', "\\\\")
                    .replace('"', "\\\"")
                    .replace('$', "\\$");
                format!("{key}=\"{escaped}\"\n")
            }
        })
        .collect()
}

fn needs_quotes(value: &str) -> bool {
    value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '#' | '"' | '\'' | '\\' | '$' | '='))
}

fn decode_error(path: &Path, e: impl std::fmt::Display) -> maestro_core::error::MaestroError {
    ApplicationError::Document {
        path: path.to_path_buf(),
        action: "decode",
        reason: e.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        assert_eq!(Format::for_path(Path::new("project/project.yml")), Format::Yaml);
        assert_eq!(Format::for_path(Path::new(".platform/routes.yaml")), Format::Yaml);
        assert_eq!(Format::for_path(Path::new(".env")), Format::Env);
        assert_eq!(Format::for_path(Path::new("local.env")), Format::Env);
        assert_eq!(Format::for_path(Path::new(".env.sample")), Format::Text);
        assert_eq!(Format::for_path(Path::new("project/README.md")), Format::Text);
    }

    #[test]
    fn env_values_survive_quoting() {
        let mut vars = BTreeMap::new();
        vars.insert("HASH_SALT".to_string(), "abc-123_x".to_string());
        vars.insert("GREETING".to_string(), "hello world # not a comment".to_string());

        let text = encode(Path::new(".env"), &Document::Env(vars.clone())).unwrap();
        assert!(text.contains("HASH_SALT=abc-123_x\n"));

        let decoded = decode(Path::new(".env"), &text).unwrap();
        assert_eq!(decoded, Document::Env(vars));
    }

    #[test]
    fn env_comments_are_ignored() {
        let decoded = decode(Path::new(".env"), "# local settings\nDB_HOST=database\n").unwrap();
        assert_eq!(
            decoded.as_env().and_then(|v| v.get("DB_HOST")).map(String::as_str),
            Some("database")
        );
    }

    #[test]
    fn empty_yaml_is_an_empty_mapping() {
        let decoded = decode(Path::new("maestro.yml"), "").unwrap();
        assert!(decoded.as_yaml().is_some_and(|v| v.is_mapping()));
    }

    #[test]
    fn broken_yaml_is_a_document_error() {
        let err = decode(Path::new("project/project.yml"), "sites: [unclosed").unwrap_err();
        assert!(matches!(
            err.as_application(),
            Some(ApplicationError::Document { action: "decode", .. })
        ));
    }
}
