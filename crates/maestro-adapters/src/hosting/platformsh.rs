//! Platform.sh deployment target.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_yaml::{Mapping, Value};
use tracing::{debug, instrument};

use maestro_core::{
    application::{ApplicationError, BuildStepResult, HostingProvider, ProjectLayout, Storage},
    domain::Project,
    error::MaestroResult,
};

use super::write_yaml;

const NAME: &str = "PlatformSh";
const DATABASE_SERVICE: &str = "db";
const DEFAULT_APP_NAME: &str = "app";

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Route {
    Upstream { upstream: String },
    Redirect { to: String },
}

#[derive(Debug, Serialize)]
struct Service {
    #[serde(rename = "type")]
    kind: &'static str,
    disk: u32,
    configuration: Value,
}

#[derive(Debug, Serialize)]
struct Cron {
    spec: String,
    cmd: String,
}

#[derive(Debug)]
pub struct PlatformSh {
    layout: ProjectLayout,
    instructions: Vec<String>,
}

impl PlatformSh {
    pub fn new(layout: ProjectLayout) -> Self {
        Self {
            layout,
            instructions: Vec::new(),
        }
    }

    fn resources(&self, project: &Project) -> PathBuf {
        self.layout.provider_resources(&project.project_type, NAME)
    }

    fn routes(project: &Project, app: &str) -> BTreeMap<String, Route> {
        let upstream = format!("{app}:http");
        let mut routes = BTreeMap::new();

        for site in project.sites().values() {
            let apex = format!("https://{}/", site.url);
            if site.www {
                let www = format!("https://www.{}/", site.url);
                routes.insert(apex, Route::Redirect { to: www.clone() });
                routes.insert(
                    www,
                    Route::Upstream {
                        upstream: upstream.clone(),
                    },
                );
            } else {
                routes.insert(
                    apex,
                    Route::Upstream {
                        upstream: upstream.clone(),
                    },
                );
            }
        }

        routes
    }

    fn services(project: &Project) -> BTreeMap<String, Service> {
        let mut schemas = Vec::new();
        let mut endpoints = Mapping::new();
        let mut services = BTreeMap::new();

        for (id, site) in project.sites() {
            schemas.push(Value::from(site.database.clone()));

            let mut privileges = Mapping::new();
            privileges.insert(site.database.clone().into(), "admin".into());
            let mut endpoint = Mapping::new();
            endpoint.insert("default_schema".into(), site.database.clone().into());
            endpoint.insert("privileges".into(), Value::Mapping(privileges));
            endpoints.insert(id.as_str().into(), Value::Mapping(endpoint));

            if site.requires_solr() {
                services.insert(format!("{id}_solr"), solr_service());
            }
        }

        let mut configuration = Mapping::new();
        configuration.insert("schemas".into(), Value::Sequence(schemas));
        configuration.insert("endpoints".into(), Value::Mapping(endpoints));
        services.insert(
            DATABASE_SERVICE.to_string(),
            Service {
                kind: "mariadb:10.4",
                disk: 2048,
                configuration: Value::Mapping(configuration),
            },
        );

        services
    }

    /// The app template with per-site relationships and crons added.
    fn app_config(
        project: &Project,
        path: &Path,
        mut template: Mapping,
    ) -> MaestroResult<Mapping> {
        let mut relationships = match template.remove("relationships") {
            Some(Value::Mapping(existing)) => existing,
            _ => Mapping::new(),
        };
        let mut crons = match template.remove("crons") {
            Some(Value::Mapping(existing)) => existing,
            _ => Mapping::new(),
        };

        for (id, site) in project.sites() {
            relationships.insert(
                id.as_str().into(),
                format!("{DATABASE_SERVICE}:{}", id).into(),
            );
            if site.requires_solr() {
                let service = format!("{id}_solr");
                relationships.insert(service.clone().into(), format!("{service}:default").into());
            }

            let cron = Cron {
                spec: site.cron_spec.clone(),
                cmd: site.cron_cmd.clone(),
            };
            let value = serde_yaml::to_value(cron).map_err(|e| ApplicationError::Document {
                path: path.to_path_buf(),
                action: "encode",
                reason: e.to_string(),
            })?;
            crons.insert(id.as_str().into(), value);
        }

        template.insert("relationships".into(), Value::Mapping(relationships));
        template.insert("crons".into(), Value::Mapping(crons));
        Ok(template)
    }
}

fn solr_service() -> Service {
    let mut core = Mapping::new();
    core.insert("conf_dir".into(), "solr_config".into());
    let mut cores = Mapping::new();
    cores.insert("default".into(), Value::Mapping(core));

    let mut default_endpoint = Mapping::new();
    default_endpoint.insert("core".into(), "default".into());
    let mut endpoints = Mapping::new();
    endpoints.insert("default".into(), Value::Mapping(default_endpoint));

    let mut configuration = Mapping::new();
    configuration.insert("cores".into(), Value::Mapping(cores));
    configuration.insert("endpoints".into(), Value::Mapping(endpoints));

    Service {
        kind: "solr:7.7",
        disk: 1024,
        configuration: Value::Mapping(configuration),
    }
}

impl HostingProvider for PlatformSh {
    fn name(&self) -> &str {
        NAME
    }

    #[instrument(skip_all, fields(provider = NAME))]
    fn build(&mut self, project: &Project, storage: &dyn Storage) -> BuildStepResult {
        self.instructions.clear();

        let template_path = self.resources(project).join("templates/.platform.app.yaml");
        let template = match storage.read(&template_path)?.into_yaml() {
            Some(Value::Mapping(mapping)) => mapping,
            _ => {
                return Err(ApplicationError::Document {
                    path: template_path,
                    action: "decode",
                    reason: "expected a YAML mapping".into(),
                }
                .into());
            }
        };
        let app = template
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_APP_NAME)
            .to_string();

        debug!("Creating Platform.sh routes");
        write_yaml(storage, Path::new(".platform/routes.yaml"), &Self::routes(project, &app))?;

        debug!("Creating Platform.sh services");
        write_yaml(storage, Path::new(".platform/services.yaml"), &Self::services(project))?;

        debug!("Creating Platform.sh application configuration");
        let app_path = Path::new(".platform.app.yaml");
        let app_config = Self::app_config(project, app_path, template)?;
        write_yaml(storage, app_path, &app_config)?;

        self.instructions.push(format!(
            "Set the Platform.sh git remote: platform project:set-remote {}",
            project.id
        ));
        self.instructions
            .push("Commit the generated .platform files and push to deploy: git push platform".into());

        Ok(())
    }

    fn instructions(&self) -> &[String] {
        &self.instructions
    }
}
