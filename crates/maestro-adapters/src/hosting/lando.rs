//! Lando local development environment.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use maestro_core::{
    application::{ApplicationError, BuildStepResult, Document, HostingProvider, ProjectLayout, Storage},
    domain::Project,
};

use super::{application_id, write_yaml};

const NAME: &str = "Lando";
const PROXY_DOMAIN: &str = "lndo.site";

#[derive(Debug, Serialize)]
struct LandoFile {
    name: String,
    proxy: Proxy,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    services: BTreeMap<String, SolrService>,
}

#[derive(Debug, Serialize)]
struct Proxy {
    appserver: Vec<String>,
}

#[derive(Debug, Serialize)]
struct SolrService {
    #[serde(rename = "type")]
    kind: &'static str,
    portforward: bool,
    core: &'static str,
    config: SolrConfig,
}

#[derive(Debug, Serialize)]
struct SolrConfig {
    dir: &'static str,
}

#[derive(Debug)]
pub struct Lando {
    layout: ProjectLayout,
    instructions: Vec<String>,
}

impl Lando {
    pub fn new(layout: ProjectLayout) -> Self {
        Self {
            layout,
            instructions: Vec::new(),
        }
    }

    fn resources(&self, project: &Project) -> PathBuf {
        self.layout.provider_resources(&project.project_type, NAME)
    }

    fn lando_file(project: &Project) -> LandoFile {
        let mut file = LandoFile {
            name: application_id(&project.name),
            proxy: Proxy {
                appserver: Vec::with_capacity(project.sites().len()),
            },
            services: BTreeMap::new(),
        };

        for (id, site) in project.sites() {
            file.proxy
                .appserver
                .push(format!("{}.{PROXY_DOMAIN}", site.url));

            if site.requires_solr() {
                file.services.insert(
                    format!("{id}_solr"),
                    SolrService {
                        kind: "solr:7",
                        portforward: true,
                        core: "default",
                        config: SolrConfig {
                            dir: ".lando/config/solr/7.x/default",
                        },
                    },
                );
            }
        }

        file
    }

    /// Make sure `.env` exists and carries a hash salt.
    fn prepare_env(&self, resources: &Path, storage: &dyn Storage) -> BuildStepResult {
        let env = Path::new(".env");
        let sample = Path::new(".env.sample");

        if !storage.exists(env) {
            let source = if storage.exists(sample) {
                sample.to_path_buf()
            } else {
                resources.join("templates/.env.sample")
            };
            storage.copy(&source, env)?;
            info!(from = %source.display(), "Created local .env file");
        }

        let mut vars = storage
            .read(env)?
            .into_env()
            .ok_or_else(|| ApplicationError::Document {
                path: env.to_path_buf(),
                action: "decode",
                reason: "expected KEY=value lines".into(),
            })?;

        if vars.get("HASH_SALT").is_none_or(|salt| salt.trim().is_empty()) {
            vars.insert("HASH_SALT".into(), hash_salt());
            storage.write(env, &Document::Env(vars))?;
            info!("Added HASH_SALT to .env");
        }

        Ok(())
    }
}

fn hash_salt() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

impl HostingProvider for Lando {
    fn name(&self) -> &str {
        NAME
    }

    #[instrument(skip_all, fields(provider = NAME))]
    fn build(&mut self, project: &Project, storage: &dyn Storage) -> BuildStepResult {
        self.instructions.clear();
        let resources = self.resources(project);

        debug!("Creating Lando base configuration file");
        storage.copy(
            &resources.join("templates/.lando.base.yml"),
            Path::new(".lando.base.yml"),
        )?;

        debug!("Creating Lando project configuration file");
        write_yaml(storage, Path::new(".lando.yml"), &Self::lando_file(project))?;

        let bundled = resources.join("resources");
        if storage.exists(&bundled) {
            debug!("Copying Lando resources to project");
            storage.create_directory(Path::new(".lando"))?;
            storage.copy_directory(&bundled, Path::new(".lando"))?;
        }

        self.prepare_env(&resources, storage)?;

        self.instructions.push(
            "Run 'lando start' to start the environment, or 'lando rebuild -y' if it is already running"
                .into(),
        );
        for site in project.sites().values() {
            self.instructions
                .push(format!("{}: https://{}.{PROXY_DOMAIN}", site.name, site.url));
        }

        Ok(())
    }

    fn instructions(&self) -> &[String] {
        &self.instructions
    }
}
