use super::{deploy, workflow, AppTarget, DEPLOY_STEP_NAME};
use crate::workflow::document::{secret_ref, Scalar, Step, Workflow};

crate::define_id_enum! {
    /// Where a container image is pulled from
    ContainerRegistrySource {
        Acr => "acr" : "Azure Container Registry",
        Docker => "docker" : "Docker Hub",
        PrivateRegistry => "privateRegistry" : "Private registry",
    }
}

impl ContainerRegistrySource {
    /// Registry URL assumed when none is configured. Only Docker Hub has one.
    pub fn default_server_url(&self, docker_hub_host: &str) -> Option<String> {
        match self {
            ContainerRegistrySource::Docker => {
                Some(format!("https://{}/v1", docker_hub_host.to_lowercase()))
            }
            ContainerRegistrySource::Acr | ContainerRegistrySource::PrivateRegistry => None,
        }
    }
}

/// Everything the container template needs
#[derive(Debug, Clone, Copy)]
pub struct ContainerTarget<'a> {
    pub app: &'a AppTarget,
    /// Registry URL as configured on the site, e.g. `https://myacr.azurecr.io`
    pub server_url: &'a str,
    pub image: &'a str,
    pub publish_profile_secret: &'a str,
    pub username_secret: &'a str,
    pub password_secret: &'a str,
    /// Any server URL containing this host is treated as Docker Hub
    pub docker_hub_host: &'a str,
}

/// Login server and image host derived from a registry URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    pub login_server: String,
    pub server: String,
}

impl Registry {
    /// Docker Hub URLs carry an API suffix (`/v1`) that must not end up in
    /// image names, so they collapse to the bare host.
    pub fn from_url(server_url: &str, docker_hub_host: &str) -> Self {
        let login_server = server_url.to_lowercase();
        let docker_hub_host = docker_hub_host.to_lowercase();
        let server = if login_server.contains(&docker_hub_host) {
            docker_hub_host
        } else {
            login_server
                .strip_prefix("https://")
                .unwrap_or(&login_server)
                .to_string()
        };

        Self {
            login_server,
            server,
        }
    }
}

pub struct ContainerTemplate;

impl ContainerTemplate {
    pub fn build(&self, target: &ContainerTarget<'_>) -> Workflow {
        let app = target.app;
        let registry = Registry::from_url(target.server_url, target.docker_hub_host);
        let image = format!(
            "{}/{}/{}:${{{{ github.sha }}}}",
            registry.server,
            secret_ref(target.username_secret),
            target.image
        );

        let steps = vec![
            Step::action("azure/docker-login@v1")
                .with("login-server", Scalar::plain(format!("{}/", registry.login_server)))
                .with("username", Scalar::secret(target.username_secret))
                .with("password", Scalar::secret(target.password_secret)),
            Step::script(Scalar::block([
                format!("docker build . -t {}", image),
                format!("docker push {}", image),
            ])),
            deploy(
                Step::named(DEPLOY_STEP_NAME),
                app.site_name.clone(),
                app,
                target.publish_profile_secret,
            )
            .with("images", Scalar::quoted(image)),
        ];

        workflow("container", app, Scalar::quoted("ubuntu-latest"), steps)
    }
}
