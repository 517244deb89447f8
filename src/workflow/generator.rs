//! Workflow generation entry points.
//!
//! The generator is pure: it validates the request, derives the file and
//! secret names, resolves the runtime version and hands a [`CodeTarget`] or
//! [`ContainerTarget`] to the template registered for the selected family.
//! Every secret name returned to the caller is the exact name embedded in the
//! document.

use super::error::WorkflowError;
use super::templates::{
    AppTarget, CodeTarget, ContainerRegistrySource, ContainerTarget, TemplateRegistry,
    WorkflowFamily,
};
use crate::stack::{JavaContainer, RuntimeStack};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_SECRET_PREFIX: &str = "AzureAppService";
pub const DEFAULT_DOCKER_HUB_HOST: &str = "index.docker.io";
pub const DEFAULT_BRANCH: &str = "master";
pub const WORKFLOWS_DIR: &str = ".github/workflows";

crate::define_id_enum! {
    /// Kind segment of a generated secret name
    SecretKind {
        PublishProfile => "PublishProfile" : "Publish profile",
        ContainerUsername => "ContainerUsername" : "Container registry username",
        ContainerPassword => "ContainerPassword" : "Container registry password",
    }
}

crate::define_id_enum! {
    /// What the user chose to do with a workflow file already in the repository
    WorkflowOption {
        Unselected => "none" : "None",
        Overwrite => "overwrite" : "Overwrite",
        Add => "add" : "Add",
        UseAvailableWorkflowConfigs => "useAvailableWorkflowConfigs" : "Use available workflow",
        UseExistingWorkflowConfig => "useExistingWorkflowConfig" : "Use existing workflow",
    }
}

/// Characters a caller-supplied value may carry besides ASCII letters and digits
struct Charset {
    extra: &'static [char],
    described: &'static str,
}

impl Charset {
    fn check(&self, field: &'static str, value: &str) -> Result<(), WorkflowError> {
        if value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || self.extra.contains(&c))
        {
            Ok(())
        } else {
            Err(WorkflowError::InvalidValue {
                field,
                value: value.to_string(),
                allowed: self.described,
            })
        }
    }
}

const SECRET_GUID_CHARS: Charset = Charset {
    extra: &['-', '_'],
    described: "'-_'",
};

const IMAGE_CHARS: Charset = Charset {
    extra: &['.', '-', '_', '/'],
    described: "'.-_/'",
};

const SERVER_URL_CHARS: Charset = Charset {
    extra: &['.', '-', '_', '/', ':'],
    described: "'.-_/:'",
};

/// Constants baked into generated names and documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratorConfig {
    pub secret_prefix: String,
    pub docker_hub_host: String,
    /// Used when a code request carries no branch
    pub default_branch: String,
    /// Java runtime versions naming this container build a WAR
    pub java_war_container: JavaContainer,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            secret_prefix: DEFAULT_SECRET_PREFIX.to_string(),
            docker_hub_host: DEFAULT_DOCKER_HUB_HOST.to_string(),
            default_branch: DEFAULT_BRANCH.to_string(),
            java_war_container: JavaContainer::Tomcat,
        }
    }
}

/// Input for a code (non-container) deployment workflow
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeWorkflowRequest {
    pub site_name: String,
    #[serde(default)]
    pub slot_name: Option<String>,
    #[serde(default)]
    pub branch: String,
    pub runtime_stack: String,
    pub runtime_version: String,
    #[serde(default)]
    pub recommended_version: Option<String>,
    #[serde(default)]
    pub is_linux: bool,
    pub secret_guid: String,
}

/// Input for a container deployment workflow
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerWorkflowRequest {
    pub site_name: String,
    #[serde(default)]
    pub slot_name: Option<String>,
    pub branch: String,
    pub server_url: String,
    pub image: String,
    pub publish_profile_guid: String,
    pub username_guid: String,
    pub password_guid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeWorkflowInformation {
    pub file_name: String,
    pub content: String,
    pub secret_name: String,
}

impl CodeWorkflowInformation {
    pub fn file_path(&self) -> String {
        workflow_file_path(&self.file_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerWorkflowInformation {
    pub file_name: String,
    pub content: String,
    pub publishing_profile_secret_name: String,
    pub container_username_secret_name: String,
    pub container_password_secret_name: String,
}

impl ContainerWorkflowInformation {
    pub fn file_path(&self) -> String {
        workflow_file_path(&self.file_name)
    }
}

fn workflow_file_path(file_name: &str) -> String {
    format!("{}/{}", WORKFLOWS_DIR, file_name)
}

pub struct WorkflowGenerator {
    config: GeneratorConfig,
    templates: TemplateRegistry,
}

impl WorkflowGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self::with_templates(config, TemplateRegistry::with_defaults())
    }

    pub fn with_templates(config: GeneratorConfig, templates: TemplateRegistry) -> Self {
        Self { config, templates }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn code_app_workflow_information(
        &self,
        request: &CodeWorkflowRequest,
    ) -> Result<CodeWorkflowInformation, WorkflowError> {
        if request.site_name.is_empty() {
            return Err(WorkflowError::EmptySiteName);
        }

        let stack = RuntimeStack::from_name(&request.runtime_stack)
            .ok_or_else(|| WorkflowError::UnsupportedStack(request.runtime_stack.clone()))?;
        SECRET_GUID_CHARS.check("secret GUID", &request.secret_guid)?;

        let branch = if request.branch.is_empty() {
            self.config.default_branch.as_str()
        } else {
            request.branch.as_str()
        };

        let app = AppTarget::new(&request.site_name, request.slot_name.as_deref(), branch);
        let file_name = workflow_file_name(branch, &app.site_name, app.slot_name.as_deref());
        let secret_name = secret_name(
            &self.config.secret_prefix,
            SecretKind::PublishProfile,
            &request.secret_guid,
        );

        let runtime_version = resolve_runtime_version(
            request.is_linux,
            &request.runtime_version,
            request.recommended_version.as_deref(),
        )?;

        let family = select_family(
            stack,
            request.is_linux,
            &request.runtime_version,
            self.config.java_war_container,
        );
        let template = self
            .templates
            .get_code_template(family)
            .ok_or_else(|| WorkflowError::UnsupportedStack(request.runtime_stack.clone()))?;

        debug!(
            stack = %stack,
            family = %family,
            runtime_version = %runtime_version,
            file_name = %file_name,
            "Generating code workflow"
        );

        let workflow = template.build(&CodeTarget {
            app: &app,
            is_linux: request.is_linux,
            runtime_version: &runtime_version,
            publish_profile_secret: &secret_name,
        });

        Ok(CodeWorkflowInformation {
            file_name,
            content: workflow.render(),
            secret_name,
        })
    }

    pub fn container_app_workflow_information(
        &self,
        request: &ContainerWorkflowRequest,
    ) -> Result<ContainerWorkflowInformation, WorkflowError> {
        if request.site_name.is_empty() {
            return Err(WorkflowError::EmptySiteName);
        }
        if request.branch.is_empty() {
            return Err(WorkflowError::MissingBranch);
        }
        SERVER_URL_CHARS.check("server URL", &request.server_url)?;
        IMAGE_CHARS.check("image", &request.image)?;
        SECRET_GUID_CHARS.check("publish profile GUID", &request.publish_profile_guid)?;
        SECRET_GUID_CHARS.check("username GUID", &request.username_guid)?;
        SECRET_GUID_CHARS.check("password GUID", &request.password_guid)?;

        let app = AppTarget::new(
            &request.site_name,
            request.slot_name.as_deref(),
            &request.branch,
        );
        let file_name = workflow_file_name(&app.branch, &app.site_name, app.slot_name.as_deref());

        let prefix = &self.config.secret_prefix;
        let publishing_profile_secret_name =
            secret_name(prefix, SecretKind::PublishProfile, &request.publish_profile_guid);
        let container_username_secret_name =
            secret_name(prefix, SecretKind::ContainerUsername, &request.username_guid);
        let container_password_secret_name =
            secret_name(prefix, SecretKind::ContainerPassword, &request.password_guid);

        debug!(
            server_url = %request.server_url,
            image = %request.image,
            file_name = %file_name,
            "Generating container workflow"
        );

        let workflow = self.templates.container_template().build(&ContainerTarget {
            app: &app,
            server_url: &request.server_url,
            image: &request.image,
            publish_profile_secret: &publishing_profile_secret_name,
            username_secret: &container_username_secret_name,
            password_secret: &container_password_secret_name,
            docker_hub_host: &self.config.docker_hub_host,
        });

        Ok(ContainerWorkflowInformation {
            file_name,
            content: workflow.render(),
            publishing_profile_secret_name,
            container_username_secret_name,
            container_password_secret_name,
        })
    }
}

impl Default for WorkflowGenerator {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}

/// Generates a code workflow with the built-in templates.
pub fn code_app_workflow_information(
    request: &CodeWorkflowRequest,
    config: &GeneratorConfig,
) -> Result<CodeWorkflowInformation, WorkflowError> {
    WorkflowGenerator::new(config.clone()).code_app_workflow_information(request)
}

/// Generates a container workflow with the built-in templates.
pub fn container_app_workflow_information(
    request: &ContainerWorkflowRequest,
    config: &GeneratorConfig,
) -> Result<ContainerWorkflowInformation, WorkflowError> {
    WorkflowGenerator::new(config.clone()).container_app_workflow_information(request)
}

/// Registry URL for a container workflow: the one supplied, or the Docker Hub
/// URL when the source is Docker Hub.
pub fn resolve_server_url(
    source: Option<ContainerRegistrySource>,
    server_url: Option<&str>,
    docker_hub_host: &str,
) -> Result<String, WorkflowError> {
    if let Some(url) = server_url.filter(|url| !url.is_empty()) {
        return Ok(url.to_string());
    }

    source
        .and_then(|source| source.default_server_url(docker_hub_host))
        .ok_or(WorkflowError::MissingServerUrl)
}

/// Picks the version written into the setup step.
///
/// A non-empty recommended version always wins. Otherwise Linux versions are
/// `<STACK>|<version>` and the part after the first `|` is used, while
/// Windows versions are used as they are.
pub fn resolve_runtime_version(
    is_linux: bool,
    runtime_version: &str,
    recommended_version: Option<&str>,
) -> Result<String, WorkflowError> {
    if let Some(recommended) = recommended_version.filter(|v| !v.is_empty()) {
        return Ok(recommended.to_string());
    }

    if !is_linux {
        return Ok(runtime_version.to_string());
    }

    runtime_version
        .split('|')
        .nth(1)
        .map(str::to_string)
        .ok_or_else(|| WorkflowError::MalformedVersion(runtime_version.to_string()))
}

/// `<branch>_<site>.yml`, or `<branch>_<site>(<slot>).yml` for a slot. Path
/// separators in the branch become dashes.
pub fn workflow_file_name(branch: &str, site_name: &str, slot_name: Option<&str>) -> String {
    let branch = branch.replace('/', "-");
    match slot_name.filter(|s| !s.is_empty()) {
        Some(slot) => format!("{}_{}({}).yml", branch, site_name, slot),
        None => format!("{}_{}.yml", branch, site_name),
    }
}

pub fn secret_name(prefix: &str, kind: SecretKind, guid: &str) -> String {
    format!("{}_{}_{}", prefix, kind.as_str(), guid)
}

/// True when the runtime version names the WAR-capable container, ignoring case.
pub fn is_java_war_build(runtime_version: &str, war_container: &str) -> bool {
    runtime_version
        .to_lowercase()
        .contains(&war_container.to_lowercase())
}

pub fn is_workflow_option_existing_or_available(option: WorkflowOption) -> bool {
    matches!(
        option,
        WorkflowOption::UseExistingWorkflowConfig | WorkflowOption::UseAvailableWorkflowConfigs
    )
}

/// Family for a code stack. Java is decided on the version as the user
/// selected it, before any recommended version replaces it.
pub fn select_family(
    stack: RuntimeStack,
    is_linux: bool,
    runtime_version: &str,
    war_container: JavaContainer,
) -> WorkflowFamily {
    match stack {
        RuntimeStack::Node => WorkflowFamily::Node,
        RuntimeStack::Python if is_linux => WorkflowFamily::PythonLinux,
        RuntimeStack::Python => WorkflowFamily::PythonWindows,
        RuntimeStack::DotNetCore => WorkflowFamily::DotNetCore,
        RuntimeStack::Java8 | RuntimeStack::Java11 => {
            if is_java_war_build(runtime_version, war_container.as_str()) {
                WorkflowFamily::JavaWar
            } else {
                WorkflowFamily::JavaJar
            }
        }
        RuntimeStack::AspNet => WorkflowFamily::AspNet,
    }
}
