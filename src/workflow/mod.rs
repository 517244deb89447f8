//! GitHub Actions workflow generation for web app deployments.

pub mod document;
pub mod error;
pub mod generator;
pub mod templates;

pub use document::{Job, Scalar, Step, Workflow};
pub use error::WorkflowError;
pub use generator::{
    code_app_workflow_information, container_app_workflow_information,
    is_java_war_build, is_workflow_option_existing_or_available, resolve_runtime_version,
    resolve_server_url, secret_name, select_family, workflow_file_name, CodeWorkflowInformation,
    CodeWorkflowRequest, ContainerWorkflowInformation, ContainerWorkflowRequest,
    GeneratorConfig, SecretKind, WorkflowGenerator, WorkflowOption,
};
pub use templates::{ContainerRegistrySource, TemplateRegistry, WorkflowFamily};
