//! deploy-center - GitHub Actions workflows for web app deployments
//!
//! This library generates the workflow document that builds and deploys a web
//! app from a GitHub repository, along with the names of the repository
//! secrets that document references. It also carries the catalog of runtime
//! stacks a web app can use and the sequence that records a manually
//! configured GitHub Actions deployment against a site.
//!
//! # Example Usage
//!
//! ```no_run
//! use deploy_center::workflow::{CodeWorkflowRequest, WorkflowGenerator};
//!
//! let generator = WorkflowGenerator::default();
//! let info = generator.code_app_workflow_information(&CodeWorkflowRequest {
//!     site_name: "app1".to_string(),
//!     branch: "main".to_string(),
//!     runtime_stack: "node".to_string(),
//!     runtime_version: "NODE|14-lts".to_string(),
//!     is_linux: true,
//!     secret_guid: "0f1e2d3c".to_string(),
//!     ..Default::default()
//! })?;
//!
//! println!("{}:\n{}", info.file_path(), info.content);
//! println!("Register secret {}", info.secret_name);
//! # Ok::<(), deploy_center::WorkflowError>(())
//! ```
//!
//! # Project Structure
//!
//! - [`workflow`]: document model, per-stack templates and the generator
//! - [`stack`]: runtime stack identifiers and the stack catalog
//! - [`source_control`]: linkage of a site to a GitHub Actions deployment
//! - [`config`]: environment-driven configuration

pub mod cli;
pub mod config;
pub mod source_control;
pub mod stack;
pub mod util;
pub mod workflow;

pub use config::{ConfigError, DeployCenterConfig};
pub use source_control::{
    is_api_sync_error, update_github_action_source_control_properties_manually, ApiError,
    DeploymentCenterData, SourceControlError,
};
pub use stack::{CatalogError, Os, RuntimeStack, StackCatalog, StackFilter, WebAppStack};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};
pub use workflow::{
    CodeWorkflowInformation, ContainerWorkflowInformation, GeneratorConfig, WorkflowError,
    WorkflowGenerator,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
