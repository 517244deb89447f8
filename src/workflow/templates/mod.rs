//! One workflow template per stack family.
//!
//! Every code template receives the same [`CodeTarget`] and returns a complete
//! [`Workflow`]. The [`TemplateRegistry`] maps families to templates so a new
//! family is added by registering a template, not by growing a match in the
//! generator.

use super::document::{Job, Scalar, Step, Workflow};
use std::collections::HashMap;

pub mod aspnet;
pub mod container;
pub mod dotnet;
pub mod java;
pub mod node;
pub mod python;

pub use aspnet::AspNetTemplate;
pub use container::{ContainerRegistrySource, ContainerTarget, ContainerTemplate, Registry};
pub use dotnet::DotNetCoreTemplate;
pub use java::{JavaJarTemplate, JavaWarTemplate};
pub use node::NodeTemplate;
pub use python::{PythonLinuxTemplate, PythonWindowsTemplate};

pub const PRODUCTION_SLOT: &str = "production";
pub const JOB_ID: &str = "build-and-deploy";
pub const CHECKOUT_ACTION: &str = "actions/checkout@master";
pub const DEPLOY_ACTION: &str = "azure/webapps-deploy@v2";
pub const DEPLOY_STEP_NAME: &str = "Deploy to Azure Web App";

const HEADER_COMMENTS: [&str; 2] = [
    "Docs for the Azure Web Apps Deploy action: https://github.com/Azure/webapps-deploy",
    "More GitHub Actions for Azure: https://github.com/Azure/actions",
];

crate::define_id_enum! {
    /// Shape of a generated workflow
    WorkflowFamily {
        Node => "node" : "Node.js",
        PythonWindows => "python-windows" : "Python (Windows)",
        PythonLinux => "python-linux" : "Python (Linux)",
        DotNetCore => "dotnetcore" : ".NET Core",
        JavaJar => "java-jar" : "Java JAR",
        JavaWar => "java-war" : "Java WAR",
        AspNet => "aspnet" : "ASP.NET",
        Container => "container" : "Container",
    }
}

/// Site, slot and branch a workflow deploys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppTarget {
    pub site_name: String,
    pub slot_name: Option<String>,
    pub branch: String,
}

impl AppTarget {
    /// An empty slot name means the production slot.
    pub fn new(site_name: &str, slot_name: Option<&str>, branch: &str) -> Self {
        Self {
            site_name: site_name.to_string(),
            slot_name: slot_name.filter(|s| !s.is_empty()).map(str::to_string),
            branch: branch.to_string(),
        }
    }

    /// `site` for production, `site(slot)` otherwise
    pub fn display_name(&self) -> String {
        match &self.slot_name {
            Some(slot) => format!("{}({})", self.site_name, slot),
            None => self.site_name.clone(),
        }
    }

    pub fn slot(&self) -> &str {
        self.slot_name.as_deref().unwrap_or(PRODUCTION_SLOT)
    }
}

/// Everything a code template needs
#[derive(Debug, Clone, Copy)]
pub struct CodeTarget<'a> {
    pub app: &'a AppTarget,
    pub is_linux: bool,
    /// Already resolved, e.g. `14.x` rather than `NODE|14-lts`
    pub runtime_version: &'a str,
    pub publish_profile_secret: &'a str,
}

pub trait CodeWorkflowTemplate: Send + Sync {
    fn family(&self) -> WorkflowFamily;

    fn build(&self, target: &CodeTarget<'_>) -> Workflow;
}

pub(crate) fn runner(is_linux: bool) -> Scalar {
    if is_linux {
        Scalar::plain("ubuntu-latest")
    } else {
        Scalar::plain("windows-latest")
    }
}

/// Wraps the family-specific steps into the shared document skeleton: header
/// comments, push trigger, single job starting with a checkout.
pub(crate) fn workflow(app_kind: &str, app: &AppTarget, runs_on: Scalar, steps: Vec<Step>) -> Workflow {
    let steps = std::iter::once(Step::action(CHECKOUT_ACTION))
        .chain(steps)
        .collect();

    Workflow {
        comments: HEADER_COMMENTS.iter().map(|c| c.to_string()).collect(),
        name: Scalar::plain(format!(
            "Build and deploy {} app to Azure Web App - {}",
            app_kind,
            app.display_name()
        )),
        push_branches: vec![Scalar::plain(app.branch.as_str())],
        jobs: vec![Job {
            id: JOB_ID.to_string(),
            runs_on,
            steps,
        }],
    }
}

/// Adds the deploy action and its common parameters to `step`.
pub(crate) fn deploy(step: Step, app_name: String, app: &AppTarget, publish_profile_secret: &str) -> Step {
    step.uses(DEPLOY_ACTION)
        .with("app-name", Scalar::quoted(app_name))
        .with("slot-name", Scalar::quoted(app.slot()))
        .with("publish-profile", Scalar::secret(publish_profile_secret))
}

pub struct TemplateRegistry {
    code: HashMap<WorkflowFamily, Box<dyn CodeWorkflowTemplate>>,
    container: ContainerTemplate,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self {
            code: HashMap::new(),
            container: ContainerTemplate,
        }
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(Box::new(NodeTemplate));
        registry.register(Box::new(PythonWindowsTemplate));
        registry.register(Box::new(PythonLinuxTemplate));
        registry.register(Box::new(DotNetCoreTemplate));
        registry.register(Box::new(JavaJarTemplate));
        registry.register(Box::new(JavaWarTemplate));
        registry.register(Box::new(AspNetTemplate));

        registry
    }

    /// Registers `template` for its family, replacing any previous one.
    pub fn register(&mut self, template: Box<dyn CodeWorkflowTemplate>) {
        self.code.insert(template.family(), template);
    }

    pub fn get_code_template(&self, family: WorkflowFamily) -> Option<&dyn CodeWorkflowTemplate> {
        self.code.get(&family).map(|t| t.as_ref())
    }

    pub fn container_template(&self) -> &ContainerTemplate {
        &self.container
    }

    pub fn code_families(&self) -> Vec<WorkflowFamily> {
        WorkflowFamily::all_variants()
            .iter()
            .copied()
            .filter(|family| self.code.contains_key(family))
            .collect()
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
