use crate::stack::Os;
use crate::workflow::ContainerRegistrySource;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// GitHub Actions workflow generation for web app deployments
#[derive(Parser, Debug)]
#[command(
    name = "deploy-center",
    about = "GitHub Actions workflow generation for web app deployments",
    version,
    author,
    long_about = "deploy-center generates the GitHub Actions workflow that builds and deploys \
                  a web app, names the repository secrets the workflow expects, and lists \
                  the runtime stacks a web app can use."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Generate a deployment workflow")]
    Generate(GenerateArgs),

    #[command(
        about = "List supported runtime stacks",
        long_about = "Lists the runtime stacks from the built-in catalog, or from the file \
                      given by --catalog or DEPLOY_CENTER_STACKS_FILE.\n\n\
                      Examples:\n  \
                      deploy-center stacks\n  \
                      deploy-center stacks --os linux --remove-hidden --remove-deprecated\n  \
                      deploy-center stacks --stack node --format json"
    )]
    Stacks(StacksArgs),

    #[command(about = "Show the effective configuration")]
    Config(ConfigArgs),
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[command(subcommand)]
    pub target: GenerateTarget,
}

#[derive(Subcommand, Debug, Clone)]
pub enum GenerateTarget {
    #[command(
        about = "Workflow that builds app sources and deploys them",
        long_about = "Generates the workflow for a code deployment.\n\n\
                      Examples:\n  \
                      deploy-center generate code --site app1 --stack node --runtime-version 'NODE|14-lts' --linux\n  \
                      deploy-center generate code --site app1 --slot staging --stack java-11 \
                      --runtime-version 'TOMCAT|9.0-java11' --linux --repo-dir ."
    )]
    Code(CodeArgs),

    #[command(
        about = "Workflow that builds a container image and deploys it",
        long_about = "Generates the workflow for a container deployment.\n\n\
                      Examples:\n  \
                      deploy-center generate container --site app1 --branch main \
                      --server-url https://myacr.azurecr.io --image web\n  \
                      deploy-center generate container --site app1 --branch main \
                      --registry-source docker --image web"
    )]
    Container(ContainerArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CodeArgs {
    #[arg(long, value_name = "NAME", help = "Web app name")]
    pub site: String,

    #[arg(long, value_name = "NAME", help = "Deployment slot (production when omitted)")]
    pub slot: Option<String>,

    #[arg(
        long,
        value_name = "BRANCH",
        help = "Branch whose pushes trigger the workflow (defaults to DEPLOY_CENTER_DEFAULT_BRANCH)"
    )]
    pub branch: Option<String>,

    #[arg(long, value_name = "ID", help = "Runtime stack: node, python, dotnetcore, java-8, java-11, aspnet")]
    pub stack: String,

    #[arg(long, value_name = "VERSION", help = "Runtime version as configured on the site")]
    pub runtime_version: String,

    #[arg(
        long,
        value_name = "VERSION",
        help = "Version for the setup action, overrides the runtime version"
    )]
    pub recommended_version: Option<String>,

    #[arg(long, help = "The site runs on Linux")]
    pub linux: bool,

    #[arg(long, value_name = "GUID", help = "Publish profile secret suffix (generated when omitted)")]
    pub secret_guid: Option<String>,

    #[command(flatten)]
    pub output: WorkflowOutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ContainerArgs {
    #[arg(long, value_name = "NAME", help = "Web app name")]
    pub site: String,

    #[arg(long, value_name = "NAME", help = "Deployment slot (production when omitted)")]
    pub slot: Option<String>,

    #[arg(long, value_name = "BRANCH", help = "Branch whose pushes trigger the workflow")]
    pub branch: String,

    #[arg(
        long,
        value_name = "URL",
        required_unless_present = "registry_source",
        help = "Container registry URL"
    )]
    pub server_url: Option<String>,

    #[arg(
        long,
        value_name = "SOURCE",
        value_parser = parse_registry_source,
        help = "Registry kind: acr, docker, privateRegistry (docker implies the Docker Hub URL)"
    )]
    pub registry_source: Option<ContainerRegistrySource>,

    #[arg(long, value_name = "IMAGE", help = "Image name without registry or tag")]
    pub image: String,

    #[arg(long, value_name = "GUID", help = "Publish profile secret suffix (generated when omitted)")]
    pub publish_profile_guid: Option<String>,

    #[arg(long, value_name = "GUID", help = "Registry username secret suffix (generated when omitted)")]
    pub username_guid: Option<String>,

    #[arg(long, value_name = "GUID", help = "Registry password secret suffix (generated when omitted)")]
    pub password_guid: Option<String>,

    #[command(flatten)]
    pub output: WorkflowOutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct WorkflowOutputArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "text",
        help = "Output format (text prints the workflow document only)"
    )]
    pub format: WorkflowFormatArg,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        conflicts_with = "repo_dir",
        help = "Write output to file instead of stdout"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        long,
        value_name = "DIR",
        help = "Write the workflow into DIR/.github/workflows/"
    )]
    pub repo_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct StacksArgs {
    #[arg(long, value_parser = parse_os, help = "Keep only settings for this OS (windows, linux)")]
    pub os: Option<Os>,

    #[arg(long = "stack", value_name = "ID", help = "Keep only the stack with this value")]
    pub stack_id: Option<String>,

    #[arg(long, help = "Drop hidden stacks and versions")]
    pub remove_hidden: bool,

    #[arg(long, help = "Drop deprecated stacks and versions")]
    pub remove_deprecated: bool,

    #[arg(long, help = "Drop preview stacks and versions")]
    pub remove_preview: bool,

    #[arg(long, value_name = "FILE", help = "Read the catalog from a JSON file")]
    pub catalog: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowFormatArg {
    Text,
    Json,
    Yaml,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

impl From<WorkflowFormatArg> for super::output::OutputFormat {
    fn from(arg: WorkflowFormatArg) -> Self {
        match arg {
            WorkflowFormatArg::Text => super::output::OutputFormat::Human,
            WorkflowFormatArg::Json => super::output::OutputFormat::Json,
            WorkflowFormatArg::Yaml => super::output::OutputFormat::Yaml,
        }
    }
}

fn parse_os(s: &str) -> Result<Os, String> {
    Os::from_name(&s.to_lowercase())
        .ok_or_else(|| format!("Invalid OS: {}. Valid options: windows, linux", s))
}

fn parse_registry_source(s: &str) -> Result<ContainerRegistrySource, String> {
    ContainerRegistrySource::from_name(s).ok_or_else(|| {
        format!(
            "Invalid registry source: {}. Valid options: acr, docker, privateRegistry",
            s
        )
    })
}
