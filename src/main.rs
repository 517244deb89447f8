use deploy_center::cli::commands::{
    CliArgs, CodeArgs, Commands, ConfigArgs, ContainerArgs, GenerateTarget, StacksArgs,
    WorkflowOutputArgs,
};
use deploy_center::cli::output::{OutputFormat, OutputFormatter};
use deploy_center::config::DeployCenterConfig;
use deploy_center::stack::{StackCatalog, StackFilter};
use deploy_center::util::{init_logging, LoggingConfig};
use deploy_center::workflow::{
    resolve_server_url, CodeWorkflowRequest, ContainerWorkflowRequest, WorkflowGenerator,
};
use deploy_center::{NAME, VERSION};

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::Path;
use std::process;
use tracing::{debug, error, info};

fn main() {
    let args = CliArgs::parse();
    init_logging(LoggingConfig::from_flags(
        args.log_level.as_deref(),
        args.verbose,
        args.quiet,
    ));

    debug!("{} v{} starting", NAME, VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Generate(generate_args) => match &generate_args.target {
            GenerateTarget::Code(code_args) => handle_generate_code(code_args, args.quiet),
            GenerateTarget::Container(container_args) => {
                handle_generate_container(container_args, args.quiet)
            }
        },
        Commands::Stacks(stacks_args) => handle_stacks(stacks_args),
        Commands::Config(config_args) => handle_config(config_args),
    };

    process::exit(exit_code);
}

fn load_config() -> Option<DeployCenterConfig> {
    let config = DeployCenterConfig::default();
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        eprintln!("\nPlease check your DEPLOY_CENTER_* environment variables.");
        return None;
    }
    Some(config)
}

/// Secret suffix supplied by the user, or a fresh one
fn secret_guid(supplied: &Option<String>) -> String {
    supplied
        .clone()
        .filter(|guid| !guid.is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string())
}

fn handle_generate_code(args: &CodeArgs, quiet: bool) -> i32 {
    info!("Generating code workflow for {}", args.site);

    let Some(config) = load_config() else {
        return 1;
    };
    let generator = WorkflowGenerator::new(config.generator_config());

    let request = CodeWorkflowRequest {
        site_name: args.site.clone(),
        slot_name: args.slot.clone(),
        branch: args.branch.clone().unwrap_or_default(),
        runtime_stack: args.stack.clone(),
        runtime_version: args.runtime_version.clone(),
        recommended_version: args.recommended_version.clone(),
        is_linux: args.linux,
        secret_guid: secret_guid(&args.secret_guid),
    };

    let info = match generator.code_app_workflow_information(&request) {
        Ok(info) => info,
        Err(e) => {
            error!("Workflow generation failed: {}", e);
            return 1;
        }
    };

    let formatter = OutputFormatter::new(args.output.format.into());
    let output = match formatter.format_code_workflow(&info) {
        Ok(output) => output,
        Err(e) => {
            error!("Failed to format output: {:#}", e);
            return 1;
        }
    };

    let secrets = [info.secret_name.as_str()];
    finish_workflow(&args.output, &info.file_path(), &info.content, &output, &secrets, quiet)
}

fn handle_generate_container(args: &ContainerArgs, quiet: bool) -> i32 {
    info!("Generating container workflow for {}", args.site);

    let Some(config) = load_config() else {
        return 1;
    };
    let generator = WorkflowGenerator::new(config.generator_config());

    let server_url = match resolve_server_url(
        args.registry_source,
        args.server_url.as_deref(),
        &generator.config().docker_hub_host,
    ) {
        Ok(url) => url,
        Err(e) => {
            error!("Workflow generation failed: {}", e);
            return 1;
        }
    };
    debug!("Using registry {}", server_url);

    let request = ContainerWorkflowRequest {
        site_name: args.site.clone(),
        slot_name: args.slot.clone(),
        branch: args.branch.clone(),
        server_url,
        image: args.image.clone(),
        publish_profile_guid: secret_guid(&args.publish_profile_guid),
        username_guid: secret_guid(&args.username_guid),
        password_guid: secret_guid(&args.password_guid),
    };

    let info = match generator.container_app_workflow_information(&request) {
        Ok(info) => info,
        Err(e) => {
            error!("Workflow generation failed: {}", e);
            return 1;
        }
    };

    let formatter = OutputFormatter::new(args.output.format.into());
    let output = match formatter.format_container_workflow(&info) {
        Ok(output) => output,
        Err(e) => {
            error!("Failed to format output: {:#}", e);
            return 1;
        }
    };

    let secrets = [
        info.publishing_profile_secret_name.as_str(),
        info.container_username_secret_name.as_str(),
        info.container_password_secret_name.as_str(),
    ];
    finish_workflow(&args.output, &info.file_path(), &info.content, &output, &secrets, quiet)
}

/// Writes the generated output where the user asked for it and lists the
/// secrets that must be registered in the repository.
fn finish_workflow(
    target: &WorkflowOutputArgs,
    file_path: &str,
    content: &str,
    output: &str,
    secrets: &[&str],
    quiet: bool,
) -> i32 {
    if let Some(repo_dir) = &target.repo_dir {
        let path = repo_dir.join(file_path);
        if let Err(e) = write_file(&path, content) {
            error!("{:#}", e);
            return 1;
        }
        info!("Workflow written to: {}", path.display());
        if !quiet {
            println!("Workflow written to: {}", path.display());
        }
    } else if let Some(output_file) = &target.output {
        if let Err(e) = write_file(output_file, output) {
            error!("{:#}", e);
            return 1;
        }
        info!("Output written to: {}", output_file.display());
        if !quiet {
            println!("Output written to: {}", output_file.display());
        }
    } else {
        println!("{}", output);
    }

    // stderr keeps stdout a clean document when printing text
    if !quiet {
        eprintln!("\nRegister these repository secrets:");
        for secret in secrets {
            eprintln!("  {}", secret);
        }
    }

    0
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

fn handle_stacks(args: &StacksArgs) -> i32 {
    let Some(config) = load_config() else {
        return 1;
    };

    let catalog = match &args.catalog {
        Some(path) => {
            debug!("Loading stack catalog from {}", path.display());
            StackCatalog::from_file(path)
        }
        None => config.load_catalog(),
    };
    let catalog = match catalog {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("Failed to load stack catalog: {}", e);
            return 1;
        }
    };

    let filter = StackFilter {
        os: args.os,
        stack_id: args.stack_id.clone(),
        remove_hidden: args.remove_hidden,
        remove_deprecated: args.remove_deprecated,
        remove_preview: args.remove_preview,
    };
    let stacks = catalog.stacks(&filter);
    info!("{} of {} stacks match", stacks.len(), catalog.len());

    let formatter = OutputFormatter::new(OutputFormat::from(args.format));
    match formatter.format_stacks(&stacks) {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            error!("Failed to format output: {:#}", e);
            1
        }
    }
}

fn handle_config(args: &ConfigArgs) -> i32 {
    let config = DeployCenterConfig::default();
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
    }

    let formatter = OutputFormatter::new(OutputFormat::from(args.format));
    match formatter.format_config(&config) {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            error!("Failed to format output: {:#}", e);
            1
        }
    }
}
