//! Output formatting for generated workflows, stack listings and configuration
//!
//! JSON and YAML output serialize the library types directly. Human output of
//! a workflow is the workflow document itself, so it can be redirected into a
//! file as it is.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::DeployCenterConfig;
use crate::stack::{Os, RuntimeSettings, WebAppStack};
use crate::workflow::{CodeWorkflowInformation, ContainerWorkflowInformation};

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable text
    Human,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_code_workflow(&self, info: &CodeWorkflowInformation) -> Result<String> {
        match self.format {
            OutputFormat::Human => Ok(info.content.clone()),
            _ => self.serialize(info, "code workflow"),
        }
    }

    pub fn format_container_workflow(&self, info: &ContainerWorkflowInformation) -> Result<String> {
        match self.format {
            OutputFormat::Human => Ok(info.content.clone()),
            _ => self.serialize(info, "container workflow"),
        }
    }

    pub fn format_stacks(&self, stacks: &[WebAppStack]) -> Result<String> {
        match self.format {
            OutputFormat::Human => Ok(format_stacks_human(stacks)),
            _ => self.serialize(&stacks, "stacks"),
        }
    }

    pub fn format_config(&self, config: &DeployCenterConfig) -> Result<String> {
        match self.format {
            OutputFormat::Human => Ok(format_config_human(config)),
            _ => self.serialize(&config.to_display_map(), "config"),
        }
    }

    fn serialize<T: Serialize + ?Sized>(&self, value: &T, what: &str) -> Result<String> {
        match self.format {
            OutputFormat::Yaml => serde_yaml::to_string(value)
                .with_context(|| format!("Failed to serialize {} to YAML", what)),
            _ => serde_json::to_string_pretty(value)
                .with_context(|| format!("Failed to serialize {} to JSON", what)),
        }
    }
}

fn format_stacks_human(stacks: &[WebAppStack]) -> String {
    let mut output = String::new();
    output.push_str("Runtime Stacks\n");
    output.push_str(RULE);
    output.push_str("\n\n");

    if stacks.is_empty() {
        output.push_str("(no matching stacks)\n");
        return output;
    }

    for stack in stacks {
        output.push_str(&format!(
            "{} ({}){}\n",
            stack.display_text,
            stack.value,
            flags(stack.is_hidden, stack.is_deprecated, stack.is_preview)
        ));

        for (i, major) in stack.major_versions.iter().enumerate() {
            let last_major = i + 1 == stack.major_versions.len();
            let (branch, indent) = if last_major {
                ("\u{2514}\u{2500}", "   ")
            } else {
                ("\u{251C}\u{2500}", "\u{2502}  ")
            };
            output.push_str(&format!("{} {}\n", branch, major.display_text));

            for minor in &major.minor_versions {
                output.push_str(&format!("{}  {}\n", indent, minor.display_text));
                for os in Os::all_variants() {
                    if let Some(settings) = minor.stack_settings.for_os(*os) {
                        output.push_str(&format!(
                            "{}    {:<8} {}\n",
                            indent,
                            os.display_name(),
                            describe(settings)
                        ));
                    }
                }
            }
        }
        output.push('\n');
    }

    output
}

fn describe(settings: &RuntimeSettings) -> String {
    let mut line = settings.runtime_version.clone();
    if let Some(version) = settings
        .git_hub_action_settings
        .supported_version
        .as_deref()
        .filter(|_| settings.git_hub_action_settings.is_supported)
    {
        line.push_str(&format!("  (GitHub Actions: {})", version));
    }
    line.push_str(&flags(
        settings.is_hidden,
        settings.is_deprecated,
        settings.is_preview,
    ));
    line
}

fn flags(hidden: bool, deprecated: bool, preview: bool) -> String {
    let names: Vec<&str> = [(hidden, "hidden"), (deprecated, "deprecated"), (preview, "preview")]
        .into_iter()
        .filter(|(set, _)| *set)
        .map(|(_, name)| name)
        .collect();

    if names.is_empty() {
        String::new()
    } else {
        format!(" [{}]", names.join(", "))
    }
}

fn format_config_human(config: &DeployCenterConfig) -> String {
    let mut output = String::new();
    output.push_str("deploy-center Configuration\n");
    output.push_str(RULE);
    output.push_str("\n\n");

    let map = config.to_display_map();
    let rows = [
        ("Secret Prefix", "secret_prefix"),
        ("Docker Hub Host", "docker_hub_host"),
        ("Default Branch", "default_branch"),
        ("Stacks File", "stacks_file"),
        ("Log Level", "log_level"),
    ];
    for (label, key) in rows {
        if let Some(value) = map.get(key) {
            output.push_str(&format!("  {}: {}\n", label, value));
        }
    }

    output
}
