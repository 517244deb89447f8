//! Configuration management for deploy-center
//!
//! Settings are loaded from environment variables with defaults that match
//! what the hosting platform expects. The generator constants (secret prefix,
//! Docker Hub host, default branch) are part of the generated documents, so
//! overriding them changes every workflow produced afterwards.
//!
//! # Environment Variables
//!
//! - `DEPLOY_CENTER_SECRET_PREFIX`: Secret name prefix - default: "AzureAppService"
//! - `DEPLOY_CENTER_DOCKER_HUB_HOST`: Docker Hub registry host - default: "index.docker.io"
//! - `DEPLOY_CENTER_DEFAULT_BRANCH`: Branch used when a code request has none - default: "master"
//! - `DEPLOY_CENTER_STACKS_FILE`: JSON stack catalog replacing the built-in one - optional
//! - `DEPLOY_CENTER_LOG_LEVEL`: Logging level - default: "info"
//!
//! # Example
//!
//! ```no_run
//! use deploy_center::DeployCenterConfig;
//!
//! let config = DeployCenterConfig::default();
//! config.validate().expect("Invalid configuration");
//!
//! let generator_config = config.generator_config();
//! assert_eq!(generator_config.secret_prefix, config.secret_prefix);
//! ```

use crate::stack::{CatalogError, StackCatalog};
use crate::workflow::generator::{
    GeneratorConfig, DEFAULT_BRANCH, DEFAULT_DOCKER_HUB_HOST, DEFAULT_SECRET_PREFIX,
};
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployCenterConfig {
    /// First segment of every generated secret name
    pub secret_prefix: String,

    /// Registry URLs containing this host are treated as Docker Hub
    pub docker_hub_host: String,

    pub default_branch: String,

    /// Replaces the built-in stack catalog when set
    pub stacks_file: Option<PathBuf>,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for DeployCenterConfig {
    /// Loads DEPLOY_CENTER_* variables, falling back to defaults for any
    /// that are missing.
    fn default() -> Self {
        let secret_prefix = env::var("DEPLOY_CENTER_SECRET_PREFIX")
            .unwrap_or_else(|_| DEFAULT_SECRET_PREFIX.to_string());

        let docker_hub_host = env::var("DEPLOY_CENTER_DOCKER_HUB_HOST")
            .unwrap_or_else(|_| DEFAULT_DOCKER_HUB_HOST.to_string())
            .to_lowercase();

        let default_branch = env::var("DEPLOY_CENTER_DEFAULT_BRANCH")
            .unwrap_or_else(|_| DEFAULT_BRANCH.to_string());

        let stacks_file = env::var("DEPLOY_CENTER_STACKS_FILE")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let log_level = env::var("DEPLOY_CENTER_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            secret_prefix,
            docker_hub_host,
            default_branch,
            stacks_file,
            log_level,
        }
    }
}

impl DeployCenterConfig {
    /// Checks that:
    /// - the secret prefix is a valid secret name segment
    /// - the Docker Hub host and default branch are not empty
    /// - the log level is valid
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret_prefix.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Secret prefix must not be empty".to_string(),
            ));
        }
        // GitHub secret names only allow alphanumerics and underscores
        if !self
            .secret_prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(ConfigError::ParseError {
                field: "DEPLOY_CENTER_SECRET_PREFIX".to_string(),
                error: format!(
                    "'{}' may only contain letters, digits and underscores",
                    self.secret_prefix
                ),
            });
        }
        if self.secret_prefix.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(ConfigError::ParseError {
                field: "DEPLOY_CENTER_SECRET_PREFIX".to_string(),
                error: format!("'{}' must not start with a digit", self.secret_prefix),
            });
        }

        if self.docker_hub_host.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Docker Hub host must not be empty".to_string(),
            ));
        }
        if self.default_branch.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Default branch must not be empty".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            secret_prefix: self.secret_prefix.clone(),
            docker_hub_host: self.docker_hub_host.clone(),
            default_branch: self.default_branch.clone(),
            ..Default::default()
        }
    }

    /// The configured catalog file, or the built-in catalog
    pub fn load_catalog(&self) -> Result<StackCatalog, CatalogError> {
        match &self.stacks_file {
            Some(path) => StackCatalog::from_file(path),
            None => StackCatalog::builtin(),
        }
    }

    /// Converts configuration to a display map for output formatting
    pub fn to_display_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();

        map.insert("secret_prefix".to_string(), self.secret_prefix.clone());
        map.insert("docker_hub_host".to_string(), self.docker_hub_host.clone());
        map.insert("default_branch".to_string(), self.default_branch.clone());
        map.insert(
            "stacks_file".to_string(),
            self.stacks_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(built-in)".to_string()),
        );
        map.insert("log_level".to_string(), self.log_level.clone());

        map
    }
}

impl fmt::Display for DeployCenterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Deploy Center Configuration:")?;
        writeln!(f, "  Secret Prefix: {}", self.secret_prefix)?;
        writeln!(f, "  Docker Hub Host: {}", self.docker_hub_host)?;
        writeln!(f, "  Default Branch: {}", self.default_branch)?;
        match &self.stacks_file {
            Some(path) => writeln!(f, "  Stacks File: {}", path.display())?,
            None => writeln!(f, "  Stacks File: (built-in)")?,
        }
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}
