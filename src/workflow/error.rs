use thiserror::Error;

/// Errors raised while generating a workflow. None of them are retryable:
/// the same input always fails the same way, and no document is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// Runtime stack value outside the supported set
    #[error("Incorrect stack value '{0}' provided.")]
    UnsupportedStack(String),

    #[error("Site name must not be empty")]
    EmptySiteName,

    /// Container workflows need an explicit branch
    #[error("Branch must be provided for container workflows")]
    MissingBranch,

    /// Linux runtime versions are `<STACK>|<version>`
    #[error("Malformed Linux runtime version '{0}', expected '<STACK>|<version>'")]
    MalformedVersion(String),

    /// Registry URLs, image names and secret GUIDs end up inside shell
    /// commands and secret references, so they are restricted to a safe set
    #[error("Invalid {field} {value:?}: only letters, digits and {allowed} are allowed")]
    InvalidValue {
        field: &'static str,
        value: String,
        allowed: &'static str,
    },

    /// Only Docker Hub has a registry URL that can be assumed
    #[error("Server URL must be provided unless the registry is Docker Hub")]
    MissingServerUrl,
}
