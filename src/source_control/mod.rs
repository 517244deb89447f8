//! Records a manually configured GitHub Actions deployment against a site.
//!
//! The management APIs are reached through [`DeploymentCenterData`]; this
//! crate ships no HTTP implementation of it. The three calls run strictly in
//! order. If the SCM type were switched while the metadata still pointed at
//! the old repository, the site's source control endpoint would start
//! failing, so nothing after a failed call is attempted.

mod error;

pub use error::{is_api_sync_error, ApiError, SourceControlError, SourceControlStep};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

const LOG_ID: &str = "GitHubActionUtility-updateGitHubActionSourceControlPropertiesManually";

/// Metadata keys describing the linked repository
const REPO_URL_KEY: &str = "RepoUrl";
const BRANCH_KEY: &str = "branch";
const STALE_KEYS: [&str; 4] = [REPO_URL_KEY, "ScmUri", "CloneUri", BRANCH_KEY];

pub type ConfigProperties = BTreeMap<String, String>;

crate::define_id_enum! {
    /// Source control integration recorded in the site config
    ScmType {
        NoScm => "None" : "None",
        GitHubAction => "GitHubAction" : "GitHub Actions",
        GitHub => "GitHub" : "GitHub",
        LocalGit => "LocalGit" : "Local Git",
        ExternalGit => "ExternalGit" : "External Git",
        BitbucketGit => "BitbucketGit" : "Bitbucket",
        Vso => "VSO" : "Azure Repos",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigMetadata {
    #[serde(default)]
    pub properties: ConfigProperties,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSourceControlRequestBody {
    pub repo_url: String,
    pub branch: String,
    pub is_manual_integration: bool,
    pub is_git_hub_action: bool,
    pub is_mercurial: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfigProperties {
    pub scm_type: ScmType,
}

/// Partial site config update, serialized as `{"properties":{"scmType":..}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteConfigPatch {
    pub properties: SiteConfigProperties,
}

impl SiteConfigPatch {
    pub fn scm_type(scm_type: ScmType) -> Self {
        Self {
            properties: SiteConfigProperties { scm_type },
        }
    }
}

/// Management API calls the linkage sequence depends on
#[async_trait]
pub trait DeploymentCenterData: Send + Sync {
    async fn get_config_metadata(&self, resource_id: &str) -> Result<ConfigMetadata, ApiError>;

    async fn update_config_metadata(
        &self,
        resource_id: &str,
        properties: ConfigProperties,
    ) -> Result<ConfigMetadata, ApiError>;

    async fn patch_site_config(
        &self,
        resource_id: &str,
        patch: &SiteConfigPatch,
    ) -> Result<(), ApiError>;
}

/// Points the site's config metadata at `payload`'s repository and branch,
/// then marks the site as deployed by GitHub Actions.
pub async fn update_github_action_source_control_properties_manually(
    data: &dyn DeploymentCenterData,
    resource_id: &str,
    payload: &SiteSourceControlRequestBody,
) -> Result<(), SourceControlError> {
    let metadata = data
        .get_config_metadata(resource_id)
        .await
        .map_err(|e| fail(SourceControlStep::FetchMetadata, e))?;

    let mut properties = metadata.properties;
    for key in STALE_KEYS {
        properties.remove(key);
    }
    properties.insert(REPO_URL_KEY.to_string(), payload.repo_url.clone());
    properties.insert(BRANCH_KEY.to_string(), payload.branch.clone());

    debug!(
        resource_id,
        repo_url = %payload.repo_url,
        branch = %payload.branch,
        "Updating config metadata"
    );
    data.update_config_metadata(resource_id, properties)
        .await
        .map_err(|e| fail(SourceControlStep::UpdateMetadata, e))?;

    data.patch_site_config(resource_id, &SiteConfigPatch::scm_type(ScmType::GitHubAction))
        .await
        .map_err(|e| fail(SourceControlStep::PatchSiteConfig, e))?;

    debug!(resource_id, "Source control linked to GitHub Actions");
    Ok(())
}

fn fail(step: SourceControlStep, error: ApiError) -> SourceControlError {
    tracing::error!(
        log_id = LOG_ID,
        step = %step,
        sync_error = error.is_sync_error(),
        error = %error,
        "Source control update failed"
    );
    SourceControlError { step, error }
}
