//! Catalog of runtime stacks supported by web apps.
//!
//! The built-in table is compiled into the binary and can be replaced by a
//! JSON file with the same shape. Queries never touch the table itself: every
//! call to [`StackCatalog::stacks`] returns an owned copy, trimmed according to
//! the supplied [`StackFilter`].
//!
//! # Filtering rules
//!
//! All supplied filters must hold (logical AND) and original ordering is kept.
//!
//! - `stack_id` keeps only the stack whose `value` matches exactly.
//! - Stack-level `isHidden`/`isDeprecated`/`isPreview` remove whole stacks.
//! - `os` keeps only that OS's runtime settings on each minor version.
//! - The remove flags strip runtime settings carrying the flag.
//! - Minor versions left without settings are dropped, then empty major
//!   versions, then empty stacks.

use super::runtime_stack::Os;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

const BUILTIN_STACKS: &str = include_str!("data/webapp_stacks.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to parse stack catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to read stack catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebAppStack {
    pub display_text: String,
    pub value: String,
    pub preferred_os: Os,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub is_deprecated: bool,
    #[serde(default)]
    pub is_preview: bool,
    pub major_versions: Vec<MajorVersion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MajorVersion {
    pub display_text: String,
    pub value: String,
    pub minor_versions: Vec<MinorVersion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinorVersion {
    pub display_text: String,
    pub value: String,
    pub stack_settings: StackSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub windows_runtime_settings: Option<RuntimeSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linux_runtime_settings: Option<RuntimeSettings>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeSettings {
    /// Version string as the platform expects it. Linux values are
    /// `<STACK>|<version>`, Windows values are bare versions.
    pub runtime_version: String,
    #[serde(default)]
    pub remote_debugging_supported: bool,
    #[serde(default)]
    pub git_hub_action_settings: GitHubActionSettings,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub is_deprecated: bool,
    #[serde(default)]
    pub is_preview: bool,
    #[serde(default)]
    pub is_auto_update: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_of_life_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubActionSettings {
    pub is_supported: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_version: Option<String>,
}

impl StackSettings {
    pub fn for_os(&self, os: Os) -> Option<&RuntimeSettings> {
        match os {
            Os::Windows => self.windows_runtime_settings.as_ref(),
            Os::Linux => self.linux_runtime_settings.as_ref(),
        }
    }

    fn is_empty(&self) -> bool {
        self.windows_runtime_settings.is_none() && self.linux_runtime_settings.is_none()
    }
}

impl WebAppStack {
    /// Recommended GitHub Actions runtime version for the first minor version
    /// of this stack that supports GitHub Actions on `os`.
    pub fn github_action_version(&self, os: Os) -> Option<&str> {
        self.major_versions
            .iter()
            .flat_map(|major| major.minor_versions.iter())
            .filter_map(|minor| minor.stack_settings.for_os(os))
            .find(|settings| settings.git_hub_action_settings.is_supported)
            .and_then(|settings| settings.git_hub_action_settings.supported_version.as_deref())
    }

    pub fn minor_version_count(&self) -> usize {
        self.major_versions
            .iter()
            .map(|major| major.minor_versions.len())
            .sum()
    }
}

/// Query over the catalog. The default value filters nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackFilter {
    pub os: Option<Os>,
    pub stack_id: Option<String>,
    pub remove_hidden: bool,
    pub remove_deprecated: bool,
    pub remove_preview: bool,
}

impl StackFilter {
    pub fn for_os(os: Os) -> Self {
        Self {
            os: Some(os),
            ..Default::default()
        }
    }

    pub fn for_stack(stack_id: impl Into<String>) -> Self {
        Self {
            stack_id: Some(stack_id.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn touches_settings(&self) -> bool {
        self.os.is_some() || self.remove_hidden || self.remove_deprecated || self.remove_preview
    }

    fn keeps_stack(&self, stack: &WebAppStack) -> bool {
        if let Some(stack_id) = &self.stack_id {
            if &stack.value != stack_id {
                return false;
            }
        }
        !(self.remove_hidden && stack.is_hidden
            || self.remove_deprecated && stack.is_deprecated
            || self.remove_preview && stack.is_preview)
    }

    fn keeps_settings(&self, settings: &RuntimeSettings) -> bool {
        !(self.remove_hidden && settings.is_hidden
            || self.remove_deprecated && settings.is_deprecated
            || self.remove_preview && settings.is_preview)
    }

    fn filter_settings(&self, settings: &StackSettings) -> StackSettings {
        let keep = |os: Os, entry: &Option<RuntimeSettings>| {
            entry
                .as_ref()
                .filter(|_| self.os.map_or(true, |wanted| wanted == os))
                .filter(|s| self.keeps_settings(s))
                .cloned()
        };

        StackSettings {
            windows_runtime_settings: keep(Os::Windows, &settings.windows_runtime_settings),
            linux_runtime_settings: keep(Os::Linux, &settings.linux_runtime_settings),
        }
    }

    fn filter_major(&self, major: &MajorVersion) -> Option<MajorVersion> {
        let minor_versions: Vec<MinorVersion> = major
            .minor_versions
            .iter()
            .filter_map(|minor| {
                let stack_settings = self.filter_settings(&minor.stack_settings);
                if stack_settings.is_empty() {
                    return None;
                }
                Some(MinorVersion {
                    display_text: minor.display_text.clone(),
                    value: minor.value.clone(),
                    stack_settings,
                })
            })
            .collect();

        if minor_versions.is_empty() {
            return None;
        }

        Some(MajorVersion {
            display_text: major.display_text.clone(),
            value: major.value.clone(),
            minor_versions,
        })
    }

    fn apply(&self, stack: &WebAppStack) -> Option<WebAppStack> {
        if !self.touches_settings() {
            return Some(stack.clone());
        }

        let major_versions: Vec<MajorVersion> = stack
            .major_versions
            .iter()
            .filter_map(|major| self.filter_major(major))
            .collect();

        if major_versions.is_empty() {
            return None;
        }

        Some(WebAppStack {
            display_text: stack.display_text.clone(),
            value: stack.value.clone(),
            preferred_os: stack.preferred_os,
            is_hidden: stack.is_hidden,
            is_deprecated: stack.is_deprecated,
            is_preview: stack.is_preview,
            major_versions,
        })
    }
}

/// Read-only table of web app stacks
#[derive(Debug, Clone)]
pub struct StackCatalog {
    stacks: Vec<WebAppStack>,
}

impl StackCatalog {
    pub fn new(stacks: Vec<WebAppStack>) -> Self {
        Self { stacks }
    }

    /// Catalog compiled into the crate
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_STACKS)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let stacks: Vec<WebAppStack> = serde_json::from_str(json)?;
        debug!("Loaded stack catalog with {} stacks", stacks.len());
        Ok(Self { stacks })
    }

    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    /// Returns the stacks matching `filter` as a fresh structure owned by the
    /// caller.
    pub fn stacks(&self, filter: &StackFilter) -> Vec<WebAppStack> {
        if filter.is_empty() {
            return self.stacks.clone();
        }

        let result: Vec<WebAppStack> = self
            .stacks
            .iter()
            .filter(|stack| filter.keeps_stack(stack))
            .filter_map(|stack| filter.apply(stack))
            .collect();

        debug!(
            filter = ?filter,
            matched = result.len(),
            "Filtered stack catalog"
        );
        result
    }

    pub fn get(&self, stack_id: &str) -> Option<&WebAppStack> {
        self.stacks.iter().find(|stack| stack.value == stack_id)
    }
}
