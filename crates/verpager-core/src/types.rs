//! Domain types shared between the pager, the store capability and the
//! headless driver.
//!
//! Field names serialize in camelCase to match the JSON the deployment
//! console's store exchanges.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// The first page index understood by the version store
pub const FIRST_PAGE: u32 = 1;

pub type ProjectId = u64;
pub type AppId = u64;
pub type AppInstanceId = u64;
pub type EnvironmentId = u64;

/// Identity of a deployable application version
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionId(String);

impl VersionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VersionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for VersionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A single deployable version as returned by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionRecord {
    pub id: VersionId,
    pub version: String,
    #[serde(default)]
    pub display_label: String,
}

impl VersionRecord {
    pub fn new(id: impl Into<VersionId>, version: impl Into<String>) -> Self {
        let version = version.into();
        Self {
            id: id.into(),
            display_label: version.clone(),
            version,
        }
    }

    /// Label shown in the option list; falls back to the version string
    pub fn label(&self) -> &str {
        if self.display_label.is_empty() {
            &self.version
        } else {
            &self.display_label
        }
    }
}

/// One request for a page of versions. Built fresh for every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionQuery {
    pub project_id: ProjectId,
    pub app_id: AppId,
    pub page: u32,
    pub search_term: String,
    /// Version the store should place on the first page even if it would
    /// otherwise sort further down
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_version: Option<VersionId>,
    pub page_size: u32,
}

impl VersionQuery {
    pub fn is_first_page(&self) -> bool {
        self.page <= FIRST_PAGE
    }
}

/// A page of versions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    #[serde(alias = "list")]
    pub items: Vec<VersionRecord>,
    pub has_next_page: bool,
}

impl PageResult {
    pub fn new(items: Vec<VersionRecord>, has_next_page: bool) -> Self {
        Self {
            items,
            has_next_page,
        }
    }

    pub fn contains(&self, id: &VersionId) -> bool {
        self.items.iter().any(|r| &r.id == id)
    }
}

/// Identifies the application instance being upgraded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceContext {
    pub project_id: ProjectId,
    pub app_id: AppId,
    pub app_instance_id: AppInstanceId,
    pub environment_id: EnvironmentId,
}

impl InstanceContext {
    /// Build a context from the sidebar's `"<envId>-<appId>"` parent key
    pub fn from_parent_key(
        project_id: ProjectId,
        app_instance_id: AppInstanceId,
        parent_key: &str,
    ) -> Result<Self> {
        let (env, app) = parent_key
            .split_once('-')
            .ok_or_else(|| Error::config(format!("malformed parent key: {parent_key:?}")))?;

        let environment_id = env
            .parse()
            .map_err(|_| Error::config(format!("invalid environment id in {parent_key:?}")))?;
        let app_id = app
            .parse()
            .map_err(|_| Error::config(format!("invalid app id in {parent_key:?}")))?;

        Ok(Self {
            project_id,
            app_id,
            app_instance_id,
            environment_id,
        })
    }
}

/// Values document bound to a version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionValue {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub yaml: String,
    #[serde(default)]
    pub name: String,
}

/// Kind of instance change being submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpgradeKind {
    #[default]
    Update,
}

/// Payload of an upgrade submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeRequest {
    pub app_instance_id: AppInstanceId,
    pub environment_id: EnvironmentId,
    pub app_id: AppId,
    pub app_version_id: VersionId,
    pub values: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: UpgradeKind,
}

/// What the store made of an upgrade submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeOutcome {
    Applied,
    /// The store answered with a failure payload
    Rejected { message: String },
}
