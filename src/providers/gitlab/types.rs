use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A GitLab project as returned by `GET /projects`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitLabProject {
    pub id: u64,
    pub name: String,
    /// Full path (e.g., "group/project")
    pub path_with_namespace: String,
    pub web_url: String,
    /// Missing for empty repositories
    #[serde(default)]
    pub default_branch: Option<String>,
}

/// A pipeline run as returned by `GET /projects/:id/pipelines`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitLabPipeline {
    pub id: u64,
    /// Pipeline status (e.g., "success", "failed", "running")
    pub status: String,
    /// Git reference that triggered the pipeline
    #[serde(rename = "ref")]
    pub ref_: String,
    pub sha: String,
    /// Trigger source (e.g., "push", "schedule", "web")
    #[serde(default)]
    pub source: Option<String>,
    pub web_url: String,
    pub created_at: DateTime<Utc>,
}
