use indexmap::IndexMap;
use serde::Serialize;

use super::variables::Variables;

/// Top-level keys GitLab reserves; a job may not be named after one.
pub const RESERVED_KEYWORDS: [&str; 10] = [
    "stages",
    "variables",
    "default",
    "include",
    "workflow",
    "image",
    "services",
    "cache",
    "before_script",
    "after_script",
];

/// Assembled pipeline, ready for YAML rendering.
///
/// Serializes `stages`, `variables` and `default` first, followed by one
/// top-level key per job.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineConfiguration {
    /// Authoritative stage order of the pipeline
    pub stages: Vec<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub variables: Variables,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub default: Variables,
    #[serde(flatten)]
    pub jobs: IndexMap<String, Job>,
}

/// A single GitLab CI job.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Job {
    /// Stage this job runs in; must appear in the pipeline's stage list
    pub stage: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub variables: Variables,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub before_script: Vec<String>,
    /// Shell commands in execution order
    pub script: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub after_script: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Jobs whose artifacts this job downloads
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<Artifacts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_failure: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Artifacts {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expire_in: Option<String>,
    /// Upload condition: on_success, on_failure or always
    #[serde(skip_serializing_if = "Option::is_none")]
    pub when: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reports: Option<ArtifactReports>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArtifactReports {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub junit: Vec<String>,
}
