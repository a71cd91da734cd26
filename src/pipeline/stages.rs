use log::debug;

use super::options::{PipelineOptions, ProjectType};
use crate::error::Result;

const QUALITY_STAGE: &str = "quality";
const TEST_STAGE: &str = "test";

/// Decides the ordered stage list of a pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct StageBuilder;

impl StageBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Returns the pipeline's stage order.
    ///
    /// Explicit stages are kept as given; otherwise the project type's
    /// defaults are used. Either way `quality` is added after `test` when code
    /// quality is enabled and the stage is not already listed.
    pub fn build_stages(&self, options: &PipelineOptions) -> Result<Vec<String>> {
        let mut stages = if options.stages.is_empty() {
            Self::default_stages(&options.project_type)?
        } else {
            options.stages.clone()
        };

        if options.include_code_quality && !stages.iter().any(|s| s == QUALITY_STAGE) {
            insert_quality_stage(&mut stages);
        }

        debug!("Stages: {}", stages.join(", "));
        Ok(stages)
    }

    /// Canonical stage order for a project type.
    pub fn default_stages(project_type: &str) -> Result<Vec<String>> {
        let stages: &[&str] = match ProjectType::parse(project_type)? {
            ProjectType::DotNet => &["build", "test", "deploy"],
        };
        Ok(stages.iter().map(ToString::to_string).collect())
    }

    /// Full stage vocabulary accepted for a project type.
    pub fn valid_stages(project_type: &str) -> Result<Vec<String>> {
        let stages: &[&str] = match ProjectType::parse(project_type)? {
            ProjectType::DotNet => &["build", "test", QUALITY_STAGE, "package", "deploy"],
        };
        Ok(stages.iter().map(ToString::to_string).collect())
    }

    /// One message per stage that is not in the project type's vocabulary.
    ///
    /// An unsupported project type yields a single message since no stage can
    /// be checked against it.
    pub fn validate_stages(stages: &[String], project_type: &str) -> Vec<String> {
        let valid = match Self::valid_stages(project_type) {
            Ok(valid) => valid,
            Err(e) => return vec![e.to_string()],
        };
        let valid_list = valid.join(", ");

        stages
            .iter()
            .filter(|stage| !valid.contains(stage))
            .map(|stage| format!("Invalid stage '{stage}'. Valid stages are: {valid_list}"))
            .collect()
    }
}

fn insert_quality_stage(stages: &mut Vec<String>) {
    let position = stages
        .iter()
        .position(|s| s == TEST_STAGE)
        .map_or(stages.len(), |i| i + 1);
    stages.insert(position, QUALITY_STAGE.to_string());
}
