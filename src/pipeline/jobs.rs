use indexmap::IndexMap;
use log::debug;

use super::options::PipelineOptions;
use super::types::{ArtifactReports, Artifacts, Job};
use super::variables::{JobVariableSource, VariableBuilder};
use crate::error::{PipegenError, Result};

const DEFAULT_DOTNET_VERSION: &str = "9.0";
const SDK_IMAGE: &str = "mcr.microsoft.com/dotnet/sdk";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JobKind {
    Build,
    Test,
    Quality,
    Deploy,
}

/// Which job a stage gets, and when.
struct JobRule {
    stage: &'static str,
    enabled: fn(&PipelineOptions) -> bool,
    kind: JobKind,
}

fn always(_: &PipelineOptions) -> bool {
    true
}

fn tests_enabled(options: &PipelineOptions) -> bool {
    options.include_tests
}

fn quality_enabled(options: &PipelineOptions) -> bool {
    options.include_code_quality
}

fn deployment_enabled(options: &PipelineOptions) -> bool {
    options.include_deployment
}

static JOB_RULES: [JobRule; 4] = [
    JobRule {
        stage: "build",
        enabled: always,
        kind: JobKind::Build,
    },
    JobRule {
        stage: "test",
        enabled: tests_enabled,
        kind: JobKind::Test,
    },
    JobRule {
        stage: "quality",
        enabled: quality_enabled,
        kind: JobKind::Quality,
    },
    JobRule {
        stage: "deploy",
        enabled: deployment_enabled,
        kind: JobKind::Deploy,
    },
];

/// Produces the jobs belonging to a stage.
///
/// Job variables come from the injected [`JobVariableSource`], keyed by the
/// stage name.
#[derive(Debug, Clone, Default)]
pub struct JobBuilder<V: JobVariableSource = VariableBuilder> {
    variables: V,
}

impl<V: JobVariableSource> JobBuilder<V> {
    pub fn new(variables: V) -> Self {
        Self { variables }
    }

    /// Jobs for `stage`, keyed by job name.
    ///
    /// Stages without a rule, or whose rule is disabled by the options, yield
    /// an empty mapping.
    pub fn build_jobs_for_stage(
        &self,
        stage: &str,
        options: &PipelineOptions,
    ) -> Result<IndexMap<String, Job>> {
        if stage.is_empty() {
            return Err(PipegenError::MissingArgument("stage"));
        }

        let mut jobs = IndexMap::new();

        let Some(rule) = JOB_RULES.iter().find(|rule| rule.stage == stage) else {
            debug!("No job template for stage '{stage}'");
            return Ok(jobs);
        };

        if !(rule.enabled)(options) {
            debug!("Job for stage '{stage}' disabled by options");
            return Ok(jobs);
        }

        let job = match rule.kind {
            JobKind::Build => self.create_build_job(options)?,
            JobKind::Test => self.create_test_job(options)?,
            JobKind::Quality => self.create_quality_job(options)?,
            JobKind::Deploy => self.create_deploy_job(options)?,
        };
        jobs.insert(stage.to_string(), job);

        Ok(jobs)
    }

    pub fn create_build_job(&self, options: &PipelineOptions) -> Result<Job> {
        Ok(Job {
            script: vec![
                "dotnet restore".to_string(),
                "dotnet build --configuration Release --no-restore".to_string(),
            ],
            artifacts: Some(Artifacts {
                paths: vec!["bin/".to_string(), "obj/".to_string()],
                expire_in: Some("1 hour".to_string()),
                ..Artifacts::default()
            }),
            ..self.base_job("build", options)?
        })
    }

    pub fn create_test_job(&self, options: &PipelineOptions) -> Result<Job> {
        Ok(Job {
            script: vec![
                "dotnet test --configuration Release --no-build --collect:\"XPlat Code Coverage\" --logger trx --results-directory ./TestResults/"
                    .to_string(),
            ],
            dependencies: vec!["build".to_string()],
            artifacts: Some(Artifacts {
                paths: vec!["TestResults/".to_string()],
                when: Some("always".to_string()),
                reports: Some(ArtifactReports {
                    junit: vec!["TestResults/*.trx".to_string()],
                }),
                ..Artifacts::default()
            }),
            ..self.base_job("test", options)?
        })
    }

    pub fn create_quality_job(&self, options: &PipelineOptions) -> Result<Job> {
        Ok(Job {
            before_script: vec!["dotnet restore".to_string()],
            script: vec![
                "dotnet format --verify-no-changes --verbosity diagnostic --report ./quality/"
                    .to_string(),
            ],
            dependencies: vec!["build".to_string()],
            artifacts: Some(Artifacts {
                paths: vec!["quality/".to_string()],
                when: Some("always".to_string()),
                ..Artifacts::default()
            }),
            allow_failure: Some(true),
            ..self.base_job("quality", options)?
        })
    }

    pub fn create_deploy_job(&self, options: &PipelineOptions) -> Result<Job> {
        Ok(Job {
            script: vec![
                "dotnet publish --configuration Release --no-build --output ./publish/"
                    .to_string(),
            ],
            dependencies: vec!["build".to_string()],
            artifacts: Some(Artifacts {
                paths: vec!["publish/".to_string()],
                ..Artifacts::default()
            }),
            environment: Some("production".to_string()),
            ..self.base_job("deploy", options)?
        })
    }

    fn base_job(&self, stage: &str, options: &PipelineOptions) -> Result<Job> {
        Ok(Job {
            stage: stage.to_string(),
            image: Some(sdk_image(options)),
            variables: self.variables.job_variables(stage, options)?,
            tags: options.runner_tags.clone(),
            ..Job::default()
        })
    }
}

fn sdk_image(options: &PipelineOptions) -> String {
    let version = options
        .dotnet_version
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_DOTNET_VERSION);
    format!("{SDK_IMAGE}:{version}")
}
