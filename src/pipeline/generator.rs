use indexmap::IndexMap;
use log::{debug, info, warn};

use super::jobs::JobBuilder;
use super::options::{validate_options, PipelineOptions};
use super::stages::StageBuilder;
use super::types::{Job, PipelineConfiguration, RESERVED_KEYWORDS};
use super::variables::VariableBuilder;
use crate::error::{PipegenError, Result};

const YAML_HEADER: &str = "# Generated by pipegen. Regenerate instead of editing by hand.\n";

/// Turns validated options into a GitLab CI configuration.
///
/// Holds only stateless builders, so one generator can serve any number of
/// generation calls.
#[derive(Debug, Clone, Default)]
pub struct PipelineGenerator {
    stages: StageBuilder,
    jobs: JobBuilder<VariableBuilder>,
    variables: VariableBuilder,
}

impl PipelineGenerator {
    pub fn new() -> Self {
        Self {
            stages: StageBuilder::new(),
            jobs: JobBuilder::new(VariableBuilder::new()),
            variables: VariableBuilder::new(),
        }
    }

    /// Generates the pipeline configuration for `options`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOptions` with every validation message when the options
    /// are rejected, or `Generation` wrapping the failing builder step.
    pub fn generate(&self, options: &PipelineOptions) -> Result<PipelineConfiguration> {
        let errors = validate_options(options);
        if !errors.is_empty() {
            return Err(PipegenError::InvalidOptions(errors));
        }

        info!(
            "Generating {} pipeline configuration",
            options.project_type.trim()
        );

        let stages = self
            .stages
            .build_stages(options)
            .map_err(|e| PipegenError::generation("building stages", e))?;

        let mut jobs = IndexMap::new();
        for stage in &stages {
            let stage_jobs = self
                .jobs
                .build_jobs_for_stage(stage, options)
                .map_err(|e| {
                    PipegenError::generation(format!("building jobs for stage '{stage}'"), e)
                })?;

            if stage_jobs.is_empty() {
                warn!("Stage '{stage}' has no generated jobs");
            }
            jobs.extend(stage_jobs);
        }

        let variables = self
            .variables
            .build_global_variables(options)
            .map_err(|e| PipegenError::generation("building global variables", e))?;

        let configuration = PipelineConfiguration {
            stages,
            variables,
            default: options.job_defaults.clone(),
            jobs,
        };

        let problems = check_consistency(&configuration);
        if !problems.is_empty() {
            return Err(PipegenError::generation(
                "checking the assembled configuration",
                PipegenError::Inconsistent(problems),
            ));
        }

        info!(
            "Generated {} stages and {} jobs",
            configuration.stages.len(),
            configuration.jobs.len()
        );

        Ok(configuration)
    }

    /// Renders the configuration as GitLab CI YAML.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` when a variable has no YAML representation or
    /// the serializer fails.
    pub fn serialize_to_yaml(&self, configuration: &PipelineConfiguration) -> Result<String> {
        ensure_representable(configuration)?;

        let body = serde_yaml::to_string(configuration)?;
        debug!("Rendered {} bytes of YAML", body.len());

        Ok(format!("{YAML_HEADER}{body}"))
    }
}

/// Local syntactic checks on an assembled configuration.
///
/// Returns one message per broken reference, reserved job name or
/// dependency that runs after its dependent.
pub fn check_consistency(configuration: &PipelineConfiguration) -> Vec<String> {
    let mut problems = Vec::new();

    if configuration.jobs.is_empty() {
        problems.push("Pipeline has no jobs".to_string());
    }

    let stage_index = |stage: &str| configuration.stages.iter().position(|s| s == stage);

    for (name, job) in &configuration.jobs {
        if RESERVED_KEYWORDS.contains(&name.as_str()) {
            problems.push(format!("Job name '{name}' is a reserved keyword"));
        }

        if !configuration.stages.contains(&job.stage) {
            problems.push(format!(
                "Job '{name}' uses stage '{}' which is not in the stage list",
                job.stage
            ));
        }

        for dependency in &job.dependencies {
            let Some(dependency_job) = configuration.jobs.get(dependency) else {
                problems.push(format!(
                    "Job '{name}' depends on unknown job '{dependency}'"
                ));
                continue;
            };

            if let (Some(own), Some(theirs)) =
                (stage_index(&job.stage), stage_index(&dependency_job.stage))
            {
                if theirs > own {
                    problems.push(format!(
                        "Job '{name}' depends on '{dependency}' from a later stage"
                    ));
                }
            }
        }
    }

    problems
}

fn ensure_representable(configuration: &PipelineConfiguration) -> Result<()> {
    let job_variables = configuration
        .jobs
        .iter()
        .flat_map(|(name, job): (&String, &Job)| {
            job.variables
                .iter()
                .map(move |(key, value)| (format!("{name}.{key}"), value))
        });
    let global_variables = configuration
        .variables
        .iter()
        .chain(&configuration.default)
        .map(|(key, value)| (key.clone(), value));

    for (key, value) in global_variables.chain(job_variables) {
        if !value.is_representable() {
            return Err(PipegenError::Serialization(format!(
                "value of '{key}' ({value}) cannot be represented in YAML"
            )));
        }
    }

    Ok(())
}
