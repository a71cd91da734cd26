use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::stages::StageBuilder;
use super::variables::Variables;
use crate::error::{PipegenError, Result};

/// Project types the generator has job templates for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectType {
    DotNet,
}

impl ProjectType {
    pub const ALL: [ProjectType; 1] = [ProjectType::DotNet];

    /// Parses a project type name, ignoring case and surrounding whitespace.
    pub fn parse(name: &str) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PipegenError::MissingArgument("project_type"));
        }

        Self::ALL
            .into_iter()
            .find(|pt| pt.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| PipegenError::UnsupportedProjectType(name.to_string()))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::DotNet => "dotnet",
        }
    }

    fn supported_list() -> String {
        Self::ALL
            .iter()
            .map(|pt| pt.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared input for one generation run.
///
/// Populated from the `[pipeline]` section of a config file and/or
/// command-line flags. Every field has a default so partial files parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PipelineOptions {
    /// Project type, e.g. "dotnet"
    pub project_type: String,

    /// Explicit stage order; empty means the project type's defaults
    pub stages: Vec<String>,

    /// SDK version used for job images (defaults to 9.0)
    pub dotnet_version: Option<String>,

    pub include_tests: bool,

    pub include_deployment: bool,

    pub include_code_quality: bool,

    /// Runner tags applied to every generated job
    pub runner_tags: Vec<String>,

    /// User variables, overriding defaults with the same key
    pub custom_variables: Variables,

    /// Emitted verbatim as the top-level `default:` section
    pub job_defaults: Variables,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            project_type: ProjectType::DotNet.as_str().to_string(),
            stages: Vec::new(),
            dotnet_version: None,
            include_tests: false,
            include_deployment: false,
            include_code_quality: false,
            runner_tags: Vec::new(),
            custom_variables: Variables::new(),
            job_defaults: Variables::new(),
        }
    }
}

/// Checks options against every validation rule and returns all violations.
///
/// An empty result means the options are safe to hand to the generator.
pub fn validate_options(options: &PipelineOptions) -> Vec<String> {
    let mut errors = Vec::new();

    match ProjectType::parse(&options.project_type) {
        Ok(project_type) => {
            if !options.stages.is_empty() {
                errors.extend(StageBuilder::validate_stages(
                    &options.stages,
                    project_type.as_str(),
                ));
            }
        }
        Err(PipegenError::MissingArgument(_)) => {
            errors.push("Project type is required".to_string());
        }
        Err(_) => {
            errors.push(format!(
                "Unsupported project type '{}'. Supported types are: {}",
                options.project_type.trim(),
                ProjectType::supported_list()
            ));
        }
    }

    let mut seen = HashSet::new();
    for stage in &options.stages {
        if !seen.insert(stage.as_str()) {
            errors.push(format!("Duplicate stage '{stage}'"));
        }
    }

    if options
        .custom_variables
        .keys()
        .any(|key| key.trim().is_empty())
    {
        errors.push("Variable names must not be empty".to_string());
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::variables::VariableValue;

    fn dotnet_options() -> PipelineOptions {
        PipelineOptions::default()
    }

    mod project_type_tests {
        use super::*;

        #[test]
        fn test_parse_is_case_insensitive() {
            assert_eq!(ProjectType::parse("DotNet").unwrap(), ProjectType::DotNet);
            assert_eq!(ProjectType::parse(" dotnet ").unwrap(), ProjectType::DotNet);
        }

        #[test]
        fn test_parse_unknown_type() {
            let err = ProjectType::parse("cobol").unwrap_err();
            assert!(matches!(err, PipegenError::UnsupportedProjectType(ref t) if t == "cobol"));
        }

        #[test]
        fn test_parse_empty_type() {
            let err = ProjectType::parse("").unwrap_err();
            assert!(matches!(err, PipegenError::MissingArgument("project_type")));
        }
    }

    mod validate_options_tests {
        use super::*;

        #[test]
        fn test_default_options_are_valid() {
            assert!(validate_options(&dotnet_options()).is_empty());
        }

        #[test]
        fn test_empty_project_type() {
            let options = PipelineOptions {
                project_type: String::new(),
                ..dotnet_options()
            };

            let errors = validate_options(&options);

            assert_eq!(errors, vec!["Project type is required".to_string()]);
        }

        #[test]
        fn test_unknown_project_type_skips_stage_checks() {
            let options = PipelineOptions {
                project_type: "cobol".to_string(),
                stages: vec!["compile".to_string()],
                ..dotnet_options()
            };

            let errors = validate_options(&options);

            assert_eq!(errors.len(), 1);
            assert!(errors[0].contains("Unsupported project type 'cobol'"));
            assert!(errors[0].contains("dotnet"));
        }

        #[test]
        fn test_reports_every_invalid_stage() {
            let options = PipelineOptions {
                stages: vec![
                    "build".to_string(),
                    "lint".to_string(),
                    "release".to_string(),
                ],
                ..dotnet_options()
            };

            let errors = validate_options(&options);

            assert_eq!(errors.len(), 2);
            assert!(errors[0].contains("Invalid stage 'lint'"));
            assert!(errors[1].contains("Invalid stage 'release'"));
        }

        #[test]
        fn test_duplicate_stage() {
            let options = PipelineOptions {
                stages: vec!["build".to_string(), "build".to_string()],
                ..dotnet_options()
            };

            let errors = validate_options(&options);

            assert_eq!(errors, vec!["Duplicate stage 'build'".to_string()]);
        }

        #[test]
        fn test_empty_variable_name() {
            let mut options = dotnet_options();
            options
                .custom_variables
                .insert(" ".to_string(), VariableValue::from("x"));

            let errors = validate_options(&options);

            assert_eq!(errors, vec!["Variable names must not be empty".to_string()]);
        }
    }

    #[test]
    fn test_options_deserialize_from_kebab_case() {
        let toml_content = r#"
project-type = "dotnet"
stages = ["build", "test"]
dotnet-version = "8.0"
include-tests = true
runner-tags = ["docker"]

[custom-variables]
DEPLOY_TARGET = "staging"
RETRIES = 3
"#;

        let options: PipelineOptions = toml::from_str(toml_content).unwrap();

        assert_eq!(options.dotnet_version.as_deref(), Some("8.0"));
        assert!(options.include_tests);
        assert!(!options.include_deployment);
        assert_eq!(options.runner_tags, vec!["docker".to_string()]);
        assert_eq!(
            options.custom_variables.get("RETRIES"),
            Some(&VariableValue::Integer(3))
        );
    }
}
