use std::fmt;

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

use super::options::{PipelineOptions, ProjectType};
use crate::error::{PipegenError, Result};

/// A scalar CI variable value.
///
/// Untagged so YAML/TOML scalars keep their native type on the way in and out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl VariableValue {
    /// Whether the value has a YAML scalar representation GitLab accepts.
    pub fn is_representable(&self) -> bool {
        match self {
            Self::Float(f) => f.is_finite(),
            _ => true,
        }
    }
}

impl fmt::Display for VariableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for VariableValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for VariableValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for VariableValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for VariableValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

/// Ordered variable mapping; insertion order is the emitted order.
pub type Variables = IndexMap<String, VariableValue>;

/// Capability the job builder needs: the variable set for a stage's job.
pub trait JobVariableSource {
    fn job_variables(&self, stage: &str, options: &PipelineOptions) -> Result<Variables>;
}

/// Builds global and per-job variable mappings.
#[derive(Debug, Clone, Copy, Default)]
pub struct VariableBuilder;

impl VariableBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Built-in variables every pipeline of the project type starts from.
    pub fn default_variables(project_type: &str) -> Result<Variables> {
        match ProjectType::parse(project_type)? {
            ProjectType::DotNet => Ok(string_variables(&[
                ("DOTNET_CLI_TELEMETRY_OPTOUT", "true"),
                ("DOTNET_SKIP_FIRST_TIME_EXPERIENCE", "true"),
                ("NUGET_PACKAGES", "$CI_PROJECT_DIR/.nuget/packages"),
            ])),
        }
    }

    /// Top-level `variables:` section: defaults, then `DOTNET_VERSION`,
    /// then user overrides.
    pub fn build_global_variables(&self, options: &PipelineOptions) -> Result<Variables> {
        let mut defaults = Self::default_variables(&options.project_type)?;

        let version = options.dotnet_version.as_deref().map(str::trim);
        if let Some(version) = version.filter(|v| !v.is_empty()) {
            defaults.insert("DOTNET_VERSION".to_string(), VariableValue::from(version));
        }

        let variables = Self::merge_variables(&defaults, &options.custom_variables);
        debug!("Built {} global variables", variables.len());
        Ok(variables)
    }

    /// Job-scoped variables for the job generated in `stage`.
    ///
    /// Only keys already defined by the stage defaults are overridable from
    /// `custom_variables` here; everything else lives in the global section.
    pub fn build_job_variables(&self, stage: &str, options: &PipelineOptions) -> Result<Variables> {
        if stage.is_empty() {
            return Err(PipegenError::MissingArgument("stage"));
        }

        let defaults = match (ProjectType::parse(&options.project_type)?, stage) {
            (ProjectType::DotNet, "build") => string_variables(&[
                ("BUILD_CONFIGURATION", "Release"),
                ("DOTNET_CONFIGURATION", "Release"),
                ("DOTNET_VERBOSITY", "minimal"),
            ]),
            (ProjectType::DotNet, "test") => string_variables(&[
                ("DOTNET_CONFIGURATION", "Release"),
                ("TEST_RESULTS_DIR", "TestResults"),
            ]),
            (ProjectType::DotNet, "quality") => {
                string_variables(&[("DOTNET_VERBOSITY", "diagnostic")])
            }
            (ProjectType::DotNet, "deploy") => string_variables(&[
                ("DOTNET_CONFIGURATION", "Release"),
                ("PUBLISH_DIR", "publish"),
            ]),
            _ => Variables::new(),
        };

        let overrides: Variables = options
            .custom_variables
            .iter()
            .filter(|(key, _)| defaults.contains_key(*key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(Self::merge_variables(&defaults, &overrides))
    }

    /// Union of both mappings where `custom` wins on identical keys.
    ///
    /// Keys keep the position of their first appearance.
    pub fn merge_variables(defaults: &Variables, custom: &Variables) -> Variables {
        let mut merged = defaults.clone();
        for (key, value) in custom {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }
}

impl JobVariableSource for VariableBuilder {
    fn job_variables(&self, stage: &str, options: &PipelineOptions) -> Result<Variables> {
        self.build_job_variables(stage, options)
    }
}

fn string_variables(pairs: &[(&str, &str)]) -> Variables {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_string(), VariableValue::from(*value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Variables {
        string_variables(pairs)
    }

    mod merge_variables_tests {
        use super::*;

        #[test]
        fn test_custom_overrides_default() {
            // Arrange: Both mappings define KEY
            let defaults = vars(&[("KEY", "default"), ("OTHER", "1")]);
            let custom = vars(&[("KEY", "custom"), ("EXTRA", "2")]);

            // Act: Merge
            let merged = VariableBuilder::merge_variables(&defaults, &custom);

            // Assert: Custom wins and every distinct key survives
            assert_eq!(merged.get("KEY"), Some(&VariableValue::from("custom")));
            assert_eq!(merged.len(), 3);
        }

        #[test]
        fn test_key_count_is_union_of_keys() {
            let defaults = vars(&[("A", "1"), ("B", "2"), ("C", "3")]);
            let custom = vars(&[("B", "x"), ("C", "y"), ("D", "z")]);

            let merged = VariableBuilder::merge_variables(&defaults, &custom);

            assert_eq!(merged.len(), 4);
            for (key, value) in &custom {
                assert_eq!(merged.get(key), Some(value));
            }
        }

        #[test]
        fn test_keys_are_case_sensitive() {
            let defaults = vars(&[("Key", "default")]);
            let custom = vars(&[("KEY", "custom")]);

            let merged = VariableBuilder::merge_variables(&defaults, &custom);

            assert_eq!(merged.len(), 2);
            assert_eq!(merged.get("Key"), Some(&VariableValue::from("default")));
        }

        #[test]
        fn test_overridden_key_keeps_position() {
            let defaults = vars(&[("A", "1"), ("B", "2")]);
            let custom = vars(&[("A", "override")]);

            let merged = VariableBuilder::merge_variables(&defaults, &custom);

            assert_eq!(merged.get_index(0).map(|(k, _)| k.as_str()), Some("A"));
        }
    }

    mod global_variables_tests {
        use super::*;

        #[test]
        fn test_dotnet_defaults() {
            let variables = VariableBuilder::new()
                .build_global_variables(&PipelineOptions::default())
                .unwrap();

            assert_eq!(
                variables.get("DOTNET_CLI_TELEMETRY_OPTOUT"),
                Some(&VariableValue::from("true"))
            );
            assert_eq!(
                variables.get("DOTNET_SKIP_FIRST_TIME_EXPERIENCE"),
                Some(&VariableValue::from("true"))
            );
            assert_eq!(
                variables.get("NUGET_PACKAGES"),
                Some(&VariableValue::from("$CI_PROJECT_DIR/.nuget/packages"))
            );
            assert!(!variables.contains_key("DOTNET_VERSION"));
        }

        #[test]
        fn test_dotnet_version_added() {
            let options = PipelineOptions {
                dotnet_version: Some("8.0".to_string()),
                ..PipelineOptions::default()
            };

            let variables = VariableBuilder::new()
                .build_global_variables(&options)
                .unwrap();

            assert_eq!(variables.get("DOTNET_VERSION"), Some(&VariableValue::from("8.0")));
        }

        #[test]
        fn test_blank_dotnet_version_is_ignored() {
            let options = PipelineOptions {
                dotnet_version: Some("  ".to_string()),
                ..PipelineOptions::default()
            };

            let variables = VariableBuilder::new()
                .build_global_variables(&options)
                .unwrap();

            assert!(!variables.contains_key("DOTNET_VERSION"));
        }

        #[test]
        fn test_custom_variables_override_defaults() {
            let mut options = PipelineOptions::default();
            options.custom_variables.insert(
                "DOTNET_CLI_TELEMETRY_OPTOUT".to_string(),
                VariableValue::from("false"),
            );
            options
                .custom_variables
                .insert("DEPLOY_TARGET".to_string(), VariableValue::from("staging"));

            let variables = VariableBuilder::new()
                .build_global_variables(&options)
                .unwrap();

            assert_eq!(
                variables.get("DOTNET_CLI_TELEMETRY_OPTOUT"),
                Some(&VariableValue::from("false"))
            );
            assert_eq!(variables.get("DEPLOY_TARGET"), Some(&VariableValue::from("staging")));
            assert_eq!(variables.len(), 4);
        }

        #[test]
        fn test_unknown_project_type() {
            let options = PipelineOptions {
                project_type: "cobol".to_string(),
                ..PipelineOptions::default()
            };

            let result = VariableBuilder::new().build_global_variables(&options);

            assert!(matches!(result, Err(PipegenError::UnsupportedProjectType(_))));
        }
    }

    mod job_variables_tests {
        use super::*;

        #[test]
        fn test_build_stage_defaults() {
            let variables = VariableBuilder::new()
                .build_job_variables("build", &PipelineOptions::default())
                .unwrap();

            assert_eq!(
                variables,
                vars(&[
                    ("BUILD_CONFIGURATION", "Release"),
                    ("DOTNET_CONFIGURATION", "Release"),
                    ("DOTNET_VERBOSITY", "minimal"),
                ])
            );
        }

        #[test]
        fn test_does_not_include_globals() {
            let variables = VariableBuilder::new()
                .build_job_variables("build", &PipelineOptions::default())
                .unwrap();

            assert!(!variables.contains_key("NUGET_PACKAGES"));
        }

        #[test]
        fn test_custom_override_of_stage_default() {
            let mut options = PipelineOptions::default();
            options
                .custom_variables
                .insert("BUILD_CONFIGURATION".to_string(), VariableValue::from("Debug"));
            options
                .custom_variables
                .insert("UNRELATED".to_string(), VariableValue::from("x"));

            let variables = VariableBuilder::new()
                .build_job_variables("build", &options)
                .unwrap();

            assert_eq!(
                variables.get("BUILD_CONFIGURATION"),
                Some(&VariableValue::from("Debug"))
            );
            assert!(!variables.contains_key("UNRELATED"));
        }

        #[test]
        fn test_unknown_stage_has_no_variables() {
            let variables = VariableBuilder::new()
                .build_job_variables("package", &PipelineOptions::default())
                .unwrap();

            assert!(variables.is_empty());
        }

        #[test]
        fn test_empty_stage_is_rejected() {
            let result =
                VariableBuilder::new().build_job_variables("", &PipelineOptions::default());

            assert!(matches!(result, Err(PipegenError::MissingArgument("stage"))));
        }
    }

    #[test]
    fn test_variable_value_yaml_scalars() {
        let parsed: Variables =
            serde_yaml::from_str("A: true\nB: 3\nC: 1.5\nD: text\n").unwrap();

        assert_eq!(parsed.get("A"), Some(&VariableValue::Bool(true)));
        assert_eq!(parsed.get("B"), Some(&VariableValue::Integer(3)));
        assert_eq!(parsed.get("C"), Some(&VariableValue::Float(1.5)));
        assert_eq!(parsed.get("D"), Some(&VariableValue::from("text")));
    }

    #[test]
    fn test_non_finite_float_is_not_representable() {
        assert!(!VariableValue::Float(f64::NAN).is_representable());
        assert!(VariableValue::Float(2.0).is_representable());
        assert!(VariableValue::from("x").is_representable());
    }
}
