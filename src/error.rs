use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipegenError {
    #[error("Invalid pipeline options: {}", .0.join("; "))]
    InvalidOptions(Vec<String>),

    #[error("Missing required argument: {0}")]
    MissingArgument(&'static str),

    #[error("Unsupported project type '{0}'")]
    UnsupportedProjectType(String),

    #[error("Pipeline generation failed while {context}: {source}")]
    Generation {
        context: String,
        #[source]
        source: Box<PipegenError>,
    },

    #[error("Inconsistent pipeline: {}", .0.join("; "))]
    Inconsistent(Vec<String>),

    #[error("YAML serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl PipegenError {
    /// Wraps a builder failure with the generation step it happened in.
    pub fn generation(context: impl Into<String>, source: PipegenError) -> Self {
        Self::Generation {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Validation messages carried by an `InvalidOptions` error, empty otherwise.
    pub fn validation_errors(&self) -> &[String] {
        match self {
            Self::InvalidOptions(errors) => errors,
            _ => &[],
        }
    }
}

impl From<serde_yaml::Error> for PipegenError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PipegenError>;
