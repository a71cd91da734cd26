mod generator;
mod jobs;
mod options;
mod stages;
mod types;
mod variables;

pub use generator::PipelineGenerator;
pub use options::PipelineOptions;
pub use stages::StageBuilder;
pub use types::PipelineConfiguration;
pub use variables::VariableValue;
