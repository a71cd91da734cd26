mod listings;
mod styling;
mod summary;
mod tables;

pub use listings::{print_pipelines, print_projects, print_stage_vocabulary};
pub use styling::{dim, magenta_bold};
pub use summary::{print_errors, print_summary};

/// Prints the `pipegen` banner to stderr.
///
/// Displays the tool name, version, and description at the start of execution.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("🛠  pipegen"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("GitLab CI/CD Pipeline Generator")
    );
}
