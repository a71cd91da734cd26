use std::fmt::Write;

use crate::pipeline::PipelineConfiguration;

use super::styling::{bright, bright_green, bright_red, cyan, dim};
use super::tables::{create_cyan_header, create_table, list_cell};

/// Prints a stage-by-stage overview of the generated pipeline to stderr.
///
/// Stderr keeps stdout clean for the YAML document itself.
pub fn print_summary(configuration: &PipelineConfiguration) {
    eprintln!("{}", render_summary(configuration));
}

/// Prints every validation or generation message as a bullet list to stderr.
pub fn print_errors(title: &str, errors: &[String]) {
    eprintln!("{}", render_errors(title, errors));
}

fn render_summary(configuration: &PipelineConfiguration) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "{}  {}", bright("📋"), bright("Pipeline").underlined());

    let mut table = create_table();
    table.set_header(create_cyan_header(&["Stage", "Job", "Image", "Dependencies"]));

    for stage in &configuration.stages {
        let stage_jobs: Vec<_> = configuration
            .jobs
            .iter()
            .filter(|(_, job)| &job.stage == stage)
            .collect();

        if stage_jobs.is_empty() {
            table.add_row(vec![
                stage.clone(),
                dim("(no jobs)").to_string(),
                String::new(),
                String::new(),
            ]);
            continue;
        }

        for (name, job) in stage_jobs {
            table.add_row(vec![
                comfy_table::Cell::new(stage),
                comfy_table::Cell::new(name),
                comfy_table::Cell::new(job.image.as_deref().unwrap_or("-")),
                list_cell(&job.dependencies),
            ]);
        }
    }

    let _ = writeln!(output, "{table}");
    let _ = writeln!(
        output,
        "{} {} stages, {} jobs, {} global variables",
        bright_green("✓"),
        cyan(configuration.stages.len()),
        cyan(configuration.jobs.len()),
        cyan(configuration.variables.len())
    );

    output
}

fn render_errors(title: &str, errors: &[String]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "{} {}", bright_red("✗"), bright_red(title));
    for error in errors {
        let _ = writeln!(output, "  - {error}");
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{PipelineGenerator, PipelineOptions};

    #[test]
    fn test_summary_lists_every_stage_and_job() {
        let options = PipelineOptions {
            include_tests: true,
            ..PipelineOptions::default()
        };
        let configuration = PipelineGenerator::new().generate(&options).unwrap();

        let rendered = console::strip_ansi_codes(&render_summary(&configuration)).to_string();

        assert!(rendered.contains("mcr.microsoft.com/dotnet/sdk:9.0"));
        assert!(rendered.contains("deploy"));
        assert!(rendered.contains("(no jobs)"));
        assert!(rendered.contains("3 stages, 2 jobs, 3 global variables"));
    }

    #[test]
    fn test_errors_rendered_one_per_line() {
        let errors = vec![
            "Invalid stage 'lint'".to_string(),
            "Duplicate stage 'build'".to_string(),
        ];

        let rendered =
            console::strip_ansi_codes(&render_errors("Invalid options", &errors)).to_string();

        assert!(rendered.contains("Invalid options"));
        assert!(rendered.contains("  - Invalid stage 'lint'\n"));
        assert!(rendered.contains("  - Duplicate stage 'build'\n"));
    }
}
