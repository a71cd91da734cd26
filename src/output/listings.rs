use comfy_table::Cell;

use crate::providers::gitlab::{GitLabPipeline, GitLabProject};

use super::styling::{bright, dim};
use super::tables::{create_cyan_header, create_table, list_cell, status_cell};

pub fn print_projects(projects: &[GitLabProject]) {
    println!("{}  {}", bright("📁"), bright("Projects").underlined());

    if projects.is_empty() {
        println!("{}", dim("No projects found"));
        return;
    }

    let mut table = create_table();
    table.set_header(create_cyan_header(&["ID", "Project", "Default Branch", "URL"]));
    for project in projects {
        table.add_row(vec![
            Cell::new(project.id),
            Cell::new(&project.path_with_namespace),
            Cell::new(project.default_branch.as_deref().unwrap_or("-")),
            Cell::new(&project.web_url),
        ]);
    }
    println!("{table}");
}

pub fn print_pipelines(project: &str, pipelines: &[GitLabPipeline]) {
    println!(
        "{}  {} {}",
        bright("🚀"),
        bright("Pipelines").underlined(),
        dim(project)
    );

    if pipelines.is_empty() {
        println!("{}", dim("No pipelines found"));
        return;
    }

    let mut table = create_table();
    table.set_header(create_cyan_header(&["ID", "Status", "Ref", "Source", "Created", "URL"]));
    for pipeline in pipelines {
        table.add_row(vec![
            Cell::new(pipeline.id),
            status_cell(&pipeline.status),
            Cell::new(&pipeline.ref_),
            Cell::new(pipeline.source.as_deref().unwrap_or("-")),
            Cell::new(pipeline.created_at.format("%Y-%m-%d %H:%M")),
            Cell::new(&pipeline.web_url),
        ]);
    }
    println!("{table}");
}

/// Prints the default and accepted stage lists of a project type.
pub fn print_stage_vocabulary(
    project_type: &str,
    default_stages: &[String],
    valid_stages: &[String],
) {
    println!("{}  {} {}", bright("🧱"), bright("Stages").underlined(), dim(project_type));

    let mut table = create_table();
    table.set_header(create_cyan_header(&["Default", "Accepted"]));
    table.add_row(vec![list_cell(default_stages), list_cell(valid_stages)]);
    println!("{table}");
}
