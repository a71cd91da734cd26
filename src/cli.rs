use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use std::path::PathBuf;

use crate::auth::Token;
use crate::config::Config;
use crate::output;
use crate::pipeline::{PipelineGenerator, PipelineOptions, StageBuilder, VariableValue};
use crate::providers::gitlab::GitLabClient;

#[derive(Parser)]
#[command(name = "pipegen")]
#[command(author, version, about = "GitLab CI/CD Pipeline Generator", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ./pipegen.{toml,json,yaml,yml})
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Write output to this file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a .gitlab-ci.yml from pipeline options
    Generate(GenerateArgs),

    /// Write a starter config file (pipegen.toml unless --config is given)
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the default and accepted stages of a project type
    Stages {
        #[arg(short = 't', long, default_value = "dotnet")]
        project_type: String,
    },

    /// Browse GitLab projects and pipelines
    Gitlab {
        #[arg(short, long, env = "GITLAB_TOKEN")]
        token: Option<String>,

        /// GitLab instance URL (defaults to the config file or https://gitlab.com)
        #[arg(short, long)]
        url: Option<String>,

        #[command(subcommand)]
        command: GitLabCommands,
    },
}

#[derive(Subcommand)]
enum GitLabCommands {
    /// List projects you are a member of
    Projects,

    /// List recent pipelines of a project
    Pipelines {
        #[arg(short = 'P', long)]
        project: String,

        /// Only pipelines of this branch or tag
        #[arg(short, long = "ref", id = "ref_")]
        ref_: Option<String>,
    },
}

/// Flags that override the `[pipeline]` section of the config file.
#[derive(Args, Debug)]
struct GenerateArgs {
    #[arg(short = 't', long)]
    project_type: Option<String>,

    /// Comma-separated stage order (e.g. build,test,deploy)
    #[arg(short, long, value_delimiter = ',')]
    stages: Vec<String>,

    #[arg(long)]
    dotnet_version: Option<String>,

    #[arg(long)]
    include_tests: bool,

    #[arg(long)]
    include_deployment: bool,

    #[arg(long)]
    include_code_quality: bool,

    /// Custom variable as KEY=VALUE, repeatable
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    variables: Vec<(String, String)>,

    /// Runner tag applied to every job, repeatable
    #[arg(long = "tag", value_name = "TAG")]
    tags: Vec<String>,

    /// Skip the summary table
    #[arg(long)]
    no_summary: bool,
}

impl GenerateArgs {
    fn apply(&self, mut options: PipelineOptions) -> PipelineOptions {
        if let Some(project_type) = &self.project_type {
            options.project_type.clone_from(project_type);
        }
        if !self.stages.is_empty() {
            options.stages.clone_from(&self.stages);
        }
        if self.dotnet_version.is_some() {
            options.dotnet_version.clone_from(&self.dotnet_version);
        }
        options.include_tests |= self.include_tests;
        options.include_deployment |= self.include_deployment;
        options.include_code_quality |= self.include_code_quality;
        for (key, value) in &self.variables {
            options
                .custom_variables
                .insert(key.clone(), VariableValue::from(value.as_str()));
        }
        options.runner_tags.extend(self.tags.iter().cloned());
        options
    }
}

fn parse_key_value(raw: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    if key.trim().is_empty() {
        return Err(format!("variable name is empty in '{raw}'"));
    }
    Ok((key.trim().to_string(), value.to_string()))
}

impl Cli {
    fn execute_generate(&self, config: &Config, args: &GenerateArgs) -> Result<()> {
        let options = args.apply(config.pipeline.clone());
        info!("Generating pipeline for project type: {}", options.project_type);

        let generator = PipelineGenerator::new();
        let configuration = generator.generate(&options)?;
        let yaml = generator.serialize_to_yaml(&configuration)?;

        if let Some(output_path) = self.output.as_ref().or(config.output.path.as_ref()) {
            std::fs::write(output_path, &yaml)
                .with_context(|| format!("Failed to write pipeline: {}", output_path.display()))?;
            info!("Pipeline written to: {}", output_path.display());
        } else {
            print!("{yaml}");
        }

        if config.output.summary && !args.no_summary {
            output::print_summary(&configuration);
        }

        Ok(())
    }

    fn execute_init(&self, force: bool) -> Result<()> {
        let path = self
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from("pipegen.toml"));

        if path.exists() && !force {
            bail!(
                "Config file already exists: {} (use --force to overwrite)",
                path.display()
            );
        }

        Config::default().save(&path)?;
        info!("Config written to: {}", path.display());
        Ok(())
    }

    fn execute_stages(project_type: &str) -> Result<()> {
        let default_stages = StageBuilder::default_stages(project_type)?;
        let valid_stages = StageBuilder::valid_stages(project_type)?;
        output::print_stage_vocabulary(project_type, &default_stages, &valid_stages);
        Ok(())
    }

    async fn execute_gitlab(
        &self,
        config: &Config,
        token: Option<&str>,
        url: Option<&str>,
        command: &GitLabCommands,
    ) -> Result<()> {
        let token = token
            .or(config.gitlab.token.as_deref())
            .map(Token::from);
        let url = url.unwrap_or(&config.gitlab.base_url);

        let client = GitLabClient::new(url, token)?;

        match command {
            GitLabCommands::Projects => {
                info!("Listing GitLab projects from: {url}");
                let projects = client.list_projects(config.gitlab.per_page).await?;
                output::print_projects(&projects);
            }
            GitLabCommands::Pipelines { project, ref_ } => {
                info!("Listing pipelines for project: {project}");
                let pipelines = client
                    .list_pipelines(project, ref_.as_deref(), config.gitlab.per_page)
                    .await?;
                output::print_pipelines(project, &pipelines);
            }
        }

        Ok(())
    }

    pub async fn execute(&self) -> Result<()> {
        match &self.command {
            // init writes the config file, so it must not require one to load
            Commands::Init { force } => self.execute_init(*force),
            Commands::Stages { project_type } => Self::execute_stages(project_type),
            Commands::Generate(args) => {
                let config = self.load_config()?;
                self.execute_generate(&config, args)
            }
            Commands::Gitlab {
                token,
                url,
                command,
            } => {
                let config = self.load_config()?;
                self.execute_gitlab(&config, token.as_deref(), url.as_deref(), command)
                    .await
            }
        }
    }

    fn load_config(&self) -> Result<Config> {
        Config::load(self.config.as_deref())
    }
}
