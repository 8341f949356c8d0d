use std::path::PathBuf;

use chrono::{Local, Timelike};
use crossterm::style::Stylize;

use crate::{
  generator::{
    emitter::Artifact,
    naming::NameOverrides,
    orchestrator::{GenerationStats, GeneratorOptions, LogEvent, Orchestrator},
  },
  ui::{Colors, GenerateCommand},
};

fn format_timestamp() -> String {
  let now = Local::now();
  format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second())
}

#[derive(Debug, Clone)]
pub struct GenerateConfig {
  pub input: PathBuf,
  pub output: PathBuf,
  pub options: GeneratorOptions,
  pub verbose: bool,
  pub quiet: bool,
}

impl GenerateConfig {
  pub fn from_command(command: GenerateCommand) -> anyhow::Result<Self> {
    let GenerateCommand {
      input,
      output,
      namespace,
      model_name,
      no_context,
      no_models,
      no_repositories,
      no_configurations,
      rename,
      acronym,
      verbose,
      quiet,
    } = command;

    let mut overrides = NameOverrides::default();
    overrides.renames = parse_pairs(rename, "rename", "RAW=FINAL")?;
    for (token, cased) in parse_pairs(acronym, "acronym", "TOKEN=CASED")? {
      overrides.acronyms.push((token, cased));
    }

    let mut options = GeneratorOptions::new(namespace, model_name);
    options.overrides = overrides;
    options.emit_context = !no_context;
    options.emit_models = !no_models;
    options.emit_repositories = !no_repositories;
    options.emit_configurations = !no_configurations;

    Ok(Self {
      input,
      output,
      options,
      verbose,
      quiet,
    })
  }

  async fn write_artifacts(&self, artifacts: &[Artifact]) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(&self.output).await?;
    for artifact in artifacts {
      let destination = self.output.join(&artifact.path);
      if let Some(parent) = destination.parent() {
        tokio::fs::create_dir_all(parent).await?;
      }
      tokio::fs::write(destination, &artifact.content).await?;
    }
    Ok(())
  }
}

fn parse_pairs(entries: Option<Vec<String>>, flag: &str, shape: &str) -> anyhow::Result<Vec<(String, String)>> {
  let Some(entries) = entries else {
    return Ok(Vec::new());
  };

  let mut pairs = Vec::new();
  for entry in entries {
    let (key, value) = entry
      .split_once('=')
      .ok_or_else(|| anyhow::anyhow!("Invalid {flag} format '{entry}': expected {shape}"))?;
    pairs.push((key.to_string(), value.to_string()));
  }
  Ok(pairs)
}

struct GenerateLogger<'a> {
  config: &'a GenerateConfig,
  colors: &'a Colors,
}

impl<'a> GenerateLogger<'a> {
  fn new(config: &'a GenerateConfig, colors: &'a Colors) -> Self {
    Self { config, colors }
  }

  fn info(&self, message: &str) {
    if !self.config.quiet {
      println!("{} {message}", format_timestamp().with(self.colors.timestamp()));
    }
  }

  fn stat(&self, label: &str, value: String) {
    if !self.config.quiet {
      println!(
        "            {:<25} {}",
        label.with(self.colors.label()),
        value.with(self.colors.value())
      );
    }
  }

  fn log_loading(&self) {
    self.info(
      &format!("Loading EDMX model from: {}", self.config.input.display())
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn log_generating(&self) {
    self.info(&"Generating C# data-access code...".with(self.colors.primary()).to_string());
  }

  fn print_statistics(&self, stats: &GenerationStats) {
    if self.config.quiet {
      return;
    }

    self.stat("Tables read:", stats.tables_read.to_string());
    self.stat("Entities read:", stats.entities_read.to_string());
    if stats.functions_read > 0 {
      self.stat("Functions read:", stats.functions_read.to_string());
    }
    self.stat("Mappings bound:", stats.mappings_bound.to_string());
    self.stat("Files generated:", stats.artifacts_emitted.to_string());
    if !stats.warnings.is_empty() {
      self.stat("Warnings:", stats.warnings.len().to_string());
    }
  }

  fn handle_event(&self, event: &LogEvent) {
    match event {
      LogEvent::Stage(stage) => {
        if self.config.verbose {
          self.info(&stage.with(self.colors.info()).to_string());
        }
      }
      LogEvent::Warning(warning) => {
        if !self.config.quiet {
          eprintln!(
            "{} {}",
            "Warning:".with(self.colors.accent()),
            warning.as_str().with(self.colors.primary())
          );
        }
      }
    }
  }

  fn print_artifact_paths(&self, artifacts: &[Artifact]) {
    if !self.config.verbose || self.config.quiet {
      return;
    }
    for artifact in artifacts {
      println!(
        "            {}",
        artifact.path.display().to_string().with(self.colors.info())
      );
    }
  }

  fn log_writing(&self) {
    self.info(
      &format!("Writing to: {}", self.config.output.display())
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn log_success(&self) {
    if !self.config.quiet {
      println!();
      println!(
        "{} {}",
        format_timestamp().with(self.colors.timestamp()),
        "Successfully generated C# data-access code".with(self.colors.success())
      );
    }
  }
}

pub async fn generate_code(config: GenerateConfig, colors: &Colors) -> anyhow::Result<()> {
  let logger = GenerateLogger::new(&config, colors);

  logger.log_loading();
  let document = tokio::fs::read_to_string(&config.input).await?;

  logger.log_generating();
  let (log, mut events) = tokio::sync::mpsc::unbounded_channel();
  let options = config.options.clone();
  let pipeline = tokio::task::spawn_blocking(move || Orchestrator::new(options).generate(&document, &log));

  while let Some(event) = events.recv().await {
    logger.handle_event(&event);
  }
  let output = pipeline.await??;
  logger.print_statistics(&output.stats);

  logger.log_writing();
  logger.print_artifact_paths(&output.artifacts);
  config.write_artifacts(&output.artifacts).await?;

  logger.log_success();
  Ok(())
}
