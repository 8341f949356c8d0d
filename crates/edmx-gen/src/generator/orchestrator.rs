//! Orchestration for the EDMX to C# code generation pipeline.
//!
//! This module provides an opaque `Orchestrator` struct that manages the
//! entire generation process: parse the document, read the three sections,
//! bind them together, and run the requested emitters. The pipeline never
//! prints; progress and warnings are streamed as [`LogEvent`] records so the
//! CLI layer decides how to render them.
//!
//! ## Usage
//!
//! ```no_run
//! use edmx_gen::generator::orchestrator::{GeneratorOptions, Orchestrator};
//!
//! # fn example() -> anyhow::Result<()> {
//! let document = std::fs::read_to_string("Model.edmx")?;
//! let (log, _events) = tokio::sync::mpsc::unbounded_channel();
//!
//! let orchestrator = Orchestrator::new(GeneratorOptions::new("Acme.Data", "Northwind"));
//! let output = orchestrator.generate(&document, &log)?;
//!
//! println!("Generated {} files with {} warnings", output.artifacts.len(), output.stats.warnings.len());
//! # Ok(())
//! # }
//! ```

use crate::generator::{
  binder::bind,
  document::Element,
  emitter::{
    Artifact, EmitContext, emit_configurations, emit_context, emit_domain_models, emit_repositories,
    emit_schema_constants,
  },
  error::GenerateError,
  naming::NameOverrides,
  reader::{read_conceptual_model, read_mappings, read_storage_model},
};

/// Everything the pipeline needs to know besides the document itself.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
  /// Root C# namespace of the generated project.
  pub namespace: String,
  /// Model name used to derive the context and schema-constant class names.
  pub model_name: String,
  pub overrides: NameOverrides,
  pub emit_context: bool,
  pub emit_models: bool,
  pub emit_repositories: bool,
  pub emit_configurations: bool,
}

impl GeneratorOptions {
  pub fn new(namespace: impl Into<String>, model_name: impl Into<String>) -> Self {
    Self {
      namespace: namespace.into(),
      model_name: model_name.into(),
      overrides: NameOverrides::default(),
      emit_context: true,
      emit_models: true,
      emit_repositories: true,
      emit_configurations: true,
    }
  }
}

/// Progress record streamed while a run is in flight.
#[derive(Debug, Clone)]
pub enum LogEvent {
  /// A pipeline stage started.
  Stage(&'static str),
  /// A non-fatal finding; also collected into [`GenerationStats`].
  Warning(String),
}

pub type LogSender = tokio::sync::mpsc::UnboundedSender<LogEvent>;

/// Statistics about one generation run.
#[derive(Debug, Default)]
pub struct GenerationStats {
  /// Tables and views read from the storage section.
  pub tables_read: usize,
  /// Entities read from the conceptual section.
  pub entities_read: usize,
  /// Stored functions read from the storage section.
  pub functions_read: usize,
  /// Entity ↔ table correspondences bound.
  pub mappings_bound: usize,
  /// Files produced by the emitters.
  pub artifacts_emitted: usize,
  /// Non-fatal findings from the readers and the binder.
  pub warnings: Vec<String>,
}

/// Result of a successful run.
#[derive(Debug)]
pub struct GeneratedOutput {
  pub artifacts: Vec<Artifact>,
  pub stats: GenerationStats,
}

/// High-level orchestrator for EDMX to C# code generation.
pub struct Orchestrator {
  options: GeneratorOptions,
}

impl Orchestrator {
  pub fn new(options: GeneratorOptions) -> Self {
    Self { options }
  }

  /// Runs the complete pipeline over one document.
  ///
  /// # Errors
  ///
  /// Returns an error if the document is not well-formed XML, a required
  /// section is missing, a cross-section reference cannot be resolved, or an
  /// emitter meets a type or relationship shape it cannot translate.
  pub fn generate(&self, document: &str, log: &LogSender) -> Result<GeneratedOutput, GenerateError> {
    let mut warnings = Vec::new();
    let report = |batch: Vec<String>, warnings: &mut Vec<String>| {
      for warning in &batch {
        // A closed receiver just means nobody is listening anymore.
        let _ = log.send(LogEvent::Warning(warning.clone()));
      }
      warnings.extend(batch);
    };

    let _ = log.send(LogEvent::Stage("parsing document"));
    let root = Element::parse(document)?;

    let _ = log.send(LogEvent::Stage("reading model sections"));
    let (mut storage, storage_warnings) = read_storage_model(&root, &self.options.overrides)?;
    report(storage_warnings, &mut warnings);
    let (mut conceptual, conceptual_warnings) = read_conceptual_model(&root, &self.options.overrides)?;
    report(conceptual_warnings, &mut warnings);
    let (mappings, mapping_warnings) = read_mappings(&root, &self.options.overrides)?;
    report(mapping_warnings, &mut warnings);

    let _ = log.send(LogEvent::Stage("binding models"));
    report(bind(&mut storage, &mut conceptual, &mappings)?, &mut warnings);

    let _ = log.send(LogEvent::Stage("emitting artifacts"));
    let ctx = EmitContext {
      storage: &storage,
      conceptual: &conceptual,
      mappings: &mappings,
      namespace: &self.options.namespace,
      model_name: &self.options.model_name,
      overrides: &self.options.overrides,
    };

    // Schema constants are referenced by every other artifact kind, so they
    // are not subject to a toggle.
    let mut artifacts = emit_schema_constants(&ctx);
    if self.options.emit_models {
      artifacts.extend(emit_domain_models(&ctx)?);
    }
    if self.options.emit_configurations {
      artifacts.extend(emit_configurations(&ctx)?);
    }
    if self.options.emit_context {
      artifacts.extend(emit_context(&ctx)?);
    }
    if self.options.emit_repositories {
      artifacts.extend(emit_repositories(&ctx)?);
    }

    let stats = GenerationStats {
      tables_read: storage.tables.len(),
      entities_read: conceptual.entities.len(),
      functions_read: storage.functions.len(),
      mappings_bound: mappings.len(),
      artifacts_emitted: artifacts.len(),
      warnings,
    };
    Ok(GeneratedOutput { artifacts, stats })
  }
}
