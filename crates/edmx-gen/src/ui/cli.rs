use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::colors::{ColorMode, Colors, ThemeMode};

#[derive(Parser, Debug)]
#[command(name = "edmx-gen")]
#[command(author, version, about = "EDMX to C# data-access code generator")]
#[command(styles = Colors::clap_styles())]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Control color output
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub color: ColorMode,

  /// Terminal theme (dark or light background)
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub theme: ThemeMode,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// List information from an EDMX model
  List {
    #[command(subcommand)]
    list_command: ListCommands,
  },
  /// Generate C# data-access code from an EDMX model
  Generate(GenerateCommand),
}

#[derive(Args, Debug)]
pub struct GenerateCommand {
  /// Path to the EDMX model file
  #[arg(short, long, value_name = "FILE")]
  pub input: PathBuf,

  /// Directory where the generated files will be written
  #[arg(short, long, value_name = "DIR")]
  pub output: PathBuf,

  /// Root namespace of the generated project
  #[arg(short, long, value_name = "NAMESPACE")]
  pub namespace: String,

  /// Model name used for the context and schema-constant class names
  #[arg(short, long, value_name = "NAME")]
  pub model_name: String,

  /// Skip the DbContext artifact
  #[arg(long, default_value_t = false)]
  pub no_context: bool,

  /// Skip the domain model artifacts
  #[arg(long, default_value_t = false)]
  pub no_models: bool,

  /// Skip the repository interfaces and implementations
  #[arg(long, default_value_t = false)]
  pub no_repositories: bool,

  /// Skip the mapping configuration artifacts
  #[arg(long, default_value_t = false)]
  pub no_configurations: bool,

  /// Rename an entity before normalization (repeatable)
  #[arg(long, value_name = "RAW=FINAL")]
  pub rename: Option<Vec<String>>,

  /// Force the casing of an acronym inside generated names (repeatable)
  #[arg(long, value_name = "TOKEN=CASED")]
  pub acronym: Option<Vec<String>>,

  /// Enable verbose output with detailed progress information
  #[arg(short, long, default_value_t = false)]
  pub verbose: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false)]
  pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
  /// List conceptual entities and their table bindings
  Entities {
    /// Path to the EDMX model file
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,
  },
  /// List storage tables and views
  Tables {
    /// Path to the EDMX model file
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,
  },
}
