//! Text emitters for the generated C# artifacts.
//!
//! Every emitter is a pure function over the bound graph: it returns
//! `(relative path, content)` pairs and never touches the filesystem. All
//! heuristics (type mapping, pluralization, collision suffixes) live in the
//! normalizer and binder; the emitters only render what the graph already
//! decided.

mod configuration;
mod context;
mod domain;
mod repository;
mod schema;

use std::path::PathBuf;

pub use configuration::emit_configurations;
pub use context::emit_context;
pub use domain::emit_domain_models;
pub use repository::emit_repositories;
pub use schema::emit_schema_constants;

use crate::generator::{
  error::GenerateError,
  model::{ComplexType, ConceptualModel, Mapping, StorageModel},
  naming::{NameOverrides, pascal_case},
};

/// Name of the constant (and folder bucket) for the default `dbo` schema.
pub const DEFAULT_SCHEMA_CONSTANT: &str = "General";

/// One generated file, addressed relative to the destination root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
  pub path: PathBuf,
  pub content: String,
}

/// Everything an emitter may look at, passed explicitly per run.
pub struct EmitContext<'a> {
  pub storage: &'a StorageModel,
  pub conceptual: &'a ConceptualModel,
  pub mappings: &'a [Mapping],
  pub namespace: &'a str,
  pub model_name: &'a str,
  pub overrides: &'a NameOverrides,
}

impl EmitContext<'_> {
  fn schema_class(&self) -> String {
    format!("SchemaName{}", self.model_name)
  }

  fn context_class(&self) -> String {
    format!("{}Context", self.model_name)
  }

  /// Reference to the schema constant for a table or function schema.
  fn schema_constant(&self, schema: &str) -> String {
    if has_custom_schema(schema) {
      format!("{}.{}", self.schema_class(), pascal_case(schema, false, self.overrides))
    } else {
      format!("{}.{DEFAULT_SCHEMA_CONSTANT}", self.schema_class())
    }
  }

  /// Complex types that appear as a function-import return and therefore need
  /// a domain class and a key-less configuration.
  fn returned_complex_types(&self) -> Vec<&ComplexType> {
    self
      .conceptual
      .complex_types
      .iter()
      .filter(|complex| {
        self
          .conceptual
          .functions
          .iter()
          .filter_map(|f| f.return_type.as_ref())
          .any(|ret| ret.is_complex && ret.type_name == complex.name)
      })
      .collect()
  }
}

fn has_custom_schema(schema: &str) -> bool {
  !schema.is_empty() && !schema.eq_ignore_ascii_case("dbo")
}

/// Folder bucket for a schema: the schema name itself, or the default bucket.
fn schema_bucket(schema: &str) -> &str {
  if has_custom_schema(schema) {
    schema
  } else {
    DEFAULT_SCHEMA_CONSTANT
  }
}

/// Closed EDM → C# translation table. Anything outside it is a fatal
/// `UnsupportedType`.
fn csharp_type(edm: &str, owner: &str) -> Result<&'static str, GenerateError> {
  let mapped = match edm {
    "String" => "string",
    "Int32" => "int",
    "Int64" => "long",
    "Boolean" => "bool",
    "DateTime" => "DateTime",
    "Decimal" => "decimal",
    "Double" => "double",
    "Guid" => "Guid",
    "Byte" => "byte",
    "Byte[]" | "Binary" => "byte[]",
    "Int16" => "short",
    "Time" => "TimeSpan",
    _ => {
      return Err(GenerateError::UnsupportedType {
        owner: owner.to_string(),
        type_name: edm.to_string(),
      });
    }
  };
  Ok(mapped)
}

/// Value types take a `?` suffix when nullable; reference types do not.
fn is_value_type(csharp: &str) -> bool {
  !matches!(csharp, "string" | "byte[]")
}

fn property_type(edm: &str, nullable: bool, owner: &str) -> Result<String, GenerateError> {
  let base = csharp_type(edm, owner)?;
  if nullable && is_value_type(base) {
    Ok(format!("{base}?"))
  } else {
    Ok(base.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn translation_table_is_closed() {
    assert_eq!(csharp_type("Int32", "T").unwrap(), "int");
    assert_eq!(csharp_type("Binary", "T").unwrap(), "byte[]");
    assert_eq!(csharp_type("Time", "T").unwrap(), "TimeSpan");
    assert!(matches!(
      csharp_type("Geography", "T"),
      Err(GenerateError::UnsupportedType { .. })
    ));
  }

  #[test]
  fn nullable_suffix_only_on_value_types() {
    assert_eq!(property_type("Int32", true, "T").unwrap(), "int?");
    assert_eq!(property_type("Int32", false, "T").unwrap(), "int");
    assert_eq!(property_type("String", true, "T").unwrap(), "string");
    assert_eq!(property_type("Byte[]", true, "T").unwrap(), "byte[]");
  }

  #[test]
  fn schema_buckets() {
    assert_eq!(schema_bucket("dbo"), "General");
    assert_eq!(schema_bucket(""), "General");
    assert_eq!(schema_bucket("finance"), "finance");
  }
}
