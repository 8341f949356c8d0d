//! Schema-constant artifact: one named string constant per distinct schema.

use std::path::PathBuf;

use super::{Artifact, DEFAULT_SCHEMA_CONSTANT, EmitContext, has_custom_schema};
use crate::generator::naming::pascal_case;

pub fn emit_schema_constants(ctx: &EmitContext<'_>) -> Vec<Artifact> {
  let mut schemas: Vec<&str> = Vec::new();
  let used_tables = ctx.storage.tables.values().filter(|t| t.used);
  let function_schemas = ctx.storage.functions.iter().map(|f| f.schema.as_str());
  for schema in used_tables.map(|t| t.schema.as_str()).chain(function_schemas) {
    if has_custom_schema(schema) && !schemas.contains(&schema) {
      schemas.push(schema);
    }
  }

  let class = ctx.schema_class();
  let mut out = String::new();
  out.push_str("using System;\n\n");
  out.push_str(&format!("namespace {}\n{{\n", ctx.namespace));
  out.push_str(&format!("    public static class {class}\n    {{\n"));
  out.push_str(&format!(
    "        public const string {DEFAULT_SCHEMA_CONSTANT} = \"dbo\";\n"
  ));
  for schema in schemas {
    out.push_str(&format!(
      "        public const string {} = \"{schema}\";\n",
      pascal_case(schema, false, ctx.overrides)
    ));
  }
  out.push_str("    }\n}\n");

  vec![Artifact {
    path: PathBuf::from(format!("{class}.cs")),
    content: out,
  }]
}
