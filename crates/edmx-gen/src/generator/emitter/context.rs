//! `DbContext` artifact: entity sets, configuration registration, and typed
//! wrappers for the model's function imports.

use std::path::PathBuf;

use itertools::Itertools;

use super::{Artifact, EmitContext, property_type, schema_bucket};
use crate::generator::{
  error::GenerateError,
  model::{Entity, FunctionImport, StorageFunction},
  naming::pluralize,
};

pub fn emit_context(ctx: &EmitContext<'_>) -> Result<Vec<Artifact>, GenerateError> {
  let class = ctx.context_class();
  let entities = mapped_entities(ctx);

  let mut out = String::new();
  out.push_str("using System;\n");
  out.push_str("using System.Collections.Generic;\n");
  out.push_str("using System.Linq;\n");
  out.push_str("using Microsoft.EntityFrameworkCore;\n\n");
  out.push_str(&format!("namespace {}\n{{\n", ctx.namespace));
  out.push_str(&format!("    public class {class} : DbContext\n    {{\n"));
  out.push_str(&format!(
    "        public {class}(DbContextOptions<{class}> options) : base(options) {{ }}\n\n"
  ));
  out.push_str("        protected override void OnConfiguring(DbContextOptionsBuilder optionsBuilder)\n");
  out.push_str("        {\n            base.OnConfiguring(optionsBuilder);\n        }\n\n");

  for entity in &entities {
    let bucket = schema_bucket(&entity.schema);
    out.push_str(&format!(
      "        public DbSet<Domain.{bucket}.{}> {} {{ get; set; }}\n",
      entity.fixed_name,
      pluralize(&entity.fixed_name)
    ));
  }

  out.push_str("\n        protected override void OnModelCreating(ModelBuilder modelBuilder)\n        {\n");
  out.push_str("            base.OnModelCreating(modelBuilder);\n");
  for entity in &entities {
    out.push_str(&format!(
      "            modelBuilder.ApplyConfiguration(new Configuration.{}.{}Configuration());\n",
      schema_bucket(&entity.schema),
      entity.fixed_name
    ));
  }
  for complex in ctx.returned_complex_types() {
    out.push_str(&format!(
      "            modelBuilder.ApplyConfiguration(new Configuration.{}.{}Configuration());\n",
      super::DEFAULT_SCHEMA_CONSTANT,
      complex.fixed_name
    ));
  }
  for function in &ctx.conceptual.functions {
    if is_composable(ctx, function) && complex_return(ctx, function).is_some() {
      out.push_str(&format!(
        "            modelBuilder.HasDbFunction(typeof({class}).GetMethod(nameof({})));\n",
        function.fixed_name
      ));
    }
  }
  out.push_str("        }\n");

  for function in &ctx.conceptual.functions {
    out.push('\n');
    out.push_str(&function_wrapper(ctx, function)?);
  }

  out.push_str("    }\n}\n");
  Ok(vec![Artifact {
    path: PathBuf::from(format!("{class}.cs")),
    content: out,
  }])
}

/// Entities with a table binding, in (schema, name) order so the context reads
/// grouped by schema.
fn mapped_entities<'a>(ctx: &'a EmitContext<'_>) -> Vec<&'a Entity> {
  ctx
    .conceptual
    .entities
    .values()
    .filter(|e| e.used && !e.table_name.is_empty())
    .sorted_by(|a, b| (&a.schema, &a.fixed_name).cmp(&(&b.schema, &b.fixed_name)))
    .collect()
}

fn storage_function<'a>(ctx: &'a EmitContext<'_>, function: &FunctionImport) -> Option<&'a StorageFunction> {
  ctx.storage.functions.iter().find(|f| f.name == function.name)
}

fn is_composable(ctx: &EmitContext<'_>, function: &FunctionImport) -> bool {
  storage_function(ctx, function).is_some_and(|f| f.composable)
}

/// Fixed name of the complex type this import returns, if any.
fn complex_return(ctx: &EmitContext<'_>, function: &FunctionImport) -> Option<String> {
  let ret = function.return_type.as_ref()?;
  if !ret.is_complex {
    return None;
  }
  ctx
    .conceptual
    .complex_type(&ret.type_name)
    .map(|c| c.fixed_name.clone())
}

fn function_wrapper(ctx: &EmitContext<'_>, function: &FunctionImport) -> Result<String, GenerateError> {
  let storage = storage_function(ctx, function);
  let schema = storage.map(|f| f.schema.as_str()).unwrap_or("dbo");
  let arguments = parameter_list(function)?;
  let names = function.parameters.iter().map(|p| p.name.as_str()).join(", ");
  let mut exec = exec_statement(schema, &function.name, function.parameters.len());
  if !names.is_empty() {
    exec = format!("{exec}, {names}");
  }

  let body = if let Some(return_type) = complex_return(ctx, function) {
    let domain = format!("Domain.{}.{return_type}", super::DEFAULT_SCHEMA_CONSTANT);
    if is_composable(ctx, function) {
      format!(
        "        public IQueryable<{domain}> {name}({arguments}) =>\n            FromExpression(() => {name}({names}));\n",
        name = function.fixed_name
      )
    } else {
      format!(
        "        public List<{domain}> {name}({arguments}) =>\n            Set<{domain}>().FromSqlRaw({exec}).ToList();\n",
        name = function.fixed_name
      )
    }
  } else if let Some(output) = single_output_parameter(function) {
    let return_type = property_type(output.as_deref().unwrap_or("Int32"), true, &function.name)?;
    format!(
      "        public {return_type} {name}({arguments})\n        {{\n            Database.ExecuteSqlRaw({exec});\n            return default;\n        }}\n",
      name = function.fixed_name
    )
  } else {
    format!(
      "        public int {name}({arguments}) =>\n            Database.ExecuteSqlRaw({exec});\n",
      name = function.fixed_name
    )
  };
  Ok(body)
}

/// Output-parameter shape: exactly one `Out`/`InOut` parameter and nothing
/// else marked output. Returns its declared type.
fn single_output_parameter(function: &FunctionImport) -> Option<Option<String>> {
  let mut outputs = function.parameters.iter().filter(|p| p.direction.is_output());
  let first = outputs.next()?;
  if outputs.next().is_some() {
    return None;
  }
  Some(first.type_name.clone())
}

fn parameter_list(function: &FunctionImport) -> Result<String, GenerateError> {
  let mut rendered = Vec::new();
  for parameter in &function.parameters {
    let csharp = match &parameter.type_name {
      Some(edm) => property_type(edm, parameter.nullable, &function.name)?,
      None => "object".to_string(),
    };
    rendered.push(format!("{csharp} {}", parameter.name));
  }
  Ok(rendered.join(", "))
}

fn exec_statement(schema: &str, name: &str, arity: usize) -> String {
  let placeholders = (0..arity).map(|i| format!("{{{i}}}")).join(", ");
  let separator = if arity == 0 { "" } else { " " };
  format!("\"EXEC [{schema}].[{name}]{separator}{placeholders}\"")
}
