//! Mapping-configuration artifacts: one `IEntityTypeConfiguration` class per
//! mapped entity, plus key-less configurations for function-return types.

use std::path::PathBuf;

use itertools::Itertools;

use super::{Artifact, EmitContext, schema_bucket};
use crate::generator::{
  error::GenerateError,
  model::{Column, ForeignKey, Table, ValueGeneration},
};

pub fn emit_configurations(ctx: &EmitContext<'_>) -> Result<Vec<Artifact>, GenerateError> {
  let mut artifacts = Vec::new();
  for mapping in ctx.mappings {
    let table = ctx
      .storage
      .tables
      .get(&mapping.table_name)
      .ok_or_else(|| GenerateError::UnmappedReference {
        kind: "table",
        name: mapping.table_name.clone(),
      })?;
    artifacts.push(entity_configuration(ctx, table)?);
  }
  for complex in ctx.returned_complex_types() {
    artifacts.push(keyless_configuration(ctx, &complex.fixed_name));
  }
  Ok(artifacts)
}

fn entity_configuration(ctx: &EmitContext<'_>, table: &Table) -> Result<Artifact, GenerateError> {
  let bucket = schema_bucket(&table.schema);
  let entity = &table.entity_name;
  let domain_type = format!("Domain.{bucket}.{entity}");

  let mut out = header(ctx, bucket, entity, &domain_type);

  if table.kind == crate::generator::model::TableKind::View {
    out.push_str(&format!(
      "            builder.ToView(\"{}\", {});\n",
      table.name,
      ctx.schema_constant(&table.schema)
    ));
    out.push_str("            builder.HasNoKey();\n");
  } else {
    out.push_str(&format!(
      "            builder.ToTable(\"{}\", {});\n",
      table.name,
      ctx.schema_constant(&table.schema)
    ));
    out.push_str(&format!("            builder.HasKey({});\n", key_selector(table)));
  }

  for column in table.columns.values() {
    if let Some(line) = property_configuration(column) {
      out.push('\n');
      out.push_str(&line);
    }
  }

  for foreign_key in &table.foreign_keys {
    out.push('\n');
    out.push_str(&relationship_configuration(ctx, table, foreign_key)?);
  }

  out.push_str("        }\n    }\n}\n");
  Ok(Artifact {
    path: PathBuf::from(format!("Configuration/{bucket}/{entity}Configuration.cs")),
    content: out,
  })
}

fn header(ctx: &EmitContext<'_>, bucket: &str, entity: &str, domain_type: &str) -> String {
  let mut out = String::new();
  out.push_str("using Microsoft.EntityFrameworkCore;\n");
  out.push_str("using Microsoft.EntityFrameworkCore.Metadata.Builders;\n\n");
  out.push_str(&format!("namespace {}.Configuration.{bucket}\n{{\n", ctx.namespace));
  out.push_str(&format!(
    "    public class {entity}Configuration : IEntityTypeConfiguration<{domain_type}>\n    {{\n"
  ));
  out.push_str(&format!(
    "        public void Configure(EntityTypeBuilder<{domain_type}> builder)\n        {{\n"
  ));
  out
}

/// Key selector in declared column order: `x => x.Id` for single-column keys,
/// an anonymous object for composites.
fn key_selector(table: &Table) -> String {
  let members: Vec<String> = table
    .primary_key_columns()
    .map(|c| format!("x.{}", c.property_name))
    .collect();
  match members.as_slice() {
    [single] => format!("x => {single}"),
    members => format!("x => new {{ {} }}", members.join(", ")),
  }
}

/// One fluent `builder.Property(...)` chain, or `None` when the column needs
/// nothing beyond convention.
fn property_configuration(column: &Column) -> Option<String> {
  let mut chain = String::new();
  if !column.nullable {
    chain.push_str(".IsRequired()");
  }
  if column.name != column.property_name {
    chain.push_str(&format!(".HasColumnName(\"{}\")", column.name));
  }
  if let Some(length) = column.max_length {
    chain.push_str(&format!(".HasMaxLength({length})"));
  }
  if let Some(precision) = column.precision {
    match column.scale {
      Some(scale) => chain.push_str(&format!(".HasPrecision({precision}, {scale})")),
      None => chain.push_str(&format!(".HasPrecision({precision})")),
    }
  }
  match column.value_generation {
    Some(ValueGeneration::Identity) => chain.push_str(".ValueGeneratedOnAdd()"),
    Some(ValueGeneration::Computed) => chain.push_str(".ValueGeneratedOnAddOrUpdate()"),
    None => {}
  }
  if chain.is_empty() {
    return None;
  }
  Some(format!(
    "            builder.Property(x => x.{}){chain};\n",
    column.property_name
  ))
}

fn relationship_configuration(
  ctx: &EmitContext<'_>,
  table: &Table,
  foreign_key: &ForeignKey,
) -> Result<String, GenerateError> {
  let line = match (foreign_key.source.is_collection(), foreign_key.destination.is_collection()) {
    // Owner is the dependent "many" side: its own columns carry the key and
    // are addressable through mapped property names.
    (true, false) => format!(
      "            builder.HasOne(x => x.{}).WithMany().HasForeignKey({});\n",
      foreign_key.fixed_name,
      dependent_selector(table, foreign_key)
    ),
    // Owner is the principal side; the key columns live on the other table,
    // so they are referenced by raw column name.
    (false, true) => format!(
      "            builder.HasMany(x => x.{}).WithOne().HasForeignKey({});\n",
      foreign_key.fixed_name,
      quoted_dependent_columns(foreign_key)
    ),
    (false, false) => {
      let dependent_type = one_to_one_dependent_type(ctx, table, foreign_key);
      format!(
        "            builder.HasOne(x => x.{}).WithOne().HasForeignKey(typeof({dependent_type}), {});\n",
        foreign_key.fixed_name,
        quoted_dependent_columns(foreign_key)
      )
    }
    (true, true) => {
      return Err(GenerateError::UnsupportedRelationshipShape {
        table: table.name.clone(),
        from: foreign_key.source,
        to: foreign_key.destination,
      });
    }
  };
  Ok(line)
}

fn dependent_selector(table: &Table, foreign_key: &ForeignKey) -> String {
  let members: Vec<String> = foreign_key
    .columns
    .iter()
    .map(|(_, dependent)| {
      let property = table
        .columns
        .get(dependent)
        .map(|c| c.property_name.as_str())
        .unwrap_or(dependent);
      format!("x.{property}")
    })
    .collect();
  match members.as_slice() {
    [single] => format!("x => {single}"),
    members => format!("x => new {{ {} }}", members.join(", ")),
  }
}

fn quoted_dependent_columns(foreign_key: &ForeignKey) -> String {
  foreign_key
    .columns
    .iter()
    .map(|(_, dependent)| format!("\"{dependent}\""))
    .join(", ")
}

/// The dependent CLR type of a one-to-one pair: the owner itself when it holds
/// the constraint, otherwise the entity behind the other table.
fn one_to_one_dependent_type(ctx: &EmitContext<'_>, table: &Table, foreign_key: &ForeignKey) -> String {
  if foreign_key.dependent {
    format!("Domain.{}.{}", schema_bucket(&table.schema), table.entity_name)
  } else {
    let (type_name, schema) = ctx
      .storage
      .tables
      .get(&foreign_key.table)
      .map(|t| {
        let name = if t.entity_name.is_empty() { &t.fixed_name } else { &t.entity_name };
        (name.clone(), t.schema.clone())
      })
      .unwrap_or_else(|| (foreign_key.fixed_name.clone(), foreign_key.schema.clone()));
    format!("Domain.{}.{type_name}", schema_bucket(&schema))
  }
}

fn keyless_configuration(ctx: &EmitContext<'_>, type_name: &str) -> Artifact {
  let bucket = super::DEFAULT_SCHEMA_CONSTANT;
  let domain_type = format!("Domain.{bucket}.{type_name}");
  let mut out = header(ctx, bucket, type_name, &domain_type);
  out.push_str("            builder.HasNoKey();\n");
  out.push_str("        }\n    }\n}\n");
  Artifact {
    path: PathBuf::from(format!("Configuration/{bucket}/{type_name}Configuration.cs")),
    content: out,
  }
}
