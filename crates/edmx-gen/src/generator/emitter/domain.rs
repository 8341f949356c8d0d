//! Domain-model artifacts: one C# class per used entity, plus one per
//! function-return complex type.

use std::path::PathBuf;

use itertools::Itertools;

use super::{Artifact, EmitContext, property_type, schema_bucket};
use crate::generator::{
  error::GenerateError,
  model::{ComplexType, Entity},
};

pub fn emit_domain_models(ctx: &EmitContext<'_>) -> Result<Vec<Artifact>, GenerateError> {
  let mut artifacts = Vec::new();
  for entity in ctx.conceptual.entities.values().filter(|e| e.used) {
    artifacts.push(entity_class(ctx, entity)?);
  }
  for complex in ctx.returned_complex_types() {
    artifacts.push(complex_type_class(ctx, complex)?);
  }
  Ok(artifacts)
}

fn entity_class(ctx: &EmitContext<'_>, entity: &Entity) -> Result<Artifact, GenerateError> {
  let bucket = schema_bucket(&entity.schema);
  let has_collections = entity.navigations.iter().any(|n| n.multiplicity.is_collection());

  let mut out = String::new();
  out.push_str("using System;\n");
  if has_collections {
    out.push_str("using System.Collections.Generic;\n");
  }
  out.push_str(&format!("\nnamespace {}.Domain.{bucket}\n{{\n", ctx.namespace));
  out.push_str(&format!("    public class {} : Entity\n    {{\n", entity.fixed_name));
  out.push_str(&format!("        public {}() {{ }}\n\n", entity.fixed_name));

  for property in &entity.properties {
    let csharp = property_type(&property.type_name, property.nullable, &entity.name)?;
    out.push_str(&format!("        public {csharp} {} {{ get; set; }}\n", property.name));
  }

  if !entity.navigations.is_empty() {
    out.push('\n');
    for navigation in &entity.navigations {
      let member_type = if navigation.multiplicity.is_collection() {
        format!("ICollection<{}>", navigation.target_fixed)
      } else {
        navigation.target_fixed.clone()
      };
      out.push_str(&format!(
        "        public virtual {member_type} {} {{ get; set; }}\n",
        navigation.fixed_name
      ));
    }
  }

  // Debug representation joining every scalar value.
  let interpolation = entity.properties.iter().map(|p| format!("{{{}}}", p.name)).join(" - ");
  out.push_str("\n        public override string ToString()\n        {\n");
  out.push_str(&format!("            return $\"{interpolation}\";\n"));
  out.push_str("        }\n    }\n}\n");

  Ok(Artifact {
    path: PathBuf::from(format!("Domain/{bucket}/{}.cs", entity.fixed_name)),
    content: out,
  })
}

fn complex_type_class(ctx: &EmitContext<'_>, complex: &ComplexType) -> Result<Artifact, GenerateError> {
  let mut out = String::new();
  out.push_str("using System;\n\n");
  out.push_str(&format!(
    "namespace {}.Domain.{}\n{{\n",
    ctx.namespace,
    super::DEFAULT_SCHEMA_CONSTANT
  ));
  out.push_str(&format!("    public class {}\n    {{\n", complex.fixed_name));
  for property in &complex.properties {
    let csharp = property_type(&property.type_name, property.nullable, &complex.name)?;
    out.push_str(&format!("        public {csharp} {} {{ get; set; }}\n", property.name));
  }
  out.push_str("    }\n}\n");

  Ok(Artifact {
    path: PathBuf::from(format!(
      "Domain/{}/{}.cs",
      super::DEFAULT_SCHEMA_CONSTANT,
      complex.fixed_name
    )),
    content: out,
  })
}
