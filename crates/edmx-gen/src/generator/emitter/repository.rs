//! Repository artifacts: an interface and an implementation pair per mapped
//! entity.

use std::path::PathBuf;

use super::{Artifact, EmitContext, schema_bucket};
use crate::generator::{error::GenerateError, model::Entity};

pub fn emit_repositories(ctx: &EmitContext<'_>) -> Result<Vec<Artifact>, GenerateError> {
  let mut artifacts = Vec::new();
  for entity in ctx.conceptual.entities.values() {
    if !entity.used || entity.table_name.is_empty() {
      continue;
    }
    artifacts.push(repository_interface(ctx, entity));
    artifacts.push(repository_class(ctx, entity));
  }
  Ok(artifacts)
}

fn repository_interface(ctx: &EmitContext<'_>, entity: &Entity) -> Artifact {
  let bucket = schema_bucket(&entity.schema);
  let mut out = String::new();
  out.push_str(&format!("using {}.Contract;\n\n", ctx.namespace));
  out.push_str(&format!(
    "namespace {}.Contracts.Repositories.{bucket}\n{{\n",
    ctx.namespace
  ));
  out.push_str(&format!(
    "    public interface I{name}Repository : IRepository<Domain.{bucket}.{name}>\n    {{\n    }}\n}}\n",
    name = entity.fixed_name
  ));
  Artifact {
    path: PathBuf::from(format!("IRepositories/{bucket}/I{}Repository.cs", entity.fixed_name)),
    content: out,
  }
}

fn repository_class(ctx: &EmitContext<'_>, entity: &Entity) -> Artifact {
  let bucket = schema_bucket(&entity.schema);
  let context = ctx.context_class();
  let mut out = String::new();
  out.push_str(&format!("using {ns}.Contract;\n", ns = ctx.namespace));
  out.push_str(&format!("using {ns}.Contracts.Repositories.{bucket};\n\n", ns = ctx.namespace));
  out.push_str(&format!("namespace {}.Repositories.{bucket}\n{{\n", ctx.namespace));
  out.push_str(&format!(
    "    public class {name}Repository : Repository<Domain.{bucket}.{name}>, I{name}Repository\n    {{\n",
    name = entity.fixed_name
  ));
  out.push_str(&format!(
    "        public {name}Repository({context} context) : base(context) {{ }}\n    }}\n}}\n",
    name = entity.fixed_name
  ));
  Artifact {
    path: PathBuf::from(format!("Repositories/{bucket}/{}Repository.cs", entity.fixed_name)),
    content: out,
  }
}

#[cfg(test)]
mod tests {
  use indexmap::IndexMap;

  use super::*;
  use crate::generator::{
    model::{ConceptualModel, StorageModel},
    naming::NameOverrides,
  };

  fn entity(name: &str, schema: &str, used: bool) -> Entity {
    Entity {
      name: name.to_string(),
      fixed_name: name.to_string(),
      table_name: if used { name.to_lowercase() } else { String::new() },
      schema: schema.to_string(),
      used,
      ..Entity::default()
    }
  }

  #[test]
  fn emits_interface_and_implementation_pairs() {
    let conceptual = ConceptualModel {
      entities: IndexMap::from([
        ("Customer".to_string(), entity("Customer", "sales", true)),
        ("Ghost".to_string(), entity("Ghost", "dbo", false)),
      ]),
      ..ConceptualModel::default()
    };
    let storage = StorageModel::default();
    let overrides = NameOverrides::default();
    let ctx = EmitContext {
      storage: &storage,
      conceptual: &conceptual,
      mappings: &[],
      namespace: "Acme.Data",
      model_name: "Northwind",
      overrides: &overrides,
    };

    let artifacts = emit_repositories(&ctx).unwrap();
    assert_eq!(artifacts.len(), 2);
    assert_eq!(
      artifacts[0].path.to_str(),
      Some("IRepositories/sales/ICustomerRepository.cs")
    );
    assert_eq!(artifacts[1].path.to_str(), Some("Repositories/sales/CustomerRepository.cs"));

    let interface = &artifacts[0].content;
    assert!(interface.contains("namespace Acme.Data.Contracts.Repositories.sales"));
    assert!(interface.contains("public interface ICustomerRepository : IRepository<Domain.sales.Customer>"));

    let class = &artifacts[1].content;
    assert!(class.contains("public class CustomerRepository : Repository<Domain.sales.Customer>, ICustomerRepository"));
    assert!(class.contains("public CustomerRepository(NorthwindContext context) : base(context) { }"));
  }
}
