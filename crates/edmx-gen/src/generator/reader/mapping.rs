//! Reader for the C-S mapping section: per-entity scalar column ↔ property
//! correspondences.

use crate::generator::{
  document::Element,
  error::GenerateError,
  model::{Mapping, MappingProperty},
  naming::{NameOverrides, strip_qualifier},
};

pub fn read_mappings(root: &Element, overrides: &NameOverrides) -> Result<(Vec<Mapping>, Vec<String>), GenerateError> {
  let container = root
    .find_descendant("Mappings")
    .and_then(|section| section.find_descendant("EntityContainerMapping"))
    .ok_or(GenerateError::MissingSection("mapping"))?;

  let mut mappings = Vec::new();
  let mut warnings = Vec::new();

  for set_mapping in container.descendants_named("EntitySetMapping") {
    let set_name = set_mapping.attr("Name").unwrap_or_default();

    let entity_name = set_mapping
      .find_descendant("EntityTypeMapping")
      .and_then(|m| m.attr("TypeName"))
      .map(|raw| overrides.rename(strip_qualifier(unwrap_is_type_of(raw))).to_string());
    let table_name = set_mapping
      .find_descendant("MappingFragment")
      .and_then(|f| f.attr("StoreEntitySet"))
      .map(str::to_string);

    let (Some(entity_name), Some(table_name)) = (entity_name, table_name) else {
      warnings.push(format!("entity set mapping '{set_name}' lacks a type or fragment; skipped"));
      continue;
    };

    let properties = set_mapping
      .descendants_named("ScalarProperty")
      .map(|scalar| MappingProperty {
        column_name: scalar.attr("ColumnName").unwrap_or_default().to_string(),
        property_name: scalar.attr("Name").unwrap_or_default().to_string(),
      })
      .collect();

    mappings.push(Mapping {
      table_name,
      entity_name,
      properties,
    });
  }

  Ok((mappings, warnings))
}

/// The designer sometimes declares `TypeName="IsTypeOf(Model.Customer)"`.
fn unwrap_is_type_of(raw: &str) -> &str {
  raw
    .strip_prefix("IsTypeOf(")
    .and_then(|r| r.strip_suffix(')'))
    .unwrap_or(raw)
}
