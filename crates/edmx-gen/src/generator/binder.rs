//! Cross-model resolution.
//!
//! The binder is the only phase that looks at all three models at once. It
//! marks tables and entities as used, propagates schemas and fixed names
//! across the section boundary, copies mapped property names onto columns,
//! and assigns collision-free identifiers to foreign keys and navigation
//! properties.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::generator::{
  error::GenerateError,
  model::{ConceptualModel, Mapping, StorageModel, TableKind},
  naming::unique_identifier,
};

pub fn bind(
  storage: &mut StorageModel,
  conceptual: &mut ConceptualModel,
  mappings: &[Mapping],
) -> Result<Vec<String>, GenerateError> {
  let mut warnings = Vec::new();

  // Target lookups must not observe in-flight mutation, so both passes work
  // from snapshots taken before they start.
  let table_info: HashMap<String, (String, String)> = storage
    .tables
    .values()
    .map(|t| (t.name.clone(), (t.fixed_name.clone(), t.schema.clone())))
    .collect();

  for mapping in mappings {
    let table = storage
      .tables
      .get_mut(&mapping.table_name)
      .ok_or_else(|| GenerateError::UnmappedReference {
        kind: "table",
        name: mapping.table_name.clone(),
      })?;
    let entity = conceptual
      .entities
      .get_mut(&mapping.entity_name)
      .ok_or_else(|| GenerateError::UnmappedReference {
        kind: "entity",
        name: mapping.entity_name.clone(),
      })?;

    table.used = true;
    entity.used = true;
    // View-backed tables already carry the marker in their fixed name; the
    // entity adopts it so the generated class matches.
    if table.kind == TableKind::View {
      entity.fixed_name = table.fixed_name.clone();
    }
    table.entity_name = entity.fixed_name.clone();
    entity.table_name = mapping.table_name.clone();
    entity.schema = table.schema.clone();

    for property in &mapping.properties {
      match table.columns.get_mut(&property.column_name) {
        Some(column) => column.property_name = property.property_name.clone(),
        None => warnings.push(format!(
          "mapping for '{}' names column '{}', which the table does not declare",
          mapping.entity_name, property.column_name
        )),
      }
    }

    // Relationship identifiers must not shadow a scalar property, the type
    // itself, or an earlier foreign key. Attachment order keeps the suffix
    // assignment deterministic.
    let mut scope: HashSet<String> = entity.property_names().map(str::to_string).collect();
    scope.insert(table.fixed_name.clone());
    for foreign_key in &mut table.foreign_keys {
      let (target_fixed, target_schema) =
        table_info
          .get(&foreign_key.table)
          .ok_or_else(|| GenerateError::UnmappedReference {
            kind: "table",
            name: foreign_key.table.clone(),
          })?;
      foreign_key.fixed_name = unique_identifier(target_fixed, &scope)?;
      foreign_key.schema = target_schema.clone();
      scope.insert(foreign_key.fixed_name.clone());
    }
  }

  resolve_navigations(conceptual)?;
  Ok(warnings)
}

/// Resolves navigation properties for every used entity. A resolved target is
/// itself marked used (its type must exist in the output), which can pull
/// further entities in; the worklist runs until that closure is complete.
fn resolve_navigations(conceptual: &mut ConceptualModel) -> Result<(), GenerateError> {
  let entity_info: HashMap<String, (String, String)> = conceptual
    .entities
    .values()
    .map(|e| (e.name.clone(), (e.fixed_name.clone(), e.schema.clone())))
    .collect();

  let mut queue: VecDeque<String> = conceptual
    .entities
    .values()
    .filter(|e| e.used)
    .map(|e| e.name.clone())
    .collect();
  let mut scheduled: HashSet<String> = queue.iter().cloned().collect();

  while let Some(name) = queue.pop_front() {
    let entity = conceptual
      .entities
      .get_mut(&name)
      .expect("queued entities exist by construction");

    let mut scope: HashSet<String> = entity.property_names().map(str::to_string).collect();
    let mut targets = Vec::new();
    for navigation in &mut entity.navigations {
      let (target_fixed, target_schema) =
        entity_info
          .get(&navigation.target)
          .ok_or_else(|| GenerateError::UnmappedReference {
            kind: "entity",
            name: navigation.target.clone(),
          })?;
      navigation.target_fixed = target_fixed.clone();
      navigation.target_schema = target_schema.clone();
      navigation.fixed_name = unique_identifier(target_fixed, &scope)?;
      scope.insert(navigation.fixed_name.clone());
      targets.push(navigation.target.clone());
    }

    for target in targets {
      let entity = conceptual.entities.get_mut(&target).expect("target resolved above");
      entity.used = true;
      if scheduled.insert(target.clone()) {
        queue.push_back(target);
      }
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use indexmap::IndexMap;

  use super::*;
  use crate::generator::model::{
    Column, Entity, ForeignKey, Mapping, MappingProperty, Multiplicity, NavigationProperty, Property, Table,
  };

  fn table(name: &str, schema: &str, columns: &[&str]) -> Table {
    Table {
      name: name.to_string(),
      fixed_name: name.to_string(),
      schema: schema.to_string(),
      columns: columns
        .iter()
        .map(|c| {
          (
            c.to_string(),
            Column {
              name: c.to_string(),
              property_name: c.to_string(),
              ..Column::default()
            },
          )
        })
        .collect(),
      ..Table::default()
    }
  }

  fn entity(name: &str, properties: &[&str]) -> Entity {
    Entity {
      name: name.to_string(),
      fixed_name: name.to_string(),
      properties: properties
        .iter()
        .map(|p| Property {
          name: p.to_string(),
          ..Property::default()
        })
        .collect(),
      ..Entity::default()
    }
  }

  fn foreign_key(target: &str) -> ForeignKey {
    ForeignKey {
      source: Multiplicity::Many,
      destination: Multiplicity::One,
      table: target.to_string(),
      fixed_name: String::new(),
      schema: String::new(),
      dependent: true,
      columns: vec![("Id".to_string(), "TargetId".to_string())],
    }
  }

  fn navigation(target: &str, multiplicity: Multiplicity) -> NavigationProperty {
    NavigationProperty {
      target: target.to_string(),
      target_fixed: String::new(),
      fixed_name: String::new(),
      target_schema: String::new(),
      multiplicity,
    }
  }

  fn mapping(table: &str, entity: &str, pairs: &[(&str, &str)]) -> Mapping {
    Mapping {
      table_name: table.to_string(),
      entity_name: entity.to_string(),
      properties: pairs
        .iter()
        .map(|(column, property)| MappingProperty {
          column_name: column.to_string(),
          property_name: property.to_string(),
        })
        .collect(),
    }
  }

  #[test]
  fn binds_mapping_and_propagates_schema() {
    let mut storage = StorageModel::default();
    storage.tables.insert("customer".to_string(), {
      let mut t = table("customer", "sales", &["id", "customer_name"]);
      t.fixed_name = "Customer".to_string();
      t
    });
    let mut conceptual = ConceptualModel {
      entities: IndexMap::from([("Customer".to_string(), entity("Customer", &["Id", "Name"]))]),
      ..ConceptualModel::default()
    };
    let mappings = vec![mapping("customer", "Customer", &[("id", "Id"), ("customer_name", "Name")])];

    let warnings = bind(&mut storage, &mut conceptual, &mappings).unwrap();
    assert!(warnings.is_empty());

    let bound_table = &storage.tables["customer"];
    assert!(bound_table.used);
    assert_eq!(bound_table.entity_name, "Customer");
    assert_eq!(bound_table.columns["customer_name"].property_name, "Name");

    let bound_entity = &conceptual.entities["Customer"];
    assert!(bound_entity.used);
    assert_eq!(bound_entity.table_name, "customer");
    assert_eq!(bound_entity.schema, "sales");
  }

  #[test]
  fn view_backed_entity_adopts_the_marked_name() {
    let mut storage = StorageModel::default();
    storage.tables.insert("vw_ActiveUsers".to_string(), {
      let mut t = table("vw_ActiveUsers", "dbo", &["Id"]);
      t.fixed_name = "ViewActiveUsers".to_string();
      t.kind = TableKind::View;
      t
    });
    let mut conceptual = ConceptualModel {
      entities: IndexMap::from([(
        "vw_ActiveUsers".to_string(),
        entity("vw_ActiveUsers", &["Id"]),
      )]),
      ..ConceptualModel::default()
    };

    bind(
      &mut storage,
      &mut conceptual,
      &[mapping("vw_ActiveUsers", "vw_ActiveUsers", &[])],
    )
    .unwrap();

    assert_eq!(conceptual.entities["vw_ActiveUsers"].fixed_name, "ViewActiveUsers");
    assert_eq!(storage.tables["vw_ActiveUsers"].entity_name, "ViewActiveUsers");
  }

  #[test]
  fn unmapped_table_reference_is_fatal() {
    let mut storage = StorageModel::default();
    let mut conceptual = ConceptualModel {
      entities: IndexMap::from([("Customer".to_string(), entity("Customer", &[]))]),
      ..ConceptualModel::default()
    };
    let err = bind(&mut storage, &mut conceptual, &[mapping("missing", "Customer", &[])]).unwrap_err();
    assert!(matches!(err, GenerateError::UnmappedReference { kind: "table", .. }));
  }

  #[test]
  fn duplicate_foreign_key_targets_get_counter_suffixes() {
    let mut storage = StorageModel::default();
    storage.tables.insert("Order".to_string(), {
      let mut t = table("Order", "dbo", &["Id"]);
      t.foreign_keys = vec![foreign_key("Customer"), foreign_key("Customer")];
      t
    });
    storage.tables.insert("Customer".to_string(), table("Customer", "dbo", &["Id"]));
    let mut conceptual = ConceptualModel {
      entities: IndexMap::from([("Order".to_string(), entity("Order", &["Id"]))]),
      ..ConceptualModel::default()
    };

    bind(&mut storage, &mut conceptual, &[mapping("Order", "Order", &[])]).unwrap();

    let keys = &storage.tables["Order"].foreign_keys;
    assert_eq!(keys[0].fixed_name, "Customer");
    assert_eq!(keys[1].fixed_name, "Customer1");
  }

  #[test]
  fn foreign_key_identifier_avoids_scalar_properties() {
    let mut storage = StorageModel::default();
    storage.tables.insert("Order".to_string(), {
      let mut t = table("Order", "dbo", &["Id"]);
      t.foreign_keys = vec![foreign_key("Customer")];
      t
    });
    storage.tables.insert("Customer".to_string(), table("Customer", "dbo", &["Id"]));
    let mut conceptual = ConceptualModel {
      entities: IndexMap::from([("Order".to_string(), entity("Order", &["Id", "Customer"]))]),
      ..ConceptualModel::default()
    };

    bind(&mut storage, &mut conceptual, &[mapping("Order", "Order", &[])]).unwrap();
    assert_eq!(storage.tables["Order"].foreign_keys[0].fixed_name, "Customer1");
  }

  #[test]
  fn navigation_resolution_marks_targets_used() {
    let mut storage = StorageModel::default();
    storage.tables.insert("Order".to_string(), table("Order", "dbo", &["Id"]));
    let mut order = entity("Order", &["Id"]);
    order.navigations = vec![
      navigation("Customer", Multiplicity::One),
      navigation("Customer", Multiplicity::One),
    ];
    let mut customer = entity("Customer", &["Id"]);
    customer.navigations = vec![navigation("Order", Multiplicity::Many)];
    let mut conceptual = ConceptualModel {
      entities: IndexMap::from([("Order".to_string(), order), ("Customer".to_string(), customer)]),
      ..ConceptualModel::default()
    };

    bind(&mut storage, &mut conceptual, &[mapping("Order", "Order", &[])]).unwrap();

    let order = &conceptual.entities["Order"];
    assert_eq!(order.navigations[0].fixed_name, "Customer");
    assert_eq!(order.navigations[1].fixed_name, "Customer1");
    assert_eq!(order.navigations[0].target_fixed, "Customer");

    // Customer was pulled in as a navigation target, so its own navigations
    // are resolved as well.
    let customer = &conceptual.entities["Customer"];
    assert!(customer.used);
    assert_eq!(customer.navigations[0].fixed_name, "Order");
  }

  #[test]
  fn navigation_to_missing_entity_is_fatal() {
    let mut storage = StorageModel::default();
    storage.tables.insert("Order".to_string(), table("Order", "dbo", &["Id"]));
    let mut order = entity("Order", &["Id"]);
    order.navigations = vec![navigation("Ghost", Multiplicity::One)];
    let mut conceptual = ConceptualModel {
      entities: IndexMap::from([("Order".to_string(), order)]),
      ..ConceptualModel::default()
    };

    let err = bind(&mut storage, &mut conceptual, &[mapping("Order", "Order", &[])]).unwrap_err();
    assert!(matches!(err, GenerateError::UnmappedReference { kind: "entity", .. }));
  }
}
