//! Reader for the storage (SSDL) section: tables, columns, stored functions
//! and the associations that become foreign keys.

use indexmap::IndexMap;

use super::DEFAULT_SCHEMA;
use crate::generator::{
  document::Element,
  error::GenerateError,
  model::{
    Column, ForeignKey, Multiplicity, ParameterDirection, StorageFunction, StorageModel, StorageParameter, Table,
    TableKind, ValueGeneration,
  },
  naming::{NameOverrides, pascal_case, strip_qualifier},
};

pub fn read_storage_model(
  root: &Element,
  overrides: &NameOverrides,
) -> Result<(StorageModel, Vec<String>), GenerateError> {
  let schema = root
    .find_descendant("StorageModels")
    .and_then(|section| section.find_descendant("Schema"))
    .ok_or(GenerateError::MissingSection("storage"))?;

  let mut warnings = Vec::new();
  let mut tables = read_tables(schema);
  attach_entity_sets(schema, &mut tables);

  // Fixed names are view-aware, so they can only be computed once the entity
  // container told us which sets are views.
  for table in tables.values_mut() {
    table.fixed_name = pascal_case(&table.name, table.kind == TableKind::View, overrides);
  }

  read_associations(schema, &mut tables, &mut warnings)?;
  let functions = read_functions(schema, overrides);

  Ok((StorageModel { tables, functions }, warnings))
}

fn read_tables(schema: &Element) -> IndexMap<String, Table> {
  let mut tables = IndexMap::new();
  for entity in schema.descendants_named("EntityType") {
    let name = entity.attr("Name").unwrap_or_default().to_string();
    let key_names: Vec<&str> = key_member_names(entity);

    let mut columns = IndexMap::new();
    for property in entity.descendants_named("Property") {
      let column = read_column(property, &key_names);
      columns.insert(column.name.clone(), column);
    }

    tables.insert(
      name.clone(),
      Table {
        name,
        schema: DEFAULT_SCHEMA.to_string(),
        columns,
        ..Table::default()
      },
    );
  }
  tables
}

fn key_member_names(entity: &Element) -> Vec<&str> {
  entity
    .find_descendant("Key")
    .map(|key| key.children_named("PropertyRef").filter_map(|r| r.attr("Name")).collect())
    .unwrap_or_default()
}

fn read_column(property: &Element, key_names: &[&str]) -> Column {
  let name = property.attr("Name").unwrap_or_default().to_string();
  let type_name = property.attr("Type").unwrap_or_default().to_string();

  // 0 and -1 both mean "no declared length"; (max) types never carry one.
  let mut max_length = property.attr("MaxLength").and_then(|v| v.parse::<i64>().ok());
  if matches!(max_length, Some(0 | -1)) || type_name == "varchar(max)" || type_name == "varbinary(max)" {
    max_length = None;
  }

  Column {
    primary_key: key_names.contains(&name.as_str()),
    property_name: name.clone(),
    name,
    nullable: property.attr("Nullable") != Some("false"),
    default_value: property.attr("DefaultValue").map(str::to_string),
    max_length,
    precision: positive_attr(property, "Precision"),
    scale: positive_attr(property, "Scale"),
    value_generation: ValueGeneration::parse(property.attr("StoreGeneratedPattern")),
    type_name,
  }
}

fn positive_attr(element: &Element, name: &str) -> Option<u32> {
  element
    .attr(name)
    .and_then(|v| v.parse::<u32>().ok())
    .filter(|v| *v > 0)
}

fn attach_entity_sets(schema: &Element, tables: &mut IndexMap<String, Table>) {
  let Some(container) = schema.find_descendant("EntityContainer") else {
    return;
  };
  for entity_set in container.descendants_named("EntitySet") {
    let name = entity_set.attr("Name").unwrap_or_default();
    let Some(table) = tables.get_mut(name) else {
      continue;
    };
    table.schema = entity_set.attr("Schema").unwrap_or(DEFAULT_SCHEMA).to_string();
    if entity_set.attr("Type") == Some("Views") {
      table.kind = TableKind::View;
    }
  }
}

fn read_functions(schema: &Element, overrides: &NameOverrides) -> Vec<StorageFunction> {
  let mut functions = Vec::new();
  for function in schema.children_named("Function") {
    let name = function.attr("Name").unwrap_or_default().to_string();
    let parameters = function
      .children_named("Parameter")
      .map(|p| StorageParameter {
        name: p.attr("Name").unwrap_or_default().to_string(),
        type_name: p.attr("Type").map(str::to_string),
        direction: ParameterDirection::parse(p.attr("Mode")),
      })
      .collect();

    let return_columns = function
      .find_descendant("RowType")
      .map(|row| row.children_named("Property").map(|p| read_column(p, &[])).collect())
      .unwrap_or_default();

    functions.push(StorageFunction {
      fixed_name: pascal_case(&name, false, overrides),
      schema: function.attr("Schema").unwrap_or(DEFAULT_SCHEMA).to_string(),
      parameters,
      composable: function.attr("IsComposable") == Some("true"),
      returns_collection: function.find_descendant("CollectionType").is_some(),
      return_columns,
      name,
    });
  }
  functions
}

struct AssociationEnd<'a> {
  role: &'a str,
  table: &'a str,
  multiplicity: Multiplicity,
}

fn read_associations(
  schema: &Element,
  tables: &mut IndexMap<String, Table>,
  warnings: &mut Vec<String>,
) -> Result<(), GenerateError> {
  for association in schema.children_named("Association") {
    let name = association.attr("Name").unwrap_or_default().to_string();

    let ends: Vec<&Element> = association.children_named("End").collect();
    if ends.len() != 2 {
      return Err(GenerateError::InvalidAssociation {
        name,
        reason: format!("expected 2 ends, found {}", ends.len()),
      });
    }
    let ends = [read_end(ends[0], &name)?, read_end(ends[1], &name)?];

    for end in &ends {
      if !tables.contains_key(end.table) {
        return Err(GenerateError::InvalidAssociation {
          name,
          reason: format!("references unknown table '{}'", end.table),
        });
      }
    }

    let Some(constraint) = association.find_descendant("ReferentialConstraint") else {
      warnings.push(format!("association '{name}' has no referential constraint; skipped"));
      continue;
    };
    let (principal_role, principal_columns) = read_constraint_side(constraint, "Principal", &name)?;
    let (_, dependent_columns) = read_constraint_side(constraint, "Dependent", &name)?;
    if principal_columns.len() != dependent_columns.len() {
      return Err(GenerateError::InvalidAssociation {
        name,
        reason: "principal and dependent column counts differ".to_string(),
      });
    }
    if !ends.iter().any(|end| end.role == principal_role) {
      return Err(GenerateError::InvalidAssociation {
        name,
        reason: format!("principal role '{principal_role}' does not match either end"),
      });
    }

    let columns: Vec<(String, String)> = principal_columns
      .into_iter()
      .zip(dependent_columns)
      .map(|(p, d)| (p.to_string(), d.to_string()))
      .collect();

    for (own, other) in [(&ends[0], &ends[1]), (&ends[1], &ends[0])] {
      let table = tables.get_mut(own.table).expect("participant checked above");
      table.foreign_keys.push(ForeignKey {
        source: own.multiplicity,
        destination: other.multiplicity,
        table: other.table.to_string(),
        fixed_name: String::new(),
        schema: String::new(),
        dependent: own.role != principal_role,
        columns: columns.clone(),
      });
    }
  }
  Ok(())
}

fn read_end<'a>(end: &'a Element, association: &str) -> Result<AssociationEnd<'a>, GenerateError> {
  let token = end.attr("Multiplicity").unwrap_or_default();
  let multiplicity = Multiplicity::parse(token).ok_or_else(|| GenerateError::InvalidAssociation {
    name: association.to_string(),
    reason: format!("unrecognized multiplicity token '{token}'"),
  })?;
  Ok(AssociationEnd {
    role: end.attr("Role").unwrap_or_default(),
    table: strip_qualifier(end.attr("Type").unwrap_or_default()),
    multiplicity,
  })
}

fn read_constraint_side<'a>(
  constraint: &'a Element,
  side: &'static str,
  association: &str,
) -> Result<(&'a str, Vec<&'a str>), GenerateError> {
  let element = constraint
    .find_descendant(side)
    .ok_or_else(|| GenerateError::InvalidAssociation {
      name: association.to_string(),
      reason: format!("referential constraint has no {side} element"),
    })?;
  let columns = element
    .children_named("PropertyRef")
    .filter_map(|r| r.attr("Name"))
    .collect();
  Ok((element.attr("Role").unwrap_or_default(), columns))
}
