//! Reader for the conceptual (CSDL) section: entities, complex types,
//! function imports and the associations that become navigation properties.

use indexmap::IndexMap;

use crate::generator::{
  document::Element,
  error::GenerateError,
  model::{
    ComplexType, ConceptualModel, Entity, FunctionImport, FunctionParameter, FunctionReturn, Multiplicity,
    NavigationProperty, ParameterDirection, Property,
  },
  naming::{NameOverrides, pascal_case, strip_qualifier},
};

pub fn read_conceptual_model(
  root: &Element,
  overrides: &NameOverrides,
) -> Result<(ConceptualModel, Vec<String>), GenerateError> {
  let schema = root
    .find_descendant("ConceptualModels")
    .and_then(|section| section.find_descendant("Schema"))
    .ok_or(GenerateError::MissingSection("conceptual"))?;

  let mut warnings = Vec::new();
  let mut entities = read_entities(schema, overrides);
  let complex_types = read_complex_types(schema, overrides);
  let functions = read_function_imports(schema, &complex_types, overrides);
  read_associations(schema, &mut entities, &mut warnings)?;

  Ok((
    ConceptualModel {
      entities,
      functions,
      complex_types,
    },
    warnings,
  ))
}

fn read_entities(schema: &Element, overrides: &NameOverrides) -> IndexMap<String, Entity> {
  let mut entities = IndexMap::new();
  for entity_type in schema.children_named("EntityType") {
    let raw = entity_type.attr("Name").unwrap_or_default();
    let name = overrides.rename(raw).to_string();
    let key_names: Vec<&str> = key_member_names(entity_type);

    let properties = entity_type
      .descendants_named("Property")
      .map(|p| read_property(p, &key_names))
      .collect();

    entities.insert(
      name.clone(),
      Entity {
        fixed_name: pascal_case(&name, false, overrides),
        name,
        properties,
        ..Entity::default()
      },
    );
  }
  entities
}

fn key_member_names(entity: &Element) -> Vec<&str> {
  entity
    .find_descendant("Key")
    .map(|key| key.children_named("PropertyRef").filter_map(|r| r.attr("Name")).collect())
    .unwrap_or_default()
}

fn read_property(property: &Element, key_names: &[&str]) -> Property {
  let name = property.attr("Name").unwrap_or_default().to_string();

  // Conceptual MaxLength differs from the storage side: empty means unset and
  // the literal "Max" becomes the -1 sentinel.
  let max_length = match property.attr("MaxLength") {
    None | Some("") => None,
    Some("Max") => Some(-1),
    Some(value) => value.parse::<i64>().ok(),
  };

  Property {
    primary_key: key_names.contains(&name.as_str()),
    name,
    type_name: property.attr("Type").unwrap_or_default().to_string(),
    nullable: property.attr("Nullable") != Some("false"),
    max_length,
    precision: positive_attr(property, "Precision"),
    scale: positive_attr(property, "Scale"),
    fixed_length: property.attr("FixedLength") == Some("true"),
    unicode: property.attr("Unicode") == Some("true"),
  }
}

fn positive_attr(element: &Element, name: &str) -> Option<u32> {
  element
    .attr(name)
    .and_then(|v| v.parse::<u32>().ok())
    .filter(|v| *v > 0)
}

fn read_complex_types(schema: &Element, overrides: &NameOverrides) -> Vec<ComplexType> {
  schema
    .children_named("ComplexType")
    .map(|complex| {
      let name = complex.attr("Name").unwrap_or_default().to_string();
      ComplexType {
        fixed_name: pascal_case(&name, false, overrides),
        properties: complex.descendants_named("Property").map(|p| read_property(p, &[])).collect(),
        name,
      }
    })
    .collect()
}

fn read_function_imports(
  schema: &Element,
  complex_types: &[ComplexType],
  overrides: &NameOverrides,
) -> Vec<FunctionImport> {
  let Some(container) = schema.find_descendant("EntityContainer") else {
    return Vec::new();
  };

  container
    .descendants_named("FunctionImport")
    .map(|import| {
      let name = import.attr("Name").unwrap_or_default().to_string();
      let parameters = import
        .children_named("Parameter")
        .map(|p| FunctionParameter {
          name: p.attr("Name").unwrap_or_default().to_string(),
          type_name: p.attr("Type").map(str::to_string),
          direction: ParameterDirection::parse(p.attr("Mode")),
          // Parameters are the one place where the designer omits Nullable
          // for non-nullable declarations.
          nullable: p.attr("Nullable") == Some("true"),
        })
        .collect();

      let return_type = import
        .attr("ReturnType")
        .or_else(|| import.find_descendant("ReturnType").and_then(|r| r.attr("Type")))
        .map(|raw| parse_return_type(raw, complex_types));

      FunctionImport {
        fixed_name: pascal_case(&name, false, overrides),
        name,
        parameters,
        return_type,
      }
    })
    .collect()
}

/// Unwraps `Collection(Ns.Type)` and strips the namespace qualifier the
/// designer prepends to every declared type.
fn parse_return_type(raw: &str, complex_types: &[ComplexType]) -> FunctionReturn {
  let (inner, is_collection) = match raw.strip_prefix("Collection(").and_then(|r| r.strip_suffix(')')) {
    Some(inner) => (inner, true),
    None => (raw, false),
  };
  let type_name = strip_qualifier(inner).to_string();
  FunctionReturn {
    is_complex: complex_types.iter().any(|c| c.name == type_name),
    type_name,
    is_collection,
  }
}

struct AssociationEnd<'a> {
  entity: &'a str,
  multiplicity: Multiplicity,
}

fn read_associations(
  schema: &Element,
  entities: &mut IndexMap<String, Entity>,
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

    for (own, other) in [(&ends[0], &ends[1]), (&ends[1], &ends[0])] {
      let Some(entity) = entities.get_mut(own.entity) else {
        warnings.push(format!("association '{name}' references undeclared entity '{}'", own.entity));
        continue;
      };
      entity.navigations.push(NavigationProperty {
        target: other.entity.to_string(),
        target_fixed: String::new(),
        fixed_name: String::new(),
        target_schema: String::new(),
        multiplicity: other.multiplicity,
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
    entity: strip_qualifier(end.attr("Type").unwrap_or_default()),
    multiplicity,
  })
}
