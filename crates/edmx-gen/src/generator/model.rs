//! Typed in-memory representation of the three EDMX sections.
//!
//! The readers fill these structures from raw XML; the binder cross-references
//! and enriches them; the emitters only read them. `IndexMap` is used wherever
//! declaration order matters (composite primary keys are generated in column
//! order, artifacts in model order).

use indexmap::IndexMap;

/// Cardinality of a relationship endpoint. Closed set; any other raw token in
/// the document is a fatal parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Multiplicity {
  One,
  ZeroOrOne,
  Many,
  ZeroOrMany,
}

impl Multiplicity {
  pub fn parse(token: &str) -> Option<Self> {
    match token {
      "1" => Some(Self::One),
      "0..1" => Some(Self::ZeroOrOne),
      "*" => Some(Self::Many),
      "0..*" => Some(Self::ZeroOrMany),
      _ => None,
    }
  }

  pub fn is_collection(self) -> bool {
    matches!(self, Self::Many | Self::ZeroOrMany)
  }

  pub fn is_single(self) -> bool {
    !self.is_collection()
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterDirection {
  In,
  Out,
  InOut,
}

impl ParameterDirection {
  pub fn parse(mode: Option<&str>) -> Self {
    match mode {
      Some("Out") => Self::Out,
      Some("InOut") => Self::InOut,
      _ => Self::In,
    }
  }

  pub fn is_output(self) -> bool {
    matches!(self, Self::Out | Self::InOut)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueGeneration {
  Identity,
  Computed,
}

impl ValueGeneration {
  pub fn parse(pattern: Option<&str>) -> Option<Self> {
    match pattern {
      Some("Identity") => Some(Self::Identity),
      Some("Computed") => Some(Self::Computed),
      _ => None,
    }
  }
}

/// Whether a storage entity set is backed by a table or a view. Views are
/// emitted as key-less read-only bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableKind {
  #[default]
  Table,
  View,
}

#[derive(Debug, Clone, Default)]
pub struct Column {
  pub name: String,
  /// Conceptual property mapped onto this column; set by the binder.
  pub property_name: String,
  pub type_name: String,
  pub nullable: bool,
  pub primary_key: bool,
  pub default_value: Option<String>,
  pub max_length: Option<i64>,
  pub precision: Option<u32>,
  pub scale: Option<u32>,
  pub value_generation: Option<ValueGeneration>,
}

/// A table-to-table relationship derived from a storage association. One
/// record is attached to each participant; `source` is the owning table's end.
#[derive(Debug, Clone)]
pub struct ForeignKey {
  pub source: Multiplicity,
  pub destination: Multiplicity,
  /// Raw name of the table on the other end.
  pub table: String,
  /// Collision-resolved identifier for the generated relationship; assigned
  /// by the binder.
  pub fixed_name: String,
  pub schema: String,
  /// Whether the owning table is the dependent end of the constraint.
  pub dependent: bool,
  /// Ordered (principal column, dependent column) pairs.
  pub columns: Vec<(String, String)>,
}

#[derive(Debug, Clone, Default)]
pub struct Table {
  pub name: String,
  pub fixed_name: String,
  pub schema: String,
  pub kind: TableKind,
  pub used: bool,
  /// Fixed name of the conceptual entity mapped onto this table; set by the
  /// binder.
  pub entity_name: String,
  pub columns: IndexMap<String, Column>,
  pub foreign_keys: Vec<ForeignKey>,
}

impl Table {
  pub fn primary_key_columns(&self) -> impl Iterator<Item = &Column> {
    self.columns.values().filter(|c| c.primary_key)
  }
}

#[derive(Debug, Clone)]
pub struct StorageParameter {
  pub name: String,
  pub type_name: Option<String>,
  pub direction: ParameterDirection,
}

#[derive(Debug, Clone, Default)]
pub struct StorageFunction {
  pub name: String,
  pub fixed_name: String,
  pub schema: String,
  pub parameters: Vec<StorageParameter>,
  pub composable: bool,
  pub returns_collection: bool,
  pub return_columns: Vec<Column>,
}

#[derive(Debug, Clone, Default)]
pub struct StorageModel {
  pub tables: IndexMap<String, Table>,
  pub functions: Vec<StorageFunction>,
}

#[derive(Debug, Clone, Default)]
pub struct Property {
  pub name: String,
  pub type_name: String,
  pub nullable: bool,
  pub primary_key: bool,
  /// `-1` is the sentinel for a declared `Max` length.
  pub max_length: Option<i64>,
  pub precision: Option<u32>,
  pub scale: Option<u32>,
  pub fixed_length: bool,
  pub unicode: bool,
}

/// A relationship endpoint on an entity, derived from a conceptual
/// association. Target fields are filled by the binder.
#[derive(Debug, Clone)]
pub struct NavigationProperty {
  /// Raw name of the entity on the other end.
  pub target: String,
  /// Fixed name of the target entity (the member's type).
  pub target_fixed: String,
  /// Collision-resolved member identifier.
  pub fixed_name: String,
  pub target_schema: String,
  pub multiplicity: Multiplicity,
}

#[derive(Debug, Clone, Default)]
pub struct Entity {
  pub name: String,
  pub fixed_name: String,
  pub table_name: String,
  pub schema: String,
  pub used: bool,
  pub properties: Vec<Property>,
  pub navigations: Vec<NavigationProperty>,
}

impl Entity {
  pub fn property_names(&self) -> impl Iterator<Item = &str> {
    self.properties.iter().map(|p| p.name.as_str())
  }
}

#[derive(Debug, Clone)]
pub struct FunctionParameter {
  pub name: String,
  pub type_name: Option<String>,
  pub direction: ParameterDirection,
  pub nullable: bool,
}

/// Return descriptor of a conceptual function import.
#[derive(Debug, Clone)]
pub struct FunctionReturn {
  pub type_name: String,
  pub is_collection: bool,
  /// True when the return names a declared complex type rather than a scalar.
  pub is_complex: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FunctionImport {
  pub name: String,
  pub fixed_name: String,
  pub parameters: Vec<FunctionParameter>,
  pub return_type: Option<FunctionReturn>,
}

#[derive(Debug, Clone, Default)]
pub struct ComplexType {
  pub name: String,
  pub fixed_name: String,
  pub properties: Vec<Property>,
}

#[derive(Debug, Clone, Default)]
pub struct ConceptualModel {
  pub entities: IndexMap<String, Entity>,
  pub functions: Vec<FunctionImport>,
  pub complex_types: Vec<ComplexType>,
}

impl ConceptualModel {
  pub fn complex_type(&self, name: &str) -> Option<&ComplexType> {
    self.complex_types.iter().find(|c| c.name == name)
  }
}

/// One entity ↔ table correspondence from the C-S mapping section. Consumed
/// once by the binder, never mutated.
#[derive(Debug, Clone, Default)]
pub struct Mapping {
  pub table_name: String,
  pub entity_name: String,
  pub properties: Vec<MappingProperty>,
}

#[derive(Debug, Clone)]
pub struct MappingProperty {
  pub column_name: String,
  pub property_name: String,
}
