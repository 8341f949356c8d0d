use std::path::PathBuf;

use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Row, Table};

use crate::{
  generator::{
    binder::bind,
    document::Element,
    model::TableKind,
    naming::NameOverrides,
    reader::{read_conceptual_model, read_mappings, read_storage_model},
  },
  ui::{Colors, colors::IntoComfyColor, term_width},
};

fn new_table() -> Table {
  let mut table = Table::new();
  table
    .load_preset("  ── ──            ")
    .set_content_arrangement(ContentArrangement::Dynamic)
    .set_width(term_width());
  table
}

fn header(colors: &Colors, labels: &[&str]) -> Row {
  let mut row = Row::new();
  for label in labels {
    row.add_cell(Cell::new(*label).fg(IntoComfyColor::into(colors.label())));
  }
  row
}

pub async fn list_entities(input: &PathBuf, colors: &Colors) -> anyhow::Result<()> {
  let document = tokio::fs::read_to_string(input).await?;
  let root = Element::parse(&document)?;

  let overrides = NameOverrides::default();
  let (mut storage, _) = read_storage_model(&root, &overrides)?;
  let (mut conceptual, _) = read_conceptual_model(&root, &overrides)?;
  let (mappings, _) = read_mappings(&root, &overrides)?;
  bind(&mut storage, &mut conceptual, &mappings)?;

  let mut rows: Vec<(String, String, String, String)> = conceptual
    .entities
    .values()
    .map(|e| {
      (
        e.fixed_name.clone(),
        e.name.clone(),
        e.table_name.clone(),
        e.schema.clone(),
      )
    })
    .collect();
  rows.sort_by(|a, b| a.0.cmp(&b.0));

  let mut table = new_table();
  table.set_header(header(colors, &["ENTITY", "RAW NAME", "TABLE", "SCHEMA"]));

  for (entity, raw, bound_table, schema) in rows {
    let mut row = Row::new();
    row.add_cell(
      Cell::new(entity)
        .fg(IntoComfyColor::into(colors.value()))
        .add_attribute(Attribute::Bold),
    );
    row.add_cell(Cell::new(raw).fg(IntoComfyColor::into(colors.primary())));
    row.add_cell(Cell::new(bound_table).fg(IntoComfyColor::into(colors.primary())));
    row.add_cell(Cell::new(schema).fg(IntoComfyColor::into(colors.info())));
    table.add_row(row);
  }

  println!("{table}");
  Ok(())
}

pub async fn list_tables(input: &PathBuf, colors: &Colors) -> anyhow::Result<()> {
  let document = tokio::fs::read_to_string(input).await?;
  let root = Element::parse(&document)?;

  let overrides = NameOverrides::default();
  let (storage, _) = read_storage_model(&root, &overrides)?;

  let mut table = new_table();
  table.set_header(header(colors, &["TABLE", "SCHEMA", "KIND", "COLUMNS"]));

  let mut rows: Vec<_> = storage.tables.values().collect();
  rows.sort_by(|a, b| a.name.cmp(&b.name));

  for entry in rows {
    let kind = match entry.kind {
      TableKind::Table => "table",
      TableKind::View => "view",
    };
    let mut row = Row::new();
    row.add_cell(
      Cell::new(&entry.name)
        .fg(IntoComfyColor::into(colors.value()))
        .add_attribute(Attribute::Bold),
    );
    row.add_cell(Cell::new(&entry.schema).fg(IntoComfyColor::into(colors.info())));
    row.add_cell(Cell::new(kind).fg(IntoComfyColor::into(colors.accent())));
    row.add_cell(
      Cell::new(entry.columns.len())
        .fg(IntoComfyColor::into(colors.primary()))
        .set_alignment(CellAlignment::Right),
    );
    table.add_row(row);
  }

  println!("{table}");
  Ok(())
}
