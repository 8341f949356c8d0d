//! Identifier normalization for generated code.
//!
//! Everything here is pure: raw database identifiers go in, PascalCase
//! identifiers come out. `pascal_case` is idempotent on its own output, which
//! the binder relies on when names flow through more than one pass.

use std::collections::HashSet;

use regex::Regex;

use crate::generator::error::GenerateError;

/// Known view-name prefixes, longest first so `vista_` wins over `v`.
const VIEW_PREFIXES: [&str; 6] = ["view_", "vista_", "vista", "vw_", "vw", "v"];

/// Marker prepended to the fixed name of every view-backed table.
const VIEW_MARKER: &str = "View";

/// Collision-suffix search gives up after this many candidates. Reaching it
/// means an internal invariant is broken, not a bad input.
const SUFFIX_LIMIT: u32 = 1000;

/// Caller-configurable naming overrides, passed alongside the configuration
/// instead of living as hardcoded special cases inside the normalizer.
#[derive(Debug, Clone)]
pub struct NameOverrides {
  /// Raw conceptual entity name -> replacement, applied before normalization.
  pub renames: Vec<(String, String)>,
  /// Token-casing overrides applied after PascalCase conversion; every
  /// case-insensitive occurrence of the token is recased to the replacement.
  pub acronyms: Vec<(String, String)>,
}

impl Default for NameOverrides {
  fn default() -> Self {
    Self {
      renames: Vec::new(),
      acronyms: vec![("tms".to_string(), "TMS".to_string()), ("doc".to_string(), "Doc".to_string())],
    }
  }
}

impl NameOverrides {
  /// Applies the rename table to a raw entity name.
  pub fn rename<'a>(&'a self, raw: &'a str) -> &'a str {
    self
      .renames
      .iter()
      .find(|(from, _)| from == raw)
      .map_or(raw, |(_, to)| to.as_str())
  }

  fn apply_acronyms(&self, name: &str) -> String {
    let mut result = name.to_string();
    for (token, replacement) in &self.acronyms {
      if token.is_empty() {
        continue;
      }
      let pattern = Regex::new(&format!("(?i){}", regex::escape(token))).expect("escaped token is a valid pattern");
      result = pattern.replace_all(&result, replacement.as_str()).into_owned();
    }
    result
  }
}

/// Converts a raw identifier into a PascalCase one.
///
/// Views get their known prefixes stripped and the `View` marker prepended.
/// Input that already looks PascalCase only has underscores removed, so a
/// second application is a no-op.
pub fn pascal_case(raw: &str, is_view: bool, overrides: &NameOverrides) -> String {
  if raw.trim().is_empty() {
    return raw.to_string();
  }
  if is_view && carries_view_marker(raw) {
    return raw.to_string();
  }

  let stripped = if is_view { strip_view_prefix(raw) } else { raw };

  let pascal = if looks_pascal_case(stripped) {
    stripped.replace('_', "")
  } else {
    stripped
      .split(['_', '-', ' '])
      .filter(|part| !part.is_empty())
      .map(capitalize)
      .collect()
  };

  let pascal = overrides.apply_acronyms(&pascal);
  if is_view { format!("{VIEW_MARKER}{pascal}") } else { pascal }
}

/// Heuristic "already PascalCase" detection: first character upper and a
/// lowercase character within the lookahead window (second position, or sixth
/// for names longer than five characters). The window is deliberately kept
/// from the legacy behavior; it misfires on short all-caps names, which is
/// why it lives behind this one predicate.
pub fn looks_pascal_case(name: &str) -> bool {
  let chars: Vec<char> = name.chars().collect();
  let Some(&first) = chars.first() else {
    return false;
  };
  if !first.is_uppercase() {
    return false;
  }
  let second_lower = chars.get(1).is_some_and(|c| c.is_lowercase());
  let sixth_lower = chars.len() > 5 && chars.get(5).is_some_and(|c| c.is_lowercase());
  second_lower || sixth_lower
}

fn carries_view_marker(name: &str) -> bool {
  name
    .strip_prefix(VIEW_MARKER)
    .and_then(|rest| rest.chars().next())
    .is_some_and(|c| c.is_uppercase())
}

fn strip_view_prefix(name: &str) -> &str {
  for prefix in VIEW_PREFIXES {
    // `get` rather than slicing: the prefix boundary may fall inside a
    // multi-byte character of a non-ASCII name.
    if name.len() > prefix.len()
      && let Some(head) = name.get(..prefix.len())
      && head.eq_ignore_ascii_case(prefix)
    {
      return &name[prefix.len()..];
    }
  }
  name
}

fn capitalize(part: &str) -> String {
  let mut chars = part.chars();
  match chars.next() {
    None => String::new(),
    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str().to_lowercase().as_str(),
  }
}

/// Pluralizes a fixed name for a context collection accessor.
pub fn pluralize(name: &str) -> String {
  let Some(last) = name.chars().next_back() else {
    return name.to_string();
  };
  match last.to_ascii_lowercase() {
    's' => name.to_string(),
    'a' | 'e' | 'i' | 'o' | 'u' | 'h' | 'k' | 'c' | 'f' | 'g' | 'r' | 'b' | 't' => format!("{name}s"),
    'z' => format!("{}ces", &name[..name.len() - last.len_utf8()]),
    _ => format!("{name}es"),
  }
}

/// Finds the first identifier not present in `taken`: the base itself, then
/// `base1`, `base2`, and so on.
pub fn unique_identifier(base: &str, taken: &HashSet<String>) -> Result<String, GenerateError> {
  if !taken.contains(base) {
    return Ok(base.to_string());
  }
  for counter in 1..SUFFIX_LIMIT {
    let candidate = format!("{base}{counter}");
    if !taken.contains(&candidate) {
      return Ok(candidate);
    }
  }
  Err(GenerateError::NamingCollisionOverflow(base.to_string()))
}

/// Drops a dotted namespace qualifier: `Model.Customer` becomes `Customer`.
pub fn strip_qualifier(name: &str) -> &str {
  name.rsplit_once('.').map_or(name, |(_, local)| local)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn plain(raw: &str) -> String {
    pascal_case(raw, false, &NameOverrides::default())
  }

  fn view(raw: &str) -> String {
    pascal_case(raw, true, &NameOverrides::default())
  }

  #[test]
  fn snake_case_becomes_pascal() {
    assert_eq!(plain("customer_order"), "CustomerOrder");
    assert_eq!(plain("customer-order line"), "CustomerOrderLine");
    assert_eq!(plain("CUSTOMER_ORDER"), "CustomerOrder");
  }

  #[test]
  fn pascal_input_keeps_interior_casing() {
    assert_eq!(plain("CustomerOrder"), "CustomerOrder");
    assert_eq!(plain("Customer_Order"), "CustomerOrder");
  }

  #[test]
  fn idempotent_on_own_output() {
    for raw in ["customer_order", "REGLA", "vw_active_users", "TipoDocumento", "x"] {
      let once = plain(raw);
      assert_eq!(plain(&once), once, "non-idempotent for {raw}");
    }
  }

  #[test]
  fn idempotent_for_views() {
    let once = view("vw_ActiveUsers");
    assert_eq!(once, "ViewActiveUsers");
    assert_eq!(view(&once), once);
  }

  #[test]
  fn view_prefixes_are_stripped() {
    assert_eq!(view("vw_ActiveUsers"), "ViewActiveUsers");
    assert_eq!(view("view_sales_summary"), "ViewSalesSummary");
    assert_eq!(view("vistaClientes"), "ViewClientes");
    assert_eq!(view("vPedidos"), "ViewPedidos");
  }

  #[test]
  fn non_ascii_view_names_survive_prefix_stripping() {
    assert_eq!(view("ñandu"), "ViewÑandu");
    assert_eq!(view("vista_niños"), "ViewNiños");
    assert_eq!(plain("año_fiscal"), "AñoFiscal");
  }

  #[test]
  fn acronym_overrides_recase_tokens() {
    assert_eq!(plain("tms_route"), "TMSRoute");
    assert_eq!(plain("tipo_doc"), "TipoDoc");
  }

  #[test]
  fn rename_table_applies_before_normalization() {
    let overrides = NameOverrides {
      renames: vec![("Regla1".to_string(), "REGLA".to_string())],
      ..NameOverrides::default()
    };
    assert_eq!(overrides.rename("Regla1"), "REGLA");
    assert_eq!(overrides.rename("Other"), "Other");
  }

  #[test]
  fn pascal_predicate_window() {
    assert!(looks_pascal_case("Customer"));
    assert!(looks_pascal_case("ABCDEfg"));
    assert!(!looks_pascal_case("REGLA"));
    assert!(!looks_pascal_case("customer"));
    assert!(!looks_pascal_case(""));
    assert!(!looks_pascal_case("X"));
  }

  #[test]
  fn pluralization_rules() {
    assert_eq!(pluralize("Status"), "Status");
    assert_eq!(pluralize("Customer"), "Customers");
    assert_eq!(pluralize("Branch"), "Branchs");
    assert_eq!(pluralize("Matriz"), "Matrices");
    assert_eq!(pluralize("Box"), "Boxes");
  }

  #[test]
  fn unique_identifier_appends_counter() {
    let mut taken = HashSet::new();
    assert_eq!(unique_identifier("Customer", &taken).unwrap(), "Customer");
    taken.insert("Customer".to_string());
    assert_eq!(unique_identifier("Customer", &taken).unwrap(), "Customer1");
    taken.insert("Customer1".to_string());
    assert_eq!(unique_identifier("Customer", &taken).unwrap(), "Customer2");
  }

  #[test]
  fn qualifier_stripping() {
    assert_eq!(strip_qualifier("Model.Customer"), "Customer");
    assert_eq!(strip_qualifier("Customer"), "Customer");
    assert_eq!(strip_qualifier("A.B.Customer"), "Customer");
  }
}
