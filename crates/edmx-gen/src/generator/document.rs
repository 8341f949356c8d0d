//! Element tree over an EDMX document.
//!
//! The three schema sections of an EDMX file live in different XML namespaces
//! (and tools disagree on the exact namespace versions), so all matching here
//! is by local name: prefixes are stripped from both element and attribute
//! names while the tree is built.

use indexmap::IndexMap;
use quick_xml::{
  Reader,
  events::{BytesStart, Event},
};

use crate::generator::error::GenerateError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
  pub name: String,
  pub attributes: IndexMap<String, String>,
  pub children: Vec<Element>,
}

impl Element {
  /// Parses a document and returns its root element.
  pub fn parse(text: &str) -> Result<Element, GenerateError> {
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<Element> = Vec::new();

    loop {
      match reader.read_event()? {
        Event::Start(start) => {
          stack.push(Self::from_start(&start)?);
        }
        Event::Empty(start) => {
          let element = Self::from_start(&start)?;
          match stack.last_mut() {
            Some(parent) => parent.children.push(element),
            None => return Ok(element),
          }
        }
        Event::End(_) => {
          let element = stack.pop().ok_or_else(unexpected_end)?;
          match stack.last_mut() {
            Some(parent) => parent.children.push(element),
            None => return Ok(element),
          }
        }
        Event::Eof => {
          return Err(stack.pop().map_or_else(missing_root, |_| unexpected_end()).into());
        }
        _ => {}
      }
    }
  }

  fn from_start(start: &BytesStart<'_>) -> Result<Element, GenerateError> {
    let name = local_name(start.name().as_ref());
    let mut attributes = IndexMap::new();
    for attr in start.attributes() {
      let attr = attr.map_err(quick_xml::Error::from)?;
      let value = attr.unescape_value().map_err(quick_xml::Error::from)?;
      attributes.insert(local_name(attr.key.as_ref()), value.into_owned());
    }
    Ok(Element {
      name,
      attributes,
      children: Vec::new(),
    })
  }

  pub fn attr(&self, name: &str) -> Option<&str> {
    self.attributes.get(name).map(String::as_str)
  }

  /// Depth-first traversal of every element below this one.
  pub fn descendants(&self) -> Descendants<'_> {
    Descendants {
      stack: self.children.iter().rev().collect(),
    }
  }

  pub fn find_descendant(&self, name: &str) -> Option<&Element> {
    self.descendants().find(|e| e.name == name)
  }

  pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
    self.children.iter().filter(move |e| e.name == name)
  }

  pub fn descendants_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
    self.descendants().filter(move |e| e.name == name)
  }
}

pub struct Descendants<'a> {
  stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
  type Item = &'a Element;

  fn next(&mut self) -> Option<Self::Item> {
    let next = self.stack.pop()?;
    self.stack.extend(next.children.iter().rev());
    Some(next)
  }
}

fn local_name(raw: &str) -> String {
  match raw.rsplit_once(':') {
    Some((_, local)) => local.to_string(),
    None => raw.to_string(),
  }
}

fn unexpected_end() -> quick_xml::Error {
  quick_xml::Error::Io(std::sync::Arc::new(std::io::Error::new(
    std::io::ErrorKind::InvalidData,
    "unbalanced element nesting",
  )))
}

fn missing_root() -> quick_xml::Error {
  quick_xml::Error::Io(std::sync::Arc::new(std::io::Error::new(
    std::io::ErrorKind::InvalidData,
    "document has no root element",
  )))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_nested_elements_with_local_names() {
    let root = Element::parse(
      r#"<edmx:Edmx xmlns:edmx="http://example/edmx">
           <edmx:Runtime>
             <StorageModels><Schema Namespace="Store.Model" /></StorageModels>
           </edmx:Runtime>
         </edmx:Edmx>"#,
    )
    .unwrap();

    assert_eq!(root.name, "Edmx");
    let schema = root.find_descendant("Schema").unwrap();
    assert_eq!(schema.attr("Namespace"), Some("Store.Model"));
  }

  #[test]
  fn strips_attribute_namespace_prefixes() {
    let root = Element::parse(r#"<EntitySet store:Type="Views" xmlns:store="urn:store" />"#).unwrap();
    assert_eq!(root.attr("Type"), Some("Views"));
  }

  #[test]
  fn descendants_are_depth_first() {
    let root = Element::parse("<a><b><c/></b><d/></a>").unwrap();
    let names: Vec<_> = root.descendants().map(|e| e.name.clone()).collect();
    assert_eq!(names, ["b", "c", "d"]);
  }

  #[test]
  fn unbalanced_document_is_an_error() {
    assert!(Element::parse("<a><b>").is_err());
    assert!(Element::parse("").is_err());
  }
}
