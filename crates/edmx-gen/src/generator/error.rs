use crate::generator::model::Multiplicity;

/// Fatal conditions for a generation run. Every variant aborts the pipeline;
/// there is no retry or partial recovery within a run.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
  #[error("the document does not contain a {0} section")]
  MissingSection(&'static str),

  #[error("mapping references {kind} '{name}', which is not defined in the model")]
  UnmappedReference { kind: &'static str, name: String },

  #[error("invalid association '{name}': {reason}")]
  InvalidAssociation { name: String, reason: String },

  #[error("unsupported property type '{type_name}' on '{owner}'")]
  UnsupportedType { owner: String, type_name: String },

  // The field cannot be called `source`; thiserror reserves that name for
  // the error cause.
  #[error("unsupported multiplicity combination {from:?} -> {to:?} on table '{table}'")]
  UnsupportedRelationshipShape {
    table: String,
    from: Multiplicity,
    to: Multiplicity,
  },

  // Internal invariant violation, not a user error.
  #[error("could not allocate a unique identifier for '{0}'")]
  NamingCollisionOverflow(String),

  #[error("malformed XML document: {0}")]
  Xml(#[from] quick_xml::Error),
}
