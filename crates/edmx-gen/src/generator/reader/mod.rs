mod conceptual;
mod mapping;
mod storage;

pub use conceptual::read_conceptual_model;
pub use mapping::read_mappings;
pub use storage::read_storage_model;

/// Default schema assigned to storage objects that do not declare one.
pub const DEFAULT_SCHEMA: &str = "dbo";
