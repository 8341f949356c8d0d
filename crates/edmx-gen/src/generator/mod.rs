pub(crate) mod binder;
pub(crate) mod document;
pub(crate) mod emitter;
pub(crate) mod error;
pub(crate) mod model;
pub(crate) mod naming;
pub mod orchestrator;
pub(crate) mod reader;
