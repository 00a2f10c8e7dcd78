//! protofold-core - Schema model, entity registry and method classification
//!
//! This crate provides:
//! - [`FileDescriptor`] and friends, the serde input boundary
//! - [`SchemaModel`], the validated per-file model
//! - [`EntityRegistry`] with identifier-field resolution
//! - [`Classifier`], which assigns Get / List / Delete / Unclassified by shape
//! - [`Driver`] and the [`Emitter`] trait for target code generators
//! - [`GeneratorConfig`] and [`SchemaError`]

pub mod classify;
mod config;
mod driver;
mod error;
pub mod model;
pub mod options;
pub mod registry;
pub mod schema;

#[cfg(test)]
mod fixtures;

pub use classify::{
    Classification, Classifier, MethodClassification, Pattern, Rule, RULES, ServiceClassification,
};
pub use config::{EntitySelection, GeneratorConfig, TieBreak};
pub use driver::{Driver, Emitter, FileAnalysis, GeneratedFile, RenderedFile};
pub use error::{SchemaError, SchemaResult};
pub use model::{Field, FieldKind, Message, Method, SchemaModel, Service, simple_name};
pub use options::EntityOptions;
pub use registry::{Entity, EntityRegistry, IdField, IdSource};
pub use schema::{
    EnumDescriptor, FieldDescriptor, FieldKindTag, FileDescriptor, MessageDescriptor,
    MethodDescriptor, ServiceDescriptor,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Classification, Classifier, Driver, Emitter, Entity, EntityRegistry, FileAnalysis,
        FileDescriptor, GeneratedFile, GeneratorConfig, IdField, Pattern, SchemaError,
        SchemaModel, SchemaResult,
    };
}
