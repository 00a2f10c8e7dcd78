//! # protofold
//!
//! A schema-driven code generation front end.
//!
//! protofold reads structural schema descriptions and produces:
//! - a normalized model of entities and RPC methods
//! - a Get / List / Delete classification of every method, inferred from
//!   input and output shapes alone
//! - a composable, indentation-aware text algebra for emitters to render with
//!
//! ## Writing an Emitter
//!
//! ```
//! use protofold::prelude::*;
//!
//! struct Repositories;
//!
//! impl Emitter for Repositories {
//!     fn name(&self) -> &str {
//!         "repositories"
//!     }
//!
//!     fn emit(&self, analysis: &FileAnalysis) -> SchemaResult<Vec<GeneratedFile>> {
//!         let unit = analysis.config().indent_unit.clone();
//!         let methods: Fragment = analysis
//!             .services()
//!             .iter()
//!             .flat_map(|s| &s.methods)
//!             .filter(|m| m.classification.pattern() != Pattern::Unclassified)
//!             .map(|m| Fragment::line(format!("{} {}", m.method, m.classification)))
//!             .collect();
//!         let name = to_pascal_case(analysis.stem());
//!         let body = Fragment::line(format!("type {name}Repository {{"))
//!             + methods.indent_with(unit)
//!             + Fragment::line("}");
//!         Ok(vec![GeneratedFile::new(format!("{}_repository.txt", analysis.stem()), body)])
//!     }
//! }
//!
//! let file = FileDescriptor::new("users.proto");
//! let driver = Driver::new(GeneratorConfig::default()).with_emitter(Repositories);
//! let output = driver.run(&file).unwrap();
//!
//! assert_eq!(output[0].content, "type UsersRepository {\n}\n");
//! ```
//!
//! ## Crate Structure
//!
//! This is a facade crate that re-exports from:
//! - [`protofold_wire`] - Schema-less option metadata reader
//! - [`protofold_fragment`] - Fragment algebra and naming helpers
//! - [`protofold_core`] - Schema model, registry, classifier and driver

// Re-export core types
pub use protofold_core::{
    Classification, Classifier, Driver, Emitter, Entity, EntityOptions, EntityRegistry,
    EntitySelection, Field, FieldKind, FileAnalysis, FileDescriptor, GeneratedFile,
    GeneratorConfig, IdField, IdSource, Message, Method, Pattern, RenderedFile, SchemaError,
    SchemaModel, SchemaResult, Service, TieBreak,
};

// Re-export fragment algebra
pub use protofold_fragment::{
    Fragment, Monoid, concat, fold, fold_map, join, naming, when, when_some,
};

// Re-export the metadata reader
pub use protofold_wire::{ExtensionValue, FieldTable, WireValue};

// Re-export the sub-crates for less common items
pub use protofold_core as core;
pub use protofold_fragment as fragment;
pub use protofold_wire as wire;

// Re-export common dependencies that emitter authors need
pub use serde;
pub use serde_json;
pub use tracing;

/// Prelude module for convenient imports.
///
/// Use `use protofold::prelude::*;` to import commonly used types.
///
/// This includes:
/// - Pipeline: `Driver`, `Emitter`, `FileAnalysis`, `GeneratedFile`, `GeneratorConfig`
/// - Model: `FileDescriptor`, `Entity`, `Pattern`, `Classification`
/// - Fragments: `Fragment`, `Monoid`, `when`, `when_some`, `join`, naming helpers
pub mod prelude {
    pub use crate::{
        Classification, Driver, Emitter, Entity, FileAnalysis, FileDescriptor, Fragment,
        GeneratedFile, GeneratorConfig, IdField, Monoid, Pattern, SchemaError, SchemaResult,
        join, when, when_some,
    };

    pub use protofold_fragment::naming::{
        collection_name, to_camel_case, to_pascal_case, to_snake_case,
    };

    // Serde derives (commonly needed for emitter options)
    pub use serde::{Deserialize, Serialize};
}
