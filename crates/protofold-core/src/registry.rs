//! Entity registry
//!
//! One [`Entity`] per qualifying message declaration, built once per file and
//! read-only afterwards.
//!
//! # Identifier resolution
//!
//! The first rule that matches wins:
//!
//! 1. a field named `id` (case-insensitive)
//! 2. a field whose name ends in `_id`
//! 3. the first `string` field
//! 4. otherwise [`IdField::Unresolved`]
//!
//! An `id_field` override from the entity annotation is tried before rule 1
//! and only applies when it names a field the declaration actually has.

use crate::config::{EntitySelection, GeneratorConfig};
use crate::model::{Field, Message, SchemaModel, simple_name};
use crate::options::{EntityOptions, entity_annotation};
use protofold_fragment::naming::collection_name;
use serde::{Serialize, Serializer};
use std::collections::HashMap;

/// Which rule picked an entity's identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdSource {
    Annotation,
    Named,
    Suffix,
    FirstString,
}

/// An entity's identifier field, or the sentinel when none qualifies
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum IdField {
    Resolved { name: String, source: IdSource },
    Unresolved,
}

impl IdField {
    pub fn name(&self) -> Option<&str> {
        match self {
            IdField::Resolved { name, .. } => Some(name),
            IdField::Unresolved => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, IdField::Resolved { .. })
    }
}

/// Pick the identifier field of a declaration.
///
/// # Examples
///
/// ```
/// use protofold_core::model::{Field, FieldKind};
/// use protofold_core::registry::{IdField, resolve_id_field};
///
/// let field = |name: &str, kind| Field {
///     name: name.into(),
///     number: 1,
///     kind,
///     repeated: false,
///     options: Vec::new(),
/// };
/// let fields = [field("tenant_id", FieldKind::String), field("name", FieldKind::String)];
///
/// assert_eq!(resolve_id_field(&fields, None).name(), Some("tenant_id"));
/// assert_eq!(resolve_id_field(&[field("bio", FieldKind::Bytes)], None), IdField::Unresolved);
/// ```
pub fn resolve_id_field(fields: &[Field], preferred: Option<&str>) -> IdField {
    let resolved = |field: &Field, source| IdField::Resolved {
        name: field.name.clone(),
        source,
    };

    if let Some(field) = preferred.and_then(|p| fields.iter().find(|f| f.name == p)) {
        return resolved(field, IdSource::Annotation);
    }
    if let Some(field) = fields.iter().find(|f| f.name.eq_ignore_ascii_case("id")) {
        return resolved(field, IdSource::Named);
    }
    if let Some(field) = fields.iter().find(|f| f.name.ends_with("_id")) {
        return resolved(field, IdSource::Suffix);
    }
    if let Some(field) = fields.iter().find(|f| f.kind.is_string()) {
        return resolved(field, IdSource::FirstString);
    }
    IdField::Unresolved
}

/// A message treated as a persisted domain object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    pub name: String,

    pub id_field: IdField,

    /// Storage collection: the annotation's value, or the lower-cased name plus `s`
    pub collection: String,

    pub fields: Vec<Field>,

    /// Position of the declaration among the file's messages
    pub index: usize,

    /// Overrides decoded from the annotation, if the declaration carried one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<EntityOptions>,
}

impl Entity {
    fn from_message(message: &Message, annotation: Option<EntityOptions>) -> Self {
        let preferred = annotation.as_ref().and_then(|a| a.id_field.as_deref());
        let collection = annotation
            .as_ref()
            .and_then(|a| a.collection.clone())
            .unwrap_or_else(|| collection_name(&message.name));

        Self {
            name: message.name.clone(),
            id_field: resolve_id_field(&message.fields, preferred),
            collection,
            fields: message.fields.clone(),
            index: message.index,
            annotation,
        }
    }

    /// The conventional foreign-key name, e.g. `user_id` for `User`
    pub fn id_convention(&self) -> String {
        format!("{}_id", self.name.to_lowercase())
    }

    /// Whether `field_name` refers to this entity's identifier, either by the
    /// resolved name or by convention.
    pub fn matches_id_field(&self, field_name: &str) -> bool {
        self.id_field.name() == Some(field_name) || self.id_convention() == field_name
    }
}

/// Name → entity index for one schema file, iterated in declaration order.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entities: Vec<Entity>,
    by_name: HashMap<String, usize>,
}

impl EntityRegistry {
    /// Collect every qualifying declaration of `model`.
    pub fn build(model: &SchemaModel, config: &GeneratorConfig) -> Self {
        let mut registry = Self::default();

        for message in &model.messages {
            let annotation = entity_annotation(&message.options, config.entity_extension_number);
            let id_shaped = config.entity_selection == EntitySelection::IdShaped
                && message
                    .fields
                    .iter()
                    .any(|f| f.name.eq_ignore_ascii_case("id"));
            if annotation.is_none() && !id_shaped {
                continue;
            }

            let entity = Entity::from_message(message, annotation);
            match entity.id_field.name() {
                Some(id) => tracing::debug!(
                    file = %model.file,
                    entity = %entity.name,
                    id_field = id,
                    collection = %entity.collection,
                    "entity registered"
                ),
                None => tracing::warn!(
                    file = %model.file,
                    entity = %entity.name,
                    "entity has no resolvable id field"
                ),
            }
            if let Some(wanted) = entity.annotation.as_ref().and_then(|a| a.id_field.as_deref())
                && message.field(wanted).is_none()
            {
                tracing::warn!(
                    file = %model.file,
                    entity = %entity.name,
                    id_field = wanted,
                    "annotated id field does not exist, falling back"
                );
            }

            registry
                .by_name
                .insert(entity.name.clone(), registry.entities.len());
            registry.entities.push(entity);
        }

        registry
    }

    /// Look up an entity by its declared name
    pub fn get(&self, name: &str) -> Option<&Entity> {
        self.by_name.get(name).and_then(|&i| self.entities.get(i))
    }

    /// Look up an entity by type reference, qualified or not
    pub fn resolve(&self, type_ref: &str) -> Option<&Entity> {
        self.get(simple_name(type_ref))
    }

    /// Entities in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl<'a> IntoIterator for &'a EntityRegistry {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter()
    }
}

impl Serialize for EntityRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.entities)
    }
}

#[cfg(test)]
#[path = "registry/registry_tests.rs"]
mod registry_tests;
