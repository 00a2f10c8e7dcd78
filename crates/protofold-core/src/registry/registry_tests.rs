#![allow(non_snake_case)]

use super::*;
use crate::fixtures::{
    self, bytes, entity, entity_options, entity_payload, int32, message, string, users_file,
};
use crate::model::FieldKind;
use crate::schema::FileDescriptor;

fn registry_for(file: &FileDescriptor, config: &GeneratorConfig) -> EntityRegistry {
    let model = SchemaModel::build(file).unwrap();
    EntityRegistry::build(&model, config)
}

fn field(name: &str, kind: FieldKind) -> Field {
    Field {
        name: name.into(),
        number: 1,
        kind,
        repeated: false,
        options: Vec::new(),
    }
}

#[test]
fn resolve_id_field___id_and_email___picks_id() {
    let fields = [field("id", FieldKind::String), field("email", FieldKind::String)];

    assert_eq!(
        resolve_id_field(&fields, None),
        IdField::Resolved {
            name: "id".into(),
            source: IdSource::Named
        }
    );
}

#[test]
fn resolve_id_field___tenant_id_and_name___picks_suffix() {
    let fields = [field("tenant_id", FieldKind::String), field("name", FieldKind::String)];

    assert_eq!(
        resolve_id_field(&fields, None),
        IdField::Resolved {
            name: "tenant_id".into(),
            source: IdSource::Suffix
        }
    );
}

#[test]
fn resolve_id_field___no_id_shaped_or_string_field___is_unresolved() {
    let fields = [field("name", FieldKind::Bytes), field("bio", FieldKind::Int64)];

    assert_eq!(resolve_id_field(&fields, None), IdField::Unresolved);
}

#[test]
fn resolve_id_field___id_is_case_insensitive() {
    let fields = [field("email", FieldKind::String), field("ID", FieldKind::Int64)];

    assert_eq!(resolve_id_field(&fields, None).name(), Some("ID"));
}

#[test]
fn resolve_id_field___named_beats_suffix_regardless_of_order() {
    let fields = [field("org_id", FieldKind::String), field("id", FieldKind::String)];

    assert_eq!(resolve_id_field(&fields, None).name(), Some("id"));
}

#[test]
fn resolve_id_field___first_string_when_nothing_id_shaped() {
    let fields = [
        field("count", FieldKind::Int32),
        field("slug", FieldKind::String),
        field("title", FieldKind::String),
    ];

    assert_eq!(
        resolve_id_field(&fields, None),
        IdField::Resolved {
            name: "slug".into(),
            source: IdSource::FirstString
        }
    );
}

#[test]
fn resolve_id_field___existing_preferred_field___wins() {
    let fields = [field("id", FieldKind::String), field("user_id", FieldKind::String)];

    assert_eq!(
        resolve_id_field(&fields, Some("user_id")),
        IdField::Resolved {
            name: "user_id".into(),
            source: IdSource::Annotation
        }
    );
}

#[test]
fn resolve_id_field___missing_preferred_field___falls_back() {
    let fields = [field("id", FieldKind::String)];

    assert_eq!(resolve_id_field(&fields, Some("uuid")).name(), Some("id"));
}

#[test]
fn EntityRegistry___annotated_selection___registers_only_annotated() {
    let registry = registry_for(&users_file(), &GeneratorConfig::default());

    assert_eq!(registry.len(), 1);
    assert!(registry.get("User").is_some());
    assert!(registry.get("GetUserRequest").is_none());
}

#[test]
fn EntityRegistry___id_shaped_selection___adds_messages_with_id() {
    let file = FileDescriptor::new("t.proto")
        .with_message(entity("User", vec![string("email")]))
        .with_message(message("Team", vec![string("Id"), string("name")]))
        .with_message(message("TeamRef", vec![string("team_id")]));
    let config = GeneratorConfig::default().with_entity_selection(EntitySelection::IdShaped);

    let registry = registry_for(&file, &config);

    let names: Vec<_> = registry.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["User", "Team"]);
}

#[test]
fn EntityRegistry___id_shaped_selection___skips_foreign_key_requests() {
    let config = GeneratorConfig::default().with_entity_selection(EntitySelection::IdShaped);

    let registry = registry_for(&users_file(), &config);

    let names: Vec<_> = registry.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["User"]);
    assert!(registry.get("DeleteUserRequest").is_none());
}

#[test]
fn EntityRegistry___iter___follows_declaration_order() {
    let file = FileDescriptor::new("t.proto")
        .with_message(entity("Zebra", vec![string("id")]))
        .with_message(message("Noise", vec![]))
        .with_message(entity("Apple", vec![string("id")]));

    let registry = registry_for(&file, &GeneratorConfig::default());

    let order: Vec<_> = (&registry).into_iter().map(|e| (e.name.as_str(), e.index)).collect();
    assert_eq!(order, [("Zebra", 0), ("Apple", 2)]);
}

#[test]
fn EntityRegistry___resolve___accepts_qualified_names() {
    let registry = registry_for(&users_file(), &GeneratorConfig::default());

    assert!(registry.resolve(".acme.users.v1.User").is_some());
    assert!(registry.resolve("acme.users.v1.Team").is_none());
}

#[test]
fn EntityRegistry___collection___derived_from_name() {
    let registry = registry_for(&users_file(), &GeneratorConfig::default());

    assert_eq!(registry.get("User").unwrap().collection, "users");
}

#[test]
fn EntityRegistry___annotation_overrides___apply() {
    let options = entity_options(&entity_payload(Some("people"), Some("user_id")));
    let file = FileDescriptor::new("t.proto").with_message(
        message("Person", vec![string("id"), string("user_id")]).with_options(options),
    );

    let registry = registry_for(&file, &GeneratorConfig::default());
    let person = registry.get("Person").unwrap();

    assert_eq!(person.collection, "people");
    assert_eq!(person.id_field.name(), Some("user_id"));
    assert_eq!(
        person.annotation.as_ref().and_then(|a| a.collection.as_deref()),
        Some("people")
    );
}

#[test]
fn EntityRegistry___custom_extension_number___is_honoured() {
    let options = fixtures::bytes_field(50100, &[]);
    let file = FileDescriptor::new("t.proto")
        .with_message(message("Order", vec![string("id")]).with_options(options))
        .with_message(entity("User", vec![string("id")]));
    let config = GeneratorConfig::default().with_entity_extension_number(50100);

    let registry = registry_for(&file, &config);

    let names: Vec<_> = registry.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Order"]);
}

#[test]
fn EntityRegistry___unresolved_entity___is_still_registered() {
    let file = FileDescriptor::new("t.proto")
        .with_message(entity("Blob", vec![bytes("name"), int32("bio")]));

    let registry = registry_for(&file, &GeneratorConfig::default());

    assert_eq!(registry.get("Blob").unwrap().id_field, IdField::Unresolved);
}

#[test]
fn EntityRegistry___empty_model___is_empty() {
    let registry = registry_for(&FileDescriptor::new("e.proto"), &GeneratorConfig::default());

    assert!(registry.is_empty());
    assert_eq!(registry.len(), 0);
}

#[test]
fn Entity___matches_id_field___accepts_resolved_name_and_convention() {
    let registry = registry_for(&users_file(), &GeneratorConfig::default());
    let user = registry.get("User").unwrap();

    assert_eq!(user.id_convention(), "user_id");
    assert!(user.matches_id_field("id"));
    assert!(user.matches_id_field("user_id"));
    assert!(!user.matches_id_field("User_id"));
    assert!(!user.matches_id_field("email"));
}

#[test]
fn EntityRegistry___is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}

    assert_send_sync::<EntityRegistry>();
}

#[test]
fn IdField___serialize___tags_status() {
    let json = serde_json::to_value(IdField::Unresolved).unwrap();
    assert_eq!(json["status"], "unresolved");

    let json = serde_json::to_value(IdField::Resolved {
        name: "id".into(),
        source: IdSource::FirstString,
    })
    .unwrap();
    assert_eq!(json["status"], "resolved");
    assert_eq!(json["source"], "first-string");
}
