//! Property-based tests for the analysis pipeline
//!
//! Arbitrary (but structurally valid) schema files must analyze without
//! error, classify every method exactly once, bind only registered entities,
//! and produce identical results on every run.

use proptest::prelude::*;
use protofold_core::prelude::*;
use protofold_core::{
    FieldDescriptor, FieldKindTag, MessageDescriptor, MethodDescriptor, ServiceDescriptor, TieBreak,
};

const ENTITY_ANNOTATION: [u8; 4] = [0x82, 0xb5, 0x18, 0x00];

fn field_kind() -> impl Strategy<Value = FieldKindTag> {
    prop_oneof![
        Just(FieldKindTag::String),
        Just(FieldKindTag::Int64),
        Just(FieldKindTag::Bytes),
        Just(FieldKindTag::Bool),
    ]
}

fn field_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("id".to_string()),
        Just("name".to_string()),
        Just("owner_id".to_string()),
        Just("m0_id".to_string()),
        Just("m1_id".to_string()),
        "[a-z]{1,6}",
    ]
}

/// Messages `M0..Mn`, some annotated, with scalar fields and optional
/// repeated references to other messages.
fn schema_file() -> impl Strategy<Value = FileDescriptor> {
    (2usize..6).prop_flat_map(|count| {
        let message = (
            prop::collection::vec((field_name(), field_kind()), 0..5),
            any::<bool>(),
            prop::option::of(0..count),
        );
        let method = (0..count, 0..count, any::<bool>());
        (
            prop::collection::vec(message, count),
            prop::collection::vec(method, 0..8),
        )
            .prop_map(move |(messages, methods)| build_file(messages, methods))
    })
}

type MessageShape = (Vec<(String, FieldKindTag)>, bool, Option<usize>);

fn build_file(messages: Vec<MessageShape>, methods: Vec<(usize, usize, bool)>) -> FileDescriptor {
    let mut file = FileDescriptor::new("generated.proto").with_package("prop.v1");

    for (index, (fields, annotated, list_of)) in messages.into_iter().enumerate() {
        let mut message = MessageDescriptor::new(format!("M{index}"));
        let mut seen = std::collections::HashSet::new();
        for (number, (name, kind)) in fields.into_iter().enumerate() {
            if seen.insert(name.clone()) {
                message = message
                    .with_field(FieldDescriptor::new(name, kind).with_number(number as u32 + 1));
            }
        }
        if let Some(target) = list_of
            && seen.insert("items".to_string())
        {
            message = message
                .with_field(FieldDescriptor::message("items", format!("M{target}")).repeated());
        }
        if annotated {
            message = message.with_options(ENTITY_ANNOTATION.to_vec());
        }
        file = file.with_message(message);
    }

    let mut service = ServiceDescriptor::new("Svc");
    for (i, (input, output, empty)) in methods.into_iter().enumerate() {
        let output = if empty {
            "google.protobuf.Empty".to_string()
        } else {
            format!("M{output}")
        };
        service = service.with_method(MethodDescriptor::new(
            format!("Op{i}"),
            format!("M{input}"),
            output,
        ));
    }
    file.with_service(service)
}

proptest! {
    #[test]
    fn prop_every_method_classified_once(file in schema_file()) {
        let analysis = FileAnalysis::build(&file, &GeneratorConfig::default()).unwrap();

        let declared = file.services.iter().map(|s| s.methods.len()).sum::<usize>();
        let classified = analysis.services().iter().map(|s| s.methods.len()).sum::<usize>();
        prop_assert_eq!(declared, classified);
    }

    #[test]
    fn prop_bound_entities_are_registered(file in schema_file()) {
        let analysis = FileAnalysis::build(&file, &GeneratorConfig::default()).unwrap();

        for method in analysis.services().iter().flat_map(|s| &s.methods) {
            let classification = &method.classification;
            match classification.pattern() {
                Pattern::Unclassified => prop_assert!(classification.entity().is_none()),
                Pattern::List => {
                    let entity = classification.entity().unwrap();
                    prop_assert!(analysis.registry().get(entity).is_some());
                    prop_assert!(classification.list_field().is_some());
                }
                Pattern::Get | Pattern::Delete => {
                    let entity = analysis.registry().get(classification.entity().unwrap()).unwrap();
                    prop_assert!(entity.matches_id_field(classification.id_field().unwrap()));
                }
            }
        }
    }

    #[test]
    fn prop_only_empty_outputs_are_deletes(file in schema_file()) {
        let analysis = FileAnalysis::build(&file, &GeneratorConfig::default()).unwrap();

        for method in analysis.services().iter().flat_map(|s| &s.methods) {
            let is_delete = method.classification.pattern() == Pattern::Delete;
            prop_assert!(!is_delete || method.output_type.ends_with("Empty"));
        }
    }

    #[test]
    fn prop_analysis_is_deterministic(file in schema_file()) {
        let config = GeneratorConfig::default();
        let first = FileAnalysis::build(&file, &config).unwrap().to_json().unwrap();
        let second = FileAnalysis::build(&file, &config).unwrap().to_json().unwrap();

        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_unclassified_tie_break_never_adds_matches(file in schema_file()) {
        let lenient = FileAnalysis::build(&file, &GeneratorConfig::default()).unwrap();
        let strict = FileAnalysis::build(
            &file,
            &GeneratorConfig::default().with_tie_break(TieBreak::Unclassified),
        )
        .unwrap();

        let count = |a: &FileAnalysis| a
            .services()
            .iter()
            .flat_map(|s| &s.methods)
            .filter(|m| m.classification.pattern() == Pattern::Unclassified)
            .count();
        prop_assert!(count(&strict) >= count(&lenient));
    }

    #[test]
    fn prop_registry_follows_declaration_order(file in schema_file()) {
        let analysis = FileAnalysis::build(&file, &GeneratorConfig::default()).unwrap();

        let indexes: Vec<usize> = analysis.registry().iter().map(|e| e.index).collect();
        let mut sorted = indexes.clone();
        sorted.sort_unstable();
        prop_assert_eq!(indexes, sorted);
    }
}
