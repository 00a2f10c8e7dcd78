//! Shape-based RPC method classification
//!
//! Methods are classified from their input and output message shapes only;
//! method names are never consulted. The rules run in a fixed order and the
//! first one that matches decides:
//!
//! | order | rule | output | input |
//! |-------|------|--------|-------|
//! | 1 | [`Pattern::Delete`] | a no-payload type | string field naming an entity's id |
//! | 2 | [`Pattern::Get`] | an entity | string field naming that entity's id |
//! | 3 | [`Pattern::List`] | has a repeated entity field | anything |
//! | - | [`Pattern::Unclassified`] | otherwise | |
//!
//! An input field "names an entity's id" when it equals the entity's resolved
//! id field or its `<lowercased entity>_id` convention. When one field names
//! several entities the configured [`TieBreak`] decides.

use crate::config::{GeneratorConfig, TieBreak};
use crate::model::{Message, Method, SchemaModel};
use crate::registry::{Entity, EntityRegistry};
use serde::Serialize;
use std::fmt;

/// The inferred role of a method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Pattern {
    Get,
    List,
    Delete,
    Unclassified,
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Pattern::Get => "Get",
            Pattern::List => "List",
            Pattern::Delete => "Delete",
            Pattern::Unclassified => "Unclassified",
        };
        f.write_str(name)
    }
}

/// The result of classifying one method. Immutable once computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pattern: Pattern,

    #[serde(skip_serializing_if = "Option::is_none")]
    entity: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    id_field: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    list_field: Option<String>,
}

impl Classification {
    pub fn get(entity: impl Into<String>, id_field: impl Into<String>) -> Self {
        Self {
            pattern: Pattern::Get,
            entity: Some(entity.into()),
            id_field: Some(id_field.into()),
            list_field: None,
        }
    }

    pub fn list(entity: impl Into<String>, list_field: impl Into<String>) -> Self {
        Self {
            pattern: Pattern::List,
            entity: Some(entity.into()),
            id_field: None,
            list_field: Some(list_field.into()),
        }
    }

    pub fn delete(entity: impl Into<String>, id_field: impl Into<String>) -> Self {
        Self {
            pattern: Pattern::Delete,
            entity: Some(entity.into()),
            id_field: Some(id_field.into()),
            list_field: None,
        }
    }

    pub fn unclassified() -> Self {
        Self {
            pattern: Pattern::Unclassified,
            entity: None,
            id_field: None,
            list_field: None,
        }
    }

    pub fn pattern(&self) -> Pattern {
        self.pattern
    }

    /// The bound entity (absent when unclassified)
    pub fn entity(&self) -> Option<&str> {
        self.entity.as_deref()
    }

    /// The input field carrying the id, for Get and Delete
    pub fn id_field(&self) -> Option<&str> {
        self.id_field.as_deref()
    }

    /// The repeated output field, for List
    pub fn list_field(&self) -> Option<&str> {
        self.list_field.as_deref()
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.entity, &self.list_field) {
            (Some(entity), Some(list)) => write!(f, "{}({entity}, {list})", self.pattern),
            (Some(entity), None) => write!(f, "{}({entity})", self.pattern),
            _ => write!(f, "{}", self.pattern),
        }
    }
}

type RuleFn = fn(&Classifier<'_>, &Method) -> Option<Classification>;

/// One classification rule
pub struct Rule {
    pub name: &'static str,
    pub pattern: Pattern,
    apply: RuleFn,
}

impl Rule {
    /// Run this rule alone against `method`
    pub fn apply(&self, classifier: &Classifier<'_>, method: &Method) -> Option<Classification> {
        (self.apply)(classifier, method)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("pattern", &self.pattern)
            .finish()
    }
}

/// Rules in precedence order.
pub const RULES: &[Rule] = &[
    Rule {
        name: "delete",
        pattern: Pattern::Delete,
        apply: delete_rule,
    },
    Rule {
        name: "get",
        pattern: Pattern::Get,
        apply: get_rule,
    },
    Rule {
        name: "list",
        pattern: Pattern::List,
        apply: list_rule,
    },
];

fn delete_rule(classifier: &Classifier<'_>, method: &Method) -> Option<Classification> {
    if !classifier.config.is_empty_type(&method.output_type) {
        return None;
    }
    let input = classifier.model.message(&method.input_type)?;
    let (field, entity) = classifier.match_id_field(method, input)?;
    Some(Classification::delete(&entity.name, field))
}

fn get_rule(classifier: &Classifier<'_>, method: &Method) -> Option<Classification> {
    let entity = classifier.registry.resolve(&method.output_type)?;
    let input = classifier.model.message(&method.input_type)?;
    let field = input
        .fields
        .iter()
        .find(|f| f.kind.is_string() && entity.matches_id_field(&f.name))?;
    Some(Classification::get(&entity.name, &field.name))
}

fn list_rule(classifier: &Classifier<'_>, method: &Method) -> Option<Classification> {
    let output = classifier.model.message(&method.output_type)?;
    output.fields.iter().find_map(|field| {
        let entity = classifier.registry.resolve(field.repeated_message()?)?;
        Some(Classification::list(&entity.name, &field.name))
    })
}

/// Classifications of one service's methods, in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceClassification {
    pub service: String,
    pub methods: Vec<MethodClassification>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodClassification {
    pub method: String,
    pub input_type: String,
    pub output_type: String,

    #[serde(flatten)]
    pub classification: Classification,
}

/// Classifies the methods of one schema file.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    model: &'a SchemaModel,
    registry: &'a EntityRegistry,
    config: &'a GeneratorConfig,
}

impl<'a> Classifier<'a> {
    pub fn new(
        model: &'a SchemaModel,
        registry: &'a EntityRegistry,
        config: &'a GeneratorConfig,
    ) -> Self {
        Self {
            model,
            registry,
            config,
        }
    }

    /// The ordered rule list
    pub fn rules(&self) -> &'static [Rule] {
        RULES
    }

    /// Assign exactly one pattern to `method`. Never fails.
    pub fn classify(&self, method: &Method) -> Classification {
        let (rule, classification) = RULES
            .iter()
            .find_map(|rule| rule.apply(self, method).map(|c| (rule.name, c)))
            .unwrap_or(("fallback", Classification::unclassified()));

        tracing::debug!(
            file = %self.model.file,
            method = %method.name,
            rule,
            classification = %classification,
            "method classified"
        );
        classification
    }

    /// Classify every method of every service in the model
    pub fn classify_model(&self) -> Vec<ServiceClassification> {
        self.model
            .services
            .iter()
            .map(|service| ServiceClassification {
                service: service.name.clone(),
                methods: service
                    .methods
                    .iter()
                    .map(|method| MethodClassification {
                        method: method.name.clone(),
                        input_type: method.input_type.clone(),
                        output_type: method.output_type.clone(),
                        classification: self.classify(method),
                    })
                    .collect(),
            })
            .collect()
    }

    /// Find the first string input field naming some entity's id.
    ///
    /// Fields are scanned in declaration order and, per field, entities in
    /// registry order. A field naming several entities goes through the
    /// tie-break; under [`TieBreak::Unclassified`] it ends the search.
    fn match_id_field<'m>(
        &self,
        method: &Method,
        input: &'m Message,
    ) -> Option<(&'m str, &'a Entity)> {
        for field in input.fields.iter().filter(|f| f.kind.is_string()) {
            let mut candidates = self
                .registry
                .iter()
                .filter(|e| e.matches_id_field(&field.name));
            let Some(first) = candidates.next() else {
                continue;
            };
            let others: Vec<&str> = candidates.map(|e| e.name.as_str()).collect();
            if others.is_empty() {
                return Some((&field.name, first));
            }

            match self.config.tie_break {
                TieBreak::FirstDeclared => {
                    tracing::warn!(
                        method = %method.name,
                        field = %field.name,
                        chosen = %first.name,
                        ?others,
                        "ambiguous id field, first declared entity wins"
                    );
                    return Some((&field.name, first));
                }
                TieBreak::Unclassified => {
                    tracing::warn!(
                        method = %method.name,
                        field = %field.name,
                        first = %first.name,
                        ?others,
                        "ambiguous id field, rule skipped"
                    );
                    return None;
                }
            }
        }
        None
    }
}
