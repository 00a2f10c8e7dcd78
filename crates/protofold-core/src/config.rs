//! Generator configuration

use crate::error::{SchemaError, SchemaResult};
use crate::model::simple_name;
use serde::{Deserialize, Serialize};

/// Field numbers protobuf reserves for its own implementation.
const RESERVED_FIELD_NUMBERS: std::ops::RangeInclusive<u32> = 19000..=19999;

/// Which declarations become entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntitySelection {
    /// Only declarations carrying the entity annotation
    #[default]
    Annotated,

    /// Annotated declarations plus any declaration with a field named `id`
    /// (case-insensitive).
    ///
    /// A `*_id` field alone does not qualify: request messages carry foreign
    /// keys such as `user_id`, and selecting them would make every such field
    /// match two entities.
    IdShaped,
}

/// How an input field that matches several entities' identifiers is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// The entity declared first in the schema file wins
    #[default]
    FirstDeclared,

    /// The match is discarded, leaving the method to later rules or Unclassified
    Unclassified,
}

/// Configuration for one analysis run
///
/// Every field has a default, so `{}` (or an empty file) is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Metadata field number of the entity annotation
    #[serde(default = "default_entity_extension_number")]
    pub entity_extension_number: u32,

    #[serde(default)]
    pub entity_selection: EntitySelection,

    /// Type names (simple, unqualified) that mean "no payload"
    #[serde(default = "default_empty_types")]
    pub empty_types: Vec<String>,

    #[serde(default)]
    pub tie_break: TieBreak,

    /// Indent unit handed to emitters
    #[serde(default = "default_indent_unit")]
    pub indent_unit: String,

    /// Default log level for the CLI
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_entity_extension_number() -> u32 {
    50000
}

fn default_empty_types() -> Vec<String> {
    vec!["Empty".to_string()]
}

fn default_indent_unit() -> String {
    "\t".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            entity_extension_number: default_entity_extension_number(),
            entity_selection: EntitySelection::default(),
            empty_types: default_empty_types(),
            tie_break: TieBreak::default(),
            indent_unit: default_indent_unit(),
            log_level: default_log_level(),
        }
    }
}

impl GeneratorConfig {
    /// Create a configuration with every default
    pub fn new() -> Self {
        Self::default()
    }

    /// Create configuration from JSON bytes; empty input yields the defaults
    pub fn from_json(bytes: &[u8]) -> SchemaResult<Self> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn with_entity_selection(mut self, selection: EntitySelection) -> Self {
        self.entity_selection = selection;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_entity_extension_number(mut self, number: u32) -> Self {
        self.entity_extension_number = number;
        self
    }

    /// Check values serde cannot check on its own
    pub fn validate(&self) -> SchemaResult<()> {
        let n = self.entity_extension_number;
        if n == 0 || n > protofold_wire::MAX_FIELD_NUMBER {
            return Err(SchemaError::ConfigError(format!(
                "entity_extension_number {n} is outside 1..={}",
                protofold_wire::MAX_FIELD_NUMBER
            )));
        }
        if RESERVED_FIELD_NUMBERS.contains(&n) {
            return Err(SchemaError::ConfigError(format!(
                "entity_extension_number {n} is in the reserved range 19000..=19999"
            )));
        }
        if self.empty_types.iter().all(|t| t.trim().is_empty()) {
            return Err(SchemaError::ConfigError(
                "empty_types must name at least one type".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether `type_ref` is a no-payload marker.
    ///
    /// Matching is on the simple name, so `Empty`, `google.protobuf.Empty` and
    /// `.google.protobuf.Empty` are equivalent.
    pub fn is_empty_type(&self, type_ref: &str) -> bool {
        let name = simple_name(type_ref);
        self.empty_types.iter().any(|t| simple_name(t) == name)
    }
}
