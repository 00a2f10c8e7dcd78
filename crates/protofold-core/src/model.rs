//! Typed in-memory schema model
//!
//! The model is a validated, read-only view over one [`FileDescriptor`].
//! Field kinds carry their referenced type, declarations keep their schema
//! order, and message lookups accept both simple and fully-qualified names.
//!
//! # Structure
//!
//! - [`SchemaModel`]: messages, enums and services of one file
//! - [`Message`]: ordered [`Field`]s plus the raw option blob
//! - [`Service`] / [`Method`]: RPC surface with input/output type references

use crate::error::{SchemaError, SchemaResult};
use crate::schema::{FieldDescriptor, FieldKindTag, FileDescriptor, MessageDescriptor};
use protofold_wire::ExtensionValue;
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// The last `.`-separated segment of a type reference.
///
/// # Examples
///
/// ```
/// use protofold_core::model::simple_name;
///
/// assert_eq!(simple_name(".google.protobuf.Empty"), "Empty");
/// assert_eq!(simple_name("acme.users.v1.User"), "User");
/// assert_eq!(simple_name("User"), "User");
/// ```
pub fn simple_name(type_ref: &str) -> &str {
    type_ref.rsplit('.').next().unwrap_or(type_ref)
}

/// Field kind, with the referenced type for enum and message kinds
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "type_name", rename_all = "lowercase")]
pub enum FieldKind {
    Bool,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Float,
    Double,
    String,
    Bytes,
    Enum(String),
    Message(String),
}

impl FieldKind {
    /// Combine a kind tag with its referenced type name.
    ///
    /// Returns `None` for an enum or message tag without a (non-blank) type name.
    pub fn from_tag(tag: FieldKindTag, type_name: Option<&str>) -> Option<Self> {
        let referenced = || {
            type_name
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from)
        };
        Some(match tag {
            FieldKindTag::Bool => FieldKind::Bool,
            FieldKindTag::Int32 => FieldKind::Int32,
            FieldKindTag::Int64 => FieldKind::Int64,
            FieldKindTag::Uint32 => FieldKind::Uint32,
            FieldKindTag::Uint64 => FieldKind::Uint64,
            FieldKindTag::Sint32 => FieldKind::Sint32,
            FieldKindTag::Sint64 => FieldKind::Sint64,
            FieldKindTag::Fixed32 => FieldKind::Fixed32,
            FieldKindTag::Fixed64 => FieldKind::Fixed64,
            FieldKindTag::Sfixed32 => FieldKind::Sfixed32,
            FieldKindTag::Sfixed64 => FieldKind::Sfixed64,
            FieldKindTag::Float => FieldKind::Float,
            FieldKindTag::Double => FieldKind::Double,
            FieldKindTag::String => FieldKind::String,
            FieldKindTag::Bytes => FieldKind::Bytes,
            FieldKindTag::Enum => FieldKind::Enum(referenced()?),
            FieldKindTag::Message => FieldKind::Message(referenced()?),
        })
    }

    pub fn is_string(&self) -> bool {
        matches!(self, FieldKind::String)
    }

    /// The referenced message type, for message kinds
    pub fn message_type(&self) -> Option<&str> {
        match self {
            FieldKind::Message(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scalar = match self {
            FieldKind::Bool => "bool",
            FieldKind::Int32 => "int32",
            FieldKind::Int64 => "int64",
            FieldKind::Uint32 => "uint32",
            FieldKind::Uint64 => "uint64",
            FieldKind::Sint32 => "sint32",
            FieldKind::Sint64 => "sint64",
            FieldKind::Fixed32 => "fixed32",
            FieldKind::Fixed64 => "fixed64",
            FieldKind::Sfixed32 => "sfixed32",
            FieldKind::Sfixed64 => "sfixed64",
            FieldKind::Float => "float",
            FieldKind::Double => "double",
            FieldKind::String => "string",
            FieldKind::Bytes => "bytes",
            FieldKind::Enum(name) | FieldKind::Message(name) => return f.write_str(name),
        };
        f.write_str(scalar)
    }
}

/// A field in a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: String,

    pub number: u32,

    #[serde(flatten)]
    pub kind: FieldKind,

    pub repeated: bool,

    #[serde(skip)]
    pub options: Vec<u8>,
}

impl Field {
    /// A repeated field whose element is a message
    pub fn repeated_message(&self) -> Option<&str> {
        if self.repeated {
            self.kind.message_type()
        } else {
            None
        }
    }

    /// Lazy view of metadata field `field_number` in this field's options.
    pub fn extension(&self, field_number: u32) -> ExtensionValue<'_> {
        ExtensionValue::new(&self.options, field_number)
    }
}

/// A message declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub name: String,

    /// Fields in declaration order.
    pub fields: Vec<Field>,

    /// Position among the file's messages.
    pub index: usize,

    #[serde(skip)]
    pub options: Vec<u8>,
}

impl Message {
    /// Look up a field by exact name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Lazy view of metadata field `field_number` in this message's options.
    pub fn extension(&self, field_number: u32) -> ExtensionValue<'_> {
        ExtensionValue::new(&self.options, field_number)
    }
}

/// An enum declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Enum {
    pub name: String,
    pub values: Vec<String>,
}

/// An RPC method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Method {
    pub name: String,
    pub input_type: String,
    pub output_type: String,
    pub client_streaming: bool,
    pub server_streaming: bool,

    #[serde(skip)]
    pub options: Vec<u8>,
}

impl Method {
    /// Lazy view of metadata field `field_number` in this method's options.
    pub fn extension(&self, field_number: u32) -> ExtensionValue<'_> {
        ExtensionValue::new(&self.options, field_number)
    }
}

/// A service declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Service {
    pub name: String,
    pub methods: Vec<Method>,

    #[serde(skip)]
    pub options: Vec<u8>,
}

impl Service {
    /// Look up a method by exact name
    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Lazy view of metadata field `field_number` in this service's options.
    pub fn extension(&self, field_number: u32) -> ExtensionValue<'_> {
        ExtensionValue::new(&self.options, field_number)
    }
}

/// Validated model of one schema file.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaModel {
    pub file: String,
    pub package: String,
    pub messages: Vec<Message>,
    pub enums: Vec<Enum>,
    pub services: Vec<Service>,

    #[serde(skip)]
    messages_by_name: HashMap<String, usize>,
}

impl SchemaModel {
    /// Build the model for one file.
    ///
    /// # Errors
    ///
    /// Fails when a declaration has an empty name, when two messages or enums
    /// share a name, when a message has two fields of the same name, or when an
    /// enum or message field has no `type_name`.
    pub fn build(file: &FileDescriptor) -> SchemaResult<Self> {
        let mut type_names: HashMap<&str, &'static str> = HashMap::new();
        let mut messages_by_name = HashMap::new();
        let mut messages = Vec::with_capacity(file.messages.len());

        for (index, descriptor) in file.messages.iter().enumerate() {
            let message = build_message(descriptor, index)?;
            claim_type_name(&mut type_names, &descriptor.name, "message")?;
            messages_by_name.insert(message.name.clone(), index);
            messages.push(message);
        }

        let mut enums = Vec::with_capacity(file.enums.len());
        for descriptor in &file.enums {
            require_name(&descriptor.name, "enum")?;
            claim_type_name(&mut type_names, &descriptor.name, "enum")?;
            enums.push(Enum {
                name: descriptor.name.clone(),
                values: descriptor.values.iter().map(|v| v.name.clone()).collect(),
            });
        }

        let mut service_names = HashSet::new();
        let mut services = Vec::with_capacity(file.services.len());
        for descriptor in &file.services {
            require_name(&descriptor.name, "service")?;
            if !service_names.insert(descriptor.name.as_str()) {
                return Err(SchemaError::DuplicateDeclaration(format!(
                    "service {}",
                    descriptor.name
                )));
            }

            let mut methods = Vec::with_capacity(descriptor.methods.len());
            for method in &descriptor.methods {
                let qualified = format!("{}.{}", descriptor.name, method.name);
                require_name(&method.name, &format!("method in service {}", descriptor.name))?;
                if method.input_type.trim().is_empty() || method.output_type.trim().is_empty() {
                    return Err(SchemaError::InvalidDeclaration(format!(
                        "method {qualified} is missing an input or output type"
                    )));
                }
                if methods.iter().any(|m: &Method| m.name == method.name) {
                    return Err(SchemaError::DuplicateDeclaration(format!("method {qualified}")));
                }
                methods.push(Method {
                    name: method.name.clone(),
                    input_type: method.input_type.clone(),
                    output_type: method.output_type.clone(),
                    client_streaming: method.client_streaming,
                    server_streaming: method.server_streaming,
                    options: method.options.clone(),
                });
            }

            services.push(Service {
                name: descriptor.name.clone(),
                methods,
                options: descriptor.options.clone(),
            });
        }

        Ok(Self {
            file: file.name.clone(),
            package: file.package.clone(),
            messages,
            enums,
            services,
            messages_by_name,
        })
    }

    /// Resolve a type reference to a message declared in this file.
    ///
    /// Both `User` and `.acme.users.v1.User` find `User`; scalar names and
    /// types declared elsewhere return `None`.
    pub fn message(&self, type_ref: &str) -> Option<&Message> {
        self.messages_by_name
            .get(simple_name(type_ref))
            .and_then(|&index| self.messages.get(index))
    }

    /// Every method of every service, in declaration order
    pub fn methods(&self) -> impl Iterator<Item = (&Service, &Method)> {
        self.services
            .iter()
            .flat_map(|s| s.methods.iter().map(move |m| (s, m)))
    }
}

fn require_name(name: &str, what: &str) -> SchemaResult<()> {
    if name.trim().is_empty() {
        return Err(SchemaError::InvalidDeclaration(format!(
            "{what} has an empty name"
        )));
    }
    Ok(())
}

fn claim_type_name<'a>(
    seen: &mut HashMap<&'a str, &'static str>,
    name: &'a str,
    what: &'static str,
) -> SchemaResult<()> {
    match seen.entry(name) {
        Entry::Occupied(previous) => Err(SchemaError::DuplicateDeclaration(format!(
            "{what} {name} (already declared as {})",
            previous.get()
        ))),
        Entry::Vacant(slot) => {
            slot.insert(what);
            Ok(())
        }
    }
}

fn build_message(descriptor: &MessageDescriptor, index: usize) -> SchemaResult<Message> {
    require_name(&descriptor.name, "message")?;

    let mut fields: Vec<Field> = Vec::with_capacity(descriptor.fields.len());
    for field in &descriptor.fields {
        require_name(&field.name, &format!("field in message {}", descriptor.name))?;
        if fields.iter().any(|f| f.name == field.name) {
            return Err(SchemaError::DuplicateDeclaration(format!(
                "field {}.{}",
                descriptor.name, field.name
            )));
        }
        fields.push(build_field(&descriptor.name, field)?);
    }

    Ok(Message {
        name: descriptor.name.clone(),
        fields,
        index,
        options: descriptor.options.clone(),
    })
}

fn build_field(message: &str, field: &FieldDescriptor) -> SchemaResult<Field> {
    let kind = FieldKind::from_tag(field.kind, field.type_name.as_deref()).ok_or_else(|| {
        SchemaError::MissingTypeName {
            message: message.to_string(),
            field: field.name.clone(),
        }
    })?;

    Ok(Field {
        name: field.name.clone(),
        number: field.number,
        kind,
        repeated: field.repeated,
        options: field.options.clone(),
    })
}
