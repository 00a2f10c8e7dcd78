//! Input descriptors handed over by a schema loader
//!
//! These mirror the parts of a compiled protobuf file descriptor the analysis
//! needs: declarations, fields with kinds and referenced type names, services,
//! and each declaration's raw option bytes. Option bytes travel as hex strings
//! in JSON.
//!
//! # Example
//!
//! ```json
//! {
//!   "name": "users.proto",
//!   "package": "acme.users.v1",
//!   "messages": [
//!     {
//!       "name": "User",
//!       "options": "82b51800",
//!       "fields": [
//!         { "name": "id", "number": 1, "kind": "string" },
//!         { "name": "email", "number": 2, "kind": "string" }
//!       ]
//!     }
//!   ],
//!   "services": [
//!     {
//!       "name": "UserService",
//!       "methods": [
//!         { "name": "GetUser", "input_type": "GetUserRequest", "output_type": "User" }
//!       ]
//!     }
//!   ]
//! }
//! ```

use crate::error::SchemaResult;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path};

/// One schema file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// File name as the loader knows it (e.g., "acme/users/v1/users.proto")
    pub name: String,

    #[serde(default)]
    pub package: String,

    #[serde(default)]
    pub messages: Vec<MessageDescriptor>,

    #[serde(default)]
    pub enums: Vec<EnumDescriptor>,

    #[serde(default)]
    pub services: Vec<ServiceDescriptor>,
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    pub fn with_message(mut self, message: MessageDescriptor) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_enum(mut self, descriptor: EnumDescriptor) -> Self {
        self.enums.push(descriptor);
        self
    }

    pub fn with_service(mut self, service: ServiceDescriptor) -> Self {
        self.services.push(service);
        self
    }

    /// Parse one file descriptor from JSON bytes
    pub fn from_json(bytes: &[u8]) -> SchemaResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Parse a JSON document holding either one file descriptor or an array of them
    pub fn from_json_set(bytes: &[u8]) -> SchemaResult<Vec<Self>> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            Many(Vec<FileDescriptor>),
            One(Box<FileDescriptor>),
        }

        Ok(match serde_json::from_slice(bytes)? {
            OneOrMany::Many(files) => files,
            OneOrMany::One(file) => vec![*file],
        })
    }

    /// Serialize to JSON bytes
    pub fn to_json(&self) -> SchemaResult<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// The file name without directories or extension, for emitters naming outputs
    pub fn stem(&self) -> &str {
        Path::new(&self.name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.name)
    }

    /// The file name without extension, directories kept, so outputs mirror
    /// the schema layout and files sharing a stem stay apart.
    ///
    /// Root, `.` and `..` components are dropped so the result is always
    /// relative.
    pub fn output_base(&self) -> String {
        let base = Path::new(&self.name)
            .with_extension("")
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => part.to_str(),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");
        if base.is_empty() {
            self.stem().to_string()
        } else {
            base
        }
    }
}

/// A message declaration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageDescriptor {
    pub name: String,

    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,

    /// Serialized `MessageOptions`, extensions included
    #[serde(default, with = "hex_bytes", skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<u8>,
}

impl MessageDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_options(mut self, options: impl Into<Vec<u8>>) -> Self {
        self.options = options.into();
        self
    }
}

/// Scalar and reference kinds a field may have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKindTag {
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
    Enum,
    Message,
}

/// A field of a message declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,

    #[serde(default)]
    pub number: u32,

    pub kind: FieldKindTag,

    #[serde(default)]
    pub repeated: bool,

    /// Referenced type for `enum` and `message` kinds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,

    #[serde(default, with = "hex_bytes", skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<u8>,
}

impl FieldDescriptor {
    /// A scalar field
    pub fn new(name: impl Into<String>, kind: FieldKindTag) -> Self {
        Self {
            name: name.into(),
            number: 0,
            kind,
            repeated: false,
            type_name: None,
            options: Vec::new(),
        }
    }

    /// A field referencing a message type
    pub fn message(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            ..Self::new(name, FieldKindTag::Message)
        }
    }

    /// A field referencing an enum type
    pub fn enumeration(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            ..Self::new(name, FieldKindTag::Enum)
        }
    }

    pub fn with_number(mut self, number: u32) -> Self {
        self.number = number;
        self
    }

    pub fn repeated(mut self) -> Self {
        self.repeated = true;
        self
    }

    pub fn with_options(mut self, options: impl Into<Vec<u8>>) -> Self {
        self.options = options.into();
        self
    }
}

/// An enum declaration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnumDescriptor {
    pub name: String,

    #[serde(default)]
    pub values: Vec<EnumValueDescriptor>,
}

impl EnumDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
        }
    }

    pub fn with_value(mut self, name: impl Into<String>, number: i32) -> Self {
        self.values.push(EnumValueDescriptor {
            name: name.into(),
            number,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValueDescriptor {
    pub name: String,
    pub number: i32,
}

/// A service declaration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub name: String,

    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,

    #[serde(default, with = "hex_bytes", skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<u8>,
}

impl ServiceDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_options(mut self, options: impl Into<Vec<u8>>) -> Self {
        self.options = options.into();
        self
    }
}

/// An RPC method of a service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,

    pub input_type: String,

    pub output_type: String,

    #[serde(default)]
    pub client_streaming: bool,

    #[serde(default)]
    pub server_streaming: bool,

    #[serde(default, with = "hex_bytes", skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<u8>,
}

impl MethodDescriptor {
    pub fn new(
        name: impl Into<String>,
        input_type: impl Into<String>,
        output_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            input_type: input_type.into(),
            output_type: output_type.into(),
            ..Default::default()
        }
    }

    pub fn with_options(mut self, options: impl Into<Vec<u8>>) -> Self {
        self.options = options.into();
        self
    }
}

/// Hex string (de)serialization for option blobs
mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        hex::decode(text.trim()).map_err(serde::de::Error::custom)
    }
}
