//! Shared schema fixtures for unit tests

use crate::schema::{
    FieldDescriptor, FieldKindTag, FileDescriptor, MessageDescriptor, MethodDescriptor,
    ServiceDescriptor,
};

pub const ENTITY_EXTENSION: u32 = 50000;

pub fn varint(mut value: u64) -> Vec<u8> {
    let mut out = Vec::new();
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return out;
        }
        out.push(byte | 0x80);
    }
}

/// A length-delimited field
pub fn bytes_field(field_number: u32, payload: &[u8]) -> Vec<u8> {
    let mut out = varint(u64::from(field_number) << 3 | 2);
    out.extend(varint(payload.len() as u64));
    out.extend_from_slice(payload);
    out
}

/// Options blob carrying the entity annotation with `payload`
pub fn entity_options(payload: &[u8]) -> Vec<u8> {
    bytes_field(ENTITY_EXTENSION, payload)
}

/// Entity annotation payload with optional overrides
pub fn entity_payload(collection: Option<&str>, id_field: Option<&str>) -> Vec<u8> {
    let mut payload = Vec::new();
    if let Some(collection) = collection {
        payload.extend(bytes_field(1, collection.as_bytes()));
    }
    if let Some(id_field) = id_field {
        payload.extend(bytes_field(2, id_field.as_bytes()));
    }
    payload
}

pub fn string(name: &str) -> FieldDescriptor {
    FieldDescriptor::new(name, FieldKindTag::String)
}

pub fn int32(name: &str) -> FieldDescriptor {
    FieldDescriptor::new(name, FieldKindTag::Int32)
}

pub fn bytes(name: &str) -> FieldDescriptor {
    FieldDescriptor::new(name, FieldKindTag::Bytes)
}

pub fn entity(name: &str, fields: Vec<FieldDescriptor>) -> MessageDescriptor {
    message(name, fields).with_options(entity_options(&[]))
}

pub fn message(name: &str, fields: Vec<FieldDescriptor>) -> MessageDescriptor {
    fields
        .into_iter()
        .enumerate()
        .fold(MessageDescriptor::new(name), |m, (i, f)| {
            m.with_field(f.with_number(i as u32 + 1))
        })
}

pub fn rpc(name: &str, input: &str, output: &str) -> MethodDescriptor {
    MethodDescriptor::new(name, input, output)
}

/// The canonical user service: Get, List, Delete and one method no rule covers
pub fn users_file() -> FileDescriptor {
    FileDescriptor::new("acme/users/v1/users.proto")
        .with_package("acme.users.v1")
        .with_message(entity(
            "User",
            vec![string("id"), string("email"), string("display_name")],
        ))
        .with_message(message("GetUserRequest", vec![string("user_id")]))
        .with_message(message("DeleteUserRequest", vec![string("user_id")]))
        .with_message(message(
            "ListUsersRequest",
            vec![int32("page_size"), string("page_token")],
        ))
        .with_message(message(
            "ListUsersResponse",
            vec![
                FieldDescriptor::message("users", "User").repeated(),
                string("next_page_token"),
            ],
        ))
        .with_message(message("ExportUsersRequest", vec![string("format")]))
        .with_message(message("ExportUsersResponse", vec![bytes("payload")]))
        .with_service(
            ServiceDescriptor::new("UserService")
                .with_method(rpc("GetUser", "GetUserRequest", "User"))
                .with_method(rpc("ListUsers", "ListUsersRequest", "ListUsersResponse"))
                .with_method(rpc(
                    "DeleteUser",
                    "DeleteUserRequest",
                    ".google.protobuf.Empty",
                ))
                .with_method(rpc(
                    "ExportUsers",
                    "ExportUsersRequest",
                    "ExportUsersResponse",
                )),
        )
}
