//! Naming convention utilities for code generation.
//!
//! Schema declarations arrive in `PascalCase` (messages, services, methods) and
//! `snake_case` (fields). Emitters convert between the two constantly, so the
//! conversions live next to the fragment primitives.
//!
//! # Supported Conversions
//!
//! | Input | Function | Output |
//! |-------|----------|--------|
//! | `PascalCase` | [`to_snake_case`] | `pascal_case` |
//! | `snake_case` | [`to_camel_case`] | `snakeCase` |
//! | `snake_case` | [`to_pascal_case`] | `SnakeCase` |
//! | `word` | [`capitalize`] | `Word` |
//! | `Word` | [`lower_first`] | `word` |
//! | `UserProfile` | [`collection_name`] | `userprofiles` |

/// Convert PascalCase or camelCase to snake_case.
///
/// An underscore is inserted before every upper-case letter except the first
/// character; runs of capitals are not collapsed.
///
/// # Examples
///
/// ```
/// use protofold_fragment::naming::to_snake_case;
///
/// assert_eq!(to_snake_case("UserProfile"), "user_profile");
/// assert_eq!(to_snake_case("createdAt"), "created_at");
/// assert_eq!(to_snake_case("already_snake"), "already_snake");
/// ```
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);

    for (i, c) in s.chars().enumerate() {
        if i > 0 && c.is_uppercase() {
            result.push('_');
        }
        result.extend(c.to_lowercase());
    }

    result
}

/// Convert snake_case to camelCase.
///
/// # Examples
///
/// ```
/// use protofold_fragment::naming::to_camel_case;
///
/// assert_eq!(to_camel_case("hello_world"), "helloWorld");
/// assert_eq!(to_camel_case("display_name"), "displayName");
/// assert_eq!(to_camel_case("already"), "already");
/// ```
pub fn to_camel_case(s: &str) -> String {
    let mut result = String::new();
    let mut capitalize_next = false;

    for c in s.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

/// Convert a string to PascalCase.
///
/// Handles snake_case, kebab-case, and already-capitalized input.
///
/// # Examples
///
/// ```
/// use protofold_fragment::naming::to_pascal_case;
///
/// assert_eq!(to_pascal_case("user_id"), "UserId");
/// assert_eq!(to_pascal_case("list-users"), "ListUsers");
/// assert_eq!(to_pascal_case("User"), "User");
/// ```
pub fn to_pascal_case(s: &str) -> String {
    s.split(['-', '_']).map(capitalize).collect()
}

/// Capitalize the first letter of a string.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Lower-case the first letter of a string.
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
    }
}

/// Storage collection name for an entity: the name lower-cased with an `s`
/// appended.
///
/// This is deliberately not a general pluralizer (`Category` becomes
/// `categorys`); schemas that care set an explicit collection instead.
///
/// # Examples
///
/// ```
/// use protofold_fragment::naming::collection_name;
///
/// assert_eq!(collection_name("User"), "users");
/// assert_eq!(collection_name("UserProfile"), "userprofiles");
/// ```
pub fn collection_name(entity: &str) -> String {
    let mut name = entity.to_lowercase();
    name.push('s');
    name
}
