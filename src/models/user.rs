use super::{Field, FieldType};

/// Account holder. Owns places and writes reviews.
pub const USER_FIELDS: &[Field] = &[
    Field::new("email", FieldType::Str),
    Field::new("password", FieldType::Str),
    Field::new("first_name", FieldType::Str),
    Field::new("last_name", FieldType::Str),
];
