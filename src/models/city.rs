use super::{Field, FieldType};

/// A city, linked to its state through `state_id`.
pub const CITY_FIELDS: &[Field] = &[
    Field::new("state_id", FieldType::Str),
    Field::new("name", FieldType::Str),
];
