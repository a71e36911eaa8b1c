use super::{Field, FieldType};

/// A user's review of a place.
pub const REVIEW_FIELDS: &[Field] = &[
    Field::new("place_id", FieldType::Str),
    Field::new("user_id", FieldType::Str),
    Field::new("text", FieldType::Str),
];
