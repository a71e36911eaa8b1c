use super::{Field, FieldType};

pub const AMENITY_FIELDS: &[Field] = &[Field::new("name", FieldType::Str)];
