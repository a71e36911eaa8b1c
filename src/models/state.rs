use super::{Field, FieldType};

pub const STATE_FIELDS: &[Field] = &[Field::new("name", FieldType::Str)];
