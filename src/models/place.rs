use super::{Field, FieldType};

/// A rentable place.
///
/// The only kind with numeric fields, so it is where `update` coercion
/// actually changes the stored type. `amenity_ids` holds the ids of
/// [`Kind::Amenity`](super::Kind::Amenity) entities.
pub const PLACE_FIELDS: &[Field] = &[
    Field::new("city_id", FieldType::Str),
    Field::new("user_id", FieldType::Str),
    Field::new("name", FieldType::Str),
    Field::new("description", FieldType::Str),
    Field::new("number_rooms", FieldType::Int),
    Field::new("number_bathrooms", FieldType::Int),
    Field::new("max_guest", FieldType::Int),
    Field::new("price_by_night", FieldType::Int),
    Field::new("latitude", FieldType::Float),
    Field::new("longitude", FieldType::Float),
    Field::new("amenity_ids", FieldType::List),
];
