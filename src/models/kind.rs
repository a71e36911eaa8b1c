use std::fmt;

use super::{Entity, Field, AMENITY_FIELDS, CITY_FIELDS, PLACE_FIELDS, REVIEW_FIELDS, STATE_FIELDS, USER_FIELDS};

/// The concrete type of an entity.
///
/// Kinds are looked up by name when commands and stored records refer to them,
/// so `as_str`/`from_str` are the registry: every kind name the console or the
/// storage file can mention resolves through here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    BaseModel,
    User,
    State,
    City,
    Amenity,
    Place,
    Review,
}

impl Kind {
    pub const ALL: [Kind; 7] = [
        Self::BaseModel,
        Self::User,
        Self::State,
        Self::City,
        Self::Amenity,
        Self::Place,
        Self::Review,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BaseModel => "BaseModel",
            Self::User => "User",
            Self::State => "State",
            Self::City => "City",
            Self::Amenity => "Amenity",
            Self::Place => "Place",
            Self::Review => "Review",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "BaseModel" => Some(Self::BaseModel),
            "User" => Some(Self::User),
            "State" => Some(Self::State),
            "City" => Some(Self::City),
            "Amenity" => Some(Self::Amenity),
            "Place" => Some(Self::Place),
            "Review" => Some(Self::Review),
            _ => None,
        }
    }

    /// Fields declared by this kind, in declaration order.
    pub fn fields(&self) -> &'static [Field] {
        match self {
            Self::BaseModel => &[],
            Self::User => USER_FIELDS,
            Self::State => STATE_FIELDS,
            Self::City => CITY_FIELDS,
            Self::Amenity => AMENITY_FIELDS,
            Self::Place => PLACE_FIELDS,
            Self::Review => REVIEW_FIELDS,
        }
    }

    pub fn field(&self, name: &str) -> Option<&'static Field> {
        self.fields().iter().find(|f| f.name == name)
    }

    /// Construct a fresh entity of this kind.
    pub fn instantiate(self) -> Entity {
        Entity::new(self)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
