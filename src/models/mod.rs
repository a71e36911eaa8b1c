//! Domain model for the HBnB store.
//!
//! # Core Concepts
//!
//! - [`Entity`]: the single record type. Every live object is an entity with an
//!   id, creation/update timestamps and an open map of extra attributes.
//! - [`Kind`]: the closed set of entity kinds (`BaseModel`, `User`, `State`,
//!   `City`, `Amenity`, `Place`, `Review`). A kind adds no behavior; it only
//!   names the entity and declares typed fields.
//! - [`Field`]: a declared field. Declared fields read as their type's default
//!   until set, and values written through `update` are coerced to the
//!   declared [`FieldType`].

mod amenity;
mod city;
mod entity;
mod field;
mod kind;
mod place;
mod review;
mod state;
mod user;

pub use amenity::*;
pub use city::*;
pub use entity::*;
pub use field::*;
pub use kind::*;
pub use place::*;
pub use review::*;
pub use state::*;
pub use user::*;
