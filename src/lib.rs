//! HBnB object store and command console.
//!
//! Every live object is an [`models::Entity`] of some [`models::Kind`], held by
//! a [`storage::FileStorage`] that persists the whole set to one JSON file.
//! The [`console`] module interprets textual commands, either shell style
//! (`show User 1234`) or call style (`User.show("1234")`), against that store.

pub mod config;
pub mod console;
pub mod error;
pub mod models;
pub mod storage;
