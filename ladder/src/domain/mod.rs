//! Domain layer
//!
//! Contains pure business models with no storage dependencies.
//! - `entities`: Players, ratings, ladder cycles and tournaments
//! - `ports`: Repository traits implemented by the caller's data store

pub mod entities;
pub mod ports;
