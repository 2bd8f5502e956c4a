//! Core domain model for foodquest.
//!
//! This crate defines the restaurant catalog record and the recommendation
//! row handed to presentation layers, the parse-or-default field rules
//! applied at catalog load, CSV catalog loading, the SQLite user store and
//! the points/badge progression built on top of it.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod catalog;
pub mod error;
pub mod model;
pub mod parse;
pub mod password;
pub mod progress;
pub mod schema;

pub use catalog::{find_restaurant, load_catalog, read_catalog};
pub use error::{Error, Result};
