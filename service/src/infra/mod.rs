//! Infrastructure layer.

pub mod database;
pub mod generator;
pub mod rules;

pub use self::{
    database::Database,
    generator::{Generator, UuidGenerator},
    rules::{Rules, StaticRules},
};
#[cfg(feature = "memory")]
pub use self::database::{memory, Memory};
