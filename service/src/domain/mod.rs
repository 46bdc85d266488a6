//! Domain definitions.

pub mod budget;
pub mod criterion;
pub mod document;
pub mod item;
pub mod lot;
pub mod organization;
pub mod record;
pub mod tender;

use derive_more::{Display, Error};

pub use self::{
    budget::Planning,
    criterion::{Conversion, Criterion},
    document::Document,
    item::Item,
    lot::Lot,
    organization::{Person, ProcuringEntity},
    record::Record,
    tender::Tender,
};

/// Required attribute absent while building a domain entity.
#[derive(Clone, Copy, Debug, Display, Error, Eq, PartialEq)]
#[display("`{_0}` attribute is required")]
pub struct MissingAttribute(#[error(not(source))] pub &'static str);
