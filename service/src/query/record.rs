//! [`Query`] collection related to a single [`Record`].

use common::operations::By;

use crate::domain::{
    record::{Cpid, Ocid},
    Record,
};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Record`] by its [`Cpid`] and [`Ocid`].
pub type ById = DatabaseQuery<By<Option<Record>, (Cpid, Ocid)>>;
