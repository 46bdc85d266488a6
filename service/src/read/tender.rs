//! [`Tender`]-related read definitions.

use serde::Serialize;

use crate::domain::{
    budget::Planning,
    record::{Cpid, CreationDateTime, Ocid},
    Record, Tender,
};
#[cfg(doc)]
use crate::domain::record::{Owner, Token};

/// Response view of a [`Record`].
///
/// Unlike the [`Record`] itself, omits its [`Owner`] and [`Token`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    /// [`Cpid`] of the process.
    pub cpid: Cpid,

    /// [`Ocid`] of the stage.
    pub ocid: Ocid,

    /// [`DateTime`] when the [`Record`] was created.
    ///
    /// [`DateTime`]: common::DateTime
    pub created_at: CreationDateTime,

    /// [`Planning`] section of the process.
    pub planning: Planning,

    /// [`Tender`] of the stage.
    pub tender: Tender,
}

impl From<Record> for View {
    fn from(record: Record) -> Self {
        let Record {
            cpid,
            ocid,
            owner: _,
            token: _,
            created_at,
            planning,
            tender,
        } = record;

        Self {
            cpid,
            ocid,
            created_at,
            planning,
            tender,
        }
    }
}

impl From<&Record> for View {
    fn from(record: &Record) -> Self {
        record.clone().into()
    }
}
