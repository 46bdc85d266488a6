//! In-memory [`Database`] implementation.

use std::{collections::HashMap, sync::Arc};

use common::operations::{By, Insert, Select, Update};
use derive_more::{Display, Error as StdError, From};
use tokio::sync::RwLock;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        record::{Cpid, Ocid},
        Record,
    },
    infra::{database, Database},
};

/// In-memory [`Database`] keeping [`Record`]s as serialized documents.
///
/// Every save replaces the whole document at once.
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// Serialized [`Record`]s by their keys.
    records: Arc<RwLock<HashMap<(Cpid, Ocid), String>>>,
}

impl Memory {
    /// Creates a new empty [`Memory`] database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Database<Select<By<Option<Record>, (Cpid, Ocid)>>> for Memory {
    type Ok = Option<Record>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Record>, (Cpid, Ocid)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let key = by.into_inner();
        let records = self.records.read().await;
        records
            .get(&key)
            .map(|doc| serde_json::from_str(doc))
            .transpose()
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)
    }
}

impl Database<Insert<Record>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(record): Insert<Record>,
    ) -> Result<Self::Ok, Self::Err> {
        let doc = serde_json::to_string(&record)
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;

        let mut records = self.records.write().await;
        let key = record.key();
        if records.contains_key(&key) {
            return Err(tracerr::map_from(tracerr::new!(
                Error::AlreadyExists(key.0, key.1)
            )));
        }
        log::debug!("inserting `Record(ocid: {})`", key.1);
        drop(records.insert(key, doc));

        Ok(())
    }
}

impl Database<Update<Record>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(record): Update<Record>,
    ) -> Result<Self::Ok, Self::Err> {
        let doc = serde_json::to_string(&record)
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;

        let key = record.key();
        log::debug!("replacing `Record(ocid: {})`", key.1);
        drop(self.records.write().await.insert(key, doc));

        Ok(())
    }
}

/// [`Memory`] database [`Error`].
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// [`Record`] (de)serialization failed.
    #[display("`Record` (de)serialization failed: {_0}")]
    #[from]
    Serde(serde_json::Error),

    /// [`Record`] with the same key exists already.
    #[display("`Record(cpid: {_0}, ocid: {_1})` exists already")]
    AlreadyExists(
        #[error(not(source))] Cpid,
        #[error(not(source))] Ocid,
    ),
}
