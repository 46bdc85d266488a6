//! [`Command`] definition.

mod build;
mod cn_on_pn;
pub mod create_cn;
pub mod create_negotiation_cn_on_pn;
pub mod create_open_cn_on_pn;
pub mod create_selective_cn_on_pn;
pub mod update_cn;

use std::collections::HashMap;

use derive_more::{Display, Error, From};
use secrecy::SecretBox;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        lot,
        record::{Cpid, Ocid, Token},
    },
    infra::{database, rules},
    read,
    validation::{self, ErrorKind},
};

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    cn_on_pn::CnOnPn,
    create_cn::CreateCn,
    create_negotiation_cn_on_pn::CreateNegotiationCnOnPn,
    create_open_cn_on_pn::CreateOpenCnOnPn,
    create_selective_cn_on_pn::CreateSelectiveCnOnPn, update_cn::UpdateCn,
};

/// Outcome of a [`Check`]ed [`Command`].
///
/// [`Check`]: common::operations::Check
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CheckOutput {
    /// Indicator whether an electronic auction is required.
    pub is_auction_required: bool,
}

/// Outcome of an executed [`Command`].
#[derive(Debug)]
pub struct Output {
    /// [`Cpid`] of the affected process.
    pub cpid: Cpid,

    /// [`Ocid`] of the produced record.
    pub ocid: Ocid,

    /// [`Token`] of a newly created process.
    pub token: Option<SecretBox<Token>>,

    /// Permanent IDs assigned to the lots received with temporary ones.
    pub lot_ids: HashMap<lot::Id, lot::Id>,

    /// [`read::tender::View`] of the produced record.
    pub tender: read::tender::View,
}

/// Error of a [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    ///
    /// [`Database`]: crate::infra::Database
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Rules`] lookup error.
    ///
    /// [`Rules`]: crate::infra::Rules
    #[display("`Rules` lookup failed: {_0}")]
    Rules(rules::Error),

    /// Request is invalid.
    #[display("{_0}")]
    Invalid(validation::Error),
}

impl ExecutionError {
    /// Returns the [`ErrorKind`] if this [`ExecutionError`] is a validation
    /// one.
    #[must_use]
    pub const fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Invalid(e) => Some(e.kind()),
            Self::Db(_) | Self::Rules(_) => None,
        }
    }
}

/// Logs the rejection of the `command` with the provided error.
fn log_rejection(command: &str, e: &Traced<ExecutionError>) {
    match e.as_ref().kind() {
        Some(kind) => log::warn!(%kind, "`{command}` rejected: {e}"),
        None => log::error!("`{command}` failed: {e}"),
    }
}
