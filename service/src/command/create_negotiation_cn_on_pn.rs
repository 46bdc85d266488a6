//! [`Command`] for creating a negotiated Contract Notice on a Planning Notice.

use common::operations::{By, Check, Insert, Select};
use derive_more::{From, Into};
use tracerr::Traced;
use tracing as log;

use crate::{
    calculation::AmountRule,
    domain::{
        record::{Cpid, Ocid, Stage},
        tender::StatusDetails,
        Record,
    },
    infra::{database, rules, Database, Generator, Rules},
    Service,
};

use super::{
    cn_on_pn::{self, CnOnPn, Transition},
    log_rejection, CheckOutput, Command, ExecutionError, Output,
};

/// [`Command`] for creating a negotiated Contract Notice on a Planning Notice.
#[derive(Clone, Debug, From, Into)]
pub struct CreateNegotiationCnOnPn(pub CnOnPn);

/// [`Transition`] performed by the [`CreateNegotiationCnOnPn`] [`Command`].
const TRANSITION: Transition = Transition {
    stage: Stage::Np,
    status_details: StatusDetails::Negotiation,
    contract_periods: cn_on_pn::NEGOTIATED,
    amount: AmountRule::TenderNotAboveLots,
    auctions: false,
    tender_period: false,
    candidates: false,
};

impl<Db, Gen, Rl> Command<Check<CreateNegotiationCnOnPn>>
    for Service<Db, Gen, Rl>
where
    Db: Database<
        Select<By<Option<Record>, (Cpid, Ocid)>>,
        Ok = Option<Record>,
        Err = Traced<database::Error>,
    >,
    Gen: Generator,
    Rl: Rules<
        Select<By<rules::AuctionRequired, rules::Params>>,
        Ok = rules::AuctionRequired,
        Err = Traced<rules::Error>,
    >,
{
    type Ok = CheckOutput;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        Check(cmd): Check<CreateNegotiationCnOnPn>,
    ) -> Result<Self::Ok, Self::Err> {
        log::debug!("checking `CreateNegotiationCnOnPn` of `{}`", cmd.0.cpid);

        let prepared = self
            .prepare_cn_on_pn(TRANSITION, cmd.0)
            .await
            .inspect_err(|e| log_rejection("CreateNegotiationCnOnPn", e))?;

        Ok(CheckOutput {
            is_auction_required: prepared.is_auction_required,
        })
    }
}

impl<Db, Gen, Rl> Command<CreateNegotiationCnOnPn> for Service<Db, Gen, Rl>
where
    Db: Database<
            Select<By<Option<Record>, (Cpid, Ocid)>>,
            Ok = Option<Record>,
            Err = Traced<database::Error>,
        > + Database<Insert<Record>, Err = Traced<database::Error>>,
    Gen: Generator,
    Rl: Rules<
        Select<By<rules::AuctionRequired, rules::Params>>,
        Ok = rules::AuctionRequired,
        Err = Traced<rules::Error>,
    >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateNegotiationCnOnPn,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        log::debug!("executing `CreateNegotiationCnOnPn` of `{}`", cmd.0.cpid);

        let prepared = self
            .prepare_cn_on_pn(TRANSITION, cmd.0)
            .await
            .inspect_err(|e| log_rejection("CreateNegotiationCnOnPn", e))?;
        let record = prepared.record;

        self.database()
            .execute(Insert(record.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .inspect_err(|e| log_rejection("CreateNegotiationCnOnPn", e))
            .map(drop)?;
        log::info!("`CreateNegotiationCnOnPn` saved `{}`", record.ocid);

        Ok(Output {
            cpid: record.cpid.clone(),
            ocid: record.ocid.clone(),
            token: None,
            lot_ids: prepared.ids.lots.into_inner(),
            tender: record.into(),
        })
    }
}
