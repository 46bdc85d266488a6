//! [`Command`] for creating a selective Contract Notice on a Planning Notice.

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

/// [`Command`] for creating a selective Contract Notice on a Planning Notice.
#[derive(Clone, Debug, From, Into)]
pub struct CreateSelectiveCnOnPn(pub CnOnPn);

/// [`Transition`] performed by the [`CreateSelectiveCnOnPn`] [`Command`].
const TRANSITION: Transition = Transition {
    stage: Stage::Ev,
    status_details: StatusDetails::Submission,
    contract_periods: cn_on_pn::SELECTIVE,
    amount: AmountRule::LotsNotAboveTender,
    auctions: true,
    tender_period: true,
    candidates: true,
};

impl<Db, Gen, Rl> Command<Check<CreateSelectiveCnOnPn>> for Service<Db, Gen, Rl>
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
        Check(cmd): Check<CreateSelectiveCnOnPn>,
    ) -> Result<Self::Ok, Self::Err> {
        log::debug!("checking `CreateSelectiveCnOnPn` of `{}`", cmd.0.cpid);

        let prepared = self
            .prepare_cn_on_pn(TRANSITION, cmd.0)
            .await
            .inspect_err(|e| log_rejection("CreateSelectiveCnOnPn", e))?;

        Ok(CheckOutput {
            is_auction_required: prepared.is_auction_required,
        })
    }
}

impl<Db, Gen, Rl> Command<CreateSelectiveCnOnPn> for Service<Db, Gen, Rl>
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
        cmd: CreateSelectiveCnOnPn,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        log::debug!("executing `CreateSelectiveCnOnPn` of `{}`", cmd.0.cpid);

        let prepared = self
            .prepare_cn_on_pn(TRANSITION, cmd.0)
            .await
            .inspect_err(|e| log_rejection("CreateSelectiveCnOnPn", e))?;
        let record = prepared.record;

        self.database()
            .execute(Insert(record.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .inspect_err(|e| log_rejection("CreateSelectiveCnOnPn", e))
            .map(drop)?;
        log::info!("`CreateSelectiveCnOnPn` saved `{}`", record.ocid);

        Ok(Output {
            cpid: record.cpid.clone(),
            ocid: record.ocid.clone(),
            token: None,
            lot_ids: prepared.ids.lots.into_inner(),
            tender: record.into(),
        })
    }
}
