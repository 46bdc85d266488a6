//! [`Command`] for creating an open Contract Notice on a Planning Notice.

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

/// [`Command`] for creating an open Contract Notice on a Planning Notice.
#[derive(Clone, Debug, From, Into)]
pub struct CreateOpenCnOnPn(pub CnOnPn);

/// [`Transition`] performed by the [`CreateOpenCnOnPn`] [`Command`].
const TRANSITION: Transition = Transition {
    stage: Stage::Ev,
    status_details: StatusDetails::Clarification,
    contract_periods: cn_on_pn::OPEN,
    amount: AmountRule::TenderNotAboveLots,
    auctions: true,
    tender_period: true,
    candidates: false,
};

impl<Db, Gen, Rl> Command<Check<CreateOpenCnOnPn>> for Service<Db, Gen, Rl>
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
        Check(cmd): Check<CreateOpenCnOnPn>,
    ) -> Result<Self::Ok, Self::Err> {
        log::debug!("checking `CreateOpenCnOnPn` of `{}`", cmd.0.cpid);

        let prepared = self
            .prepare_cn_on_pn(TRANSITION, cmd.0)
            .await
            .inspect_err(|e| log_rejection("CreateOpenCnOnPn", e))?;

        Ok(CheckOutput {
            is_auction_required: prepared.is_auction_required,
        })
    }
}

impl<Db, Gen, Rl> Command<CreateOpenCnOnPn> for Service<Db, Gen, Rl>
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
        cmd: CreateOpenCnOnPn,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        log::debug!("executing `CreateOpenCnOnPn` of `{}`", cmd.0.cpid);

        let prepared = self
            .prepare_cn_on_pn(TRANSITION, cmd.0)
            .await
            .inspect_err(|e| log_rejection("CreateOpenCnOnPn", e))?;
        let record = prepared.record;

        self.database()
            .execute(Insert(record.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .inspect_err(|e| log_rejection("CreateOpenCnOnPn", e))
            .map(drop)?;
        log::info!("`CreateOpenCnOnPn` saved `{}`", record.ocid);

        Ok(Output {
            cpid: record.cpid.clone(),
            ocid: record.ocid.clone(),
            token: None,
            lot_ids: prepared.ids.lots.into_inner(),
            tender: record.into(),
        })
    }
}
