//! [`Command`] for updating an active Contract Notice.

use std::collections::HashSet;

use common::{
    operations::{By, Check, Select, Update},
    DateTime,
};
use secrecy::SecretBox;
use tracerr::Traced;
use tracing as log;

use crate::{
    calculation,
    domain::{
        record::{Cpid, Ocid, Owner, Stage, Token},
        Record, Tender,
    },
    infra::{database, rules, Database, Generator, Rules},
    request,
    validation::{
        self, auction, documents, items, lots,
        lots::{ContractPeriodPolicy, ContractPeriodRule},
        organization, status, value,
    },
    Service,
};

use super::{
    build, log_rejection, CheckOutput, Command, ExecutionError, Output,
};

/// [`Command`] for updating an active Contract Notice.
#[derive(Clone, Debug)]
pub struct UpdateCn {
    /// [`Cpid`] of the process.
    pub cpid: Cpid,

    /// [`Ocid`] of the Contract Notice.
    pub ocid: Ocid,

    /// [`Owner`] claiming the Contract Notice.
    pub owner: Owner,

    /// [`Token`] granting write access to the Contract Notice.
    pub token: SecretBox<Token>,

    /// Reference [`DateTime`] of the update.
    pub start_date: DateTime,

    /// Received [`request::Tender`].
    pub tender: request::Tender,
}

/// [`ContractPeriodPolicy`] of the [`UpdateCn`] [`Command`].
const CONTRACT_PERIODS: ContractPeriodPolicy = ContractPeriodPolicy {
    open: ContractPeriodRule::AfterTenderPeriodEnd,
    restricted: ContractPeriodRule::AfterStartDate,
};

/// Contract Notice updated out of the saved one.
#[derive(Debug)]
struct Prepared {
    /// Updated [`Record`] to replace the saved one.
    record: Record,

    /// Permanent IDs of the lots received with temporary ones.
    ids: build::Ids,

    /// Indicator whether an electronic auction is required.
    is_auction_required: bool,
}

impl<Db, Gen, Rl> Service<Db, Gen, Rl>
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
    /// Validates the provided [`UpdateCn`] request and merges it into the
    /// saved Contract Notice, without persisting anything.
    async fn prepare_update_cn(
        &self,
        cmd: UpdateCn,
    ) -> Result<Prepared, Traced<ExecutionError>> {
        use ExecutionError as E;

        let cn = self
            .database()
            .execute(Select(By::<Option<Record>, _>::new((
                cmd.cpid.clone(),
                cmd.ocid.clone(),
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|r| r.stage() != Stage::Pn)
            .ok_or_else(|| {
                validation::Error::NotFound(format!(
                    "contract notice `{}` of `{}`",
                    cmd.ocid, cmd.cpid,
                ))
            })
            .map_err(tracerr::from_and_wrap!(=> E))?;

        validate(&cn, &cmd).map_err(tracerr::from_and_wrap!(=> E))?;

        let required = self
            .rules()
            .execute(Select(By::<rules::AuctionRequired, _>::new(
                rules::Params {
                    country: cn.cpid.country(),
                    method: cn.tender.procurement_method,
                    category: cn.tender.main_procurement_category,
                },
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        auction::consistency(&cmd.tender, *required)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let (record, ids) = merge(cn, cmd.tender, self.generator())
            .map_err(tracerr::from_and_wrap!(=> E))?;

        Ok(Prepared {
            record,
            ids,
            is_auction_required: *required,
        })
    }
}

impl<Db, Gen, Rl> Command<Check<UpdateCn>> for Service<Db, Gen, Rl>
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
        Check(cmd): Check<UpdateCn>,
    ) -> Result<Self::Ok, Self::Err> {
        log::debug!("checking `UpdateCn` of `{}`", cmd.ocid);

        let prepared = self
            .prepare_update_cn(cmd)
            .await
            .inspect_err(|e| log_rejection("UpdateCn", e))?;

        Ok(CheckOutput {
            is_auction_required: prepared.is_auction_required,
        })
    }
}

impl<Db, Gen, Rl> Command<UpdateCn> for Service<Db, Gen, Rl>
where
    Db: Database<
            Select<By<Option<Record>, (Cpid, Ocid)>>,
            Ok = Option<Record>,
            Err = Traced<database::Error>,
        > + Database<Update<Record>, Err = Traced<database::Error>>,
    Gen: Generator,
    Rl: Rules<
        Select<By<rules::AuctionRequired, rules::Params>>,
        Ok = rules::AuctionRequired,
        Err = Traced<rules::Error>,
    >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateCn) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        log::debug!("executing `UpdateCn` of `{}`", cmd.ocid);

        let prepared = self
            .prepare_update_cn(cmd)
            .await
            .inspect_err(|e| log_rejection("UpdateCn", e))?;
        let record = prepared.record;

        self.database()
            .execute(Update(record.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .inspect_err(|e| log_rejection("UpdateCn", e))
            .map(drop)?;
        log::info!("`UpdateCn` saved `{}`", record.ocid);

        Ok(Output {
            cpid: record.cpid.clone(),
            ocid: record.ocid.clone(),
            token: None,
            lot_ids: prepared.ids.lots.into_inner(),
            tender: record.into(),
        })
    }
}

/// Runs the validations of the `cmd` preceding the rules lookup.
fn validate(cn: &Record, cmd: &UpdateCn) -> Result<(), validation::Error> {
    let received = &cmd.tender;
    let saved = &cn.tender;

    cn.authorize(&cmd.owner, &cmd.token)?;
    status::active(saved)?;

    lots::unique_ids(&received.lots)?;
    items::unique_ids(&received.items)?;
    documents::unique_ids(&received.documents)?;
    organization::same_procuring_entity(
        received.procuring_entity.as_ref(),
        &saved.procuring_entity.id,
    )?;
    let persons = received.persons();
    organization::unique_persons(persons)?;
    organization::unique_business_functions(persons)?;
    organization::unique_business_function_documents(persons)?;
    organization::business_function_types(persons)?;
    organization::business_function_periods(persons, cmd.start_date)?;

    documents::allowed_types(&received.documents)?;
    items::positive_quantities(&received.items)?;

    lots::active_lots_transferred(&received.lots, &saved.lots)?;
    let known = lots::ids(&received.lots, &saved.lots);
    items::related_lots_exist(&received.items, &known)?;
    documents::related_lots_exist(&received.documents, &known)?;
    auction::related_lots_exist(received.electronic_auctions.as_ref(), &known)?;

    lots::non_zero_values(&received.lots)?;
    lots::budget_currency(&received.lots, &cn.planning.budget.amount.currency)?;
    lots::contract_periods(
        &received.lots,
        saved.procurement_method,
        CONTRACT_PERIODS,
        received.tender_period.as_ref().or(saved.tender_period.as_ref()),
        cmd.start_date,
    )
}

/// Merges the validated `received` [`request::Tender`] into the `cn`
/// [`Record`].
///
/// Saved criteria and conversions are kept as is.
fn merge<G: Generator>(
    cn: Record,
    received: request::Tender,
    generator: &G,
) -> Result<(Record, build::Ids), validation::Error> {
    let Record {
        cpid,
        ocid,
        owner,
        token,
        created_at,
        planning,
        tender: saved,
    } = cn;

    let value = calculation::merged_tender_value(&received.lots, &saved.lots)?;
    value::stored_currency(&value, &saved.value)?;

    let request::Tender {
        title,
        description,
        procurement_method_rationale,
        tender_period,
        enquiry_period,
        procurement_method_modalities,
        electronic_auctions,
        lots,
        items,
        documents,
        criteria: _,
        conversions: _,
        award_criteria,
        award_criteria_details,
        procuring_entity,
        second_stage: _,
        pre_qualification: _,
    } = received;

    let mut ids = build::Ids::default();
    let lots = build::lots(lots, saved.lots, generator, &mut ids)?;
    let items = build::items(items, saved.items, generator, &mut ids);
    let documents = build::documents(documents, saved.documents, &ids);

    validation::lots::active_lots_have_items(&lots, &items)?;
    let contract_period =
        calculation::contract_period(lots.iter().map(|l| &l.contract_period))?;
    calculation::check_budget_coverage(
        &planning.budget.budget_breakdown,
        &contract_period,
    )?;

    let existing = saved
        .electronic_auctions
        .iter()
        .flat_map(|a| &a.details)
        .map(|d| d.id.as_str())
        .collect::<HashSet<_>>();
    let electronic_auctions =
        build::auctions(electronic_auctions, &existing, generator, &ids);
    let persons = procuring_entity.map(|pe| pe.persons).unwrap_or_default();

    let tender = Tender {
        title: title.unwrap_or(saved.title),
        description: description.unwrap_or(saved.description),
        procurement_method_rationale: procurement_method_rationale
            .or(saved.procurement_method_rationale),
        value,
        contract_period: Some(contract_period),
        tender_period: tender_period.or(saved.tender_period),
        enquiry_period: enquiry_period.or(saved.enquiry_period),
        procuring_entity: saved.procuring_entity.update(persons),
        lots,
        items,
        documents,
        award_criteria: award_criteria.or(saved.award_criteria),
        award_criteria_details: award_criteria_details
            .or(saved.award_criteria_details),
        procurement_method_modalities,
        electronic_auctions,
        ..saved
    };

    let record = Record {
        cpid,
        ocid,
        owner,
        token,
        created_at,
        planning,
        tender,
    };
    Ok((record, ids))
}

#[cfg(test)]
mod spec {
    use common::operations::{Check, Insert};
    use secrecy::SecretBox;

    use crate::{
        domain::{
            document::DocumentType, lot, organization::BusinessFunctionType,
            record::Token, tender::Period, Record,
        },
        infra::{Database as _, Memory},
        query::record::ById,
        request, test_support as fx,
        validation::ErrorKind,
        Command as _, Query as _,
    };

    use super::UpdateCn;

    fn update(cn: &Record, tender: request::Tender) -> UpdateCn {
        UpdateCn {
            cpid: cn.cpid.clone(),
            ocid: cn.ocid.clone(),
            owner: cn.owner.clone(),
            token: SecretBox::new(Box::new(cn.token)),
            start_date: fx::start_date(),
            tender,
        }
    }

    fn unchanged() -> request::Tender {
        request::Tender {
            lots: vec![fx::received_lot("lot-1", "1000", "EUR")],
            items: vec![fx::item("item-1", "lot-1")],
            documents: vec![fx::document(
                "doc-1",
                DocumentType::TenderNotice,
                &["lot-1"],
            )],
            ..request::Tender::default()
        }
    }

    async fn rejection(tender: request::Tender) -> ErrorKind {
        let svc = fx::service(Memory::new());
        let cn = fx::cn_record();
        svc.database().execute(Insert(cn.clone())).await.unwrap();

        let err = svc.execute(update(&cn, tender)).await.unwrap_err();
        err.as_ref().kind().unwrap()
    }

    #[tokio::test]
    async fn keeps_unchanged_record_intact() {
        let svc = fx::service(Memory::new());
        let cn = fx::cn_record();
        svc.database().execute(Insert(cn.clone())).await.unwrap();

        let out = svc.execute(update(&cn, unchanged())).await.unwrap();

        assert!(out.lot_ids.is_empty());
        assert!(out.token.is_none());
        let saved = svc.execute(ById::by(cn.key())).await.unwrap();
        assert_eq!(saved, Some(cn));
    }

    #[tokio::test]
    async fn adds_new_lot_with_permanent_id() {
        let svc = fx::service(Memory::new());
        let cn = fx::cn_record();
        svc.database().execute(Insert(cn.clone())).await.unwrap();

        let mut tender = unchanged();
        tender.lots.push(fx::received_lot("temp-1", "500.50", "EUR"));
        tender.items.push(fx::item("item-2", "temp-1"));
        let out = svc.execute(update(&cn, tender)).await.unwrap();

        let permanent = out.lot_ids[&lot::Id::from("temp-1")].clone();
        let saved = svc.execute(ById::by(cn.key())).await.unwrap().unwrap();
        assert_eq!(saved.tender.value, "1500.50EUR".parse().unwrap());
        assert_eq!(saved.tender.lots.len(), 2);
        assert_eq!(saved.tender.lots[1].id, permanent);
        assert_eq!(saved.tender.lots[1].status, lot::Status::Active);
        assert_eq!(saved.tender.items[1].related_lot, permanent);
    }

    #[tokio::test]
    async fn requires_active_lots_transferred() {
        let mut tender = unchanged();
        tender.lots.clear();

        assert_eq!(rejection(tender).await, ErrorKind::MissingCoverage);
    }

    #[tokio::test]
    async fn rejects_deprecated_business_function() {
        let mut person = fx::person("MD-IDNO", "1");
        person.business_functions[0].kind = BusinessFunctionType::Authority;
        let tender = request::Tender {
            procuring_entity: Some(request::ProcuringEntity {
                id: "MD-IDNO-1010101".into(),
                persons: vec![person],
            }),
            ..unchanged()
        };

        assert_eq!(rejection(tender).await, ErrorKind::InvalidEnumValue);
    }

    #[tokio::test]
    async fn rejects_empty_contract_period() {
        let mut tender = unchanged();
        let start = tender.lots[0].contract_period.start_date;
        tender.lots[0].contract_period = Period {
            start_date: start,
            end_date: start,
        };

        assert_eq!(rejection(tender).await, ErrorKind::InvalidRange);
    }

    #[tokio::test]
    async fn rejects_documents_of_unknown_lots() {
        let mut tender = unchanged();
        tender.documents[0].related_lots.push("ghost".into());

        assert_eq!(rejection(tender).await, ErrorKind::DanglingReference);
    }

    #[tokio::test]
    async fn rejects_uncovered_active_lot() {
        let mut tender = unchanged();
        tender.lots.push(fx::received_lot("temp-1", "500", "EUR"));

        assert_eq!(rejection(tender).await, ErrorKind::MissingCoverage);
    }

    #[tokio::test]
    async fn rejects_foreign_token() {
        let svc = fx::service(Memory::new());
        let cn = fx::cn_record();
        svc.database().execute(Insert(cn.clone())).await.unwrap();

        let mut cmd = update(&cn, unchanged());
        cmd.token = SecretBox::new(Box::new(Token::new()));
        let err = svc.execute(cmd).await.unwrap_err();

        assert_eq!(err.as_ref().kind(), Some(ErrorKind::Unauthorized));
    }

    #[tokio::test]
    async fn rejects_unknown_and_planning_records() {
        let svc = fx::service(Memory::new());
        let cn = fx::cn_record();
        let err = svc
            .execute(Check(update(&cn, unchanged())))
            .await
            .unwrap_err();
        assert_eq!(err.as_ref().kind(), Some(ErrorKind::NotFound));

        let pn = fx::pn_record();
        svc.database().execute(Insert(pn.clone())).await.unwrap();
        let err = svc
            .execute(Check(update(&pn, unchanged())))
            .await
            .unwrap_err();
        assert_eq!(err.as_ref().kind(), Some(ErrorKind::NotFound));
    }

    #[tokio::test]
    async fn checks_without_saving() {
        let svc = fx::service(Memory::new());
        let cn = fx::cn_record();
        svc.database().execute(Insert(cn.clone())).await.unwrap();

        let mut tender = unchanged();
        tender.lots[0].title = "Renamed".into();
        let out = svc.execute(Check(update(&cn, tender))).await.unwrap();

        assert!(!out.is_auction_required);
        let saved = svc.execute(ById::by(cn.key())).await.unwrap();
        assert_eq!(saved, Some(cn));
    }
}
